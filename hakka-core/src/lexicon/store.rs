//! 词典仓库
//!
//! 按 (腔调, 发音格式) 懒加载词典文件，加载后常驻内存。
//!
//! 目录结构：
//! ```text
//! <root>/ipa/hak_sx.json
//! <root>/ipa/eng_cmu.json      英文词典（可选，可多个）
//! <root>/pinyin/hak_sx.json
//! ```

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::dialect::{Dialect, PronunciationFormat};
use crate::error::{HakkaError, HakkaResult};
use crate::lexicon::Lexicon;

type TableKey = (Dialect, PronunciationFormat);

/// 英文词典文件名前缀
const ENGLISH_PREFIX: &str = "eng_";

/// 词典仓库
#[derive(Debug, Default)]
pub struct LexiconStore {
    /// 词典根目录（None 时只使用内存注册的词典）
    root: Option<PathBuf>,
    /// 内存注册的词典，不会被 clear() 清除
    registered: HashMap<TableKey, Arc<Lexicon>>,
    registered_english: HashMap<PronunciationFormat, Arc<Lexicon>>,
    /// 从文件加载的词典
    loaded: Mutex<HashMap<TableKey, Arc<Lexicon>>>,
    loaded_english: Mutex<HashMap<PronunciationFormat, Arc<Lexicon>>>,
}

impl LexiconStore {
    /// 仅使用内存词典
    pub fn new() -> Self {
        Self::default()
    }

    /// 从目录懒加载词典
    pub fn from_dir(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            ..Self::default()
        }
    }

    /// 注册一张腔调词典
    pub fn with_lexicon(
        mut self,
        dialect: Dialect,
        format: PronunciationFormat,
        lexicon: Lexicon,
    ) -> Self {
        self.registered.insert((dialect, format), Arc::new(lexicon));
        self
    }

    /// 注册英文词典
    pub fn with_english(mut self, format: PronunciationFormat, lexicon: Lexicon) -> Self {
        self.registered_english.insert(format, Arc::new(lexicon));
        self
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// 词典文件路径
    pub fn lexicon_path(root: &Path, dialect: Dialect, format: PronunciationFormat) -> PathBuf {
        root.join(format.as_str()).join(format!("{}.json", dialect.code()))
    }

    /// 获取腔调词典，首次访问时从文件加载
    ///
    /// 加载失败不会缓存，下次访问会重新尝试读取。
    pub fn lexicon(
        &self,
        dialect: Dialect,
        format: PronunciationFormat,
    ) -> HakkaResult<Arc<Lexicon>> {
        if let Some(lexicon) = self.registered.get(&(dialect, format)) {
            return Ok(Arc::clone(lexicon));
        }

        let mut loaded = lock(&self.loaded);
        if let Some(lexicon) = loaded.get(&(dialect, format)) {
            return Ok(Arc::clone(lexicon));
        }

        let path = match &self.root {
            Some(root) => Self::lexicon_path(root, dialect, format),
            None => {
                return Err(HakkaError::LexiconLoad {
                    path: "<memory>".to_string(),
                    reason: format!("no lexicon registered for {} / {}", dialect, format),
                })
            }
        };
        let lexicon = Arc::new(Lexicon::load(&path)?);
        tracing::info!("📖 加载词典: {} / {} ({} 词) {:?}", dialect, format, lexicon.len(), path);

        loaded.insert((dialect, format), Arc::clone(&lexicon));
        Ok(lexicon)
    }

    /// 获取英文词典（合并 `eng_*.json`，没有文件时为空表）
    pub fn english(&self, format: PronunciationFormat) -> HakkaResult<Arc<Lexicon>> {
        if let Some(lexicon) = self.registered_english.get(&format) {
            return Ok(Arc::clone(lexicon));
        }

        let mut loaded = lock(&self.loaded_english);
        if let Some(lexicon) = loaded.get(&format) {
            return Ok(Arc::clone(lexicon));
        }

        let mut merged = Lexicon::default();
        if let Some(root) = &self.root {
            for path in english_files(&root.join(format.as_str()))? {
                merged.merge(Lexicon::load(&path)?);
                tracing::info!("📖 加载英文词典: {:?}", path);
            }
        }

        let lexicon = Arc::new(merged);
        loaded.insert(format, Arc::clone(&lexicon));
        Ok(lexicon)
    }

    /// 查询单词的全部候选发音，不存在时返回 `Ok(None)`
    pub fn get_pronunciation(
        &self,
        word: &str,
        dialect: Dialect,
        format: PronunciationFormat,
    ) -> HakkaResult<Option<Vec<String>>> {
        Ok(self.lexicon(dialect, format)?.get(word).map(<[String]>::to_vec))
    }

    /// 分词词表：IPA 词典的全部词条，可选并入英文词典
    pub fn vocabulary(
        &self,
        dialect: Dialect,
        include_english: bool,
    ) -> HakkaResult<HashSet<String>> {
        let mut words: HashSet<String> = self
            .lexicon(dialect, PronunciationFormat::Ipa)?
            .words()
            .map(str::to_string)
            .collect();

        if include_english {
            words.extend(self.english(PronunciationFormat::Ipa)?.words().map(str::to_string));
        }

        Ok(words)
    }

    /// 当前常驻内存的腔调词典
    pub fn loaded_tables(&self) -> Vec<(Dialect, PronunciationFormat)> {
        let mut tables: Vec<TableKey> = self.registered.keys().copied().collect();
        tables.extend(lock(&self.loaded).keys().copied());
        tables.sort();
        tables.dedup();
        tables
    }

    /// 清除从文件加载的词典，下次访问时重新读取
    pub fn clear(&self) {
        lock(&self.loaded).clear();
        lock(&self.loaded_english).clear();
        tracing::debug!("词典缓存已清除");
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// 列出目录下的英文词典文件（按文件名排序）
fn english_files(dir: &Path) -> HakkaResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_english = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.starts_with(ENGLISH_PREFIX) && name.ends_with(".json"))
            .unwrap_or(false);
        if is_english && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_lexicon(root: &Path, format: &str, name: &str, content: &str) {
        let dir = root.join(format);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), content).unwrap();
    }

    fn sample_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        write_lexicon(
            dir.path(),
            "ipa",
            "hak_sx.json",
            r#"{"天公": ["tʰ-ien_24 k-uŋ_24"], "水": ["s-ui_31"]}"#,
        );
        write_lexicon(
            dir.path(),
            "pinyin",
            "hak_sx.json",
            r#"{"天公": ["tien24 gung24"], "水": ["sui31"]}"#,
        );
        write_lexicon(dir.path(), "ipa", "eng_a.json", r#"{"HELLO": ["h ə l oʊ"]}"#);
        write_lexicon(
            dir.path(),
            "ipa",
            "eng_b.json",
            r#"{"HELLO": ["h ɛ l oʊ"], "OK": [["o", "k", "e"]]}"#,
        );
        dir
    }

    #[test]
    fn test_lazy_load_from_dir() {
        let dir = sample_dir();
        let store = LexiconStore::from_dir(dir.path());
        assert_eq!(store.root(), Some(dir.path()));
        assert!(store.loaded_tables().is_empty());

        let prons = store
            .get_pronunciation("天公", Dialect::Sixian, PronunciationFormat::Pinyin)
            .unwrap()
            .unwrap();
        assert_eq!(prons, vec!["tien24 gung24"]);
        assert_eq!(store.loaded_tables(), vec![(Dialect::Sixian, PronunciationFormat::Pinyin)]);
    }

    #[test]
    fn test_lookup_miss_is_none() {
        let dir = sample_dir();
        let store = LexiconStore::from_dir(dir.path());
        assert!(store
            .get_pronunciation("落水", Dialect::Sixian, PronunciationFormat::Ipa)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_missing_dialect_file_is_load_error() {
        let dir = sample_dir();
        let store = LexiconStore::from_dir(dir.path());
        let err = store.lexicon(Dialect::Hailu, PronunciationFormat::Ipa).unwrap_err();
        assert!(matches!(err, HakkaError::LexiconLoad { .. }));
        // 失败不缓存
        assert!(store.loaded_tables().is_empty());
    }

    #[test]
    fn test_english_files_merged_in_order() {
        let dir = sample_dir();
        let store = LexiconStore::from_dir(dir.path());
        let english = store.english(PronunciationFormat::Ipa).unwrap();
        assert_eq!(english.get("HELLO").unwrap(), ["h ə l oʊ", "h ɛ l oʊ"]);
        assert_eq!(english.get("OK").unwrap(), ["o k e"]);

        // 拼音目录没有英文词典
        assert!(store.english(PronunciationFormat::Pinyin).unwrap().is_empty());
    }

    #[test]
    fn test_vocabulary() {
        let dir = sample_dir();
        let store = LexiconStore::from_dir(dir.path());

        let vocab = store.vocabulary(Dialect::Sixian, false).unwrap();
        assert_eq!(vocab.len(), 2);
        assert!(vocab.contains("天公"));
        assert!(!vocab.contains("HELLO"));

        let vocab = store.vocabulary(Dialect::Sixian, true).unwrap();
        assert!(vocab.contains("HELLO"));
        assert!(vocab.contains("OK"));
    }

    #[test]
    fn test_registered_lexicon_survives_clear() {
        let lexicon = Lexicon::from_entries([("天", ["tʰ-ien_24"])]).unwrap();
        let store =
            LexiconStore::new().with_lexicon(Dialect::Dapu, PronunciationFormat::Ipa, lexicon);

        assert!(store.root().is_none());
        store.clear();
        assert_eq!(
            store.get_pronunciation("天", Dialect::Dapu, PronunciationFormat::Ipa).unwrap(),
            Some(vec!["tʰ-ien_24".to_string()])
        );
        assert!(store.lexicon(Dialect::Dapu, PronunciationFormat::Pinyin).is_err());
    }

    #[test]
    fn test_clear_reloads_from_disk() {
        let dir = sample_dir();
        let store = LexiconStore::from_dir(dir.path());
        assert!(store
            .get_pronunciation("落水", Dialect::Sixian, PronunciationFormat::Ipa)
            .unwrap()
            .is_none());

        write_lexicon(dir.path(), "ipa", "hak_sx.json", r#"{"落水": ["l-ok_5 s-ui_31"]}"#);
        // 未清除前仍使用旧表
        assert!(store
            .get_pronunciation("落水", Dialect::Sixian, PronunciationFormat::Ipa)
            .unwrap()
            .is_none());

        store.clear();
        assert!(store
            .get_pronunciation("落水", Dialect::Sixian, PronunciationFormat::Ipa)
            .unwrap()
            .is_some());
    }
}
