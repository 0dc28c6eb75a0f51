//! 发音词典
//!
//! 每个 (腔调, 发音格式) 一张表：词 → 一个或多个候选发音

pub mod store;

pub use store::LexiconStore;

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{HakkaError, HakkaResult};

/// 词典文件中的单个候选发音
///
/// 英文词典的候选可以写成音素数组，加载时以空格连接。
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCandidate {
    Joined(String),
    Phonemes(Vec<String>),
}

impl RawCandidate {
    fn into_string(self) -> String {
        match self {
            RawCandidate::Joined(s) => s,
            RawCandidate::Phonemes(phonemes) => phonemes.join(" "),
        }
    }
}

/// 发音词典（加载后不可变）
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: HashMap<String, Vec<String>>,
}

impl Lexicon {
    /// 从词条构建，候选列表不可为空
    pub fn from_entries<I, W, P>(entries: I) -> HakkaResult<Self>
    where
        I: IntoIterator<Item = (W, P)>,
        W: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        let mut lexicon = Self::default();
        for (word, prons) in entries {
            let word = word.into();
            let prons: Vec<String> = prons.into_iter().map(Into::into).collect();
            if prons.is_empty() {
                return Err(HakkaError::LexiconLoad {
                    path: "<memory>".to_string(),
                    reason: format!("word '{}' has no pronunciation", word),
                });
            }
            lexicon.entries.insert(word, prons);
        }
        Ok(lexicon)
    }

    /// 解析 JSON 词典：`{"天公": ["tʰ-ien_24 k-uŋ_24"], ...}`
    pub fn from_json_str(content: &str, source: &str) -> HakkaResult<Self> {
        let raw: HashMap<String, Vec<RawCandidate>> =
            serde_json::from_str(content).map_err(|e| HakkaError::LexiconLoad {
                path: source.to_string(),
                reason: e.to_string(),
            })?;

        let mut entries = HashMap::with_capacity(raw.len());
        for (word, candidates) in raw {
            if word.is_empty() || candidates.is_empty() {
                return Err(HakkaError::LexiconLoad {
                    path: source.to_string(),
                    reason: format!("invalid entry '{}': empty word or pronunciation list", word),
                });
            }
            let prons = candidates.into_iter().map(RawCandidate::into_string).collect();
            entries.insert(word, prons);
        }

        Ok(Self { entries })
    }

    /// 从文件加载
    pub fn load(path: &Path) -> HakkaResult<Self> {
        let source = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| HakkaError::LexiconLoad {
            path: source.clone(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&content, &source)
    }

    /// 合并另一张词典：新词直接加入，已有词只追加不重复的候选
    pub fn merge(&mut self, other: Lexicon) {
        for (word, prons) in other.entries {
            let existing = self.entries.entry(word).or_default();
            for pron in prons {
                if !existing.contains(&pron) {
                    existing.push(pron);
                }
            }
        }
    }

    /// 精确查询
    pub fn get(&self, word: &str) -> Option<&[String]> {
        self.entries.get(word).map(Vec::as_slice)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
