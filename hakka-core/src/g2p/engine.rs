//! G2P Engine - 主管道
//!
//! 正规化 → 分词 → 逐词查发音 → 收集未知词 → 组装结果

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::HakkaConfig;
use crate::dialect::{Dialect, PronunciationFormat};
use crate::error::{HakkaError, HakkaResult};
use crate::g2p::result::{G2pResult, TokenDetail, TokenKind, WordPronunciation};
use crate::lexicon::{Lexicon, LexiconStore};
use crate::normalize::{is_punctuation, TextNormalizer};
use crate::tokenizer::{Segmentation, Segmenter, TokenizerCache, TokenizerKey};
use crate::variant::VariantMap;

/// G2P 参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct G2pOptions {
    /// 发音格式
    pub format: PronunciationFormat,
    /// 未知词占位符，None 时输出原词
    pub unknown_token: Option<String>,
    /// 是否在发音序列中保留未知词
    pub keep_unknown: bool,
    /// 是否套用异体字对照表
    pub use_variant_map: bool,
    /// 是否查询英文词典（仅支持 IPA）
    pub include_english: bool,
}

impl Default for G2pOptions {
    fn default() -> Self {
        Self {
            format: PronunciationFormat::Ipa,
            unknown_token: None,
            keep_unknown: true,
            use_variant_map: true,
            include_english: false,
        }
    }
}

impl G2pOptions {
    pub fn with_format(mut self, format: PronunciationFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_unknown_token(mut self, token: impl Into<String>) -> Self {
        self.unknown_token = Some(token.into());
        self
    }

    pub fn with_keep_unknown(mut self, keep: bool) -> Self {
        self.keep_unknown = keep;
        self
    }

    pub fn with_variant_map(mut self, enabled: bool) -> Self {
        self.use_variant_map = enabled;
        self
    }

    pub fn with_english(mut self, enabled: bool) -> Self {
        self.include_english = enabled;
        self
    }

    /// 参数组合校验：英文词典只有 IPA 版本
    fn validate(&self) -> HakkaResult<()> {
        if self.include_english && self.format != PronunciationFormat::Ipa {
            return Err(HakkaError::UnsupportedFormat(format!(
                "{} (English lookup supports ipa only)",
                self.format
            )));
        }
        Ok(())
    }
}

/// 单个 token 的查询结果
struct Resolution<'a> {
    kind: TokenKind,
    candidates: Option<&'a [String]>,
}

/// 逐词查询发音
struct Resolver {
    lexicon: Arc<Lexicon>,
    english: Option<Arc<Lexicon>>,
}

impl Resolver {
    fn resolve<'a>(&'a self, word: &'a str) -> Resolution<'a> {
        if is_punctuation(word) {
            return Resolution {
                kind: TokenKind::Punctuation,
                candidates: None,
            };
        }

        let (kind, candidates) = match &self.english {
            Some(english) if is_latin_word(word) => (TokenKind::English, english.get(word)),
            _ => (TokenKind::Known, self.lexicon.get(word)),
        };

        match candidates {
            Some(candidates) => Resolution {
                kind,
                candidates: Some(candidates),
            },
            None => Resolution {
                kind: TokenKind::Unknown,
                candidates: None,
            },
        }
    }
}

/// G2P 引擎
///
/// 持有词典仓库与分词器缓存；缓存随引擎实例存在，互不影响。
#[derive(Debug)]
pub struct G2pEngine {
    lexicons: LexiconStore,
    tokenizers: TokenizerCache,
    normalizer: TextNormalizer,
}

impl G2pEngine {
    /// 创建引擎（使用内置异体字表）
    pub fn new(lexicons: LexiconStore) -> Self {
        Self {
            lexicons,
            tokenizers: TokenizerCache::new(),
            normalizer: TextNormalizer::default(),
        }
    }

    /// 从配置创建
    pub fn from_config(config: &HakkaConfig) -> HakkaResult<Self> {
        let normalizer = match &config.variant_map {
            Some(path) => TextNormalizer::new(Arc::new(VariantMap::load(path)?)),
            None => TextNormalizer::default(),
        };

        Ok(Self::new(LexiconStore::from_dir(&config.lexicon_dir)).with_normalizer(normalizer))
    }

    pub fn with_normalizer(mut self, normalizer: TextNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn lexicons(&self) -> &LexiconStore {
        &self.lexicons
    }

    /// 正规化文本
    pub fn normalize(&self, text: &str, use_variant_map: bool) -> String {
        self.normalizer.normalize(text, use_variant_map)
    }

    /// 分词，返回词与词表外的词
    pub fn run_jieba(
        &self,
        text: &str,
        dialect: Dialect,
        include_english: bool,
    ) -> HakkaResult<Segmentation> {
        Ok(self.segmenter(dialect, include_english)?.cut(text))
    }

    /// 直接查询词典（不分词）
    pub fn get_pronunciation(
        &self,
        word: &str,
        dialect: Dialect,
        format: PronunciationFormat,
    ) -> HakkaResult<Option<Vec<String>>> {
        self.lexicons.get_pronunciation(word, dialect, format)
    }

    /// 分词并附上每个词的全部候选发音（IPA）
    ///
    /// 输入按原样分词，不做正规化。
    pub fn segment_with_pronunciation(
        &self,
        text: &str,
        dialect: Dialect,
        include_english: bool,
    ) -> HakkaResult<Vec<WordPronunciation>> {
        let segmenter = self.segmenter(dialect, include_english)?;
        let resolver = self.resolver(dialect, PronunciationFormat::Ipa, include_english)?;

        Ok(segmenter
            .segment(text)
            .into_iter()
            .map(|(word, _)| {
                let resolution = resolver.resolve(word);
                let pronunciations = match resolution.kind {
                    TokenKind::Punctuation => Some(vec![word.to_string()]),
                    _ => resolution.candidates.map(<[String]>::to_vec),
                };
                WordPronunciation {
                    word: word.to_string(),
                    pronunciations,
                }
            })
            .collect())
    }

    /// 文本转发音
    pub fn g2p(
        &self,
        text: &str,
        dialect: Dialect,
        options: &G2pOptions,
    ) -> HakkaResult<G2pResult> {
        // 1. 参数校验（先于任何处理）
        options.validate()?;

        // 2. 正规化
        let normalized = self.normalize(text, options.use_variant_map);

        // 3. 分词器与词典
        let segmenter = self.segmenter(dialect, options.include_english)?;
        let resolver = self.resolver(dialect, options.format, options.include_english)?;

        if normalized.is_empty() {
            return Ok(G2pResult::default());
        }

        // 4. 逐词查询
        let tokens = segmenter.segment(&normalized);
        let mut pronunciations = Vec::with_capacity(tokens.len());
        let mut unknown_words = Vec::new();
        let mut details = Vec::with_capacity(tokens.len());

        for (word, span) in tokens {
            let resolution = resolver.resolve(word);

            let pronunciation = match resolution.kind {
                TokenKind::Punctuation => Some(word.to_string()),
                // 多音词取第一个候选
                _ => resolution.candidates.and_then(|c| c.first()).cloned(),
            };

            match &pronunciation {
                Some(pron) => pronunciations.push(pron.clone()),
                None => {
                    unknown_words.push(word.to_string());
                    if options.keep_unknown {
                        let placeholder = options.unknown_token.as_deref().unwrap_or(word);
                        pronunciations.push(placeholder.to_string());
                    }
                }
            }

            details.push(TokenDetail {
                word: word.to_string(),
                kind: resolution.kind,
                pronunciation,
                span,
            });
        }

        tracing::debug!(
            "G2P {}: {} tokens, {} unknown",
            dialect,
            details.len(),
            unknown_words.len()
        );

        Ok(G2pResult::new(pronunciations, unknown_words, details))
    }

    /// 文本转发音字符串（以空格连接）
    pub fn text_to_pronunciation(
        &self,
        text: &str,
        dialect: Dialect,
        options: &G2pOptions,
    ) -> HakkaResult<String> {
        Ok(self.g2p(text, dialect, options)?.join(" "))
    }

    /// 预先构建全部腔调的分词器
    pub fn init_tokenizers(&self, include_english: bool) -> HakkaResult<()> {
        for dialect in Dialect::ALL {
            self.segmenter(dialect, include_english)?;
        }
        Ok(())
    }

    /// 已缓存分词器的腔调
    pub fn cached_tokenizers(&self) -> Vec<Dialect> {
        self.tokenizers.cached_dialects()
    }

    /// 清空分词器缓存（词典变更后需调用）
    pub fn clear_tokenizer_cache(&self) {
        self.tokenizers.clear();
    }

    fn segmenter(&self, dialect: Dialect, include_english: bool) -> HakkaResult<Arc<Segmenter>> {
        self.tokenizers
            .get_or_build(TokenizerKey::new(dialect, include_english), || {
                Ok(Segmenter::new(self.lexicons.vocabulary(dialect, include_english)?))
            })
    }

    fn resolver(
        &self,
        dialect: Dialect,
        format: PronunciationFormat,
        include_english: bool,
    ) -> HakkaResult<Resolver> {
        let english = if include_english {
            Some(self.lexicons.english(format)?)
        } else {
            None
        };

        Ok(Resolver {
            lexicon: self.lexicons.lexicon(dialect, format)?,
            english,
        })
    }
}

/// 是否全部由拉丁字母组成
fn is_latin_word(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> G2pEngine {
        let ipa = Lexicon::from_entries([
            ("天公", vec!["tʰ-ien_24 k-uŋ_24"]),
            ("落水", vec!["l-ok_5 s-ui_31"]),
            ("天", vec!["tʰ-ien_24"]),
            ("水", vec!["s-ui_31"]),
            ("好", vec!["h-o_31", "h-au_55"]),
        ])
        .unwrap();
        let pinyin = Lexicon::from_entries([
            ("天公", vec!["tien24 gung24"]),
            ("落水", vec!["log5 sui31"]),
            ("好", vec!["ho31", "hau55"]),
        ])
        .unwrap();
        let english = Lexicon::from_entries([("HELLO", vec!["h ə l oʊ"])]).unwrap();

        G2pEngine::new(
            LexiconStore::new()
                .with_lexicon(Dialect::Sixian, PronunciationFormat::Ipa, ipa)
                .with_lexicon(Dialect::Sixian, PronunciationFormat::Pinyin, pinyin)
                .with_english(PronunciationFormat::Ipa, english),
        )
    }

    #[test]
    fn test_basic_g2p() {
        let engine = engine();
        let result = engine.g2p("天公落水", Dialect::Sixian, &G2pOptions::default()).unwrap();

        assert_eq!(result.pronunciations(), ["tʰ-ien_24 k-uŋ_24", "l-ok_5 s-ui_31"]);
        assert!(!result.has_unknown());
        assert_eq!(result.details()[0].kind, TokenKind::Known);
        assert_eq!(result.details()[1].span, 6..12);
    }

    #[test]
    fn test_pinyin_format() {
        let engine = engine();
        let options = G2pOptions::default().with_format(PronunciationFormat::Pinyin);
        let text = engine.text_to_pronunciation("天公落水", Dialect::Sixian, &options).unwrap();
        assert_eq!(text, "tien24 gung24 log5 sui31");
    }

    #[test]
    fn test_polyphonic_first_candidate() {
        let engine = engine();
        let result = engine.g2p("好", Dialect::Sixian, &G2pOptions::default()).unwrap();
        assert_eq!(result.pronunciations(), ["h-o_31"]);
    }

    #[test]
    fn test_unknown_kept_literal() {
        let engine = engine();
        let result = engine.g2p("天公落水Hello", Dialect::Sixian, &G2pOptions::default()).unwrap();

        assert_eq!(result.unknown_words(), ["HELLO"]);
        assert_eq!(result.pronunciations().last().unwrap(), "HELLO");
        assert_eq!(result.details()[2].kind, TokenKind::Unknown);
        assert_eq!(result.details()[2].pronunciation, None);
    }

    #[test]
    fn test_unknown_placeholder() {
        let engine = engine();
        let options = G2pOptions::default().with_unknown_token("<unk>");
        let result = engine.g2p("天公HELLO落水", Dialect::Sixian, &options).unwrap();
        assert_eq!(result.pronunciations(), ["tʰ-ien_24 k-uŋ_24", "<unk>", "l-ok_5 s-ui_31"]);
    }

    #[test]
    fn test_unknown_dropped() {
        let engine = engine();
        let options = G2pOptions::default().with_keep_unknown(false).with_unknown_token("<unk>");
        let result = engine.g2p("天公HELLO落水", Dialect::Sixian, &options).unwrap();

        assert_eq!(result.pronunciations(), ["tʰ-ien_24 k-uŋ_24", "l-ok_5 s-ui_31"]);
        assert_eq!(result.unknown_words(), ["HELLO"]);
        // 明细仍然记录全部 token
        assert_eq!(result.details().len(), 3);
    }

    #[test]
    fn test_english_lookup() {
        let engine = engine();
        let options = G2pOptions::default().with_english(true);
        let result = engine.g2p("天公Hello", Dialect::Sixian, &options).unwrap();

        assert_eq!(result.pronunciations(), ["tʰ-ien_24 k-uŋ_24", "h ə l oʊ"]);
        assert_eq!(result.details()[1].kind, TokenKind::English);
        assert!(!result.has_unknown());
    }

    #[test]
    fn test_english_miss_is_unknown() {
        let engine = engine();
        let options = G2pOptions::default().with_english(true);
        let result = engine.g2p("WORLD", Dialect::Sixian, &options).unwrap();
        assert_eq!(result.unknown_words(), ["WORLD"]);
        assert_eq!(result.details()[0].kind, TokenKind::Unknown);
    }

    #[test]
    fn test_english_with_pinyin_rejected() {
        let engine = engine();
        let options = G2pOptions::default()
            .with_format(PronunciationFormat::Pinyin)
            .with_english(true);
        let err = engine.g2p("天公", Dialect::Sixian, &options).unwrap_err();

        assert!(matches!(err, HakkaError::UnsupportedFormat(_)));
        // 校验失败时不构建分词器
        assert!(engine.cached_tokenizers().is_empty());
    }

    #[test]
    fn test_punctuation_passthrough() {
        let engine = engine();
        let result = engine.g2p("天公,落水!", Dialect::Sixian, &G2pOptions::default()).unwrap();
        assert_eq!(result.pronunciations(), ["tʰ-ien_24 k-uŋ_24", "，", "l-ok_5 s-ui_31", "！"]);
        assert_eq!(result.details()[1].kind, TokenKind::Punctuation);
        assert!(!result.has_unknown());
    }

    #[test]
    fn test_empty_text_still_caches_tokenizer() {
        let engine = engine();
        let result = engine.g2p("「」", Dialect::Sixian, &G2pOptions::default()).unwrap();
        assert!(result.is_empty());
        assert_eq!(engine.cached_tokenizers(), vec![Dialect::Sixian]);
    }

    #[test]
    fn test_missing_lexicon_is_error() {
        let engine = engine();
        let err = engine.g2p("天公", Dialect::Hailu, &G2pOptions::default()).unwrap_err();
        assert!(matches!(err, HakkaError::LexiconLoad { .. }));
    }

    #[test]
    fn test_segment_with_pronunciation() {
        let engine = engine();
        let pairs = engine
            .segment_with_pronunciation("天公落水，好靚", Dialect::Sixian, false)
            .unwrap();

        let words: Vec<&str> = pairs.iter().map(|p| p.word.as_str()).collect();
        assert_eq!(words, vec!["天公", "落水", "，", "好", "靚"]);
        assert_eq!(
            pairs[3].pronunciations.as_deref(),
            Some(&["h-o_31".to_string(), "h-au_55".to_string()][..])
        );
        assert_eq!(pairs[2].pronunciations, Some(vec!["，".to_string()]));
        assert_eq!(pairs[4].pronunciations, None);
    }

    #[test]
    fn test_pua_and_extension_g_words() {
        let ipa = Lexicon::from_entries([
            ("\u{E000}\u{E001}", vec!["ŋ-ai_11 tʃ-o_24"]),
            ("\u{30000}人", vec!["p-a_31 ŋ-in_11"]),
            ("水", vec!["s-ui_31"]),
            ("人", vec!["ŋ-in_11"]),
        ])
        .unwrap();
        let engine = G2pEngine::new(LexiconStore::new().with_lexicon(
            Dialect::Raoping,
            PronunciationFormat::Ipa,
            ipa,
        ));

        let result = engine
            .g2p("\u{E000}\u{E001}水", Dialect::Raoping, &G2pOptions::default())
            .unwrap();
        assert_eq!(result.pronunciations(), ["ŋ-ai_11 tʃ-o_24", "s-ui_31"]);
        assert!(!result.has_unknown());

        let result = engine
            .g2p("\u{30000}人", Dialect::Raoping, &G2pOptions::default())
            .unwrap();
        assert_eq!(result.pronunciations(), ["p-a_31 ŋ-in_11"]);
        assert!(!result.has_unknown());
    }

    #[test]
    fn test_is_latin_word() {
        assert!(is_latin_word("HELLO"));
        assert!(!is_latin_word("OK1"));
        assert!(!is_latin_word("天"));
        assert!(!is_latin_word(""));
    }
}
