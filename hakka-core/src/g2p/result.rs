//! G2P 结果模型

use std::fmt;
use std::ops::Range;

use serde::Serialize;

/// Token 分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// 腔调词典中的词
    Known,
    /// 保留标点（，。？！），原样输出
    Punctuation,
    /// 英文词典中的词
    English,
    /// 查不到发音的词
    Unknown,
}

/// 单个 token 的明细
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenDetail {
    /// 词
    pub word: String,
    /// 分类
    pub kind: TokenKind,
    /// 发音，未知词为 None
    pub pronunciation: Option<String>,
    /// 在正规化文本中的字节范围
    pub span: Range<usize>,
}

/// G2P 转换结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct G2pResult {
    pronunciations: Vec<String>,
    unknown_words: Vec<String>,
    details: Vec<TokenDetail>,
}

impl G2pResult {
    pub(crate) fn new(
        pronunciations: Vec<String>,
        unknown_words: Vec<String>,
        details: Vec<TokenDetail>,
    ) -> Self {
        Self {
            pronunciations,
            unknown_words,
            details,
        }
    }

    /// 发音序列（与 token 顺序对齐，丢弃的未知词除外）
    pub fn pronunciations(&self) -> &[String] {
        &self.pronunciations
    }

    /// 未知词（按出现顺序，保留重复）
    pub fn unknown_words(&self) -> &[String] {
        &self.unknown_words
    }

    /// 每个 token 的明细
    pub fn details(&self) -> &[TokenDetail] {
        &self.details
    }

    pub fn has_unknown(&self) -> bool {
        !self.unknown_words.is_empty()
    }

    /// 以分隔符连接发音
    pub fn join(&self, separator: &str) -> String {
        self.pronunciations.join(separator)
    }

    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }
}

impl fmt::Display for G2pResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join(" "))
    }
}

/// 分词 + 发音（`segment_with_pronunciation` 的结果）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordPronunciation {
    pub word: String,
    /// 全部候选发音，查不到时为 None
    pub pronunciations: Option<Vec<String>>,
}
