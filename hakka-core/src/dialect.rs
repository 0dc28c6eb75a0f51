//! 方言与发音格式
//!
//! 六种台湾客语腔调，以及 IPA / 拼音两种发音格式

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HakkaError;

/// 客语腔调
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Dialect {
    /// 四县腔
    #[default]
    Sixian,
    /// 南四县腔
    SouthSixian,
    /// 海陆腔
    Hailu,
    /// 大埔腔
    Dapu,
    /// 饶平腔
    Raoping,
    /// 诏安腔
    Zhaoan,
}

impl Dialect {
    /// 全部腔调（固定顺序）
    pub const ALL: [Dialect; 6] = [
        Dialect::Sixian,
        Dialect::SouthSixian,
        Dialect::Hailu,
        Dialect::Dapu,
        Dialect::Raoping,
        Dialect::Zhaoan,
    ];

    /// 腔调代码，同时也是词典文件名
    pub fn code(self) -> &'static str {
        match self {
            Dialect::Sixian => "hak_sx",
            Dialect::SouthSixian => "hak_nsx",
            Dialect::Hailu => "hak_hl",
            Dialect::Dapu => "hak_dp",
            Dialect::Raoping => "hak_rp",
            Dialect::Zhaoan => "hak_za",
        }
    }

    pub fn codes() -> Vec<&'static str> {
        Self::ALL.iter().map(|d| d.code()).collect()
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Dialect {
    type Err = HakkaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.code() == s)
            .ok_or_else(|| HakkaError::UnsupportedDialect(s.to_string()))
    }
}

impl TryFrom<String> for Dialect {
    type Error = HakkaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Dialect> for String {
    fn from(value: Dialect) -> Self {
        value.code().to_string()
    }
}

/// 发音格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PronunciationFormat {
    /// 国际音标，如 `tʰ-ien_24`
    #[default]
    Ipa,
    /// 客语拼音，如 `tien24`
    Pinyin,
}

impl PronunciationFormat {
    pub const ALL: [PronunciationFormat; 2] =
        [PronunciationFormat::Ipa, PronunciationFormat::Pinyin];

    /// 格式名称，同时也是词典子目录名
    pub fn as_str(self) -> &'static str {
        match self {
            PronunciationFormat::Ipa => "ipa",
            PronunciationFormat::Pinyin => "pinyin",
        }
    }
}

impl fmt::Display for PronunciationFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PronunciationFormat {
    type Err = HakkaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ipa" => Ok(PronunciationFormat::Ipa),
            "pinyin" => Ok(PronunciationFormat::Pinyin),
            other => Err(HakkaError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl TryFrom<String> for PronunciationFormat {
    type Error = HakkaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PronunciationFormat> for String {
    fn from(value: PronunciationFormat) -> Self {
        value.as_str().to_string()
    }
}
