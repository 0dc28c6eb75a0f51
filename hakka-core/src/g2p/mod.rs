//! G2P (Grapheme-to-Phoneme) 模块
//!
//! 客语文字转 IPA / 拼音

pub mod engine;
pub mod result;

// 导出核心类型
pub use engine::{G2pEngine, G2pOptions};
pub use result::{G2pResult, TokenDetail, TokenKind, WordPronunciation};
