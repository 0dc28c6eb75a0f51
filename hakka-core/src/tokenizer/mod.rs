//! 分词模块
//!
//! jieba 分词器封装与按腔调缓存

pub mod cache;
pub mod segmenter;

// 导出核心类型
pub use cache::{TokenizerCache, TokenizerKey};
pub use segmenter::{Segmentation, Segmenter};
