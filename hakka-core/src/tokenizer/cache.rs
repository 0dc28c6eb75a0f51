//! 分词器缓存
//!
//! 按 (腔调, 是否包含英文) 缓存已构建的分词器。
//! 锁只在检查/构建时持有，分词本身不持锁。

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::dialect::Dialect;
use crate::error::HakkaResult;
use crate::tokenizer::Segmenter;

/// 缓存键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenizerKey {
    pub dialect: Dialect,
    pub include_english: bool,
}

impl TokenizerKey {
    pub fn new(dialect: Dialect, include_english: bool) -> Self {
        Self {
            dialect,
            include_english,
        }
    }
}

/// 分词器缓存
#[derive(Debug, Default)]
pub struct TokenizerCache {
    tokenizers: Mutex<HashMap<TokenizerKey, Arc<Segmenter>>>,
}

impl TokenizerCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取出缓存的分词器，不存在时调用 `build` 构建并缓存
    ///
    /// 构建失败时不写入缓存。
    pub fn get_or_build<F>(&self, key: TokenizerKey, build: F) -> HakkaResult<Arc<Segmenter>>
    where
        F: FnOnce() -> HakkaResult<Segmenter>,
    {
        let mut tokenizers = self.lock();
        if let Some(segmenter) = tokenizers.get(&key) {
            return Ok(Arc::clone(segmenter));
        }

        let segmenter = Arc::new(build()?);
        tracing::info!(
            "✅ 分词器构建完成: {} (include_english={}, 词表 {} 词)",
            key.dialect,
            key.include_english,
            segmenter.vocabulary_size()
        );
        tokenizers.insert(key, Arc::clone(&segmenter));
        Ok(segmenter)
    }

    pub fn contains(&self, key: &TokenizerKey) -> bool {
        self.lock().contains_key(key)
    }

    /// 已缓存的键（排序）
    pub fn cached_keys(&self) -> Vec<TokenizerKey> {
        let mut keys: Vec<TokenizerKey> = self.lock().keys().copied().collect();
        keys.sort();
        keys
    }

    /// 已缓存的腔调（去重，按 [`Dialect::ALL`] 顺序）
    pub fn cached_dialects(&self) -> Vec<Dialect> {
        let tokenizers = self.lock();
        Dialect::ALL
            .into_iter()
            .filter(|&dialect| tokenizers.keys().any(|key| key.dialect == dialect))
            .collect()
    }

    /// 清空缓存，下次使用时重新构建
    pub fn clear(&self) {
        let mut tokenizers = self.lock();
        let count = tokenizers.len();
        tokenizers.clear();
        tracing::debug!("分词器缓存已清除 ({} 个)", count);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<TokenizerKey, Arc<Segmenter>>> {
        self.tokenizers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
