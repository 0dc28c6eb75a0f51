//! 异体字对照表
//!
//! 将异体字替换为标准字形（如 `台` → `臺`），查词典之前执行。
//! 默认表随库编译（`share/variant_map.json`），也可以从文件加载。

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use crate::error::{HakkaError, HakkaResult};

/// 内置对照表
const BUILTIN_VARIANT_MAP: &str = include_str!("../../share/variant_map.json");

static DEFAULT_VARIANT_MAP: OnceLock<Arc<VariantMap>> = OnceLock::new();

/// 异体字对照表（字符 → 标准字符）
///
/// 构建时会展开链式映射（`a → b`、`b → c` 得到 `a → c`），
/// 因此 [`VariantMap::apply`] 是幂等的。
#[derive(Debug, Clone, Default)]
pub struct VariantMap {
    map: HashMap<char, char>,
}

impl VariantMap {
    /// 从 (异体字, 标准字) 对构建
    ///
    /// 出现循环映射时返回错误，`source` 仅用于错误信息。
    pub fn from_pairs<I>(pairs: I, source: &str) -> HakkaResult<Self>
    where
        I: IntoIterator<Item = (char, char)>,
    {
        let raw: HashMap<char, char> = pairs.into_iter().filter(|(from, to)| from != to).collect();

        let mut map = HashMap::with_capacity(raw.len());
        for (&from, &to) in &raw {
            let mut target = to;
            let mut steps = 0;
            while let Some(&next) = raw.get(&target) {
                steps += 1;
                if next == from || steps > raw.len() {
                    return Err(HakkaError::VariantMapLoad {
                        path: source.to_string(),
                        reason: format!("cyclic mapping starting at '{}'", from),
                    });
                }
                target = next;
            }
            map.insert(from, target);
        }

        Ok(Self { map })
    }

    /// 解析 JSON 格式：`{"台": "臺", ...}`，键和值都必须是单个字符
    pub fn from_json_str(content: &str, source: &str) -> HakkaResult<Self> {
        let entries: HashMap<String, String> =
            serde_json::from_str(content).map_err(|e| HakkaError::VariantMapLoad {
                path: source.to_string(),
                reason: e.to_string(),
            })?;

        let mut pairs = Vec::with_capacity(entries.len());
        for (from, to) in entries {
            match (single_char(&from), single_char(&to)) {
                (Some(f), Some(t)) => pairs.push((f, t)),
                _ => {
                    return Err(HakkaError::VariantMapLoad {
                        path: source.to_string(),
                        reason: format!(
                            "entry '{}' -> '{}' is not a single character pair",
                            from, to
                        ),
                    })
                }
            }
        }

        Self::from_pairs(pairs, source)
    }

    /// 从文件加载
    ///
    /// 文件不存在时返回空表并记录警告；格式错误则返回错误。
    pub fn load(path: &Path) -> HakkaResult<Self> {
        if !path.exists() {
            tracing::warn!("异体字对照表不存在，跳过异体字替换: {:?}", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let map = Self::from_json_str(&content, &path.display().to_string())?;
        tracing::info!("加载异体字对照表: {:?} ({} 条)", path, map.len());
        Ok(map)
    }

    /// 内置对照表（进程内只解析一次）
    pub fn builtin() -> Arc<VariantMap> {
        DEFAULT_VARIANT_MAP
            .get_or_init(|| {
                let map = Self::from_json_str(BUILTIN_VARIANT_MAP, "<builtin>").unwrap_or_else(|e| {
                    tracing::error!("内置异体字对照表解析失败: {}", e);
                    Self::default()
                });
                Arc::new(map)
            })
            .clone()
    }

    /// 查询单个字符的标准字形
    pub fn get(&self, ch: char) -> Option<char> {
        self.map.get(&ch).copied()
    }

    /// 逐字替换，表中没有的字符原样保留
    pub fn apply(&self, text: &str) -> String {
        if self.map.is_empty() {
            return text.to_string();
        }
        text.chars().map(|ch| self.get(ch).unwrap_or(ch)).collect()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// 使用内置对照表替换异体字
pub fn apply_variant_map(text: &str) -> String {
    VariantMap::builtin().apply(text)
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
