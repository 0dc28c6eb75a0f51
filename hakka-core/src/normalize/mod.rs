//! 文本正规化
//!
//! 处理顺序固定：
//! 1. Unicode NFKC（全形转半形、相容字元折叠）
//! 2. 半形标点 `, ? ! .` 转全形 `， ？ ！ 。`
//! 3. 删除保留字符以外的所有标点与符号，合并空白
//! 4. 异体字替换（可关闭）
//! 5. 拉丁字母转大写

use std::sync::Arc;

use unicode_normalization::UnicodeNormalization;

use crate::variant::VariantMap;

/// 保留的四个全形标点
pub const PUNCTUATIONS: [char; 4] = ['，', '。', '？', '！'];

/// 判断 token 是否为保留标点
pub fn is_punctuation(word: &str) -> bool {
    let mut chars = word.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if PUNCTUATIONS.contains(&c))
}

/// 文本正规化器
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    variant_map: Arc<VariantMap>,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(VariantMap::builtin())
    }
}

impl TextNormalizer {
    pub fn new(variant_map: Arc<VariantMap>) -> Self {
        Self { variant_map }
    }

    pub fn variant_map(&self) -> &VariantMap {
        &self.variant_map
    }

    /// 正规化文本
    pub fn normalize(&self, text: &str, use_variant_map: bool) -> String {
        // 1-2. NFKC，并将半形标点转为全形
        let folded = text.nfkc().map(half_to_full_marker);

        // 3. 过滤字符，连续空白合并为一个空格
        let mut filtered = String::with_capacity(text.len());
        let mut pending_space = false;
        for ch in folded {
            if ch.is_whitespace() {
                pending_space = !filtered.is_empty();
                continue;
            }
            if !is_retained(ch) {
                continue;
            }
            if pending_space {
                filtered.push(' ');
                pending_space = false;
            }
            filtered.push(ch);
        }

        // 4. 异体字
        let mapped = if use_variant_map {
            self.variant_map.apply(&filtered)
        } else {
            filtered
        };

        // 5. 大写
        mapped.to_ascii_uppercase()
    }
}

/// 使用内置异体字表正规化文本
pub fn normalize(text: &str, use_variant_map: bool) -> String {
    TextNormalizer::default().normalize(text, use_variant_map)
}

fn half_to_full_marker(ch: char) -> char {
    match ch {
        ',' => '，',
        '?' => '？',
        '!' => '！',
        '.' => '。',
        other => other,
    }
}

/// 是否为正规化后保留的字符
fn is_retained(ch: char) -> bool {
    if ch.is_ascii_alphanumeric() || PUNCTUATIONS.contains(&ch) {
        return true;
    }

    match ch as u32 {
        // CJK 符号和标点，仅保留 々〆〇
        0x3000..=0x303F => matches!(ch, '々' | '〆' | '〇'),
        // 片假名中点
        0x30FB => false,
        // CJK 部首、假名、注音、扩展 A、基本汉字
        0x2E80..=0x9FFF => true,
        // CJK 相容汉字
        0xF900..=0xFAFF => true,
        // CJK 扩展 B ~ H（台湾客语常用外字）
        0x20000..=0x323AF => true,
        // 私用区 (PUA)
        0xE000..=0xF8FF => true,
        // 私用区补充 A & B（客语造字）
        0xF0000..=0x10FFFD => true,
        _ => false,
    }
}
