//! Segmenter - 基于 jieba 的客语分词器
//!
//! 以空词典初始化 jieba，再加入腔调词表；词频设为 `字数 × 10000`，
//! 使最长匹配优先。关闭 HMM，不猜测新词。
//!
//! jieba 的汉字正则不含私用区 (PUA) 与 CJK 扩展 G/H，这些字会被逐字切开。
//! 为了让含这些字的词条能整体匹配，构建时为每个这样的字分配一个
//! CJK 相容表意文字补充区 (U+2F800 起) 的替身字符，分词前替换，
//! 分词后按字数映射回原文。该区段的字经 NFKC 都会被折叠，
//! 正规化后的文本中不会出现。

use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::ops::Range;

use jieba_rs::Jieba;

use crate::normalize::PUNCTUATIONS;

/// 每个字的词频权重
const FREQ_PER_CHAR: usize = 10_000;

/// 替身字符起点（CJK Compatibility Ideographs Supplement）
const STAND_IN_START: u32 = 0x2F800;

/// 可用替身字符数（U+2F800..=U+2FA1D，均有 NFKC 分解）
const STAND_IN_COUNT: u32 = 542;

/// 分词结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmentation {
    /// 分词结果（已去除空白 token）
    pub words: Vec<String>,
    /// 词表外的词（不含保留标点，可重复）
    pub oovs: Vec<String>,
}

/// 绑定词表的分词器
pub struct Segmenter {
    jieba: Jieba,
    vocabulary: HashSet<String>,
    /// jieba 汉字正则以外的字 → 替身字符
    stand_ins: HashMap<char, char>,
}

impl Segmenter {
    /// 用词表构建分词器
    pub fn new(vocabulary: HashSet<String>) -> Self {
        let stand_ins = assign_stand_ins(&vocabulary);

        let mut jieba = Jieba::empty();
        for word in vocabulary.iter().filter(|w| !w.is_empty()) {
            let key = substitute(word, &stand_ins);
            jieba.add_word(&key, Some(word_frequency(word)), None);
        }

        Self {
            jieba,
            vocabulary,
            stand_ins,
        }
    }

    /// 分词，返回 token 及其在输入中的字节范围（空白 token 已去除）
    pub fn segment<'a>(&self, text: &'a str) -> Vec<(&'a str, Range<usize>)> {
        // 输入本身含替身区字符时不做替换，避免与替身混淆
        let source = if self.stand_ins.is_empty() || text.chars().any(is_stand_in) {
            Cow::Borrowed(text)
        } else {
            substitute(text, &self.stand_ins)
        };

        let mut offset = 0;
        let mut tokens = Vec::new();

        for piece in self.jieba.cut(&source, false) {
            // 替换是逐字的，按字数回到原文
            let len: usize = text[offset..]
                .chars()
                .take(piece.chars().count())
                .map(char::len_utf8)
                .sum();
            let span = offset..offset + len;
            offset = span.end;

            let word = &text[span.clone()];
            if !word.trim().is_empty() {
                tokens.push((word, span));
            }
        }

        tokens
    }

    /// 分词并找出词表外的词
    pub fn cut(&self, text: &str) -> Segmentation {
        let words: Vec<String> = self
            .segment(text)
            .into_iter()
            .map(|(word, _)| word.to_string())
            .collect();

        let oovs = words
            .iter()
            .filter(|w| !crate::normalize::is_punctuation(w) && !self.contains(w))
            .cloned()
            .collect();

        Segmentation { words, oovs }
    }

    /// 是否在词表中
    pub fn contains(&self, word: &str) -> bool {
        self.vocabulary.contains(word)
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// 使用替身字符的字数
    pub fn stand_in_count(&self) -> usize {
        self.stand_ins.len()
    }
}

impl fmt::Debug for Segmenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Segmenter")
            .field("vocabulary_size", &self.vocabulary.len())
            .field("stand_ins", &self.stand_ins.len())
            .finish()
    }
}

fn word_frequency(word: &str) -> usize {
    word.chars().count() * FREQ_PER_CHAR
}

/// jieba 默认汉字正则覆盖的字符
fn is_jieba_han(ch: char) -> bool {
    if ch.is_ascii_alphanumeric() || matches!(ch, '+' | '#' | '&' | '.' | '_' | '%' | '-') {
        return true;
    }

    matches!(
        ch as u32,
        0x3400..=0x4DBF
            | 0x4E00..=0x9FFF
            | 0xF900..=0xFAFF
            | 0x20000..=0x2A6DF
            | 0x2A700..=0x2EBEF
            | 0x2F800..=0x2FA1F
    )
}

fn is_stand_in(ch: char) -> bool {
    (STAND_IN_START..STAND_IN_START + STAND_IN_COUNT).contains(&(ch as u32))
}

/// 为词表中 jieba 无法整体匹配的字分配替身字符
///
/// 超出可用数量时放弃替换，这些字退回逐字切分。
fn assign_stand_ins(vocabulary: &HashSet<String>) -> HashMap<char, char> {
    let chars: BTreeSet<char> = vocabulary
        .iter()
        .flat_map(|word| word.chars())
        .filter(|&ch| !is_jieba_han(ch) && !ch.is_whitespace() && !PUNCTUATIONS.contains(&ch))
        .collect();

    if chars.len() > STAND_IN_COUNT as usize {
        tracing::warn!(
            "⚠️ 词表中汉字正则以外的字过多 ({} > {})，这些字将逐字切分",
            chars.len(),
            STAND_IN_COUNT
        );
        return HashMap::new();
    }

    let slots = (STAND_IN_START..STAND_IN_START + STAND_IN_COUNT).filter_map(char::from_u32);
    chars.into_iter().zip(slots).collect()
}

fn substitute<'a>(text: &'a str, stand_ins: &HashMap<char, char>) -> Cow<'a, str> {
    if stand_ins.is_empty() || !text.chars().any(|ch| stand_ins.contains_key(&ch)) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.chars()
            .map(|ch| stand_ins.get(&ch).copied().unwrap_or(ch))
            .collect(),
    )
}
