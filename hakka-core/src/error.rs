use thiserror::Error;

use crate::dialect::Dialect;

#[derive(Error, Debug)]
pub enum HakkaError {
    // 参数校验错误
    #[error(
        "Unsupported dialect: {0} (supported: {supported})",
        supported = Dialect::codes().join(", ")
    )]
    UnsupportedDialect(String),

    #[error("Unsupported pronunciation format: {0}")]
    UnsupportedFormat(String),

    // 资源加载错误
    #[error("Lexicon load failed: {path} - {reason}")]
    LexiconLoad { path: String, reason: String },

    #[error("Variant map load failed: {path} - {reason}")]
    VariantMapLoad { path: String, reason: String },

    // 配置错误
    #[error("Config parse error: {path} - {reason}")]
    ConfigParse { path: String, reason: String },

    #[error("Config file not found: {0}")]
    ConfigNotFound(String),

    // 其他错误
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type HakkaResult<T> = Result<T, HakkaError>;
