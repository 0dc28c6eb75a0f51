//! Hakka G2P Core Engine
//!
//! 台湾客语文字转音标核心引擎
//!
//! 支持四县、南四县、海陆、大埔、饶平、诏安六种腔调
//!
//! ```no_run
//! use hakka_core::{Dialect, G2pEngine, G2pOptions, LexiconStore};
//!
//! # fn main() -> hakka_core::HakkaResult<()> {
//! let engine = G2pEngine::new(LexiconStore::from_dir("/usr/share/hakka-g2p/lexicon"));
//! let result = engine.g2p("天公落水", Dialect::Sixian, &G2pOptions::default())?;
//! println!("{}", result);
//! # Ok(())
//! # }
//! ```

#![warn(rust_2018_idioms)]

pub mod config;
pub mod dialect;
pub mod error;
pub mod g2p;
pub mod lexicon;
pub mod normalize;
pub mod tokenizer;
pub mod variant;

// Re-export key types
pub use config::HakkaConfig;
pub use dialect::{Dialect, PronunciationFormat};
pub use error::{HakkaError, HakkaResult};
pub use g2p::{G2pEngine, G2pOptions, G2pResult, TokenDetail, TokenKind, WordPronunciation};
pub use lexicon::{Lexicon, LexiconStore};
pub use normalize::{normalize, TextNormalizer, PUNCTUATIONS};
pub use tokenizer::{Segmentation, TokenizerCache};
pub use variant::{apply_variant_map, VariantMap};

/// 初始化日志系统
///
/// 调试模式 (--features debug-logs): 由 HAKKA_LOG 控制级别，默认 warn
///
/// 注意: 此函数可以安全地多次调用
pub fn init_logging() {
    #[cfg(feature = "debug-logs")]
    {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter = EnvFilter::try_from_env("HAKKA_LOG")
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        // 使用 try_init() 代替 init()，避免重复初始化时 panic
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_target(false))
            .with(filter)
            .try_init();
    }

    #[cfg(not(feature = "debug-logs"))]
    {
        // 未启用 debug-logs 时静默运行
    }
}
