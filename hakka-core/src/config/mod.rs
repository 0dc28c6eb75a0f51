//! Hakka G2P 配置模块
//!
//! 统一的配置管理，从 ~/.config/hakka-g2p/config.toml 加载

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dialect::Dialect;
use crate::error::{HakkaError, HakkaResult};
use crate::g2p::G2pOptions;

/// 词典目录环境变量
pub const LEXICON_DIR_ENV: &str = "HAKKA_LEXICON_DIR";

/// 完整配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HakkaConfig {
    /// 词典根目录（包含 ipa/ 与 pinyin/ 子目录）
    pub lexicon_dir: PathBuf,
    /// 异体字对照表，未设置时使用内置表
    pub variant_map: Option<PathBuf>,
    /// 默认腔调
    pub default_dialect: Dialect,
    /// 默认 G2P 参数
    pub g2p: G2pOptions,
}

impl Default for HakkaConfig {
    fn default() -> Self {
        Self {
            lexicon_dir: default_lexicon_dir(),
            variant_map: None,
            default_dialect: Dialect::default(),
            g2p: G2pOptions::default(),
        }
    }
}

impl HakkaConfig {
    /// 加载配置文件，文件不存在时使用默认配置
    pub fn load() -> HakkaResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::info!("配置文件不存在，使用默认配置: {:?}", config_path);
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// 从指定路径加载
    pub fn load_from(path: &Path) -> HakkaResult<Self> {
        if !path.exists() {
            return Err(HakkaError::ConfigNotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| HakkaError::ConfigParse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        tracing::info!("📋 加载配置成功: {:?}", path);
        tracing::info!(
            "📊 词典目录: {:?}, 默认腔调: {}, 发音格式: {}",
            config.lexicon_dir,
            config.default_dialect,
            config.g2p.format
        );
        Ok(config)
    }

    /// 保存到默认路径
    pub fn save(&self) -> HakkaResult<()> {
        self.save_to(&Self::config_path()?)
    }

    /// 保存到指定路径
    pub fn save_to(&self, path: &Path) -> HakkaResult<()> {
        // 确保目录存在
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| HakkaError::ConfigParse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        std::fs::write(path, content)?;

        tracing::info!("保存配置成功: {:?}", path);
        Ok(())
    }

    /// 获取配置文件路径
    pub fn config_path() -> HakkaResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| HakkaError::ConfigNotFound("无法获取配置目录".to_string()))?;

        Ok(config_dir.join("hakka-g2p").join("config.toml"))
    }
}

/// 默认词典目录：$HAKKA_LEXICON_DIR > 数据目录/hakka-g2p/lexicon
fn default_lexicon_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(LEXICON_DIR_ENV) {
        return PathBuf::from(dir);
    }

    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hakka-g2p")
        .join("lexicon")
}
