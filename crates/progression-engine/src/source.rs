//! 目录来源
//!
//! 引擎不关心目录从哪里来，只要求来源产出已校验的 `TierCatalog`。

use std::fs;
use std::path::{Path, PathBuf};

use progression_shared::config::CatalogConfig;
use tracing::{info, instrument};

use crate::catalog::TierCatalog;
use crate::error::{ProgressionError, Result};

/// 目录来源接口
#[cfg_attr(test, mockall::automock)]
pub trait CatalogSource: Send + Sync {
    /// 来源描述，用于日志
    fn describe(&self) -> String;

    /// 加载并校验目录
    fn load(&self) -> Result<TierCatalog>;
}

/// 根据配置选择来源：配置了文件路径时从文件加载，否则使用内置预设
pub fn from_config(config: &CatalogConfig) -> Box<dyn CatalogSource> {
    match &config.path {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(PresetSource::new(&config.preset)),
    }
}

/// 内置预设来源
#[derive(Debug, Clone)]
pub struct PresetSource {
    name: String,
}

impl PresetSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl CatalogSource for PresetSource {
    fn describe(&self) -> String {
        format!("preset:{}", self.name)
    }

    fn load(&self) -> Result<TierCatalog> {
        Ok(TierCatalog::preset(&self.name)?)
    }
}

/// 文件来源，按扩展名识别 JSON / TOML
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl CatalogSource for FileSource {
    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> Result<TierCatalog> {
        let extension = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let content = fs::read_to_string(&self.path)?;
        let catalog = match extension.as_str() {
            "json" => TierCatalog::from_json(&content)?,
            "toml" => TierCatalog::from_toml(&content)?,
            other => return Err(ProgressionError::UnsupportedFormat(other.to_string())),
        };

        info!(tiers = catalog.len(), "目录文件已加载");
        Ok(catalog)
    }
}
