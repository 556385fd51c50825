//! 目录存储
//!
//! 使用 ArcSwap 持有当前生效的引擎，读取端拿到的是不可变快照，
//! 替换是一次原子 store，读者不会看到构造到一半的目录。

use arc_swap::ArcSwap;
use progression_shared::observability::metrics::record_catalog_reload;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::catalog::TierCatalog;
use crate::engine::ProgressionEngine;
use crate::error::Result;
use crate::source::CatalogSource;

/// 目录存储
#[derive(Clone)]
pub struct CatalogStore {
    current: Arc<ArcSwap<ProgressionEngine>>,
}

impl CatalogStore {
    pub fn new(catalog: TierCatalog) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(ProgressionEngine::new(catalog))),
        }
    }

    /// 从来源加载初始目录
    pub fn from_source(source: &dyn CatalogSource) -> Result<Self> {
        let catalog = source.load()?;
        info!(source = %source.describe(), tiers = catalog.len(), "目录已加载");
        Ok(Self::new(catalog))
    }

    /// 获取当前引擎快照
    pub fn load(&self) -> Arc<ProgressionEngine> {
        self.current.load_full()
    }

    /// 直接替换目录（目录已在构造时校验）
    #[instrument(skip(self, catalog), fields(tiers = catalog.len()))]
    pub fn replace(&self, catalog: TierCatalog) {
        self.current.store(Arc::new(ProgressionEngine::new(catalog)));
        info!("目录已替换");
    }

    /// 从来源重新加载
    ///
    /// 加载或校验失败时保留原目录并返回错误。
    #[instrument(skip(self, source), fields(source = %source.describe()))]
    pub fn reload(&self, source: &dyn CatalogSource) -> Result<()> {
        match source.load() {
            Ok(catalog) => {
                record_catalog_reload("success");
                self.replace(catalog);
                Ok(())
            }
            Err(e) => {
                record_catalog_reload("failure");
                warn!(error = %e, "目录重新加载失败，保留当前目录");
                Err(e)
            }
        }
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new(TierCatalog::standard())
    }
}
