//! 配置管理模块
//!
//! 支持多格式配置文件加载，环境变量覆盖，以及类型安全的配置访问。

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::observability::ObservabilityConfig;

/// 徽章目录配置
///
/// `path` 存在时优先从文件加载（JSON 或 TOML），否则使用内置预设。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// 内置预设名称：standard / legacy
    pub preset: String,
    pub path: Option<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            preset: "standard".to_string(),
            path: None,
        }
    }
}

/// 学习者会话配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// 登录时的初始积分
    pub starting_points: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_points: 45,
        }
    }
}

/// 报告输出配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// text（人类可读）或 json
    pub format: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service_name: String,
    pub environment: String,
    pub catalog: CatalogConfig,
    pub session: SessionConfig,
    pub report: ReportConfig,
    pub observability: ObservabilityConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service_name: "progression-engine".to_string(),
            environment: "development".to_string(),
            catalog: CatalogConfig::default(),
            session: SessionConfig::default(),
            report: ReportConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 加载顺序（后加载的会覆盖先加载的同名配置项）：
    /// 1. config/default.toml（默认配置）
    /// 2. config/{environment}.toml（环境特定配置）
    /// 3. config/{service_name}.toml（服务特定配置）
    /// 4. 环境变量（PROGRESSION_ 前缀，双下划线分隔层级，
    ///    如 PROGRESSION_CATALOG__PRESET -> catalog.preset）
    pub fn load(service_name: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("PROGRESSION_ENV").unwrap_or_else(|_| "development".to_string());
        let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

        Self::load_from(Path::new(&config_dir), service_name, &env)
    }

    /// 从指定目录加载配置
    pub fn load_from(config_dir: &Path, service_name: &str, env: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("service_name", service_name)?
            .set_default("environment", env)?
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join(format!("{}.toml", env))).required(false))
            .add_source(
                File::from(config_dir.join(format!("{}.toml", service_name))).required(false),
            )
            .add_source(
                Environment::with_prefix("PROGRESSION")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.catalog.preset, "standard");
        assert_eq!(config.session.starting_points, 45);
        assert_eq!(config.report.format, "text");
        assert_eq!(config.environment, "development");
    }

    #[test]
    fn test_load_from_layers_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            r#"
            [catalog]
            preset = "legacy"

            [session]
            starting_points = 10
            "#,
        )
        .unwrap();
        fs::write(
            dir.path().join("staging.toml"),
            r#"
            [session]
            starting_points = 20
            "#,
        )
        .unwrap();

        let config = AppConfig::load_from(dir.path(), "progression-engine", "staging").unwrap();
        assert_eq!(config.service_name, "progression-engine");
        assert_eq!(config.environment, "staging");
        assert_eq!(config.catalog.preset, "legacy");
        // 环境特定配置覆盖默认配置
        assert_eq!(config.session.starting_points, 20);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_load_from_missing_dir_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        let config = AppConfig::load_from(&missing, "progression-engine", "production").unwrap();
        assert_eq!(config.environment, "production");
        assert_eq!(config.catalog.preset, "standard");
        assert!(config.catalog.path.is_none());
    }
}
