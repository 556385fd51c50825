//! 进度引擎错误类型

use progression_shared::error::AppError;
use thiserror::Error;

/// 徽章目录配置错误，在目录构造时检测并拒绝
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("徽章目录为空")]
    Empty,

    #[error("等级 id 不能为空: index={index}")]
    EmptyId { index: usize },

    #[error("等级 id 重复: {id}")]
    DuplicateId { id: String },

    #[error("等级 level 必须为正整数: id={id}")]
    InvalidLevel { id: String },

    #[error("等级阈值超出积分快照范围: {id} 需要 {required}, 上限 {max}")]
    ThresholdOutOfRange { id: String, required: u64, max: u64 },

    #[error("等级阈值必须严格递增: {id} 需要 {required}, 前一等级 {previous_id} 需要 {previous}")]
    NonIncreasingThreshold {
        id: String,
        required: u64,
        previous_id: String,
        previous: u64,
    },

    #[error("等级 level 必须严格递增: {id} level={level}, 前一等级 {previous_id} level={previous}")]
    NonIncreasingLevel {
        id: String,
        level: u32,
        previous_id: String,
        previous: u32,
    },

    #[error("未知的目录预设: {0}")]
    UnknownPreset(String),
}

#[derive(Debug, Error)]
pub enum ProgressionError {
    #[error("目录校验失败: {0}")]
    Catalog(#[from] CatalogError),

    #[error("未登录，无法执行: {operation}")]
    NotSignedIn { operation: String },

    #[error("当前角色无权执行: {operation}")]
    Forbidden { operation: String },

    #[error("登录参数无效: {0}")]
    InvalidLogin(String),

    #[error("未知的角色: {0}")]
    UnknownRole(String),

    #[error("成就 id 重复: {0}")]
    DuplicateAchievement(String),

    #[error("不支持的目录文件格式: {0}")]
    UnsupportedFormat(String),

    #[error("读取文件失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON 解析错误: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML 解析错误: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ProgressionError>;

impl From<ProgressionError> for AppError {
    fn from(err: ProgressionError) -> Self {
        match err {
            ProgressionError::Catalog(CatalogError::UnknownPreset(name)) => AppError::NotFound {
                entity: "catalog preset".to_string(),
                id: name,
            },
            ProgressionError::Catalog(e) => AppError::InvalidCatalog(e.to_string()),
            ProgressionError::NotSignedIn { .. } => AppError::Unauthorized,
            ProgressionError::Forbidden { operation } => AppError::Forbidden { operation },
            ProgressionError::InvalidLogin(message) => AppError::InvalidArgument {
                field: "email".to_string(),
                message,
            },
            ProgressionError::UnknownRole(role) => AppError::InvalidArgument {
                field: "role".to_string(),
                message: format!("unknown role '{}'", role),
            },
            ProgressionError::Io(e) => AppError::Io(e),
            other => AppError::Validation(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_app_error() {
        let err: AppError = ProgressionError::Catalog(CatalogError::Empty).into();
        assert_eq!(err.code(), "INVALID_CATALOG");

        let err: AppError = ProgressionError::NotSignedIn {
            operation: "add_points".to_string(),
        }
        .into();
        assert_eq!(err.code(), "UNAUTHORIZED");

        let err: AppError = ProgressionError::UnknownRole("guest".to_string()).into();
        assert_eq!(err.code(), "INVALID_ARGUMENT");

        let err: AppError = ProgressionError::Forbidden {
            operation: "reload_catalog".to_string(),
        }
        .into();
        assert_eq!(err.code(), "FORBIDDEN");

        let err: AppError =
            ProgressionError::Catalog(CatalogError::UnknownPreset("gold".to_string())).into();
        assert_eq!(err.code(), "NOT_FOUND");
        assert_eq!(err.to_string(), "记录未找到: catalog preset id=gold");
    }
}
