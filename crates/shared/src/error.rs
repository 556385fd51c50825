//! 统一错误处理模块
//!
//! 定义宿主侧共享的错误类型，使用 thiserror 提供良好的错误信息。

use thiserror::Error;

/// 系统错误类型
#[derive(Debug, Error)]
pub enum AppError {
    // ==================== 配置错误 ====================
    #[error("配置加载失败: {0}")]
    Config(#[from] config::ConfigError),

    #[error("徽章目录无效: {0}")]
    InvalidCatalog(String),

    // ==================== 会话错误 ====================
    #[error("未登录")]
    Unauthorized,

    #[error("权限不足: {operation}")]
    Forbidden { operation: String },

    // ==================== 验证错误 ====================
    #[error("参数验证失败: {0}")]
    Validation(String),

    #[error("无效的参数: {field} - {message}")]
    InvalidArgument { field: String, message: String },

    #[error("记录未找到: {entity} id={id}")]
    NotFound { entity: String, id: String },

    // ==================== 通用错误 ====================
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 错误结果类型别名
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// 获取错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::InvalidCatalog(_) => "INVALID_CATALOG",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Io(_) => "IO_ERROR",
        }
    }

    /// 是否由调用方输入引起（宿主据此决定降级展示，如显示 0% 进度）
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized
                | Self::Forbidden { .. }
                | Self::Validation(_)
                | Self::InvalidArgument { .. }
                | Self::NotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        let err = AppError::NotFound {
            entity: "Tier".to_string(),
            id: "tier-9".to_string(),
        };
        assert_eq!(err.code(), "NOT_FOUND");
        assert_eq!(err.to_string(), "记录未找到: Tier id=tier-9");
    }

    #[test]
    fn test_is_client_error() {
        assert!(AppError::Unauthorized.is_client_error());
        assert!(AppError::Validation("email".to_string()).is_client_error());
        assert!(
            AppError::Forbidden {
                operation: "reload_catalog".to_string()
            }
            .is_client_error()
        );

        let catalog = AppError::InvalidCatalog("empty".to_string());
        assert!(!catalog.is_client_error());
        assert_eq!(catalog.code(), "INVALID_CATALOG");
    }
}
