use axum::response::{IntoResponse, Response};
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// 进程级错误 (启动、监听、关闭)
///
/// 请求级错误使用 [`AppError`]
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("数据库错误: {0}")]
    Database(String),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("内部服务器错误")]
    Internal(#[from] anyhow::Error),
}

impl From<AppError> for ServerError {
    fn from(err: AppError) -> Self {
        match err.code {
            ErrorCode::DatabaseError => ServerError::Database(err.message),
            ErrorCode::ConfigError => ServerError::Config(err.message),
            _ => ServerError::Internal(anyhow::anyhow!(err.message)),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let err = match self {
            ServerError::Config(msg) => AppError::with_message(ErrorCode::ConfigError, msg),
            ServerError::Database(msg) => AppError::database(msg),
            ServerError::Io(e) => AppError::internal(e.to_string()),
            ServerError::Internal(e) => {
                // 记录内部错误但不暴露详细信息
                tracing::error!(error = ?e, "Internal server error");
                AppError::internal("An internal error occurred")
            }
        };
        err.into_response()
    }
}

/// 服务器 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
