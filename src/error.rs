use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub type AppResult<T> = Result<T, AppError>;

/// Ошибки ядра. Каждый вариант соответствует отдельному классу отказа,
/// вызывающая сторона должна уметь их различать.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AppError {
    /// Окружение настроено неверно. Фатально, без повторов.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("{0}")]
    Validation(String),

    /// Ссылка на несуществующее событие.
    #[error("{0}")]
    Reference(String),

    /// Нарушение уникальности при записи.
    #[error("{0}")]
    Conflict(String),

    /// Проверку не удалось выполнить: хранилище недоступно. Можно повторить.
    #[error("{0}")]
    Dependency(String),

    #[error("{0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Reference(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Dependency(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Configuration(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Reference(_) => "REFERENCE_ERROR",
            AppError::Conflict(_) => "CONFLICT_ERROR",
            AppError::Dependency(_) => "DEPENDENCY_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Можно ли повторить тот же запрос без изменений.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Dependency(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Клиентские ошибки не логируем - это обычный ответ API
        if status.is_server_error() {
            error!(error = ?self, code = self.code(), "request failed");
        }

        let message = match &self {
            AppError::Internal(_) | AppError::Configuration(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "success": false,
            "error": {
                "code": self.code(),
                "message": message,
            }
        });

        (status, Json(body)).into_response()
    }
}
