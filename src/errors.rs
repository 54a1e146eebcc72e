use crate::mood::DomainError;
use crate::mood_form::FormError;
use axum::http::StatusCode;

pub const FALLBACK_MESSAGE: &str = "Something went wrong";
pub const NETWORK_MESSAGE: &str = "Network error";

/// Failure talking to the mood API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx answer. Carries the server's message when it sent one.
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("{0}")]
    Network(String),

    /// 2xx answer with `success: false`.
    #[error("{0}")]
    Rejected(String),

    #[error("response carried no data")]
    MissingData,

    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn network(err: &reqwest::Error) -> Self {
        let detail = err.to_string();
        if detail.is_empty() {
            Self::Network(NETWORK_MESSAGE.into())
        } else {
            Self::Network(detail)
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Server { status: 401 | 403, .. })
    }
}

/// Failure of a session operation.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("not signed in")]
    NotAuthenticated,

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "Authentication required".into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        let status = match &err {
            ApiError::Server { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(StatusCode::is_client_error)
                .unwrap_or(StatusCode::BAD_GATEWAY),
            ApiError::Rejected(_) => StatusCode::BAD_REQUEST,
            ApiError::Network(_) | ApiError::MissingData | ApiError::Decode(_) => {
                StatusCode::BAD_GATEWAY
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotAuthenticated => Self::unauthorized(),
            SessionError::Api(err) => err.into(),
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<FormError> for AppError {
    fn from(err: FormError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = axum::Json(serde_json::json!({ "message": self.message }));
        (self.status, body).into_response()
    }
}
