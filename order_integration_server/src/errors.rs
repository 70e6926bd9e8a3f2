use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use order_integration_engine::IntegrationApiError;
use source_tools::SourceToolsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("The request cannot be applied to this resource. {0}")]
    InvalidRequest(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("The event queue is full. Try again later.")]
    EventQueueFull,
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::EventQueueFull => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

impl From<IntegrationApiError> for ServerError {
    fn from(e: IntegrationApiError) -> Self {
        match e {
            IntegrationApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
            IntegrationApiError::IntegrationNotFound(_) | IntegrationApiError::IntegrationNameNotFound(_) => {
                Self::NoRecordFound(e.to_string())
            },
            IntegrationApiError::WrongKind { .. } => Self::InvalidRequest(e.to_string()),
            IntegrationApiError::MalformedPayload(e) => Self::InvalidRequestBody(e),
        }
    }
}

impl From<SourceToolsError> for ServerError {
    fn from(e: SourceToolsError) -> Self {
        Self::InitializeError(e.to_string())
    }
}
