use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use coffee_shop_engine::DrinkApiError;
use log::*;
use thiserror::Error;

use crate::data_objects::ErrorResponse;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("The request could not be processed. {0}")]
    UnprocessableEntity(String),
    #[error("The request body is empty")]
    EmptyRequestBody,
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("Method not allowed. {0}")]
    MethodNotAllowed(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::EmptyRequestBody => StatusCode::CONFLICT,
            Self::AuthenticationError(e) => e.status_code(),
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Error details are logged, but never leak into the response. Clients only see the status code and a fixed
    /// message for that code.
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("💻️ {self}");
        } else {
            debug!("💻️ {self}");
        }
        HttpResponse::build(status).json(ErrorResponse::for_status(status))
    }
}

impl From<DrinkApiError> for ServerError {
    fn from(e: DrinkApiError) -> Self {
        match e {
            DrinkApiError::DatabaseError(_) => Self::BackendError(e.to_string()),
            DrinkApiError::DuplicateTitle(_) => Self::UnprocessableEntity(e.to_string()),
            DrinkApiError::InvalidDrink(_) => Self::UnprocessableEntity(e.to_string()),
            DrinkApiError::EmptyUpdate => Self::EmptyRequestBody,
        }
    }
}

/// The ways in which an `Authorization` header can fail to hold a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MalformedHeader {
    #[error("Authorization header must start with \"Bearer\".")]
    MissingBearerPrefix,
    #[error("Token not found.")]
    MissingToken,
    #[error("Authorization header must be a bearer token.")]
    TooManyParts,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authorization header is expected.")]
    AuthHeaderMissing,
    #[error("Authorization header is malformed. {0}")]
    AuthHeaderMalformed(MalformedHeader),
    #[error("No access token was provided.")]
    MissingToken,
    #[error("Invalid token header. {0}")]
    InvalidHeader(String),
    #[error("Invalid token claims. {0}")]
    InvalidClaims(String),
    #[error("Permission not granted. {0}")]
    Unauthorized(String),
    #[error("Could not fetch the signing key set. {0}")]
    KeySetUnavailable(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::AuthHeaderMissing => StatusCode::UNAUTHORIZED,
            AuthError::AuthHeaderMalformed(_) => StatusCode::UNAUTHORIZED,
            AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::InvalidHeader(_) => StatusCode::UNAUTHORIZED,
            AuthError::InvalidClaims(_) => StatusCode::UNAUTHORIZED,
            AuthError::Unauthorized(_) => StatusCode::FORBIDDEN,
            AuthError::KeySetUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MalformedHeader> for AuthError {
    fn from(e: MalformedHeader) -> Self {
        AuthError::AuthHeaderMalformed(e)
    }
}
