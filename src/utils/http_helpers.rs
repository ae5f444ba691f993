use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::error;

use crate::access::AccessError;
use crate::auth::AuthRejected;
use crate::store::StoreError;

const INTERNAL_ERROR: &str = "Internal server error";

/// A general purpose HTTP error type that can be converted into an `IntoResponse`.
#[derive(Debug)]
pub struct HTTPError {
    status: StatusCode,
    message: String,
    challenge: Option<String>,
}

impl HTTPError {
    /// Creates a new HTTP error. `challenge` becomes the `WWW-Authenticate` header.
    pub fn new(status: StatusCode, message: impl Into<String>, challenge: Option<&str>) -> Self {
        HTTPError {
            status,
            message: message.into(),
            challenge: challenge.map(str::to_string),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn internal() -> Self {
        HTTPError::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR, None)
    }
}

impl IntoResponse for HTTPError {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(json!({ "error": self.message }))).into_response();
        if let Some(challenge) = self.challenge {
            match HeaderValue::from_str(&challenge) {
                Ok(value) => {
                    response.headers_mut().insert(header::WWW_AUTHENTICATE, value);
                }
                Err(e) => error!("Invalid WWW-Authenticate challenge '{}': {}", challenge, e),
            }
        }
        response
    }
}

impl From<JsonRejection> for HTTPError {
    fn from(rejection: JsonRejection) -> Self {
        HTTPError::new(rejection.status(), rejection.body_text(), None)
    }
}

/// A JSON request body whose parse failures are reported as `HTTPError`.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = HTTPError;

    async fn from_request(req: Request, state: &S) -> Result<Self, HTTPError> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}

impl From<AuthRejected> for HTTPError {
    fn from(rejected: AuthRejected) -> Self {
        let message = match rejected {
            AuthRejected::MissingCredential => "Not authenticated",
            AuthRejected::Rejected(_) => "Could not validate credentials",
        };
        HTTPError::new(StatusCode::UNAUTHORIZED, message, Some("Bearer"))
    }
}

impl From<StoreError> for HTTPError {
    fn from(e: StoreError) -> Self {
        error!("Store error: {}", e);
        HTTPError::internal()
    }
}

impl From<AccessError> for HTTPError {
    fn from(e: AccessError) -> Self {
        match e {
            AccessError::NotFound { resource } => HTTPError::new(
                StatusCode::NOT_FOUND,
                format!("{} not found", resource),
                None,
            ),
            AccessError::Store(e) => e.into(),
        }
    }
}
