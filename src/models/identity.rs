use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use http::request::Parts;
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use crate::utils::http_helpers::HTTPError;

/// The caller resolved from a verified bearer credential.
///
/// Lives for a single request and is never persisted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    #[serde(rename = "uid")]
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

impl Identity {
    pub fn new(
        id: impl Into<String>,
        email: Option<String>,
        name: Option<String>,
        picture: Option<String>,
    ) -> Self {
        Identity {
            id: id.into(),
            email,
            name,
            picture,
        }
    }
}

/// Optional-mode resolution: `None` when the request carries no valid credential.
#[derive(Debug, Clone)]
pub struct MaybeIdentity(pub Option<Identity>);

fn client_ip(parts: &Parts) -> String {
    parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn authorization_header(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

/// Required-mode extractor. Rejects with a 401 carrying a `WWW-Authenticate: Bearer`
/// challenge before the handler runs.
impl FromRequestParts<AppState> for Identity {
    type Rejection = HTTPError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, HTTPError> {
        let ip = client_ip(parts);
        state
            .auth
            .require(authorization_header(parts), &ip, &state.metrics)
            .await
            .map_err(HTTPError::from)
    }
}

impl FromRequestParts<AppState> for MaybeIdentity {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Infallible> {
        let ip = client_ip(parts);
        let identity = state
            .auth
            .optional(authorization_header(parts), &ip, &state.metrics)
            .await;
        Ok(MaybeIdentity(identity))
    }
}
