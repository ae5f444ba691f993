use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    jwt_verifier::{FirebaseVerifierConfig, JwtVerifier, JwtVerifierConfig},
    plain_verifier::{PlainVerifier, PlainVerifierConfig},
};
use crate::models::identity::Identity;

/// Configuration options for the token verifier.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone)]
#[serde(tag = "type")]
pub enum VerifierConfig {
    #[serde(rename = "jwt")]
    Jwt(JwtVerifierConfig),
    #[serde(rename = "firebase")]
    Firebase(FirebaseVerifierConfig),
    #[serde(rename = "plain")]
    Plain(PlainVerifierConfig),
}

/// Why a credential was not accepted. Only ever used for logs and metrics;
/// clients see the same 401 for every kind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The credential cannot be parsed or fails structural verification.
    #[error("malformed credential: {0}")]
    Malformed(String),
    /// The credential was valid but its validity window has passed.
    #[error("credential has expired")]
    Expired,
    /// Anything else, including issuer or network failures.
    #[error("verification failed: {0}")]
    Unknown(String),
}

impl Rejection {
    pub fn kind(&self) -> &'static str {
        match self {
            Rejection::Malformed(_) => "malformed",
            Rejection::Expired => "expired",
            Rejection::Unknown(_) => "unknown",
        }
    }
}

/// Turns a bearer credential into an `Identity`.
#[async_trait::async_trait]
pub trait TokenVerifier: Send + Sync {
    fn get_name(&self) -> &str;
    async fn verify(&self, credential: &str) -> Result<Identity, Rejection>;
}

/// Create a token verifier from a given config.
pub fn create_verifier(config: &VerifierConfig) -> Box<dyn TokenVerifier> {
    match config {
        VerifierConfig::Jwt(cfg) => Box::new(JwtVerifier::new(cfg)),
        VerifierConfig::Firebase(cfg) => Box::new(JwtVerifier::new(&cfg.into())),
        VerifierConfig::Plain(cfg) => Box::new(PlainVerifier::new(cfg)),
    }
}
