use async_trait::async_trait;
use chrono::Utc;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::base::{Rejection, TokenVerifier};
use crate::models::identity::Identity;

/// A fixed table of bearer tokens, for local development and tests.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct PlainVerifierConfig {
    /// A friendly name for logs.
    pub name: String,
    pub tokens: Vec<PlainTokenEntry>,
}

/// One accepted token and the identity it resolves to.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct PlainTokenEntry {
    pub token: String,
    pub uid: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
    /// Unix timestamp after which the token is treated as expired.
    pub expires_at: Option<i64>,
}

pub struct PlainVerifier {
    pub config: PlainVerifierConfig,
}

impl PlainVerifier {
    pub fn new(config: &PlainVerifierConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

#[async_trait]
impl TokenVerifier for PlainVerifier {
    fn get_name(&self) -> &str {
        &self.config.name
    }

    async fn verify(&self, credential: &str) -> Result<Identity, Rejection> {
        let entry = self
            .config
            .tokens
            .iter()
            .find(|entry| entry.token == credential)
            .ok_or_else(|| Rejection::Malformed("Unknown static token".to_string()))?;

        if let Some(expires_at) = entry.expires_at {
            if expires_at <= Utc::now().timestamp() {
                return Err(Rejection::Expired);
            }
        }

        debug!("Static token matched uid '{}'", entry.uid);
        Ok(Identity::new(
            entry.uid.clone(),
            entry.email.clone(),
            entry.name.clone(),
            entry.picture.clone(),
        ))
    }
}
