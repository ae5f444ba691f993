#[allow(unused_imports)]
use cached::proc_macro::cached;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::jwk::{Jwk, JwkSet, KeyAlgorithm};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::base::{Rejection, TokenVerifier};
use crate::models::identity::Identity;

/// Google's published signing keys for Firebase ID tokens.
pub const FIREBASE_CERT_URI: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";
const FIREBASE_ISSUER_PREFIX: &str = "https://securetoken.google.com/";

/// JWT verifier config: where to fetch the keys and which issuer/audience to accept.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone)]
pub struct JwtVerifierConfig {
    pub name: String,
    pub cert_uri: String,
    pub issuer: String,
    pub audience: String,
}

/// Shorthand for Firebase Authentication ID tokens of one project.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone)]
pub struct FirebaseVerifierConfig {
    pub project_id: String,
}

impl From<&FirebaseVerifierConfig> for JwtVerifierConfig {
    fn from(config: &FirebaseVerifierConfig) -> Self {
        JwtVerifierConfig {
            name: format!("firebase:{}", config.project_id),
            cert_uri: FIREBASE_CERT_URI.to_string(),
            issuer: format!("{}{}", FIREBASE_ISSUER_PREFIX, config.project_id),
            audience: config.project_id.clone(),
        }
    }
}

/// Verifier that validates JWTs using downloaded keys (JWK) from `cert_uri`.
pub struct JwtVerifier {
    pub config: JwtVerifierConfig,
}

/// The claims we map onto an `Identity`; everything else is ignored.
#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

impl JwtVerifier {
    pub fn new(config: &JwtVerifierConfig) -> Self {
        info!(
            "Creating JWT verifier '{}' for issuer '{}'",
            config.name, config.issuer
        );
        Self {
            config: config.clone(),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for Rejection {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => Rejection::Expired,
            _ => Rejection::Malformed(format!("Failed to decode JWT: {}", e)),
        }
    }
}

#[async_trait::async_trait]
impl TokenVerifier for JwtVerifier {
    fn get_name(&self) -> &str {
        &self.config.name
    }

    /// Decodes the header, looks up the signing key by `kid`, and validates
    /// signature, expiry, issuer and audience.
    async fn verify(&self, token: &str) -> Result<Identity, Rejection> {
        let header = decode_header(token)
            .map_err(|e| Rejection::Malformed(format!("Failed to decode JWT header: {}", e)))?;

        let alg = match header.alg {
            Algorithm::RS256 | Algorithm::RS512 | Algorithm::HS256 | Algorithm::HS512 => {
                header.alg
            }
            other => return Err(Rejection::Unknown(format!("Unsupported JWT algorithm: {:?}", other))),
        };
        let kid = header
            .kid
            .ok_or_else(|| Rejection::Malformed("Missing 'kid' in JWT header".to_string()))?;
        debug!("Verifying JWT with kid '{}' via '{}'", kid, self.config.name);

        let certs = get_certs(self.config.cert_uri.clone())
            .await
            .map_err(Rejection::Unknown)?;
        let jwks: JwkSet = serde_json::from_str(&certs)
            .map_err(|e| Rejection::Unknown(format!("Failed to parse certificates: {}", e)))?;
        let jwk = jwks
            .find(&kid)
            .ok_or_else(|| Rejection::Unknown(format!("No signing key with kid {}", kid)))?;
        if !key_allows(jwk, alg) {
            return Err(Rejection::Malformed(format!(
                "JWT algorithm {:?} does not match signing key {}",
                alg, kid
            )));
        }
        let decoding_key = DecodingKey::from_jwk(jwk)
            .map_err(|e| Rejection::Unknown(format!("Unusable signing key {}: {}", kid, e)))?;

        let mut validation = Validation::new(alg);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);

        let claims = decode::<Claims>(token, &decoding_key, &validation)?.claims;
        if claims.sub.is_empty() {
            return Err(Rejection::Malformed("Empty 'sub' claim".to_string()));
        }

        Ok(Identity::new(
            claims.sub,
            claims.email,
            claims.name,
            claims.picture,
        ))
    }
}

/// A key that declares its algorithm may only verify tokens signed with it.
fn key_allows(jwk: &Jwk, alg: Algorithm) -> bool {
    match &jwk.common.key_algorithm {
        None => true,
        Some(declared) => matches!(
            (declared, alg),
            (KeyAlgorithm::RS256, Algorithm::RS256)
                | (KeyAlgorithm::RS512, Algorithm::RS512)
                | (KeyAlgorithm::HS256, Algorithm::HS256)
                | (KeyAlgorithm::HS512, Algorithm::HS512)
        ),
    }
}

/// Retrieves the certificates (JWKS) from a remote URI. Successful downloads are
/// cached for 600s.
#[cfg_attr(not(test), cached(time = 600, result = true))]
pub async fn get_certs(cert_uri: String) -> Result<String, String> {
    debug!("Fetching certificates from {}", cert_uri);
    let res = reqwest::get(&cert_uri)
        .await
        .map_err(|e| format!("Failed to download certificates: {}", e))?;

    if res.status().is_success() {
        let json: Value = res
            .json()
            .await
            .map_err(|e| format!("Failed to parse certificate JSON: {}", e))?;
        Ok(json.to_string())
    } else {
        Err(format!("Failed to download certificates: {}", res.status()))
    }
}
