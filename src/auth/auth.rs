use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::metrics::MetricsRecorder;
use crate::models::identity::Identity;
use crate::verifiers::{create_verifier, Rejection, TokenVerifier, VerifierConfig};

const REQUIRED: &str = "required";
const OPTIONAL: &str = "optional";

/// Why required-mode resolution refused a request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthRejected {
    #[error("no bearer credential supplied")]
    MissingCredential,
    #[error(transparent)]
    Rejected(#[from] Rejection),
}

impl AuthRejected {
    fn result_label(&self) -> &'static str {
        match self {
            AuthRejected::MissingCredential => "missing",
            AuthRejected::Rejected(rejection) => rejection.kind(),
        }
    }
}

/// Pulls the credential out of an `Authorization: Bearer <credential>` header.
/// The scheme is matched case-insensitively and exactly one credential must follow.
pub fn bearer_credential(auth_header: Option<&str>) -> Option<&str> {
    let mut parts = auth_header?.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(credential), None) if scheme.eq_ignore_ascii_case("Bearer") => {
            Some(credential)
        }
        _ => None,
    }
}

/// Resolves the caller's identity for a request, in required or optional mode.
pub struct Auth {
    verifier: Box<dyn TokenVerifier>,
}

impl Auth {
    pub fn new(verifier: Box<dyn TokenVerifier>) -> Self {
        info!("Using token verifier '{}'", verifier.get_name());
        Auth { verifier }
    }

    pub fn from_config(config: &VerifierConfig) -> Self {
        Self::new(create_verifier(config))
    }

    /// Verifies a bare credential. Every rejection is logged with its kind.
    pub async fn verify(&self, credential: &str) -> Result<Identity, Rejection> {
        match self.verifier.verify(credential).await {
            Ok(identity) => {
                debug!(
                    "Verifier '{}' resolved uid '{}'",
                    self.verifier.get_name(),
                    identity.id
                );
                Ok(identity)
            }
            Err(rejection) => {
                warn!(
                    kind = rejection.kind(),
                    verifier = self.verifier.get_name(),
                    "Credential rejected: {}",
                    rejection
                );
                Err(rejection)
            }
        }
    }

    /// Required mode: anything short of a verified credential is an error.
    pub async fn require<M: MetricsRecorder>(
        &self,
        auth_header: Option<&str>,
        ip: &str,
        metrics: &M,
    ) -> Result<Identity, AuthRejected> {
        self.resolve_recorded(REQUIRED, auth_header, ip, metrics)
            .await
    }

    /// Optional mode: a missing or failing credential yields `None`, never an error.
    pub async fn optional<M: MetricsRecorder>(
        &self,
        auth_header: Option<&str>,
        ip: &str,
        metrics: &M,
    ) -> Option<Identity> {
        match self
            .resolve_recorded(OPTIONAL, auth_header, ip, metrics)
            .await
        {
            Ok(identity) => Some(identity),
            Err(AuthRejected::MissingCredential) => None,
            Err(AuthRejected::Rejected(rejection)) => {
                debug!(
                    "Continuing without identity for IP='{}' after {} rejection",
                    ip,
                    rejection.kind()
                );
                None
            }
        }
    }

    async fn resolve_recorded<M: MetricsRecorder>(
        &self,
        mode: &str,
        auth_header: Option<&str>,
        ip: &str,
        metrics: &M,
    ) -> Result<Identity, AuthRejected> {
        let started = Instant::now();
        let result = self.resolve(auth_header, ip).await;
        metrics.record_auth_duration(mode, started.elapsed().as_secs_f64());
        let label = match &result {
            Ok(_) => "success",
            Err(e) => e.result_label(),
        };
        metrics.record_auth_attempt(mode, label);
        result
    }

    async fn resolve(&self, auth_header: Option<&str>, ip: &str) -> Result<Identity, AuthRejected> {
        let Some(credential) = bearer_credential(auth_header) else {
            if auth_header.is_some() {
                warn!("Authorization header from IP='{}' is not a bearer credential", ip);
            }
            return Err(AuthRejected::MissingCredential);
        };

        debug!("Verifying bearer credential from IP='{}'", ip);
        Ok(self.verify(credential).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Metrics;
    use crate::verifiers::plain_verifier::{PlainTokenEntry, PlainVerifier, PlainVerifierConfig};

    fn entry(token: &str, uid: &str, expires_at: Option<i64>) -> PlainTokenEntry {
        PlainTokenEntry {
            token: token.to_string(),
            uid: uid.to_string(),
            email: None,
            name: None,
            picture: None,
            expires_at,
        }
    }

    fn test_auth() -> Auth {
        Auth::new(Box::new(PlainVerifier::new(&PlainVerifierConfig {
            name: "test".to_string(),
            tokens: vec![entry("good", "u1", None), entry("stale", "u2", Some(0))],
        })))
    }

    #[test]
    fn test_bearer_credential_parsing() {
        assert_eq!(bearer_credential(Some("Bearer abc")), Some("abc"));
        assert_eq!(bearer_credential(Some("bearer abc")), Some("abc"));
        assert_eq!(bearer_credential(Some("  Bearer   abc ")), Some("abc"));
        assert_eq!(bearer_credential(Some("Basic abc")), None);
        assert_eq!(bearer_credential(Some("Bearer")), None);
        assert_eq!(bearer_credential(Some("Bearer a b")), None);
        assert_eq!(bearer_credential(Some("")), None);
        assert_eq!(bearer_credential(None), None);
    }

    #[tokio::test]
    async fn test_require_resolves_valid_credential() {
        let auth = test_auth();
        let identity = auth
            .require(Some("Bearer good"), "127.0.0.1", &Metrics::new())
            .await
            .expect("valid credential should resolve");
        assert_eq!(identity.id, "u1");
    }

    #[tokio::test]
    async fn test_require_rejects_missing_and_invalid() {
        let auth = test_auth();
        let metrics = Metrics::new();

        assert_eq!(
            auth.require(None, "ip", &metrics).await,
            Err(AuthRejected::MissingCredential)
        );
        assert_eq!(
            auth.require(Some("Basic Z29vZA=="), "ip", &metrics).await,
            Err(AuthRejected::MissingCredential)
        );
        assert_eq!(
            auth.require(Some("Bearer stale"), "ip", &metrics).await,
            Err(AuthRejected::Rejected(Rejection::Expired))
        );
        assert!(matches!(
            auth.require(Some("Bearer bogus"), "ip", &metrics).await,
            Err(AuthRejected::Rejected(Rejection::Malformed(_)))
        ));

        let text = metrics.render();
        assert!(text.contains(r#"auth_requests_total{mode="required",result="missing"} 2"#));
        assert!(text.contains(r#"auth_requests_total{mode="required",result="expired"} 1"#));
        assert!(text.contains(r#"auth_requests_total{mode="required",result="malformed"} 1"#));
    }

    #[tokio::test]
    async fn test_optional_never_fails() {
        let auth = test_auth();
        let metrics = Metrics::new();

        let cases: [(Option<&str>, Option<&str>); 5] = [
            (None, None),
            (Some("Bearer good"), Some("u1")),
            (Some("Bearer stale"), None),
            (Some("Bearer bogus"), None),
            (Some("garbage"), None),
        ];
        for (header, expected) in cases {
            let resolved = auth.optional(header, "ip", &metrics).await;
            assert_eq!(resolved.as_ref().map(|i| i.id.as_str()), expected, "header {:?}", header);
        }

        let text = metrics.render();
        assert!(text.contains(r#"auth_requests_total{mode="optional",result="success"} 1"#));
    }
}
