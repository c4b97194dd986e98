//! Caller identity resolution.
//!
//! The protocol never inspects tokens itself; it asks a [`TokenVerifier`]
//! for the identity behind a bearer token. An unresolvable token yields
//! `None`, which the protocol surfaces as `Unauthorized` — verification
//! failures are deliberately silent at this layer.
//!
//! [`StaticTokenVerifier`] is the bundled implementation: a token → email
//! map loaded from a JSON file at startup. Raw tokens never reach the logs;
//! only a SHA-256 digest prefix does.

use crate::error::SeedError;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// The resolved caller behind a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Email the caller's profile is keyed on
    pub email: String,
}

/// Resolves bearer tokens to identities.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Returns `None` for any token that cannot be resolved, without
    /// distinguishing why.
    async fn verify(&self, token: &str) -> Option<Identity>;
}

/// SHA-256 digest prefix of a token, safe to log.
fn token_digest(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    digest.iter().take(4).map(|b| format!("{b:02x}")).collect()
}

/// Token map verifier backed by a JSON file of `{ "<token>": "<email>" }`.
#[derive(Debug, Default)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, String>,
}

impl StaticTokenVerifier {
    /// Build a verifier from an in-memory token → email map.
    #[must_use]
    pub fn new(tokens: HashMap<String, String>) -> Self {
        Self { tokens }
    }

    /// Load the token map from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `SeedError` if the file cannot be read or is not a JSON
    /// object of string pairs.
    pub fn from_file(path: &Path) -> Result<Self, SeedError> {
        let file = File::open(path).map_err(|source| SeedError::LoadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let tokens: HashMap<String, String> = serde_json::from_reader(BufReader::new(file))?;
        Ok(Self { tokens })
    }

    /// Number of tokens loaded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the map holds no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Option<Identity> {
        match self.tokens.get(token) {
            Some(email) => Some(Identity {
                email: email.clone(),
            }),
            None => {
                tracing::debug!("Rejected token {}", token_digest(token));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_token_digest_is_short_and_stable() {
        let digest = token_digest("secret-token");
        assert_eq!(digest.len(), 8);
        assert_eq!(digest, token_digest("secret-token"));
        assert_ne!(digest, token_digest("other-token"));
    }

    #[tokio::test]
    async fn test_verify_known_token() {
        let verifier = StaticTokenVerifier::new(HashMap::from([(
            "tok-ada".to_string(),
            "ada@example.com".to_string(),
        )]));

        let identity = verifier.verify("tok-ada").await;
        assert_eq!(
            identity,
            Some(Identity {
                email: "ada@example.com".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_verify_unknown_token_is_silent() {
        let verifier = StaticTokenVerifier::default();
        assert_eq!(verifier.verify("whatever").await, None);
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"tok-a": "a@example.com", "tok-b": "b@example.com"}"#)
            .unwrap();

        let verifier = StaticTokenVerifier::from_file(file.path()).unwrap();
        assert_eq!(verifier.len(), 2);
    }

    #[test]
    fn test_from_file_rejects_bad_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[1, 2, 3]").unwrap();

        let err = StaticTokenVerifier::from_file(file.path()).unwrap_err();
        assert!(matches!(err, SeedError::InvalidJson(_)));
    }

    #[test]
    fn test_from_file_missing() {
        let err =
            StaticTokenVerifier::from_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, SeedError::LoadFailed { .. }));
    }
}
