//! Credential acquisition with ordered fallback
//!
//! A [`CredentialChain`] tries its sources in order and returns the first
//! token it gets. Sources that cannot produce a token are logged and
//! skipped; only when every source misses does acquisition fail, naming
//! everything that was tried.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;
use screenplay_config::AzureSettings;
use screenplay_core::ScreenplayError;

/// A bearer token and its expiry
#[derive(Clone)]
pub struct Credential {
    token: String,
    expires_on: DateTime<Utc>,
}

impl Credential {
    /// Build a credential from a token and its expiry
    #[must_use]
    pub fn new(token: impl Into<String>, expires_on: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_on,
        }
    }

    /// The raw token, for presenting to a backend
    #[inline]
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// When the token stops being valid
    #[inline]
    #[must_use]
    pub fn expires_on(&self) -> DateTime<Utc> {
        self.expires_on
    }

    /// Whether the token has already expired
    #[inline]
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_on <= Utc::now()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"***")
            .field("expires_on", &self.expires_on)
            .finish()
    }
}

/// Errors from credential acquisition
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// One source could not produce a token
    #[error("credential source {source_name} unavailable: {reason}")]
    Unavailable {
        /// Name of the source that missed
        source_name: String,
        /// Why it missed
        reason: String,
    },

    /// Every source in the chain missed
    #[error("no credential source succeeded (tried: {})", tried.join(", "))]
    Exhausted {
        /// Names of the sources tried, in order
        tried: Vec<String>,
    },
}

impl From<CredentialError> for ScreenplayError {
    fn from(err: CredentialError) -> Self {
        ScreenplayError::upstream("credential acquisition", err)
    }
}

/// One way of obtaining a token
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Name used in logs and in the exhausted error
    fn name(&self) -> &str;

    /// Try to produce a token
    async fn acquire(&self) -> Result<Credential, CredentialError>;
}

/// Ordered fallback over credential sources
pub struct CredentialChain {
    sources: Vec<Box<dyn CredentialSource>>,
}

impl CredentialChain {
    /// Build an empty chain
    #[must_use]
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Append a source; earlier sources are tried first
    #[must_use]
    pub fn with(mut self, source: impl CredentialSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Number of sources in the chain
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether the chain has no sources
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Try each source in order, returning the first token produced.
    ///
    /// # Errors
    /// `CredentialError::Exhausted` naming every source tried.
    pub async fn acquire(&self) -> Result<Credential, CredentialError> {
        let mut tried = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            match source.acquire().await {
                Ok(credential) => {
                    tracing::info!(source = source.name(), "credential acquired");
                    return Ok(credential);
                }
                Err(error) => {
                    tracing::debug!(source = source.name(), %error, "credential source missed");
                    tried.push(source.name().to_string());
                }
            }
        }
        Err(CredentialError::Exhausted { tried })
    }
}

impl Default for CredentialChain {
    fn default() -> Self {
        Self::new()
    }
}

/// Service-principal source backed by a tenant/client-id/secret triple.
///
/// Token minting is delegated to the closure supplied at construction so
/// the chain never links an identity SDK directly.
pub struct ClientSecretSource {
    tenant_id: String,
    client_id: String,
    client_secret: String,
    mint: MintFn,
}

type MintFn =
    Box<dyn Fn(&str, &str, &str) -> Result<Credential, CredentialError> + Send + Sync>;

impl ClientSecretSource {
    /// Build from settings; fails when any of the three keys is absent
    pub fn from_settings(
        azure: &AzureSettings,
        mint: MintFn,
    ) -> Result<Self, CredentialError> {
        let missing = |key: &str| CredentialError::Unavailable {
            source_name: "client-secret".to_string(),
            reason: format!("{key} not configured"),
        };
        Ok(Self {
            tenant_id: azure
                .tenant_id
                .clone()
                .ok_or_else(|| missing("azure.tenant_id"))?,
            client_id: azure
                .client_id
                .clone()
                .ok_or_else(|| missing("azure.client_id"))?,
            client_secret: azure
                .client_secret
                .clone()
                .ok_or_else(|| missing("azure.client_secret"))?,
            mint,
        })
    }
}

#[async_trait]
impl CredentialSource for ClientSecretSource {
    fn name(&self) -> &str {
        "client-secret"
    }

    async fn acquire(&self) -> Result<Credential, CredentialError> {
        (self.mint)(&self.tenant_id, &self.client_id, &self.client_secret)
    }
}

impl std::fmt::Debug for ClientSecretSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSecretSource")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    struct FixedSource {
        name: &'static str,
        outcome: Result<(), &'static str>,
    }

    #[async_trait]
    impl CredentialSource for FixedSource {
        fn name(&self) -> &str {
            self.name
        }

        async fn acquire(&self) -> Result<Credential, CredentialError> {
            match self.outcome {
                Ok(()) => Ok(Credential::new(
                    format!("token-from-{}", self.name),
                    Utc::now() + Duration::hours(1),
                )),
                Err(reason) => Err(CredentialError::Unavailable {
                    source_name: self.name.to_string(),
                    reason: reason.to_string(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn chain_returns_first_success_in_order() {
        let chain = CredentialChain::new()
            .with(FixedSource {
                name: "cli",
                outcome: Err("not logged in"),
            })
            .with(FixedSource {
                name: "client-secret",
                outcome: Ok(()),
            })
            .with(FixedSource {
                name: "interactive",
                outcome: Ok(()),
            });

        let credential = chain.acquire().await.unwrap();
        assert_eq!(credential.token(), "token-from-client-secret");
    }

    #[tokio::test]
    async fn exhausted_chain_names_every_source_tried() {
        let chain = CredentialChain::new()
            .with(FixedSource {
                name: "cli",
                outcome: Err("not logged in"),
            })
            .with(FixedSource {
                name: "managed-identity",
                outcome: Err("no endpoint"),
            });

        let err = chain.acquire().await.unwrap_err();
        let text = err.to_string();
        assert!(text.contains("cli"));
        assert!(text.contains("managed-identity"));
    }

    #[tokio::test]
    async fn empty_chain_is_exhausted_immediately() {
        let err = CredentialChain::new().acquire().await.unwrap_err();
        assert!(matches!(err, CredentialError::Exhausted { tried } if tried.is_empty()));
    }

    #[test]
    fn credential_debug_redacts_the_token() {
        let credential = Credential::new("s3cr3t-token", Utc::now() + Duration::hours(1));
        let text = format!("{credential:?}");
        assert!(!text.contains("s3cr3t-token"));
        assert!(text.contains("***"));
    }

    #[test]
    fn expiry_is_checked_against_now() {
        let expired = Credential::new("t", Utc::now() - Duration::minutes(1));
        let live = Credential::new("t", Utc::now() + Duration::minutes(5));
        assert!(expired.is_expired());
        assert!(!live.is_expired());
    }

    #[test]
    fn client_secret_source_requires_all_three_keys() {
        let azure = AzureSettings {
            tenant_id: Some("t".to_string()),
            client_id: Some("c".to_string()),
            client_secret: None,
            ..AzureSettings::default()
        };
        let err = ClientSecretSource::from_settings(
            &azure,
            Box::new(|_, _, _| unreachable!("never minted")),
        )
        .map(|_| ())
        .unwrap_err();
        assert!(err.to_string().contains("azure.client_secret"));
    }

    #[test]
    fn client_secret_debug_redacts_the_secret() {
        let azure = AzureSettings {
            tenant_id: Some("t".to_string()),
            client_id: Some("c".to_string()),
            client_secret: Some("hunter2".to_string()),
            ..AzureSettings::default()
        };
        let source = ClientSecretSource::from_settings(
            &azure,
            Box::new(|_, _, _| unreachable!("never minted")),
        )
        .unwrap();
        assert!(!format!("{source:?}").contains("hunter2"));
    }
}
