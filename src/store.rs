//! Lookup of encrypted API secret keys from an external key-value store.
//!
//! The store itself (connections, retries, wire protocol) is an external collaborator; only its
//! read contract is consumed here, through the [`SecretKeyStore`] trait. The adapter performs no
//! retries and caches nothing: every lookup is one store round trip plus a fresh decryption.

use {
    crate::{cipher, config::Config, constants::SECRET_KEY_FIELD, SignatureError},
    async_trait::async_trait,
    log::debug,
    tower::BoxError,
};

/// The read contract consumed from the external key-value store: fetch a single field of the
/// hash entry stored under `key`, distinguishing absence from backend failure.
#[async_trait]
pub trait SecretKeyStore: Send + Sync {
    /// Return the field's value, `None` if the key or field is absent, or an error if the
    /// backend could not be reached.
    async fn get_field(&self, key: &str, field: &str) -> Result<Option<String>, BoxError>;
}

/// Resolves an API key id to its decrypted secret key.
///
/// The `Debug` implementation never reveals the passphrase.
pub struct ApiKeyService<S> {
    /// The external key-value store client.
    store: S,

    /// The process-wide passphrase the stored secrets are encrypted under.
    passphrase: String,
}

impl<S> std::fmt::Debug for ApiKeyService<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKeyService")
    }
}

impl<S: SecretKeyStore> ApiKeyService<S> {
    /// Create a new `ApiKeyService` over `store`, taking the passphrase from `config`.
    pub fn new(store: S, config: &Config) -> Self {
        Self {
            store,
            passphrase: config.passphrase().to_string(),
        }
    }

    /// Retrieve and decrypt the API secret key stored for `api_key_id`.
    ///
    /// # Errors
    /// * [`SignatureError::SecretNotFound`] if the store has no record for `api_key_id`. No
    ///   decryption is attempted in this case.
    /// * [`SignatureError::StoreUnavailable`] if the store backend failed; distinct from
    ///   absence, and potentially retryable by the caller.
    /// * [`SignatureError::DecryptionFailure`] if the stored ciphertext cannot be deciphered.
    pub async fn get_api_secret_key(&self, api_key_id: &str) -> Result<String, SignatureError> {
        let stored =
            self.store.get_field(api_key_id, SECRET_KEY_FIELD).await.map_err(SignatureError::StoreUnavailable)?;
        match stored {
            None => Err(SignatureError::SecretNotFound(format!("No secret key record for API key id {}", api_key_id))),
            Some(ciphertext) => {
                debug!("Decrypting stored secret for API key id {}", api_key_id);
                // Key material is re-derived from the passphrase on every call, never cached.
                cipher::decrypt(&ciphertext, &self.passphrase)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::{ApiKeyService, SecretKeyStore},
        crate::{cipher, config::Config},
        async_trait::async_trait,
        std::collections::HashMap,
        std::io::{Error as IOError, ErrorKind},
        tower::BoxError,
    };

    /// In-memory stand-in for the external store: one hash entry per API key id.
    struct MemoryStore {
        entries: HashMap<String, HashMap<String, String>>,
    }

    #[async_trait]
    impl SecretKeyStore for MemoryStore {
        async fn get_field(&self, key: &str, field: &str) -> Result<Option<String>, BoxError> {
            Ok(self.entries.get(key).and_then(|entry| entry.get(field)).cloned())
        }
    }

    /// Store whose backend is down.
    struct BrokenStore;

    #[async_trait]
    impl SecretKeyStore for BrokenStore {
        async fn get_field(&self, _key: &str, _field: &str) -> Result<Option<String>, BoxError> {
            Err(Box::new(IOError::new(ErrorKind::ConnectionRefused, "connection refused")))
        }
    }

    fn store_with(api_key_id: &str, secret: &str, config: &Config) -> MemoryStore {
        let mut fields = HashMap::new();
        fields.insert("apiSecretKey".to_string(), cipher::encrypt(secret, config.passphrase()));
        let mut entries = HashMap::new();
        entries.insert(api_key_id.to_string(), fields);
        MemoryStore {
            entries,
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_lookup_decrypts_stored_secret() {
        let config = Config::default();
        let service = ApiKeyService::new(store_with("MyId", "Shush!", &config), &config);
        assert_eq!(service.get_api_secret_key("MyId").await.unwrap(), "Shush!");
    }

    #[test_log::test(tokio::test)]
    async fn test_lookup_of_unknown_id_is_not_found() {
        let config = Config::default();
        let service = ApiKeyService::new(store_with("MyId", "Shush!", &config), &config);
        let e = service.get_api_secret_key("OtherId").await.unwrap_err();
        assert_eq!(e.error_code(), "SecretNotFound");
    }

    #[test_log::test(tokio::test)]
    async fn test_backend_outage_is_distinct_from_absence() {
        let config = Config::default();
        let service = ApiKeyService::new(BrokenStore, &config);
        let e = service.get_api_secret_key("MyId").await.unwrap_err();
        assert_eq!(e.error_code(), "StoreUnavailable");
        assert_eq!(e.to_string(), "connection refused");
    }

    #[test_log::test(tokio::test)]
    async fn test_wrong_passphrase_surfaces_decryption_failure_or_garbage() {
        let stored_under = Config::new("passphraseA", "localhost", 6379);
        let read_with = Config::new("passphraseB", "localhost", 6379);
        let service = ApiKeyService::new(store_with("MyId", "Shush!", &stored_under), &read_with);
        match service.get_api_secret_key("MyId").await {
            Err(e) => assert_eq!(e.error_code(), "DecryptionFailure"),
            Ok(plaintext) => assert!(plaintext != "Shush!"),
        }
    }
}
