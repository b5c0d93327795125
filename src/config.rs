use {
    log::warn,
    std::{
        env,
        fmt::{Debug, Formatter, Result as FmtResult},
    },
};

/// Environment variable holding the secret-cipher passphrase.
const ENV_AUTH_PASSPHRASE: &str = "CL_AUTH_PASSPHRASE";

/// Environment variable holding the key-value store host.
const ENV_STORE_HOST: &str = "CL_REDIS_HOST";

/// Environment variable holding the key-value store port.
const ENV_STORE_PORT: &str = "CL_REDIS_PORT";

/// Default secret-cipher passphrase.
const DEFAULT_PASSPHRASE: &str = "defaultPassphrase";

/// Default key-value store host.
const DEFAULT_STORE_HOST: &str = "localhost";

/// Default key-value store port.
const DEFAULT_STORE_PORT: u16 = 6379;

/// Process-wide configuration: the secret-cipher passphrase and the key-value store connection
/// parameters.
///
/// Constructed once at startup and passed by reference to the components that need it; there is
/// no ambient configuration state and no hot-reload. The `Debug` implementation redacts the
/// passphrase.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// The passphrase used to encrypt and decrypt stored API secret keys.
    passphrase: String,

    /// The key-value store host.
    store_host: String,

    /// The key-value store port.
    store_port: u16,
}

impl Config {
    /// Create a configuration with explicit values.
    pub fn new(passphrase: impl Into<String>, store_host: impl Into<String>, store_port: u16) -> Self {
        Self {
            passphrase: passphrase.into(),
            store_host: store_host.into(),
            store_port,
        }
    }

    /// Load the configuration from `CL_AUTH_PASSPHRASE`, `CL_REDIS_HOST`, and `CL_REDIS_PORT`,
    /// falling back to the defaults for unset variables. An unparsable port falls back to the
    /// default with a warning.
    pub fn from_env() -> Self {
        let passphrase = env::var(ENV_AUTH_PASSPHRASE).unwrap_or_else(|_| DEFAULT_PASSPHRASE.to_string());
        let store_host = env::var(ENV_STORE_HOST).unwrap_or_else(|_| DEFAULT_STORE_HOST.to_string());
        let store_port = match env::var(ENV_STORE_PORT) {
            Err(_) => DEFAULT_STORE_PORT,
            Ok(value) => match value.parse() {
                Ok(port) => port,
                Err(_) => {
                    warn!("Ignoring unparsable {} value {:?}; using {}", ENV_STORE_PORT, value, DEFAULT_STORE_PORT);
                    DEFAULT_STORE_PORT
                }
            },
        };

        Self {
            passphrase,
            store_host,
            store_port,
        }
    }

    /// Retrieve the secret-cipher passphrase.
    #[inline]
    pub fn passphrase(&self) -> &str {
        &self.passphrase
    }

    /// Retrieve the key-value store host.
    #[inline]
    pub fn store_host(&self) -> &str {
        &self.store_host
    }

    /// Retrieve the key-value store port.
    #[inline]
    pub fn store_port(&self) -> u16 {
        self.store_port
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_PASSPHRASE, DEFAULT_STORE_HOST, DEFAULT_STORE_PORT)
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Config")
            .field("passphrase", &"<redacted>")
            .field("store_host", &self.store_host)
            .field("store_port", &self.store_port)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test_log::test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.passphrase(), "defaultPassphrase");
        assert_eq!(config.store_host(), "localhost");
        assert_eq!(config.store_port(), 6379);
    }

    #[test_log::test]
    fn test_debug_redacts_passphrase() {
        let debug = format!("{:?}", Config::new("hunter2", "localhost", 6379));
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }
}
