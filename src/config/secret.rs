//! Secure credential handling using the secrecy crate
//!
//! API keys for the remote functions are held as [`SecretString`]: the memory
//! is zeroed on drop, Debug output is redacted, and the value is only reachable
//! through `expose_secret()`.
//!
//! # Example
//!
//! ```rust
//! use ferry::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let key = secret_string("my-api-key".to_string());
//! assert_eq!(key.expose_secret().as_ref(), "my-api-key");
//! assert!(!format!("{key:?}").contains("my-api-key"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// String wrapper that satisfies the bounds `Secret` needs
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl SecretValue {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Needed by `RequestBuilder::bearer_auth`
impl std::fmt::Display for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Secret string type used for credentials in configuration
pub type SecretString = Secret<SecretValue>;

/// Wrap a plain string as a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}
