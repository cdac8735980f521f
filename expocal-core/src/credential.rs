//! The API key handed to event sources.

use std::fmt;

use crate::constants::{KEY_CREDENTIAL, MIN_CREDENTIAL_LEN};
use crate::error::{ExpoError, ExpoResult};
use crate::store::Store;

/// An API key. Only its length is checked; the source finds out the rest.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Accept user input, rejecting anything trivially short before it
    /// reaches the network.
    pub fn parse(input: &str) -> ExpoResult<Self> {
        let key = input.trim();
        if key.chars().count() < MIN_CREDENTIAL_LEN {
            return Err(ExpoError::CredentialInvalid(format!(
                "expected at least {MIN_CREDENTIAL_LEN} characters"
            )));
        }
        Ok(Credential(key.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Read the stored key.
    pub fn load(store: &dyn Store) -> ExpoResult<Self> {
        match store.get(KEY_CREDENTIAL)? {
            Some(key) => Self::parse(&key),
            None => Err(ExpoError::CredentialMissing),
        }
    }

    pub fn is_stored(store: &dyn Store) -> ExpoResult<bool> {
        Ok(store.get(KEY_CREDENTIAL)?.is_some())
    }

    pub fn save(&self, store: &dyn Store) -> ExpoResult<()> {
        store.set(KEY_CREDENTIAL, &self.0)
    }

    pub fn forget(store: &dyn Store) -> ExpoResult<()> {
        store.remove(KEY_CREDENTIAL)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let skip = self.0.chars().count().saturating_sub(4);
        let tail: String = self.0.chars().skip(skip).collect();
        write!(f, "Credential(…{tail})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn short_input_is_rejected() {
        assert!(matches!(
            Credential::parse("abc"),
            Err(ExpoError::CredentialInvalid(_))
        ));
        assert!(Credential::parse("   abc       ").is_err());
    }

    #[test]
    fn input_is_trimmed() {
        let key = Credential::parse("  AIzaSyExampleKey123  ").unwrap();
        assert_eq!(key.expose(), "AIzaSyExampleKey123");
    }

    #[test]
    fn missing_key_is_reported() {
        let store = MemoryStore::new();
        assert!(matches!(
            Credential::load(&store),
            Err(ExpoError::CredentialMissing)
        ));
        assert!(!Credential::is_stored(&store).unwrap());
    }

    #[test]
    fn save_load_forget() {
        let store = MemoryStore::new();
        let key = Credential::parse("AIzaSyExampleKey123").unwrap();
        key.save(&store).unwrap();
        assert_eq!(Credential::load(&store).unwrap(), key);

        Credential::forget(&store).unwrap();
        assert!(matches!(
            Credential::load(&store),
            Err(ExpoError::CredentialMissing)
        ));
    }

    #[test]
    fn debug_does_not_leak_the_key() {
        let key = Credential::parse("AIzaSyExampleKey123").unwrap();
        let debug = format!("{key:?}");
        assert!(!debug.contains("AIzaSy"));
        assert!(debug.ends_with("123)"));
    }
}
