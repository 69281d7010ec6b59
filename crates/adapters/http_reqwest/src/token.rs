//! Access token persistence.
//!
//! Exactly one token is kept, as the whole content of one file. A missing
//! or blank file means "not signed in".

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::ApiError;

/// File-backed storage for the access token.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::TokenFile`] if the file exists but cannot be read.
    pub fn load(&self) -> Result<Option<String>, ApiError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(ApiError::TokenFile(err)),
        }
    }

    /// Replace the stored token, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::TokenFile`] if the file cannot be written.
    pub fn store(&self, token: &str) -> Result<(), ApiError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(ApiError::TokenFile)?;
        }
        std::fs::write(&self.path, token).map_err(ApiError::TokenFile)?;
        tracing::debug!(path = %self.path.display(), "access token stored");
        Ok(())
    }

    /// Forget the stored token. Succeeds when there is none.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::TokenFile`] if the file exists but cannot be
    /// removed.
    pub fn clear(&self) -> Result<(), ApiError> {
        match std::fs::remove_file(&self.path) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(ApiError::TokenFile(err)),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(name: &str) -> TokenStore {
        let dir = std::env::temp_dir().join(format!(
            "wattdesk-token-{name}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        TokenStore::new(dir.join("nested").join("token"))
    }

    #[test]
    fn should_report_no_token_when_file_missing() {
        assert_eq!(store("missing").load().unwrap(), None);
    }

    #[test]
    fn should_store_and_reload_token() {
        let store = store("roundtrip");
        store.store("eyJhbGciOi.abc.def").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("eyJhbGciOi.abc.def"));
    }

    #[test]
    fn should_treat_blank_file_as_signed_out() {
        let store = store("blank");
        store.store("  \n").unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn should_clear_token_idempotently() {
        let store = store("clear");
        store.store("token").unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
