//! Cross-run identity.
//!
//! The run-setup phase generates one e-mail/password pair and writes it to a
//! small JSON file. Registration and cleanup suites read it back; a missing
//! file is an error, never a silent skip.

use crate::result::{ShopcheckError, ShopcheckResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fixed password of every generated account
pub const GENERATED_PASSWORD: &str = "Password123!";

/// Generated e-mail prefix
pub const EMAIL_PREFIX: &str = "qa_engineer_";

/// Generated e-mail domain
pub const EMAIL_DOMAIN: &str = "gmail.com";

/// What to do when the state file already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitMode {
    /// Reuse the existing identity
    #[default]
    KeepExisting,
    /// Replace it with a fresh one
    Overwrite,
}

/// The identity shared by one suite run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedState {
    /// Generated e-mail address
    #[serde(rename = "randomEmail")]
    pub random_email: String,
    /// Account password
    pub password: String,
}

impl SharedState {
    /// Fresh identity with a random e-mail
    #[must_use]
    pub fn generate() -> Self {
        let token = uuid::Uuid::new_v4().simple().to_string();
        Self {
            random_email: format!("{EMAIL_PREFIX}{}@{EMAIL_DOMAIN}", &token[..12]),
            password: GENERATED_PASSWORD.to_string(),
        }
    }

    /// Display name used when registering this identity
    #[must_use]
    pub fn display_name(&self) -> String {
        let local = self.random_email.split('@').next().unwrap_or_default();
        format!("QA {}", local.trim_start_matches(EMAIL_PREFIX))
    }

    /// Write the record, replacing any existing file
    pub fn write(&self, path: &Path) -> ShopcheckResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        tracing::info!(path = %path.display(), email = %self.random_email, "shared state written");
        Ok(())
    }

    /// Read the record; absence is [`ShopcheckError::MissingSharedState`]
    pub fn load(path: &Path) -> ShopcheckResult<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ShopcheckError::MissingSharedState {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    /// Run-setup entry point: ensure a record exists and return it
    pub fn init(path: &Path, mode: InitMode) -> ShopcheckResult<Self> {
        if mode == InitMode::KeepExisting && path.exists() {
            let existing = Self::load(path)?;
            tracing::info!(path = %path.display(), "reusing shared state");
            return Ok(existing);
        }
        let state = Self::generate();
        state.write(path)?;
        Ok(state)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod generate_tests {
        use super::*;

        #[test]
        fn test_email_shape() {
            let state = SharedState::generate();
            assert!(state.random_email.starts_with("qa_engineer_"));
            assert!(state.random_email.ends_with("@gmail.com"));
            assert_eq!(state.password, "Password123!");
        }

        #[test]
        fn test_emails_differ() {
            assert_ne!(
                SharedState::generate().random_email,
                SharedState::generate().random_email
            );
        }

        #[test]
        fn test_display_name() {
            let state = SharedState {
                random_email: "qa_engineer_abc123@gmail.com".to_string(),
                password: GENERATED_PASSWORD.to_string(),
            };
            assert_eq!(state.display_name(), "QA abc123");
        }
    }

    mod file_tests {
        use super::*;

        #[test]
        fn test_json_keys() {
            let state = SharedState {
                random_email: "qa_engineer_x@gmail.com".to_string(),
                password: "Password123!".to_string(),
            };
            let value = serde_json::to_value(&state).unwrap();
            assert_eq!(
                value,
                serde_json::json!({ "randomEmail": "qa_engineer_x@gmail.com", "password": "Password123!" })
            );
        }

        #[test]
        fn test_write_then_load() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("nested").join("shared-state.json");
            let state = SharedState::generate();
            state.write(&path).unwrap();
            assert_eq!(SharedState::load(&path).unwrap(), state);
        }

        #[test]
        fn test_missing_file_fails_loudly() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("shared-state.json");
            let err = SharedState::load(&path).unwrap_err();
            assert!(matches!(err, ShopcheckError::MissingSharedState { path: ref p } if *p == path));
        }

        #[test]
        fn test_malformed_file_is_json_error() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("shared-state.json");
            std::fs::write(&path, "{ not json").unwrap();
            assert!(matches!(
                SharedState::load(&path),
                Err(ShopcheckError::Json(_))
            ));
        }

        #[test]
        fn test_init_keeps_existing() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("shared-state.json");
            let first = SharedState::init(&path, InitMode::KeepExisting).unwrap();
            let second = SharedState::init(&path, InitMode::KeepExisting).unwrap();
            assert_eq!(first, second);
        }

        #[test]
        fn test_init_overwrite_regenerates() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("shared-state.json");
            let first = SharedState::init(&path, InitMode::KeepExisting).unwrap();
            let second = SharedState::init(&path, InitMode::Overwrite).unwrap();
            assert_ne!(first.random_email, second.random_email);
            assert_eq!(SharedState::load(&path).unwrap(), second);
        }
    }
}
