//! Immutable per-server session configuration.
//!
//! Everything a session needs to make decisions is fixed before the server
//! starts accepting connections: the credential table, the category prefix
//! and the policy-file response text. Sessions share one [`SessionConfig`]
//! through an `Arc` and only ever read it.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Category prefix applied when none is configured explicitly, matching the
/// original SLF4Fx server default.
pub const DEFAULT_CATEGORY_PREFIX: &str = "slf4fx";

/// Read-only configuration shared by every session of a server.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    category_prefix: Option<String>,
    credentials: HashMap<String, String>,
    policy_file_response: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionConfig {
    /// Creates a configuration with the default category prefix, an empty
    /// credential table (accept-all) and no policy-file response.
    #[must_use]
    pub fn new() -> Self {
        Self {
            category_prefix: Some(DEFAULT_CATEGORY_PREFIX.to_owned()),
            credentials: HashMap::new(),
            policy_file_response: None,
        }
    }

    /// Sets or clears the category prefix. `None` drops the prefix segment
    /// from forwarded categories entirely.
    #[must_use]
    pub fn category_prefix(mut self, prefix: Option<String>) -> Self {
        self.category_prefix = prefix;
        self
    }

    /// Replaces the credential table. An empty table accepts any access
    /// request.
    #[must_use]
    pub fn credentials(mut self, credentials: HashMap<String, String>) -> Self {
        self.credentials = credentials;
        self
    }

    /// Sets the text answered to policy-file requests. When unset, the
    /// response is a single NUL byte.
    #[must_use]
    pub fn policy_file_response(mut self, response: Option<String>) -> Self {
        self.policy_file_response = response;
        self
    }

    /// Returns the configured category prefix, if any.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.category_prefix.as_deref()
    }

    /// Reports whether the credential table is empty (accept-all mode).
    #[must_use]
    pub fn accepts_all(&self) -> bool {
        self.credentials.is_empty()
    }

    /// Looks up the secret registered for `application_id`.
    #[must_use]
    pub fn secret_for(&self, application_id: &str) -> Option<&str> {
        self.credentials.get(application_id).map(String::as_str)
    }

    /// Returns the configured policy-file response text, if any.
    #[must_use]
    pub fn policy_response(&self) -> Option<&str> {
        self.policy_file_response.as_deref()
    }
}

/// Failures while loading a credentials file.
#[derive(Debug, Error)]
pub enum CredentialsError {
    /// The file could not be read.
    #[error("failed to read credentials file {}: {source}", .path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A non-comment line lacked the `application-id:secret` separator.
    #[error("{}:{line}: expected application-id:secret", .path.display())]
    MissingSeparator {
        /// Path that was being parsed.
        path: PathBuf,
        /// One-based line number of the offending entry.
        line: usize,
    },
    /// A line had an empty application id or secret.
    #[error("{}:{line}: application id and secret must be non-empty", .path.display())]
    EmptyField {
        /// Path that was being parsed.
        path: PathBuf,
        /// One-based line number of the offending entry.
        line: usize,
    },
}

/// Loads an `application-id:secret` table from a text file.
///
/// One entry per line; blank lines and `#` comments are skipped. The secret
/// may itself contain `:` characters — only the first separator splits the
/// line.
pub fn load_credentials(path: &Path) -> Result<HashMap<String, String>, CredentialsError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CredentialsError::Io {
        path: path.to_owned(),
        source,
    })?;

    let mut table = HashMap::new();
    for (index, raw_line) in contents.lines().enumerate() {
        let line = raw_line.trim_end_matches('\r');
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((application_id, secret)) = line.split_once(':') else {
            return Err(CredentialsError::MissingSeparator {
                path: path.to_owned(),
                line: index + 1,
            });
        };
        if application_id.is_empty() || secret.is_empty() {
            return Err(CredentialsError::EmptyField {
                path: path.to_owned(),
                line: index + 1,
            });
        }
        table.insert(application_id.to_owned(), secret.to_owned());
    }
    Ok(table)
}
