use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use roost_client::Credential;
use roost_core::{Error, Result};

/// Ordered set of upstream credentials, issued round robin so outbound calls
/// spread across sessions and no single credential soaks up the rate limit.
#[derive(Debug)]
pub struct CredentialPool {
    credentials: Vec<Credential>,
    cursor: AtomicUsize,
}

impl CredentialPool {
    /// Load from a line-delimited source, one JSON object per line.
    /// Malformed lines are skipped with a warning; a missing source or an
    /// empty surviving set is fatal.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read credential file {}: {}", path.display(), e)))?;

        let mut credentials = Vec::new();
        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<Credential>(line) {
                Ok(credential) => credentials.push(credential),
                Err(error) => {
                    tracing::warn!("Skipping malformed credential on line {}: {}", index + 1, error)
                }
            }
        }
        if credentials.is_empty() {
            return Err(Error::Config(format!(
                "no valid credentials in {}",
                path.display()
            )));
        }
        tracing::info!("Loaded {} credential(s) from {}", credentials.len(), path.display());
        Ok(CredentialPool {
            credentials,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Next credential in round-robin order. The atomic fetch-add serializes
    /// the rotation under concurrent callers: no credential is issued twice
    /// in a cycle, none skipped.
    pub fn next(&self) -> Credential {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.credentials.len();
        self.credentials[index].clone()
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}
