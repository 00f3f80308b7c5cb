//! Service account credential loading

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::CredentialsError;

/// The parts of a service account key file we care about.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ServiceAccount {
    /// Must be `service_account`
    #[serde(rename = "type")]
    pub kind: String,
    /// Project the season data belongs to
    pub project_id: String,
    /// Account identity, informational
    #[serde(default)]
    pub client_email: Option<String>,
    /// Default bucket, informational
    #[serde(default)]
    pub storage_bucket: Option<String>,
}

/// Reads and checks the credential file at `path`.
pub fn load(path: &Path) -> Result<ServiceAccount, CredentialsError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(CredentialsError::Missing(path.to_path_buf()));
        }
        Err(source) => {
            return Err(CredentialsError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let invalid = |reason: String| CredentialsError::Invalid {
        path: path.to_path_buf(),
        reason,
    };
    let account: ServiceAccount =
        serde_json::from_str(&raw).map_err(|err| invalid(err.to_string()))?;
    if account.kind != "service_account" {
        return Err(invalid(format!(
            "expected type \"service_account\", found \"{}\"",
            account.kind
        )));
    }
    if account.project_id.trim().is_empty() {
        return Err(invalid("project_id is empty".to_string()));
    }

    info!(
        "Loaded credentials for project {} from {}",
        account.project_id,
        path.display()
    );
    Ok(account)
}
