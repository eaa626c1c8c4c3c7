//! Credential loading and client construction.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;

use dep_client::{DepClient, OAuthCredentials, ServerUrl};

use crate::cli::ConnectionArgs;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

const CONSUMER_KEY_ENV: &str = "DEP_CONSUMER_KEY";
const CONSUMER_SECRET_ENV: &str = "DEP_CONSUMER_SECRET";
const ACCESS_TOKEN_ENV: &str = "DEP_ACCESS_TOKEN";
const ACCESS_SECRET_ENV: &str = "DEP_ACCESS_SECRET";

/// Build a client from the connection arguments.
pub fn connect(args: &ConnectionArgs) -> Result<DepClient> {
    let server_url = ServerUrl::new(&args.server_url).context("Invalid server URL")?;
    let credentials = load_credentials(args.tokens.as_deref())?;

    DepClient::builder(credentials)
        .server_url(server_url)
        .user_agent(concat!("dep-cli/", env!("DEP_VERSION")))
        .timeout(Duration::from_secs(args.timeout))
        .build()
        .context("Failed to create DEP client")
}

/// Resolve credentials: explicit token file, then environment, then the
/// token file in the config directory.
fn load_credentials(tokens: Option<&Path>) -> Result<OAuthCredentials> {
    if let Some(path) = tokens {
        return read_tokens(path);
    }

    if let Some(credentials) = credentials_from_env()? {
        return Ok(credentials);
    }

    if let Some(path) = default_tokens_path()
        && path.exists()
    {
        return read_tokens(&path);
    }

    bail!(
        "No DEP credentials found. Pass --tokens, set {}/{}/{}/{}, or place tokens.json in the config directory.",
        CONSUMER_KEY_ENV,
        CONSUMER_SECRET_ENV,
        ACCESS_TOKEN_ENV,
        ACCESS_SECRET_ENV
    )
}

fn credentials_from_env() -> Result<Option<OAuthCredentials>> {
    let Ok(consumer_key) = std::env::var(CONSUMER_KEY_ENV) else {
        return Ok(None);
    };

    let var = |name: &str| std::env::var(name).with_context(|| format!("{} is not set", name));

    Ok(Some(OAuthCredentials::new(
        consumer_key,
        var(CONSUMER_SECRET_ENV)?,
        var(ACCESS_TOKEN_ENV)?,
        var(ACCESS_SECRET_ENV)?,
    )))
}

/// Get the default token file path.
fn default_tokens_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "dep").map(|dirs| dirs.config_dir().join("tokens.json"))
}

fn read_tokens(path: &Path) -> Result<OAuthCredentials> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read token file {}", path.display()))?;

    // Token files hold long-lived secrets (Unix only)
    #[cfg(unix)]
    {
        let mode = fs::metadata(path)?.permissions().mode();
        if mode & 0o077 != 0 {
            tracing::warn!(path = %path.display(), mode = %format!("{:o}", mode & 0o777), "token file is readable by other users");
        }
    }

    serde_json::from_str(&json).context("Invalid token file")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_vendor_token_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        fs::write(
            &path,
            r#"{"consumer_key":"CK_1","consumer_secret":"CS_1","access_token":"AT_1","access_secret":"AS_1","access_token_expiry":"2027-01-01T00:00:00Z"}"#,
        )
        .unwrap();

        let credentials = read_tokens(&path).unwrap();
        assert_eq!(credentials.consumer_key(), "CK_1");
        assert_eq!(credentials.access_token(), "AT_1");
    }

    #[test]
    fn rejects_malformed_token_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        fs::write(&path, "{}").unwrap();

        assert!(read_tokens(&path).is_err());
    }
}
