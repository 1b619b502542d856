//! Persists a Google OAuth session per account and keeps its access token fresh.
//!
//! Sessions live at ~/.config/calnotify/google/session/{account}.toml

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use google_calendar::{AccessToken, Client};
use log::info;
use serde::{Deserialize, Serialize};

use crate::app_config::{AppConfig, base_dir};

pub struct Session {
    account_email: String,
    data: SessionData,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionData {
    access_token: String,
    refresh_token: String,
    expires_at: DateTime<Utc>,
}

impl From<&AccessToken> for SessionData {
    fn from(tokens: &AccessToken) -> Self {
        let expires_at = Utc::now() + Duration::seconds(tokens.expires_in);

        SessionData {
            access_token: tokens.access_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
            expires_at,
        }
    }
}

fn session_dir() -> Result<PathBuf> {
    Ok(base_dir()?.join("session"))
}

fn file_name_for(account_email: &str) -> String {
    let email_slug = account_email.replace(['/', '\\', ':'], "_");
    format!("{}.toml", email_slug)
}

/// Accounts that have a stored session, sorted.
pub fn stored_accounts() -> Result<Vec<String>> {
    accounts_in(&session_dir()?)
}

fn accounts_in(dir: &Path) -> Result<Vec<String>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut accounts = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read sessions from {}", dir.display()))?
    {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "toml") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                accounts.push(stem.to_string());
            }
        }
    }
    accounts.sort();
    Ok(accounts)
}

impl Session {
    pub fn new(account_email: &str, data: SessionData) -> Self {
        Session {
            account_email: account_email.to_string(),
            data,
        }
    }

    fn path(&self) -> Result<PathBuf> {
        Ok(session_dir()?.join(file_name_for(&self.account_email)))
    }

    pub fn client(&self) -> Result<Client> {
        let app_config = AppConfig::load()?;

        Ok(Client::new(
            app_config.client_id,
            app_config.client_secret,
            String::new(),
            self.data.access_token.clone(),
            self.data.refresh_token.clone(),
        ))
    }

    // Load a session and refresh it if expired:
    pub async fn load_valid(account_email: &str) -> Result<Self> {
        let mut session = Self::load(account_email)?;

        if session.is_expired(Utc::now()) {
            session.refresh().await?;
        }

        Ok(session)
    }

    fn load(account_email: &str) -> Result<Self> {
        let path = session_dir()?.join(file_name_for(account_email));

        if !path.exists() {
            anyhow::bail!(
                "Google OAuth session for {} not found!\n\
                Run `calnotify auth` first.",
                account_email
            );
        }

        Self::load_from(account_email, &path)
    }

    fn load_from(account_email: &str, path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).with_context(|| {
            format!(
                "Failed to read Google OAuth session from {}",
                path.display()
            )
        })?;

        let data: SessionData = toml::from_str(&contents).with_context(|| {
            format!(
                "Failed to parse Google OAuth session from {}",
                path.display()
            )
        })?;

        Ok(Session::new(account_email, data))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&self.path()?)
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(&self.data).context("Failed to serialize session")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write session to {}", path.display()))?;

        // Set to owner-only (0600) since file contains OAuth tokens:
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
        }

        Ok(())
    }

    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.data.expires_at
    }

    async fn refresh(&mut self) -> Result<()> {
        info!("Refreshing Google access token for {}", self.account_email);

        let client = self.client()?;

        let mut tokens = client
            .refresh_access_token()
            .await
            .context("Failed to refresh token")?;

        // Google typically doesn't return a new refresh_token on refresh
        if tokens.refresh_token.is_empty() {
            tokens.refresh_token = self.data.refresh_token.clone();
        }

        self.data = (&tokens).into();
        self.save()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_data(expires_at: DateTime<Utc>) -> SessionData {
        SessionData {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            expires_at,
        }
    }

    #[test]
    fn test_session_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session").join(file_name_for("me@example.com"));
        let session = Session::new("me@example.com", sample_data(Utc::now()));

        session.save_to(&path).unwrap();
        let loaded = Session::load_from("me@example.com", &path).unwrap();
        assert_eq!(loaded.data, session.data);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        let session = Session::new("me@example.com", sample_data(now));
        assert!(session.is_expired(now));
        assert!(!session.is_expired(now - Duration::minutes(1)));
    }

    #[test]
    fn test_file_name_is_path_safe() {
        assert_eq!(file_name_for("a/b:c@example.com"), "a_b_c@example.com.toml");
    }

    #[test]
    fn test_accounts_in_lists_sessions() {
        let dir = tempfile::tempdir().unwrap();
        assert!(accounts_in(&dir.path().join("missing")).unwrap().is_empty());

        std::fs::write(dir.path().join("b@example.com.toml"), "").unwrap();
        std::fs::write(dir.path().join("a@example.com.toml"), "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();

        assert_eq!(
            accounts_in(dir.path()).unwrap(),
            vec!["a@example.com".to_string(), "b@example.com".to_string()]
        );
    }
}
