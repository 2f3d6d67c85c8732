//! Configuration module for the community site backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// SMTP credentials for the suggestion relay.
///
/// Only constructed when host, user and password are all present; a partial
/// credential set leaves the relay unconfigured.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    /// Fixed recipient for suggestion notifications
    pub to: String,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Admin password gating all content-mutating operations (gate disabled if absent)
    pub admin_password: Option<String>,
    /// Directory holding the JSON documents and the scoreboard CSV
    pub data_dir: PathBuf,
    /// Directory holding the rules document and the bundle folders
    pub files_dir: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Chat-group invite link used until the admin sets one
    pub default_chat_link: String,
    /// Mail relay credentials, if configured
    pub smtp: Option<SmtpConfig>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let admin_password = env::var("SITE_ADMIN_PASSWORD").ok();

        let data_dir = env::var("SITE_DATA_DIR")
            .unwrap_or_else(|_| "./data".to_string())
            .into();

        let files_dir = env::var("SITE_FILES_DIR")
            .unwrap_or_else(|_| "./files".to_string())
            .into();

        let bind_addr = env::var("SITE_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid SITE_BIND_ADDR format");

        let log_level = env::var("SITE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let default_chat_link = env::var("SITE_DEFAULT_CHAT_LINK")
            .unwrap_or_else(|_| "https://chat.example.com/invite".to_string());

        let smtp = Self::smtp_from_env();

        Self {
            admin_password,
            data_dir,
            files_dir,
            bind_addr,
            log_level,
            default_chat_link,
            smtp,
        }
    }

    /// Assemble the SMTP block; host, user and password are all required.
    fn smtp_from_env() -> Option<SmtpConfig> {
        let host = env::var("SITE_SMTP_HOST").ok()?;
        let user = env::var("SITE_SMTP_USER").ok()?;
        let pass = env::var("SITE_SMTP_PASS").ok()?;

        let port = env::var("SITE_SMTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(587);

        let to = env::var("SITE_MAIL_TO").unwrap_or_else(|_| user.clone());

        Some(SmtpConfig {
            host,
            port,
            user,
            pass,
            to,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("SITE_ADMIN_PASSWORD");
        env::remove_var("SITE_DATA_DIR");
        env::remove_var("SITE_FILES_DIR");
        env::remove_var("SITE_BIND_ADDR");
        env::remove_var("SITE_LOG_LEVEL");
        env::remove_var("SITE_DEFAULT_CHAT_LINK");
        env::remove_var("SITE_SMTP_HOST");
        env::remove_var("SITE_SMTP_USER");
        env::remove_var("SITE_SMTP_PASS");

        let config = Config::from_env();

        assert!(config.admin_password.is_none());
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.files_dir, PathBuf::from("./files"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert!(config.smtp.is_none());
    }

    #[test]
    fn test_smtp_requires_full_credentials() {
        env::remove_var("SITE_SMTP_HOST");
        env::remove_var("SITE_SMTP_PASS");
        env::set_var("SITE_SMTP_USER", "mailer@example.com");

        assert!(Config::smtp_from_env().is_none());

        env::remove_var("SITE_SMTP_USER");
    }
}
