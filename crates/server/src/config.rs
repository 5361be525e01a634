use serde::Deserialize;

use folio_auth::{AdminCredentials, AuthConfig};
use folio_email::EmailConfig;

/// Top-level configuration for the folio server, loaded from a TOML file.
#[derive(Debug, Deserialize)]
pub struct FolioConfig {
    /// HTTP server bind configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// The single admin credential.
    pub admin: AdminConfig,
    /// Authentication timing knobs.
    #[serde(default)]
    pub auth: AuthTimingConfig,
    /// Document persistence configuration.
    #[serde(default)]
    pub document: DocumentConfig,
    /// Uploaded-file storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// SMTP settings for one-time code delivery. When absent, codes are
    /// written to the server log instead (local development only).
    pub email: Option<EmailConfig>,
}

/// HTTP server bind configuration.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Graceful shutdown timeout in seconds.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_seconds: u64,
    /// External URL used when building public file links
    /// (e.g. `https://folio.example.com`). Defaults to
    /// `http://{host}:{port}`.
    pub public_url: Option<String>,
}

impl ServerConfig {
    /// The base URL public file links are built from.
    #[must_use]
    pub fn resolved_public_url(&self) -> String {
        self.public_url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}", self.host, self.port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_timeout_seconds: default_shutdown_timeout(),
            public_url: None,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_owned()
}

fn default_port() -> u16 {
    8080
}

fn default_shutdown_timeout() -> u64 {
    30
}

/// The admin credential as it appears in the config file.
#[derive(Debug, Deserialize)]
pub struct AdminConfig {
    pub username: String,
    /// Argon2 hash of the admin password. Generate one with
    /// `folio-server hash-password`.
    pub password_hash: String,
    /// Where one-time codes are delivered.
    pub email: String,
}

impl AdminConfig {
    #[must_use]
    pub fn credentials(&self) -> AdminCredentials {
        AdminCredentials::new(&self.username, &self.password_hash, &self.email)
    }
}

/// Authentication timing knobs, in seconds.
#[derive(Debug, Deserialize)]
pub struct AuthTimingConfig {
    #[serde(default = "default_otp_ttl")]
    pub otp_ttl_seconds: u64,
    #[serde(default = "default_session_ttl")]
    pub session_ttl_seconds: u64,
    #[serde(default = "default_inactivity_ttl")]
    pub inactivity_ttl_seconds: u64,
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

impl AuthTimingConfig {
    #[must_use]
    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            otp_ttl: std::time::Duration::from_secs(self.otp_ttl_seconds),
            session_absolute_ttl: std::time::Duration::from_secs(self.session_ttl_seconds),
            session_inactivity_ttl: std::time::Duration::from_secs(self.inactivity_ttl_seconds),
            sweep_interval: std::time::Duration::from_secs(self.sweep_interval_seconds),
        }
    }
}

impl Default for AuthTimingConfig {
    fn default() -> Self {
        Self {
            otp_ttl_seconds: default_otp_ttl(),
            session_ttl_seconds: default_session_ttl(),
            inactivity_ttl_seconds: default_inactivity_ttl(),
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

fn default_otp_ttl() -> u64 {
    300
}

fn default_session_ttl() -> u64 {
    1800
}

fn default_inactivity_ttl() -> u64 {
    600
}

fn default_sweep_interval() -> u64 {
    300
}

/// Which backend holds the portfolio document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentBackend {
    /// JSON file on disk (the default).
    File,
    /// Volatile, for tests and experiments.
    Memory,
}

#[derive(Debug, Deserialize)]
pub struct DocumentConfig {
    #[serde(default = "default_document_backend")]
    pub backend: DocumentBackend,
    /// Path of the document file (file backend).
    #[serde(default = "default_document_path")]
    pub path: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            backend: default_document_backend(),
            path: default_document_path(),
        }
    }
}

fn default_document_backend() -> DocumentBackend {
    DocumentBackend::File
}

fn default_document_path() -> String {
    "data/portfolio.json".to_owned()
}

/// Which backend holds uploaded files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Files on the local filesystem (the default).
    Fs,
    /// Volatile, for tests and experiments.
    Memory,
}

#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_backend")]
    pub backend: StorageBackend,
    /// Root directory for uploads (fs backend).
    #[serde(default = "default_storage_root")]
    pub root: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            root: default_storage_root(),
        }
    }
}

fn default_storage_backend() -> StorageBackend {
    StorageBackend::Fs
}

fn default_storage_root() -> String {
    "data/files".to_owned()
}
