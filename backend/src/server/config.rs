//! Server configuration: command line arguments with environment fallbacks
//! and session-key loading.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use actix_web::cookie::Key;
use clap::Parser;
use tracing::warn;
use url::Url;

use crate::domain::ValidationMode;

/// Command-line and environment configuration for the backend.
#[derive(Debug, Parser)]
#[command(name = "replay-backend", about = "Game review service")]
pub struct Cli {
    /// Socket address to bind the HTTP server to.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: SocketAddr,

    /// PostgreSQL connection URL.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Games search endpoint of the external catalogue.
    #[arg(
        long,
        env = "CATALOGUE_URL",
        default_value = "https://api.rawg.io/api/games"
    )]
    pub catalogue_url: Url,

    /// API key sent to the catalogue, when it requires one.
    #[arg(long, env = "CATALOGUE_KEY")]
    pub catalogue_key: Option<String>,

    /// Timeout for catalogue requests, in seconds.
    #[arg(long, env = "CATALOGUE_TIMEOUT_SECS", default_value_t = 10)]
    pub catalogue_timeout_secs: u64,

    /// Field-validation mode. `legacy` keeps the historical acceptance of
    /// empty usernames and game names; `strict` rejects them.
    #[arg(long, env = "VALIDATION_MODE", value_enum, default_value_t = ValidationModeArg::Legacy)]
    pub validation_mode: ValidationModeArg,

    /// Path to the session signing key material.
    #[arg(
        long,
        env = "SESSION_KEY_FILE",
        default_value = "/var/run/secrets/session_key"
    )]
    pub session_key_file: PathBuf,

    /// Whether to permit an ephemeral session key when the key file is
    /// unreadable. Always permitted in debug builds.
    #[arg(long, env = "SESSION_ALLOW_EPHEMERAL", default_value_t = false, action = clap::ArgAction::Set)]
    pub session_allow_ephemeral: bool,

    /// Whether the session cookie carries the `Secure` flag.
    #[arg(long, env = "SESSION_COOKIE_SECURE", default_value_t = true, action = clap::ArgAction::Set)]
    pub cookie_secure: bool,
}

impl Cli {
    /// Catalogue request timeout as a [`Duration`].
    #[must_use]
    pub const fn catalogue_timeout(&self) -> Duration {
        Duration::from_secs(self.catalogue_timeout_secs)
    }

    /// Read and derive the session key.
    ///
    /// Falls back to a generated key in debug builds or when ephemeral keys
    /// are explicitly allowed; otherwise an unreadable key file is fatal.
    ///
    /// # Errors
    ///
    /// Returns an [`std::io::Error`] when the key file cannot be read and no
    /// fallback applies.
    pub fn session_key(&self) -> std::io::Result<Key> {
        match std::fs::read(&self.session_key_file) {
            Ok(bytes) => Ok(Key::derive_from(&bytes)),
            Err(e) => {
                if cfg!(debug_assertions) || self.session_allow_ephemeral {
                    warn!(
                        path = %self.session_key_file.display(),
                        error = %e,
                        "using temporary session key (dev only)"
                    );
                    Ok(Key::generate())
                } else {
                    Err(std::io::Error::other(format!(
                        "failed to read session key at {}: {e}",
                        self.session_key_file.display()
                    )))
                }
            }
        }
    }
}

/// CLI-facing validation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ValidationModeArg {
    /// Historical behaviour: empty usernames and game names pass.
    Legacy,
    /// Reject empty usernames and game names.
    Strict,
}

impl From<ValidationModeArg> for ValidationMode {
    fn from(value: ValidationModeArg) -> Self {
        match value {
            ValidationModeArg::Legacy => Self::Legacy,
            ValidationModeArg::Strict => Self::Strict,
        }
    }
}
