//! Command line and environment configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

pub const DEFAULT_PASSWORD: &str = "changeme";
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;
pub const SHARED_TEXT_FILE: &str = "shared_texts/shared_text.txt";

#[derive(Parser, Debug)]
#[command(name = "drop-server")]
#[command(about = "Password-gated shared file drop with a shared text box")]
pub struct Cli {
    /// Shared password that unlocks the drop
    #[arg(long, env = "FILESHARING_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Key used to sign session cookies (random per process if unset)
    #[arg(long, env = "SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Directory holding uploads and the shared text
    #[arg(long, default_value = "./data", env = "DROP_DATA_DIR")]
    pub data_dir: PathBuf,

    /// Upload directory (defaults to <data-dir>/uploads)
    #[arg(long, env = "DROP_UPLOAD_DIR")]
    pub upload_dir: Option<PathBuf>,

    /// Largest accepted upload in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES, env = "MAX_CONTENT_LENGTH")]
    pub max_upload_bytes: u64,

    /// Seconds of inactivity after which a login expires
    #[arg(long, default_value_t = 12 * 3600, env = "DROP_SESSION_IDLE_SECS")]
    pub session_idle_secs: u64,

    /// Mark session cookies Secure (serve behind HTTPS)
    #[arg(long, env = "DROP_SECURE_COOKIES")]
    pub secure_cookies: bool,

    /// Address to bind to
    #[arg(long, default_value = "0.0.0.0", env = "DROP_BIND")]
    pub bind: String,

    /// Port to listen on
    #[arg(long, default_value_t = 5000, env = "DROP_PORT")]
    pub port: u16,
}

/// Resolved settings for one server process.
#[derive(Debug, Clone)]
pub struct Config {
    pub password: String,
    /// `None` means a random signing key is generated at startup.
    pub secret_key: Option<String>,
    pub upload_dir: PathBuf,
    pub shared_text_path: PathBuf,
    pub max_upload_bytes: u64,
    pub session_idle_timeout: Duration,
    pub secure_cookies: bool,
    pub addr: SocketAddr,
}

impl Config {
    /// Settings rooted at `data_dir` with every other value defaulted.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            password: DEFAULT_PASSWORD.to_string(),
            secret_key: None,
            upload_dir: data_dir.join("uploads"),
            shared_text_path: data_dir.join(SHARED_TEXT_FILE),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            session_idle_timeout: Duration::from_secs(12 * 3600),
            secure_cookies: false,
            addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
        }
    }

    pub fn uses_default_password(&self) -> bool {
        self.password == DEFAULT_PASSWORD
    }
}

impl TryFrom<Cli> for Config {
    type Error = anyhow::Error;

    fn try_from(cli: Cli) -> Result<Self> {
        let addr: SocketAddr = format!("{}:{}", cli.bind, cli.port)
            .parse()
            .with_context(|| format!("Invalid bind address {}:{}", cli.bind, cli.port))?;

        let password = cli
            .password
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_PASSWORD.to_string());

        Ok(Self {
            password,
            secret_key: cli.secret_key.filter(|k| !k.is_empty()),
            upload_dir: cli
                .upload_dir
                .unwrap_or_else(|| cli.data_dir.join("uploads")),
            shared_text_path: cli.data_dir.join(SHARED_TEXT_FILE),
            max_upload_bytes: cli.max_upload_bytes,
            session_idle_timeout: Duration::from_secs(cli.session_idle_secs),
            secure_cookies: cli.secure_cookies,
            addr,
        })
    }
}
