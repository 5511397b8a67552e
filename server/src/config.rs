use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use ::config::{Environment, File, FileFormat};
use secrecy::SecretString;
use serde::Deserialize;
use types::{Result, err};
use url::Url;
use uuid::Uuid;

static CONFIG: OnceLock<Config> = OnceLock::new();

/// The process-wide configuration.
///
/// Falls back to [`Config::default`] when [`install`] was never called.
pub fn config() -> &'static Config {
    CONFIG.get_or_init(Config::default)
}

/// Make `config` the process-wide configuration. Only the first call wins.
pub fn install(config: Config) {
    if CONFIG.set(config).is_err() {
        tracing::warn!("configuration already installed, ignoring reload");
    }
}

/// Which record store backs the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Memory,
    File,
    Remote,
}

#[derive(Clone)]
pub struct Config {
    pub store: StoreKind,
    pub data_dir: PathBuf,
    pub page_size: u32,
    pub remote_url: Option<Url>,
    pub remote_token: Option<SecretString>,
    /// Bearer token required by the REST API, if set.
    pub api_token: Option<SecretString>,
    pub session_secret: SecretString,
    pub admin_username: String,
    pub admin_password: SecretString,
    pub admin_display_name: String,
}

#[derive(Deserialize)]
struct RawConfig {
    store: StoreKind,
    data_dir: PathBuf,
    page_size: u32,
    #[serde(default)]
    remote: RawRemote,
    api_token: Option<String>,
    session_secret: Option<String>,
    admin: RawAdmin,
}

#[derive(Deserialize, Default)]
struct RawRemote {
    url: Option<String>,
    token: Option<String>,
}

#[derive(Deserialize)]
struct RawAdmin {
    username: String,
    password: String,
    display_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreKind::Memory,
            data_dir: PathBuf::from("data"),
            page_size: 5,
            remote_url: None,
            remote_token: None,
            api_token: None,
            session_secret: ephemeral_secret(),
            admin_username: "Admin".into(),
            admin_password: "admin".into(),
            admin_display_name: "Admin".into(),
        }
    }
}

impl Config {
    /// Load `dashboard.toml` (if present) and `DASHBOARD_*` variables.
    pub fn load() -> Result<Self> {
        Self::build(File::with_name("dashboard").required(false))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        Self::build(File::from(path).format(FileFormat::Toml))
    }

    fn build<S>(file: S) -> Result<Self>
    where
        S: ::config::Source + Send + Sync + 'static,
    {
        let raw: RawConfig = ::config::Config::builder()
            .set_default("store", "memory")?
            .set_default("data_dir", "data")?
            .set_default("page_size", 5)?
            .set_default("admin.username", "Admin")?
            .set_default("admin.password", "admin")?
            .set_default("admin.display_name", "Admin")?
            .add_source(file)
            .add_source(
                Environment::with_prefix("DASHBOARD")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        raw.try_into()
    }
}

impl TryFrom<RawConfig> for Config {
    type Error = types::Error;

    fn try_from(raw: RawConfig) -> Result<Self> {
        if raw.page_size == 0 {
            return Err(err!("page_size must be at least 1"));
        }

        let remote_url = raw.remote.url.as_deref().map(Url::parse).transpose()?;
        if raw.store == StoreKind::Remote && remote_url.is_none() {
            return Err(err!("store = \"remote\" needs remote.url"));
        }

        let session_secret = match raw.session_secret {
            Some(secret) if !secret.is_empty() => secret.into(),
            _ => {
                tracing::warn!("no session_secret configured, sessions will not survive a restart");
                ephemeral_secret()
            }
        };

        Ok(Self {
            store: raw.store,
            data_dir: raw.data_dir,
            page_size: raw.page_size,
            remote_url,
            remote_token: raw.remote.token.map(Into::into),
            api_token: raw.api_token.filter(|t| !t.is_empty()).map(Into::into),
            session_secret,
            admin_username: raw.admin.username,
            admin_password: raw.admin.password.into(),
            admin_display_name: raw.admin.display_name,
        })
    }
}

fn ephemeral_secret() -> SecretString {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple()).into()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
store = "file"
data_dir = "/var/lib/staff"
page_size = 10
session_secret = "s3cret"

[admin]
password = "hunter22"
"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.store, StoreKind::File);
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/staff"));
        assert_eq!(config.page_size, 10);
        assert_eq!(config.admin_username, "Admin");
        assert_eq!(config.admin_password.expose_secret(), "hunter22");
        assert_eq!(config.session_secret.expose_secret(), "s3cret");
        assert!(config.api_token.is_none());
    }

    #[test]
    fn test_remote_needs_url() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "store = \"remote\"").unwrap();

        assert!(Config::load_from(file.path()).is_err());
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "page_size = 0").unwrap();

        assert!(Config::load_from(file.path()).is_err());
    }
}
