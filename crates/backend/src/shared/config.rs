use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub github: GithubConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Каталог собранного фронтенда (index.html + assets)
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 15001,
            static_dir: "dist".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    File,
    Github,
    Bundled,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub kind: StorageKind,
    /// Путь к JSON-файлу каталога (для kind = "file")
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            kind: StorageKind::File,
            path: "data/catalogue.json".into(),
        }
    }
}

/// Remote repository holding the catalogue file. The access token is never
/// part of the file; it is read from the environment variable `token_env`.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GithubConfig {
    pub api_base: String,
    pub owner: String,
    pub repo: String,
    pub path: String,
    /// Пустая строка: ветка по умолчанию
    pub branch: String,
    pub token_env: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".into(),
            owner: String::new(),
            repo: String::new(),
            path: "src/data.json".into(),
            branch: String::new(),
            token_env: "SITEDIR_GITHUB_TOKEN".into(),
        }
    }
}

impl GithubConfig {
    pub fn branch(&self) -> Option<&str> {
        Some(self.branch.trim()).filter(|b| !b.is_empty())
    }

    /// Read the access token from the configured environment variable
    pub fn token(&self) -> anyhow::Result<String> {
        match std::env::var(&self.token_env) {
            Ok(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
            _ => Err(anyhow::anyhow!(
                "environment variable {} with the repository access token is not set",
                self.token_env
            )),
        }
    }

    pub fn ensure_complete(&self) -> anyhow::Result<()> {
        if self.owner.trim().is_empty() || self.repo.trim().is_empty() {
            anyhow::bail!("[github] owner and repo must be configured for storage.kind = \"github\"");
        }
        if self.path.trim().is_empty() {
            anyhow::bail!("[github] path must not be empty");
        }
        Ok(())
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 15001
static_dir = "dist"

[storage]
kind = "file"
path = "data/catalogue.json"

[github]
api_base = "https://api.github.com"
owner = ""
repo = ""
path = "src/data.json"
branch = ""
token_env = "SITEDIR_GITHUB_TOKEN"
"#;

/// Load configuration
///
/// Search order:
/// 1. `$SITEDIR_CONFIG`
/// 2. `config.toml` next to the executable
/// 3. Embedded default config
///
/// `SITEDIR_PORT` overrides the port in every case.
pub fn load_config() -> anyhow::Result<Config> {
    let mut config = match find_config_file() {
        Some(config_path) => {
            tracing::info!("Loading config from: {}", config_path.display());
            let contents = std::fs::read_to_string(&config_path)?;
            parse_config(&contents)?
        }
        None => {
            tracing::info!("Using default embedded configuration");
            parse_config(DEFAULT_CONFIG)?
        }
    };

    if let Ok(port) = std::env::var("SITEDIR_PORT") {
        config.server.port = port
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid SITEDIR_PORT '{}': {}", port, e))?;
    }

    Ok(config)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    Ok(toml::from_str(contents)?)
}

fn find_config_file() -> Option<PathBuf> {
    if let Ok(explicit) = std::env::var("SITEDIR_CONFIG") {
        return Some(PathBuf::from(explicit));
    }

    let exe_path = std::env::current_exe().ok()?;
    let config_path = exe_path.parent()?.join("config.toml");
    if config_path.exists() {
        Some(config_path)
    } else {
        tracing::warn!("config.toml not found at: {}", config_path.display());
        None
    }
}

/// Resolve a configured path: absolute paths are used as is,
/// relative ones are resolved against the current directory.
pub fn resolve_path(path_str: &str) -> anyhow::Result<PathBuf> {
    let path = Path::new(path_str);
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(path))
}
