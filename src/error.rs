use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no sites configured: pass --site, --config or set SITES")]
    NoSites,

    #[error("invalid site definition {line}: expected NAME|URL|CLIENT_ID|CLIENT_SECRET, none empty")]
    InvalidSite { line: usize },

    #[error("duplicate site name: {0}")]
    DuplicateSite(String),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("command exited with {code:?}: {stderr}")]
    Command { code: Option<i32>, stderr: String },

    #[error("timed out after {0} seconds")]
    Timeout(u64),

    #[error("invalid deployed products response: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid releases response for {slug}: {source}")]
    Parse {
        slug: String,
        source: serde_json::Error,
    },
}
