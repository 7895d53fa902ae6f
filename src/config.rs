use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use crate::error::ConfigError;
use crate::types::Site;

pub const SITES_ENV: &str = "SITES";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub sites: Vec<Site>,
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&contents)?;
        config.sites = config
            .sites
            .into_iter()
            .enumerate()
            .map(|(idx, site)| validate_site(site, idx + 1))
            .collect::<Result<_, _>>()?;
        check_unique(&config.sites)?;
        Ok(config)
    }

    pub fn from_sites_text(text: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            sites: parse_sites(text)?,
            aliases: BTreeMap::new(),
        })
    }

    /// Picks the first non-empty source: explicit definitions, then the
    /// config file, then the `SITES` environment variable.
    pub fn resolve(
        definitions: &[String],
        file: Option<&Path>,
        env_value: Option<String>,
    ) -> Result<Self, ConfigError> {
        let config = if !definitions.is_empty() {
            Self::from_sites_text(&definitions.join("\n"))?
        } else if let Some(path) = file {
            Self::from_file(path)?
        } else {
            Self::from_sites_text(env_value.as_deref().unwrap_or_default())?
        };

        if config.sites.is_empty() {
            return Err(ConfigError::NoSites);
        }
        Ok(config)
    }
}

/// One `NAME|URL|CLIENT_ID|CLIENT_SECRET` site per line. The secret is the
/// remainder of the line, so it may itself contain `|`.
pub fn parse_sites(text: &str) -> Result<Vec<Site>, ConfigError> {
    let mut sites = Vec::new();

    for (idx, raw) in text.split('\n').enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.splitn(4, '|').collect();
        let &[name, url, client_id, client_secret] = fields.as_slice() else {
            return Err(ConfigError::InvalidSite { line: idx + 1 });
        };

        let site = Site {
            name: name.to_string(),
            url: url.to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        };
        sites.push(validate_site(site, idx + 1)?);
    }

    check_unique(&sites)?;
    Ok(sites)
}

// Trims every field and the trailing `/` of the URL; no field may be empty.
fn validate_site(site: Site, line: usize) -> Result<Site, ConfigError> {
    let site = Site {
        name: site.name.trim().to_string(),
        url: site.url.trim().trim_end_matches('/').to_string(),
        client_id: site.client_id.trim().to_string(),
        client_secret: site.client_secret.trim().to_string(),
    };

    let fields = [&site.name, &site.url, &site.client_id, &site.client_secret];
    if fields.iter().any(|f| f.is_empty()) {
        return Err(ConfigError::InvalidSite { line });
    }
    Ok(site)
}

fn check_unique(sites: &[Site]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for site in sites {
        if !seen.insert(site.name.as_str()) {
            return Err(ConfigError::DuplicateSite(site.name.clone()));
        }
    }
    Ok(())
}
