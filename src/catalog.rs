#[cfg(test)]
use mockall::automock;

use std::collections::BTreeMap;
use std::time::Duration;
use serde::Deserialize;
use tracing::{debug, warn};
use crate::error::CatalogError;
use crate::types::MISSING;

pub const DEFAULT_CATALOG_URL: &str = "https://network.pivotal.io/api/v2";

// Types missing here are never looked up.
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("apm", "pcf-metrics"),
    ("apmPostgres", "pcf-metrics"),
    ("apigee-cf-service-broker", "apigee-edge-for-pcf-service-broker"),
    ("cf", "elastic-runtime"),
    ("p-bosh", "ops-manager"),
    ("p-rabbitmq", "pivotal-rabbitmq-service"),
    ("p-mysql", "p-mysql"),
    ("p-spring-cloud-services", "p-spring-cloud-services"),
    ("Pivotal_Single_Sign-On_Service", "p-identity"),
    ("p-windows-runtime", "runtime-for-windows"),
    ("p-redis", "p-redis"),
    ("scanner", "p-compliance-scanner"),
];

/// Ops Manager product type to catalog slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    slugs: BTreeMap<String, String>,
}

impl AliasTable {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            slugs: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn with_overrides(mut self, extra: &BTreeMap<String, String>) -> Self {
        self.slugs
            .extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    pub fn slug(&self, product_type: &str) -> Option<&str> {
        self.slugs.get(product_type).map(String::as_str)
    }

    /// The slug when one is known, otherwise the type itself.
    pub fn slug_or_type<'a>(&'a self, product_type: &'a str) -> &'a str {
        self.slug(product_type).unwrap_or(product_type)
    }

    // Accepts a product type or, for slug-keyed reports, a slug already
    // present in the table.
    fn catalog_slug<'a>(&'a self, product: &'a str) -> Option<&'a str> {
        self.slug(product)
            .or_else(|| self.slugs.values().any(|s| s == product).then_some(product))
    }

    pub fn len(&self) -> usize {
        self.slugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slugs.is_empty()
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::new(BUILTIN_ALIASES.iter().copied())
    }
}

#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ReleaseCatalog: Send + Sync {
    /// Latest version of a product, or `"-"` when the catalog does not know
    /// it. Releases are served newest first, so the first one is taken
    /// without sorting.
    async fn latest_version(&self, product: &str) -> Result<String, CatalogError>;
}

#[derive(Debug, Deserialize)]
struct ReleasesResponse {
    releases: Option<Vec<Release>>,
}

#[derive(Debug, Deserialize)]
struct Release {
    version: String,
}

pub struct PivnetCatalog {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    aliases: AliasTable,
}

impl PivnetCatalog {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        aliases: AliasTable,
        timeout: Duration,
    ) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
            aliases,
        })
    }
}

#[async_trait::async_trait]
impl ReleaseCatalog for PivnetCatalog {
    async fn latest_version(&self, product: &str) -> Result<String, CatalogError> {
        let Some(slug) = self.aliases.catalog_slug(product) else {
            warn!("no catalog slug for product {}", product);
            return Ok(MISSING.to_string());
        };

        let url = format!("{}/products/{}/releases", self.base_url, slug);
        debug!("fetching releases: {}", url);

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Token {}", token));
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        // Error statuses still carry a JSON body without `releases`.
        let parsed: ReleasesResponse =
            serde_json::from_str(&body).map_err(|source| CatalogError::Parse {
                slug: slug.to_string(),
                source,
            })?;

        match parsed.releases.and_then(|r| r.into_iter().next()) {
            Some(release) => Ok(release.version),
            None => {
                warn!("no releases for {} (status {})", slug, status);
                Ok(MISSING.to_string())
            }
        }
    }
}
