#[cfg(test)]
use mockall::automock;

use std::time::Duration;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;
use crate::error::SiteError;
use crate::types::{InstalledProduct, Site, SiteDeployment};

const SESSIONS_PATH: &str = "/api/v0/sessions";
const DEPLOYED_PRODUCTS_PATH: &str = "/api/v0/deployed/products";
const TOKEN_PATH: &str = "/uaa/oauth/token";

#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait DeploymentSource: Send + Sync {
    async fn deployed_products(&self, site: &Site) -> Result<SiteDeployment, SiteError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

// Server certificates are not validated.
pub struct OpsManApi {
    client: reqwest::Client,
}

impl OpsManApi {
    pub fn new(timeout: Duration) -> Result<Self, SiteError> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    async fn access_token(&self, site: &Site) -> Result<String, SiteError> {
        let url = format!("{}{}", site.url, TOKEN_PATH);
        debug!("requesting token for {}", site.name);

        let response = self
            .client
            .post(&url)
            .basic_auth(&site.client_id, Some(&site.client_secret))
            .header("Accept", "application/json")
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SiteError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let token: TokenResponse = serde_json::from_str(&response.text().await?)?;
        Ok(token.access_token)
    }

    async fn delete_sessions(&self, site: &Site, token: &str) {
        let url = format!("{}{}", site.url, SESSIONS_PATH);
        match self.client.delete(&url).bearer_auth(token).send().await {
            Ok(response) => debug!("{}: DELETE {} -> {}", site.name, SESSIONS_PATH, response.status()),
            Err(e) => debug!("{}: DELETE {} failed: {}", site.name, SESSIONS_PATH, e),
        }
    }
}

#[async_trait::async_trait]
impl DeploymentSource for OpsManApi {
    async fn deployed_products(&self, site: &Site) -> Result<SiteDeployment, SiteError> {
        let token = self.access_token(site).await?;

        self.delete_sessions(site, &token).await;

        let url = format!("{}{}", site.url, DEPLOYED_PRODUCTS_PATH);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&token)
            .header("Accept", "application/json")
            .send()
            .await;

        self.delete_sessions(site, &token).await;

        let response = response?;
        let status = response.status();
        if !status.is_success() {
            return Err(SiteError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let products = serde_json::from_str(&response.text().await?)?;
        Ok(products)
    }
}

pub struct OmCli {
    program: String,
    timeout: Duration,
}

impl OmCli {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    fn command(&self, site: &Site, method: &str, path: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(["--target", site.url.as_str(), "--skip-ssl-validation"])
            .args(["--client-id", site.client_id.as_str()])
            .args(["--client-secret", site.client_secret.as_str()])
            .args(["curl", "-s", "-x", method, "-p", path])
            .kill_on_drop(true);
        cmd
    }

    async fn run(&self, site: &Site, method: &str, path: &str) -> Result<Vec<u8>, SiteError> {
        debug!("{}: om curl -x {} -p {}", site.name, method, path);

        let output = tokio::time::timeout(self.timeout, self.command(site, method, path).output())
            .await
            .map_err(|_| SiteError::Timeout(self.timeout.as_secs()))?
            .map_err(|source| SiteError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(SiteError::Command {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }
}

#[async_trait::async_trait]
impl DeploymentSource for OmCli {
    async fn deployed_products(&self, site: &Site) -> Result<SiteDeployment, SiteError> {
        if let Err(e) = self.run(site, "DELETE", SESSIONS_PATH).await {
            debug!("{}: ignoring session delete failure: {}", site.name, e);
        }

        let body = self.run(site, "GET", DEPLOYED_PRODUCTS_PATH).await;

        if let Err(e) = self.run(site, "DELETE", SESSIONS_PATH).await {
            debug!("{}: ignoring session delete failure: {}", site.name, e);
        }

        let products = serde_json::from_slice(&body?)?;
        Ok(products)
    }
}

// Even site positions get pivotal-mysql, odd ones p-redis.
pub struct SampleSource {
    sites: Vec<String>,
}

impl SampleSource {
    pub fn new(sites: &[Site]) -> Self {
        Self {
            sites: sites.iter().map(|s| s.name.clone()).collect(),
        }
    }
}

#[async_trait::async_trait]
impl DeploymentSource for SampleSource {
    async fn deployed_products(&self, site: &Site) -> Result<SiteDeployment, SiteError> {
        let position = self.sites.iter().position(|s| *s == site.name).unwrap_or(0);

        let mut products = vec![
            InstalledProduct::new("cf", "2.4.1"),
            InstalledProduct::new("apm", "1.5.3"),
            InstalledProduct::new("p-bosh", "2.4-build.152"),
            InstalledProduct::new("aws-service-broker", "1.0.0-beta.1"),
        ];
        if position % 2 == 0 {
            products.push(InstalledProduct::new("pivotal-mysql", "2.3.4"));
        } else {
            products.push(InstalledProduct::new("p-redis", "1.14.1"));
        }
        Ok(products)
    }
}
