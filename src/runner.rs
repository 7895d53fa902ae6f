use anyhow::{Context, Result};
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};
use crate::aggregate;
use crate::catalog::{AliasTable, ReleaseCatalog};
use crate::opsman::DeploymentSource;
use crate::table::Report;
use crate::types::{Site, SiteDeployment};

pub struct ReportRunner {
    sites: Vec<Site>,
    source: Box<dyn DeploymentSource>,
    catalog: Box<dyn ReleaseCatalog>,
    keep_going: bool,
    show_progress: bool,
    slug_aliases: Option<AliasTable>,
}

impl ReportRunner {
    pub fn new(
        sites: Vec<Site>,
        source: Box<dyn DeploymentSource>,
        catalog: Box<dyn ReleaseCatalog>,
    ) -> Self {
        Self {
            sites,
            source,
            catalog,
            keep_going: false,
            show_progress: false,
            slug_aliases: None,
        }
    }

    /// Render failed sites as empty columns instead of aborting the run.
    pub fn keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }

    /// Key rows by catalog slug instead of Ops Manager type.
    pub fn product_slugs(mut self, aliases: AliasTable) -> Self {
        self.slug_aliases = Some(aliases);
        self
    }

    pub fn show_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub async fn run(&self) -> Result<Report> {
        let progress = if self.show_progress {
            ProgressBar::new(self.sites.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} sites {msg}")?
                .progress_chars("#>-"),
        );

        // Query all sites in parallel; join_all keeps registry order.
        let fetches = self.sites.iter().map(|site| {
            let progress = progress.clone();
            async move {
                let result = self.source.deployed_products(site).await;
                progress.inc(1);
                result
            }
        });
        let results = join_all(fetches).await;

        let mut deployments: Vec<SiteDeployment> = Vec::with_capacity(self.sites.len());
        for (site, result) in self.sites.iter().zip(results) {
            match result {
                Ok(products) => {
                    info!("{}: {} installed products", site.name, products.len());
                    deployments.push(products);
                }
                Err(e) if self.keep_going => {
                    warn!("{}: skipping site: {}", site.name, e);
                    deployments.push(Vec::new());
                }
                Err(e) => {
                    progress.finish_and_clear();
                    return Err(e)
                        .with_context(|| format!("Failed to fetch deployed products for {}", site.name));
                }
            }
        }

        if let Some(aliases) = &self.slug_aliases {
            deployments = aggregate::key_by_slug(deployments, aliases);
        }

        progress.set_message("resolving latest releases");
        let products = aggregate::summarize(&deployments, self.catalog.as_ref()).await;
        progress.finish_and_clear();
        let products = products.context("Failed to resolve latest releases")?;

        Ok(Report {
            sites: self.sites.iter().map(|s| s.name.clone()).collect(),
            deployments,
            products,
        })
    }
}
