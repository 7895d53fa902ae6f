use std::collections::HashSet;
use futures::future::join_all;
use tracing::debug;
use crate::catalog::{AliasTable, ReleaseCatalog};
use crate::error::CatalogError;
use crate::types::{InstalledProduct, ProductSummary, SiteDeployment};

// Sites in registry order, products in the order each site reported them.
pub fn distinct_products(deployments: &[SiteDeployment]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut product_types = Vec::new();
    for product in deployments.iter().flatten() {
        if seen.insert(product.product_type.as_str()) {
            product_types.push(product.product_type.clone());
        }
    }
    product_types
}

/// One catalog lookup per distinct product; results keep first-seen order.
pub async fn summarize<C>(
    deployments: &[SiteDeployment],
    catalog: &C,
) -> Result<Vec<ProductSummary>, CatalogError>
where
    C: ReleaseCatalog + ?Sized,
{
    let product_types = distinct_products(deployments);
    debug!("resolving {} distinct products", product_types.len());

    let lookups = product_types
        .iter()
        .map(|product_type| catalog.latest_version(product_type));
    let versions = join_all(lookups).await;

    product_types
        .into_iter()
        .zip(versions)
        .map(|(product_type, latest)| {
            Ok(ProductSummary {
                product_type,
                latest_version: latest?,
            })
        })
        .collect()
}

/// Relabels products by catalog slug (the type when no alias exists), so
/// types sharing a slug collapse into one row.
pub fn key_by_slug(deployments: Vec<SiteDeployment>, aliases: &AliasTable) -> Vec<SiteDeployment> {
    deployments
        .into_iter()
        .map(|deployment| {
            deployment
                .into_iter()
                .map(|product| InstalledProduct {
                    product_type: aliases.slug_or_type(&product.product_type).to_string(),
                    version: product.version,
                })
                .collect()
        })
        .collect()
}
