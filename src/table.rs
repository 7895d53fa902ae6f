use std::fmt;
use crate::types::{ProductSummary, SiteDeployment, MISSING};

pub const PRODUCT_WIDTH: usize = 42;
pub const HEADER_SITE_WIDTH: usize = 17;
// Each cell is followed by one space.
pub const CELL_WIDTH: usize = 16;
pub const BORDER_SITE_WIDTH: usize = 16;

pub const PRODUCT_HEADER: &str = "Product (latest version)";

/// `sites` and `deployments` are index-aligned.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub sites: Vec<String>,
    pub deployments: Vec<SiteDeployment>,
    pub products: Vec<ProductSummary>,
}

impl Report {
    pub fn border(&self) -> String {
        "-".repeat(PRODUCT_WIDTH + BORDER_SITE_WIDTH * self.sites.len())
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let border = self.border();

        writeln!(f, "{}", border)?;
        write!(f, "{:<width$}", PRODUCT_HEADER, width = PRODUCT_WIDTH)?;
        for site in &self.sites {
            write!(f, "{:<width$}", site, width = HEADER_SITE_WIDTH)?;
        }
        writeln!(f)?;
        writeln!(f, "{}", border)?;

        for product in &self.products {
            let label = format!("{} ({})", product.product_type, product.latest_version);
            write!(f, "{:<width$}", label, width = PRODUCT_WIDTH)?;
            for deployment in &self.deployments {
                let cell = product.installed_at(deployment).unwrap_or(MISSING);
                write!(f, "{:<width$} ", cell, width = CELL_WIDTH)?;
            }
            writeln!(f)?;
        }

        writeln!(f, "{}", border)
    }
}
