use serde::{Deserialize, Serialize};

pub const MISSING: &str = "-";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Site {
    pub name: String,
    pub url: String,
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct InstalledProduct {
    #[serde(rename = "type")]
    pub product_type: String,
    #[serde(alias = "product_version")]
    pub version: String,
}

impl InstalledProduct {
    pub fn new(product_type: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            product_type: product_type.into(),
            version: version.into(),
        }
    }
}

pub type SiteDeployment = Vec<InstalledProduct>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSummary {
    pub product_type: String,
    pub latest_version: String,
}

impl ProductSummary {
    // First match wins if a site lists the same type twice.
    pub fn installed_at<'a>(&self, deployment: &'a [InstalledProduct]) -> Option<&'a str> {
        deployment
            .iter()
            .find(|p| p.product_type == self.product_type)
            .map(|p| p.version.as_str())
    }
}
