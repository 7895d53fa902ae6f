use crate::types::{InstalledProduct, Site};

mod config;

fn site(name: &str, url: &str) -> Site {
    Site {
        name: name.to_string(),
        url: url.to_string(),
        client_id: "client".to_string(),
        client_secret: "secret".to_string(),
    }
}

fn installed(product_type: &str, version: &str) -> InstalledProduct {
    InstalledProduct::new(product_type, version)
}
