pub mod aggregate;
pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod opsman;
pub mod runner;
pub mod table;
pub mod types;

#[cfg(test)]
mod tests;
