use foundation_report::{
    catalog::{AliasTable, PivnetCatalog, ReleaseCatalog, DEFAULT_CATALOG_URL},
    config::{Config, SITES_ENV},
    logging,
    opsman::{DeploymentSource, OmCli, OpsManApi, SampleSource},
    runner::ReportRunner,
};
use clap::{Parser, ValueEnum};
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Transport {
    /// Call the Ops Manager API directly
    Http,
    /// Shell out to the om CLI
    Om,
}

#[derive(Parser)]
#[command(name = "foundation-report")]
#[command(about = "Compare installed product versions across foundations with the latest releases")]
struct Cli {
    /// Site definition NAME|URL|CLIENT_ID|CLIENT_SECRET (repeatable, overrides $SITES)
    #[arg(short = 'f', long = "site", value_name = "SITE")]
    sites: Vec<String>,

    /// YAML file with `sites` and optional `aliases`
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Token for the release catalog API
    #[arg(short = 'p', long, env = "API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    #[arg(long, default_value = DEFAULT_CATALOG_URL)]
    catalog_url: String,

    #[arg(long, value_enum, default_value_t = Transport::Http)]
    transport: Transport,

    /// om binary used with --transport om
    #[arg(long, default_value = "om")]
    om_binary: String,

    /// Timeout in seconds for each request or om invocation
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Show "-" for sites that fail instead of aborting
    #[arg(long)]
    keep_going: bool,

    /// Label and group products by catalog slug
    #[arg(short = 's', long)]
    product_slugs: bool,

    /// Use built-in sample deployments instead of querying sites
    #[arg(long)]
    sample: bool,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(if cli.verbose { "debug" } else { "warn" })?;

    let config = Config::resolve(&cli.sites, cli.config.as_deref(), std::env::var(SITES_ENV).ok())?;
    let timeout = Duration::from_secs(cli.timeout);

    let source: Box<dyn DeploymentSource> = if cli.sample {
        Box::new(SampleSource::new(&config.sites))
    } else {
        match cli.transport {
            Transport::Http => Box::new(OpsManApi::new(timeout)?),
            Transport::Om => Box::new(OmCli::new(cli.om_binary, timeout)),
        }
    };

    let aliases = AliasTable::default().with_overrides(&config.aliases);
    let catalog: Box<dyn ReleaseCatalog> =
        Box::new(PivnetCatalog::new(&cli.catalog_url, cli.api_token, aliases.clone(), timeout)?);

    let mut runner = ReportRunner::new(config.sites, source, catalog)
        .keep_going(cli.keep_going)
        .show_progress(std::io::stderr().is_terminal());
    if cli.product_slugs {
        runner = runner.product_slugs(aliases);
    }
    let report = runner.run().await?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(report.render().as_bytes())?;
    stdout.flush()?;
    Ok(())
}
