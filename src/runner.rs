use std::sync::Arc;

use domain_recon::concurrent::ConcurrentProbe;
use domain_recon::config::Config;
use domain_recon::discover::{self, Partition};
use domain_recon::error::ReconError;
use domain_recon::http_client::create_client;
use domain_recon::output::Reporter;
use domain_recon::probe::DnsProbe;
use tokio_util::sync::CancellationToken;

use crate::cli::Cli;

pub async fn run_from_cli(cli: Cli) -> anyhow::Result<()> {
    // Keep external crates (reqwest/hyper/hickory) quiet so stderr stays readable.
    // Results go to stdout; logs go to stderr.
    use tracing_subscriber::EnvFilter;
    let crate_level = if cli.debug { "debug" } else if cli.verbose { "info" } else { "warn" };
    let filter_str = format!(
        "domain_recon={crate},reqwest=info,hyper=info,hickory_resolver=warn,hickory_proto=warn",
        crate = crate_level
    );
    let env_filter = EnvFilter::try_new(&filter_str).unwrap_or_else(|_| EnvFilter::new(crate_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = build_config(&cli)?;
    tracing::info!(domain = %cli.domain, endpoint = %config.endpoint, concurrency = config.concurrency, "Starting recon");

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, abandoning pending work");
            ctrl_c.cancel();
        }
    });

    let partition = match discover_hostnames(&cli, &config, &cancel).await {
        Ok(partition) => partition,
        Err(e) => {
            if let Some(body) = e.response_body() {
                println!("{}", body);
            }
            return Err(e.into());
        }
    };

    let extended = discover::extend_or_skip(
        &partition.wildcards,
        &partition.concrete,
        cli.file.as_deref(),
        &cancel,
    )
    .await?;

    let resolver = Arc::new(DnsProbe::new(config.lookup_timeout()));
    let probe = ConcurrentProbe::new(config.concurrency as usize);
    let mut reporter = Reporter::new(std::io::stdout(), cli.plain);
    reporter
        .print_domains(resolver, &probe, partition.concrete, extended, &cancel)
        .await?;

    let (completed, panicked) = probe.get_stats();
    tracing::debug!(completed, panicked, "Resolution finished");
    Ok(())
}

fn build_config(cli: &Cli) -> Result<Config, ReconError> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(concurrency) = cli.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(timeout) = cli.timeout {
        config.fetch_timeout_secs = timeout;
    }
    if let Some(timeout) = cli.dns_timeout {
        config.lookup_timeout_secs = timeout;
    }
    Ok(config)
}

/// Fetch certificates on their own task and wait for the body, an error, or Ctrl-C.
async fn discover_hostnames(
    cli: &Cli,
    config: &Config,
    cancel: &CancellationToken,
) -> Result<Partition, ReconError> {
    let client = create_client(config.fetch_timeout())?;
    let endpoint = config.endpoint.clone();
    let domain = cli.domain.clone();
    let fetch = tokio::spawn(async move {
        discover::fetch_certificates(&client, &endpoint, &domain).await
    });

    let records = tokio::select! {
        joined = fetch => joined??,
        _ = cancel.cancelled() => return Err(ReconError::Cancelled),
    };

    Ok(discover::extract_hostnames(&records))
}
