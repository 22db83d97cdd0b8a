use domain_recon::ReconError;

mod cli;
mod runner;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Some(cli) = cli::parse_cli() else {
        return Ok(());
    };
    match runner::run_from_cli(cli).await {
        // Exit before the runtime shuts down: a word list read from a pipe may
        // still be blocked on a worker thread.
        Err(e) if matches!(e.downcast_ref::<ReconError>(), Some(ReconError::Cancelled)) => {
            eprintln!("Error: {}", e);
            std::process::exit(130);
        }
        result => result,
    }
}
