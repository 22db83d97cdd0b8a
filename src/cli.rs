use clap::{CommandFactory, Parser};
use std::path::PathBuf;

/// Passive subdomain discovery from certificate-transparency logs.
#[derive(clap::Parser, Debug)]
#[command(name = "domain-recon", author, version, about, long_about = None)]
pub struct Cli {
    /// Domain name
    #[arg(short, long)]
    pub domain: String,

    /// File with words for extending wildcards
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Show plain domains
    #[arg(short, long, default_value_t = false)]
    pub plain: bool,

    /// Max concurrent DNS lookups, 0 for unbounded (default: 50)
    #[arg(short = 'c', long)]
    pub concurrency: Option<u16>,

    /// Certificate log request timeout in seconds, 0 to wait forever (default: 60)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Per-lookup DNS timeout in seconds, at least 1 (default: 5)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub dns_timeout: Option<u64>,

    /// Certificate-transparency search endpoint (default: https://crt.sh)
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// JSON config file; command line flags take precedence
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Enable detailed debug logging
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

/// Parse arguments. On failure the error and usage are printed to stdout and
/// `None` is returned; the caller exits normally.
pub fn parse_cli() -> Option<Cli> {
    parse_from(std::env::args_os())
}

pub fn parse_from<I, T>(args: I) -> Option<Cli>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Some(cli),
        Err(e) => {
            use clap::error::ErrorKind;
            match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => print!("{}", e),
                _ => {
                    println!("{}", e.render());
                    println!("{}", Cli::command().render_help());
                }
            }
            None
        }
    }
}
