use std::io::{self, Write};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::concurrent::ConcurrentProbe;
use crate::probe::{resolve_all, HostResolver, LookupOutcome, ResolutionResult};

pub const EXTENDED_HEADER: &str = "Extended domains:";

/// Counts for one drained resolution batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub resolved: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.resolved + self.failed
    }
}

/// `<host>` in plain mode, `<host> - IPs: [<ip> <ip> ...]` otherwise.
pub fn format_line(result: &ResolutionResult, plain: bool) -> String {
    if plain {
        return result.host.clone();
    }
    let ips: Vec<String> = result.ips.iter().map(|ip| ip.to_string()).collect();
    format!("{} - IPs: [{}]", result.host, ips.join(" "))
}

/// Prints resolved hostnames as their lookups complete.
pub struct Reporter<W: Write> {
    out: W,
    plain: bool,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, plain: bool) -> Self {
        Self { out, plain }
    }

    /// Drain every outcome from `outcomes`, printing successes.
    pub async fn report_batch(
        &mut self,
        mut outcomes: mpsc::Receiver<LookupOutcome>,
    ) -> io::Result<BatchSummary> {
        let mut summary = BatchSummary::default();
        while let Some(outcome) = outcomes.recv().await {
            match outcome {
                LookupOutcome::Resolved(result) => {
                    writeln!(self.out, "{}", format_line(&result, self.plain))?;
                    summary.resolved += 1;
                }
                LookupOutcome::Failed(err) => {
                    tracing::debug!("{}", err);
                    summary.failed += 1;
                }
            }
        }
        self.out.flush()?;

        if summary.failed > 0 {
            tracing::info!(
                "{} of {} hostnames failed to resolve",
                summary.failed,
                summary.total()
            );
        }
        Ok(summary)
    }

    /// Separator before the extended batch. Plain output has none.
    pub fn extended_header(&mut self) -> io::Result<()> {
        if !self.plain {
            write!(self.out, "\n{}\n", EXTENDED_HEADER)?;
        }
        Ok(())
    }

    /// Resolve and print the concrete batch, then the extended batch after
    /// it has fully drained. Returns the summary of each batch.
    pub async fn print_domains<R: HostResolver>(
        &mut self,
        resolver: Arc<R>,
        probe: &ConcurrentProbe,
        concrete: Vec<String>,
        extended: Vec<String>,
        cancel: &CancellationToken,
    ) -> io::Result<(BatchSummary, BatchSummary)> {
        let outcomes = resolve_all(resolver.clone(), concrete, probe, cancel.clone());
        let concrete_summary = self.report_batch(outcomes).await?;

        let mut extended_summary = BatchSummary::default();
        if !extended.is_empty() {
            self.extended_header()?;
            let outcomes = resolve_all(resolver, extended, probe, cancel.clone());
            extended_summary = self.report_batch(outcomes).await?;
        }
        Ok((concrete_summary, extended_summary))
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReconError;
    use std::net::IpAddr;

    fn resolved(host: &str, ips: &[&str]) -> ResolutionResult {
        ResolutionResult {
            host: host.to_string(),
            ips: ips.iter().map(|ip| ip.parse::<IpAddr>().unwrap()).collect(),
        }
    }

    #[test]
    fn annotated_line_lists_addresses() {
        let line = format_line(&resolved("a.example.com", &["10.0.0.1", "2001:db8::1"]), false);
        assert_eq!(line, "a.example.com - IPs: [10.0.0.1 2001:db8::1]");
    }

    #[test]
    fn plain_line_is_bare_host() {
        assert_eq!(format_line(&resolved("a.example.com", &["10.0.0.1"]), true), "a.example.com");
    }

    #[test]
    fn plain_mode_has_no_header() {
        let mut reporter = Reporter::new(Vec::new(), true);
        reporter.extended_header().unwrap();
        assert!(reporter.into_inner().is_empty());

        let mut reporter = Reporter::new(Vec::new(), false);
        reporter.extended_header().unwrap();
        assert_eq!(reporter.into_inner(), b"\nExtended domains:\n");
    }

    #[tokio::test]
    async fn failures_are_counted_not_printed() {
        let (tx, rx) = mpsc::channel(2);
        tx.send(LookupOutcome::Resolved(resolved("a.example.com", &["10.0.0.1"]))).await.unwrap();
        tx.send(LookupOutcome::Failed(ReconError::Resolution {
            host: "b.example.com".into(),
            reason: "NXDOMAIN".into(),
        }))
        .await
        .unwrap();
        drop(tx);

        let mut reporter = Reporter::new(Vec::new(), false);
        let summary = reporter.report_batch(rx).await.unwrap();
        assert_eq!(summary, BatchSummary { resolved: 1, failed: 1 });
        assert_eq!(
            String::from_utf8(reporter.into_inner()).unwrap(),
            "a.example.com - IPs: [10.0.0.1]\n"
        );
    }
}
