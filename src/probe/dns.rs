use async_trait::async_trait;
use futures::FutureExt;
use hickory_resolver::config::{LookupIpStrategy, ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use std::net::IpAddr;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::concurrent::ConcurrentProbe;
use crate::error::ReconError;

/// A hostname and the addresses it resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    pub host: String,
    pub ips: Vec<IpAddr>,
}

/// Exactly one of these is produced per launched lookup.
#[derive(Debug)]
pub enum LookupOutcome {
    Resolved(ResolutionResult),
    Failed(ReconError),
}

impl LookupOutcome {
    pub fn is_resolved(&self) -> bool {
        matches!(self, LookupOutcome::Resolved(_))
    }
}

#[async_trait]
pub trait HostResolver: Send + Sync + 'static {
    async fn lookup(&self, host: &str) -> Result<Vec<IpAddr>, ReconError>;
}

/// Resolver backed by hickory, configured from the system resolv.conf.
pub struct DnsProbe {
    resolver: TokioAsyncResolver,
}

impl DnsProbe {
    pub fn new(timeout: Duration) -> Self {
        let (config, mut opts) = match hickory_resolver::system_conf::read_system_conf() {
            Ok(conf) => conf,
            Err(e) => {
                tracing::warn!("Could not read system DNS configuration ({}), using defaults", e);
                (ResolverConfig::default(), ResolverOpts::default())
            }
        };
        opts.timeout = timeout;
        opts.ip_strategy = LookupIpStrategy::Ipv4AndIpv6;

        Self { resolver: TokioAsyncResolver::tokio(config, opts) }
    }
}

#[async_trait]
impl HostResolver for DnsProbe {
    async fn lookup(&self, host: &str) -> Result<Vec<IpAddr>, ReconError> {
        let lookup = self.resolver.lookup_ip(host).await.map_err(|e| ReconError::Resolution {
            host: host.to_string(),
            reason: e.to_string(),
        })?;
        Ok(lookup.iter().collect())
    }
}

/// Resolve every host concurrently. Outcomes arrive in completion order,
/// exactly one per host; a lookup that panics is reported as a failure.
pub fn resolve_all<R: HostResolver>(
    resolver: Arc<R>,
    hosts: Vec<String>,
    probe: &ConcurrentProbe,
    cancel: CancellationToken,
) -> mpsc::Receiver<LookupOutcome> {
    tracing::debug!("Resolving {} hostnames", hosts.len());
    probe.execute(hosts, move |host| {
        let resolver = resolver.clone();
        let cancel = cancel.clone();
        async move {
            let name = host.clone();
            AssertUnwindSafe(resolve_one(resolver.as_ref(), host, &cancel))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| {
                    LookupOutcome::Failed(ReconError::Resolution {
                        host: name,
                        reason: "lookup panicked".to_string(),
                    })
                })
        }
    })
}

async fn resolve_one<R: HostResolver + ?Sized>(
    resolver: &R,
    host: String,
    cancel: &CancellationToken,
) -> LookupOutcome {
    // Empty common names show up in crt.sh data; never send them to the resolver.
    if host.is_empty() {
        return LookupOutcome::Failed(ReconError::Resolution {
            host,
            reason: "empty hostname".to_string(),
        });
    }

    let result = tokio::select! {
        _ = cancel.cancelled() => Err(ReconError::Resolution {
            host: host.clone(),
            reason: ReconError::Cancelled.to_string(),
        }),
        r = resolver.lookup(&host) => r,
    };

    match result {
        Ok(ips) if !ips.is_empty() => LookupOutcome::Resolved(ResolutionResult { host, ips }),
        Ok(_) => LookupOutcome::Failed(ReconError::Resolution {
            host,
            reason: "no addresses".to_string(),
        }),
        Err(e) => LookupOutcome::Failed(e),
    }
}
