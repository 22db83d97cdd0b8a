use reqwest::{Client, ClientBuilder};
use std::time::Duration;

use crate::error::ReconError;

const USER_AGENT: &str = concat!("domain-recon/", env!("CARGO_PKG_VERSION"));

/// Create the client used for certificate-log queries.
///
/// crt.sh can take a long time to answer large queries, so the overall
/// timeout is optional; the connect timeout always applies.
pub fn create_client(timeout: Option<Duration>) -> Result<Client, ReconError> {
    let mut builder = ClientBuilder::new()
        .pool_idle_timeout(Some(Duration::from_secs(90)))
        .tcp_nodelay(true)
        .connect_timeout(Duration::from_secs(10))
        // Compression
        .gzip(true)
        .brotli(true)
        .use_rustls_tls()
        .redirect(reqwest::redirect::Policy::limited(5))
        .user_agent(USER_AGENT);

    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    builder.build().map_err(ReconError::Client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        assert!(create_client(Some(Duration::from_secs(10))).is_ok());
        assert!(create_client(None).is_ok());
    }
}
