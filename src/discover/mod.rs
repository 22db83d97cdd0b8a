pub mod crtsh;
pub mod extract;
pub mod wildcard;

pub use crtsh::{fetch_certificates, CertificateRecord};
pub use extract::{extract_hostnames, HostnameSet, Partition};
pub use wildcard::{extend_or_skip, extend_wildcards};
