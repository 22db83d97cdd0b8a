pub mod dns;

pub use dns::{resolve_all, DnsProbe, HostResolver, LookupOutcome, ResolutionResult};
