use ahash::AHashSet;

use super::crtsh::CertificateRecord;

/// Trimmed hostnames, unique by exact string.
pub type HostnameSet = AHashSet<String>;

/// Hostnames split by the leading `*` rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub wildcards: Vec<String>,
    pub concrete: Vec<String>,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.wildcards.len() + self.concrete.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn is_wildcard(hostname: &str) -> bool {
    hostname.starts_with('*')
}

/// Union of every common name and every `name_value` line, trimmed.
///
/// Empty common names are kept; no case folding or trailing-dot handling.
pub fn collect_hostnames(records: &[CertificateRecord]) -> HostnameSet {
    let mut hostnames = HostnameSet::new();
    for record in records {
        hostnames.insert(record.common_name.trim().to_string());
        for name in record.name_value.split('\n') {
            hostnames.insert(name.trim().to_string());
        }
    }
    hostnames
}

pub fn partition_hostnames(hostnames: HostnameSet) -> Partition {
    let (mut wildcards, mut concrete): (Vec<String>, Vec<String>) =
        hostnames.into_iter().partition(|h| is_wildcard(h));
    wildcards.sort();
    concrete.sort();
    Partition { wildcards, concrete }
}

pub fn extract_hostnames(records: &[CertificateRecord]) -> Partition {
    let partition = partition_hostnames(collect_hostnames(records));
    tracing::info!(
        wildcards = partition.wildcards.len(),
        concrete = partition.concrete.len(),
        "Extracted hostnames from {} certificates",
        records.len()
    );
    partition
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(common_name: &str, name_value: &str) -> CertificateRecord {
        CertificateRecord {
            common_name: common_name.to_string(),
            name_value: name_value.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn trims_before_dedup() {
        let set = collect_hostnames(&[record(" a.example.com", "a.example.com \n\tb.example.com\r")]);
        let mut names: Vec<_> = set.into_iter().collect();
        names.sort();
        assert_eq!(names, vec!["a.example.com", "b.example.com"]);
    }

    #[test]
    fn case_variants_stay_distinct() {
        let set = collect_hostnames(&[record("WWW.example.com", "www.example.com")]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn empty_common_name_is_kept() {
        let set = collect_hostnames(&[record("", "a.example.com")]);
        assert!(set.contains(""));
        assert!(set.contains("a.example.com"));
    }

    #[test]
    fn partition_by_leading_star() {
        let set: HostnameSet = ["*.example.com", "www.example.com", "a.*.example.com"]
            .into_iter()
            .map(String::from)
            .collect();
        let partition = partition_hostnames(set);
        assert_eq!(partition.wildcards, vec!["*.example.com"]);
        assert_eq!(partition.concrete, vec!["a.*.example.com", "www.example.com"]);
    }

    #[test]
    fn no_records_no_hostnames() {
        let partition = extract_hostnames(&[]);
        assert!(partition.is_empty());
    }
}
