use reqwest::Client;
use serde::{Deserialize, Deserializer};
use url::Url;

use crate::error::ReconError;

/// One row of a crt.sh JSON response.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CertificateRecord {
    pub issuer_ca_id: i64,
    #[serde(deserialize_with = "null_as_empty")]
    pub issuer_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub common_name: String,
    /// Zero or more hostnames separated by line breaks.
    #[serde(deserialize_with = "null_as_empty")]
    pub name_value: String,
    pub id: i64,
    #[serde(deserialize_with = "null_as_empty")]
    pub entry_timestamp: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub not_before: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub not_after: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub serial_number: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Build the search URL: `<endpoint>?q=<domain>&output=json&excluded=expired`.
pub fn search_url(endpoint: &str, domain: &str) -> Result<Url, ReconError> {
    Url::parse_with_params(endpoint, &[("q", domain), ("output", "json"), ("excluded", "expired")])
        .map_err(|source| ReconError::Endpoint { endpoint: endpoint.to_string(), source })
}

/// Issue the search request and return the raw body.
pub async fn fetch_raw(client: &Client, endpoint: &str, domain: &str) -> Result<Vec<u8>, ReconError> {
    let url = search_url(endpoint, domain)?;
    tracing::debug!(%url, "Querying certificate log");

    let resp = client.get(url).send().await.map_err(ReconError::Fetch)?;
    let status = resp.status();
    let body = resp.bytes().await.map_err(ReconError::Fetch)?;

    if !status.is_success() {
        return Err(ReconError::HttpStatus {
            status,
            body: String::from_utf8_lossy(&body).into_owned(),
        });
    }
    Ok(body.to_vec())
}

pub fn decode_records(body: &[u8]) -> Result<Vec<CertificateRecord>, ReconError> {
    serde_json::from_slice(body).map_err(|source| ReconError::Decode {
        source,
        body: String::from_utf8_lossy(body).into_owned(),
    })
}

/// Fetch every unexpired certificate crt.sh knows for `domain`.
pub async fn fetch_certificates(
    client: &Client,
    endpoint: &str,
    domain: &str,
) -> Result<Vec<CertificateRecord>, ReconError> {
    let body = fetch_raw(client, endpoint, domain).await?;
    let records = decode_records(&body)?;
    tracing::info!("crt.sh returned {} certificates for {}", records.len(), domain);
    Ok(records)
}
