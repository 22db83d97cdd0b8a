use ahash::AHashSet;
use std::path::Path;
use tokio_util::sync::CancellationToken;

use crate::error::ReconError;

/// Split a word list into trimmed words, one per line. Blank lines are dropped.
pub fn parse_words(content: &str) -> Vec<String> {
    content
        .split('\n')
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(String::from)
        .collect()
}

pub async fn load_words(path: &Path) -> Result<Vec<String>, ReconError> {
    let content = tokio::fs::read_to_string(path).await.map_err(|source| ReconError::WordList {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_words(&content))
}

/// Replace the first `*` of every wildcard with every word.
pub fn expand_wildcards(wildcards: &[String], words: &[String]) -> Vec<String> {
    let mut candidates = Vec::with_capacity(wildcards.len() * words.len());
    for wildcard in wildcards {
        for word in words {
            candidates.push(wildcard.replacen('*', word, 1));
        }
    }
    candidates
}

/// Drop candidates equal to an already known hostname. Duplicates among
/// the candidates themselves are kept.
pub fn exclude_known(candidates: Vec<String>, known: &[String]) -> Vec<String> {
    let known: AHashSet<&str> = known.iter().map(String::as_str).collect();
    candidates
        .into_iter()
        .filter(|c| !known.contains(c.as_str()))
        .collect()
}

/// Read the word list at `path` and expand `wildcards` against it, skipping
/// candidates already present in `concrete`.
pub async fn extend_wildcards(
    wildcards: &[String],
    concrete: &[String],
    path: &Path,
) -> Result<Vec<String>, ReconError> {
    let words = load_words(path).await?;
    let candidates = expand_wildcards(wildcards, &words);
    let raw = candidates.len();
    let extended = exclude_known(candidates, concrete);
    tracing::info!(
        words = words.len(),
        candidates = raw,
        kept = extended.len(),
        "Expanded {} wildcard hostnames",
        wildcards.len()
    );
    Ok(extended)
}

/// Expansion step of the pipeline. Without a word list or wildcards nothing
/// is read; a word list that cannot be read yields no candidates.
///
/// Returns `Err(Cancelled)` if `cancel` fires first, since a read from a
/// pipe or device can block indefinitely.
pub async fn extend_or_skip(
    wildcards: &[String],
    concrete: &[String],
    words: Option<&Path>,
    cancel: &CancellationToken,
) -> Result<Vec<String>, ReconError> {
    let Some(path) = words else {
        return Ok(Vec::new());
    };
    if wildcards.is_empty() {
        tracing::debug!("No wildcard hostnames, not reading {}", path.display());
        return Ok(Vec::new());
    }
    let result = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(ReconError::Cancelled),
        r = extend_wildcards(wildcards, concrete, path) => r,
    };
    match result {
        Ok(extended) => Ok(extended),
        Err(e) => {
            tracing::warn!("{}, skipping wildcard expansion", e);
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_words_drops_trailing_blank() {
        assert_eq!(parse_words("api\n shop \r\n\nwww\n"), strings(&["api", "shop", "www"]));
        assert!(parse_words("").is_empty());
    }

    #[test]
    fn only_first_star_is_replaced() {
        let out = expand_wildcards(&strings(&["*.*.example.com"]), &strings(&["dev"]));
        assert_eq!(out, strings(&["dev.*.example.com"]));
    }

    #[test]
    fn candidate_count_is_product() {
        let wildcards = strings(&["*.a.com", "*.b.com", "*.c.com"]);
        let words = strings(&["x", "y"]);
        assert_eq!(expand_wildcards(&wildcards, &words).len(), 6);
    }

    #[test]
    fn exclude_known_keeps_self_duplicates() {
        let candidates = strings(&["api.example.com", "api.example.com", "www.example.com"]);
        let out = exclude_known(candidates, &strings(&["www.example.com"]));
        assert_eq!(out, strings(&["api.example.com", "api.example.com"]));
    }
}
