//! Load transcriptions and subject listings from URLs or local files

use crate::error::ExtractorError;
use std::path::Path;
use tracing::debug;
use url::Url;

/// True when `path` parses as an absolute `http` or `https` URL
pub fn is_url(path: &str) -> bool {
    Url::parse(path)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Read the content behind `path`
///
/// URLs are fetched with a GET request and decoded lossily as UTF-8. Anything
/// else must name an existing local file.
pub async fn get_content(path: &str) -> Result<String, ExtractorError> {
    if is_url(path) {
        return fetch(path).await;
    }

    if Path::new(path).is_file() {
        debug!("Reading local file {}", path);
        return Ok(tokio::fs::read_to_string(path).await?);
    }

    Err(ExtractorError::InvalidPath(path.to_string()))
}

async fn fetch(url: &str) -> Result<String, ExtractorError> {
    debug!("Fetching {}", url);

    let response = reqwest::get(url)
        .await
        .map_err(|e| ExtractorError::Fetch(format!("Failed to fetch {}: {}", url, e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ExtractorError::Fetch(format!("Failed to fetch {}: {}", url, status)));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ExtractorError::Fetch(format!("Failed to fetch {}: {}", url, e)))?;
    debug!("Fetched {} bytes from {}", bytes.len(), url);

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/text.txt"));
        assert!(is_url("http://localhost:8080/listing.json"));
        assert!(!is_url("ftp://example.com/text.txt"));
        assert!(!is_url("data/transcription.txt"));
        assert!(!is_url("/tmp/transcription.txt"));
        assert!(!is_url(""));
    }

    #[tokio::test]
    async fn test_local_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Know all men by these presents").unwrap();

        let content = get_content(file.path().to_str().unwrap()).await.unwrap();
        assert_eq!(content, "Know all men by these presents");
    }

    #[tokio::test]
    async fn test_invalid_path() {
        let result = get_content("no/such/transcription.txt").await;
        match result {
            Err(ExtractorError::InvalidPath(path)) => assert_eq!(path, "no/such/transcription.txt"),
            other => panic!("expected InvalidPath, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_directory_is_not_content() {
        let dir = tempfile::tempdir().unwrap();
        let result = get_content(dir.path().to_str().unwrap()).await;
        assert!(matches!(result, Err(ExtractorError::InvalidPath(_))));
    }

    #[tokio::test]
    async fn test_unreachable_url() {
        let result = get_content("http://127.0.0.1:1/text.txt").await;
        match result {
            Err(ExtractorError::Fetch(msg)) => {
                assert!(msg.starts_with("Failed to fetch http://127.0.0.1:1/text.txt"))
            }
            other => panic!("expected Fetch, got {:?}", other),
        }
    }
}
