// src/source/client.rs
use std::path::Path;

use reqwest::header;

use crate::utils::error::SourceError;

const USER_AGENT: &str = concat!("kapify-financials/", env!("CARGO_PKG_VERSION"));

/// Creates a reqwest client for fetching uploaded workbooks.
fn build_http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
}

pub fn is_remote(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Loads workbook bytes from a local path or an http(s) URL.
pub async fn load_workbook_bytes(input: &str) -> Result<Vec<u8>, SourceError> {
    if is_remote(input) {
        download_workbook(input).await
    } else {
        read_workbook(input).await
    }
}

async fn read_workbook(path: &str) -> Result<Vec<u8>, SourceError> {
    if !Path::new(path).exists() {
        return Err(SourceError::NotFound(path.to_string()));
    }
    let bytes = tokio::fs::read(path).await?;
    tracing::debug!("Read {} bytes from {}", bytes.len(), path);
    Ok(bytes)
}

/// Downloads a workbook. Any non-2xx status is an error.
async fn download_workbook(url: &str) -> Result<Vec<u8>, SourceError> {
    let client = build_http_client()?;

    tracing::info!("Downloading workbook from: {}", url);
    let response = client
        .get(url)
        .header(header::ACCEPT, "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet,application/octet-stream,*/*")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        tracing::error!("HTTP error status: {} for URL: {}", status, url);
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound(url.to_string()));
        }
        return Err(SourceError::Http(status));
    }

    let body = response.bytes().await?;
    tracing::debug!("Successfully downloaded {} bytes from {}", body.len(), url);
    Ok(body.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn recognises_remote_inputs() {
        assert!(is_remote("https://files.example.com/upload.xlsx"));
        assert!(is_remote("http://localhost:8080/a.xlsx"));
        assert!(!is_remote("./uploads/a.xlsx"));
    }

    #[test]
    fn reads_local_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"PK\x03\x04 bytes").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let bytes = tokio_test::block_on(load_workbook_bytes(&path)).unwrap();
        assert_eq!(bytes, b"PK\x03\x04 bytes");
    }

    #[test]
    fn missing_local_file_is_not_found() {
        let result = tokio_test::block_on(load_workbook_bytes("/no/such/dir/upload.xlsx"));
        assert!(matches!(result, Err(SourceError::NotFound(_))));
    }
}
