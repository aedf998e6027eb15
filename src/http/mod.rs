use futures_util::StreamExt;
use reqwest::Client;
use sha1::{Digest, Sha1};
use sha2::{Sha256, Sha512};
use std::io;
use std::path::Path;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Enum representing supported hashers for file integrity verification.
pub enum HasherEnum {
    Sha1(Sha1),
    Sha256(Sha256),
    Sha512(Sha512),
    None,
}

impl HasherEnum {
    /// Picks a hasher from the length of a hex-encoded digest.
    pub fn for_digest(expected: Option<&str>) -> Self {
        match expected.map(str::len) {
            Some(40) => HasherEnum::Sha1(Sha1::new()),
            Some(64) => HasherEnum::Sha256(Sha256::new()),
            Some(128) => HasherEnum::Sha512(Sha512::new()),
            _ => HasherEnum::None,
        }
    }

    /// Updates the internal state of the hasher with the provided data.
    pub fn update(&mut self, data: &[u8]) {
        match self {
            HasherEnum::Sha1(h) => h.update(data),
            HasherEnum::Sha256(h) => h.update(data),
            HasherEnum::Sha512(h) => h.update(data),
            HasherEnum::None => {}
        }
    }

    /// Finalizes the hash computation and returns the resulting digest as a byte vector.
    pub fn finalize(self) -> Vec<u8> {
        match self {
            HasherEnum::Sha1(h) => h.finalize().to_vec(),
            HasherEnum::Sha256(h) => h.finalize().to_vec(),
            HasherEnum::Sha512(h) => h.finalize().to_vec(),
            HasherEnum::None => Vec::new(),
        }
    }
}

/// Downloads `url` into `dest`, overwriting any existing file.
///
/// Parent directories are created as needed. When `expected_hash` is a
/// SHA-1, SHA-256 or SHA-512 hex digest the written bytes are verified
/// against it.
///
/// # Returns
///
/// * `io::Result<u64>` - The number of bytes written.
pub async fn download_to_file(
    client: &Client,
    url: &str,
    dest: &Path,
    expected_hash: Option<&str>,
) -> io::Result<u64> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).await?;
    }

    debug!(%url, dest = %dest.display(), "Downloading");
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| io::Error::other(format!("http error: {}", e)))?;

    if !response.status().is_success() {
        return Err(io::Error::other(format!(
            "download failed: status code {}",
            response.status()
        )));
    }

    let mut out_file = File::create(dest).await?;
    let mut hasher = HasherEnum::for_digest(expected_hash);
    let mut written = 0u64;

    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| io::Error::other(e.to_string()))?;
        out_file.write_all(&chunk).await?;
        hasher.update(&chunk);
        written += chunk.len() as u64;
    }
    out_file.flush().await?;

    if let Some(expected) = expected_hash {
        let actual = hex::encode(hasher.finalize());
        if !actual.is_empty() && !actual.eq_ignore_ascii_case(expected) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("hash mismatch: got {}, want {}", actual, expected),
            ));
        }
    }

    debug!(bytes = written, dest = %dest.display(), "Download finished");
    Ok(written)
}
