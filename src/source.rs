//! Reading the uploaded ledger into memory.

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::borrow::Cow;
use std::io::Read;
use tracing::debug;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Loads the ledger bytes from a local file path or fetches them over HTTP.
#[tracing::instrument(fields(source = %source))]
pub fn load_bytes(source: &str) -> Result<Vec<u8>> {
    let bytes = if source.starts_with("http://") || source.starts_with("https://") {
        fetch_bytes(source)?
    } else {
        std::fs::read(source).with_context(|| format!("failed to read '{source}'"))?
    };
    debug!(bytes = bytes.len(), "Upload loaded");
    Ok(bytes)
}

/// Blocking GET of `url`, failing on a non-success status.
pub fn fetch_bytes(url: &str) -> Result<Vec<u8>> {
    let resp = reqwest::blocking::get(url)?.error_for_status()?;
    Ok(resp.bytes()?.to_vec())
}

pub fn is_gzip(bytes: &[u8]) -> bool {
    bytes.starts_with(&GZIP_MAGIC)
}

/// Returns the bytes unchanged unless they carry the gzip magic, in which
/// case the decompressed content is returned.
pub fn decompress_if_gzip(bytes: &[u8]) -> std::io::Result<Cow<'_, [u8]>> {
    if !is_gzip(bytes) {
        return Ok(Cow::Borrowed(bytes));
    }
    let mut out = Vec::new();
    GzDecoder::new(bytes).read_to_end(&mut out)?;
    debug!(compressed = bytes.len(), decompressed = out.len(), "Gzip upload inflated");
    Ok(Cow::Owned(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    #[test]
    fn test_plain_bytes_pass_through() {
        let data = b"Date,Client_Name\n";
        let out = decompress_if_gzip(data).unwrap();
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out.as_ref(), data);
    }

    #[test]
    fn test_gzip_bytes_are_inflated() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"Date,Client_Name\n2023-01-01,A\n").unwrap();
        let compressed = encoder.finish().unwrap();

        assert!(is_gzip(&compressed));
        let out = decompress_if_gzip(&compressed).unwrap();
        assert_eq!(out.as_ref(), b"Date,Client_Name\n2023-01-01,A\n");
    }

    #[test]
    fn test_truncated_gzip_is_an_error() {
        let bad = [0x1f, 0x8b, 0x08, 0x00];
        assert!(decompress_if_gzip(&bad).is_err());
    }

    #[test]
    fn test_load_bytes_reads_local_file() {
        let path = format!("{}/sales_dashboard_source_test.csv", std::env::temp_dir().display());
        std::fs::write(&path, b"Date\n").unwrap();

        let bytes = load_bytes(&path).unwrap();
        assert_eq!(bytes, b"Date\n");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_bytes_missing_file() {
        assert!(load_bytes("/definitely/not/here.csv").is_err());
    }
}
