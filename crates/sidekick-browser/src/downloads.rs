//! Local download writer for data URLs.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use base64::Engine as _;
use sidekick_core::{Error, Result};
use tracing::{debug, info};

use crate::types::{ConflictAction, DownloadId, DownloadOptions};

/// Writes downloads into a single directory.
pub struct DownloadWriter {
    dir: PathBuf,
    next_id: AtomicU64,
}

/// A download that has been written to disk.
#[derive(Debug, Clone)]
pub struct SavedDownload {
    pub id: DownloadId,
    pub path: PathBuf,
}

impl DownloadWriter {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Decode `options.url` and write it under the download directory.
    pub fn save(&self, options: &DownloadOptions) -> Result<SavedDownload> {
        validate_filename(&options.filename)?;
        let bytes = decode_data_url(&options.url)?;

        std::fs::create_dir_all(&self.dir)?;
        let path = match options.conflict_action {
            ConflictAction::Overwrite => self.dir.join(&options.filename),
            // No UI to prompt with; behave like uniquify.
            ConflictAction::Uniquify | ConflictAction::Prompt => {
                uniquify(&self.dir, &options.filename)
            }
        };

        if options.save_as {
            debug!("saveAs requested for {}; writing to download directory", options.filename);
        }

        std::fs::write(&path, &bytes)?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        info!("Download {} saved to {} ({} bytes)", id, path.display(), bytes.len());

        Ok(SavedDownload { id, path })
    }
}

/// Decode a `data:` URL into its payload bytes. Only base64 payloads are supported.
pub fn decode_data_url(url: &str) -> Result<Vec<u8>> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| Error::Browser("Invalid URL: only data URLs can be downloaded".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::Browser("Invalid data URL: missing payload".into()))?;

    if !header.split(';').any(|part| part == "base64") {
        return Err(Error::Browser("Unsupported data URL encoding".into()));
    }

    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| Error::Browser(format!("Invalid data URL payload: {}", e)))
}

fn validate_filename(filename: &str) -> Result<()> {
    let invalid = filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains(['/', '\\'])
        || filename.chars().any(char::is_control);
    if invalid {
        return Err(Error::Browser(format!("Invalid filename: {:?}", filename)));
    }
    Ok(())
}

/// First free path for `filename` in `dir`, appending ` (n)` before the extension.
fn uniquify(dir: &Path, filename: &str) -> PathBuf {
    let candidate = dir.join(filename);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, ext) = match filename.rfind('.') {
        Some(idx) if idx > 0 => (&filename[..idx], &filename[idx..]),
        _ => (filename, ""),
    };

    (1u32..)
        .map(|n| dir.join(format!("{} ({}){}", stem, n, ext)))
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_url(text: &str) -> String {
        format!(
            "data:text/plain;charset=utf-8;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(text)
        )
    }

    fn options(filename: &str, url: String, conflict: ConflictAction) -> DownloadOptions {
        DownloadOptions {
            url,
            filename: filename.into(),
            save_as: true,
            conflict_action: conflict,
        }
    }

    #[test]
    fn test_decode_data_url() {
        let bytes = decode_data_url(&data_url("[1, 2]")).unwrap();
        assert_eq!(bytes, b"[1, 2]");
    }

    #[test]
    fn test_decode_rejects_non_data_urls() {
        assert!(decode_data_url("https://example.com/file.txt").is_err());
        assert!(decode_data_url("data:text/plain,hello").is_err());
        assert!(decode_data_url("data:text/plain;base64").is_err());
    }

    #[test]
    fn test_save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let writer = DownloadWriter::new(dir.path());
        let saved = writer
            .save(&options("a.txt", data_url("héllo"), ConflictAction::Uniquify))
            .unwrap();

        assert_eq!(saved.path, dir.path().join("a.txt"));
        assert_eq!(std::fs::read_to_string(&saved.path).unwrap(), "héllo");
    }

    #[test]
    fn test_uniquify_on_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let writer = DownloadWriter::new(dir.path());

        let first = writer
            .save(&options("c.txt", data_url("one"), ConflictAction::Uniquify))
            .unwrap();
        let second = writer
            .save(&options("c.txt", data_url("two"), ConflictAction::Uniquify))
            .unwrap();
        let third = writer
            .save(&options("c.txt", data_url("three"), ConflictAction::Prompt))
            .unwrap();

        assert_eq!(second.path, dir.path().join("c (1).txt"));
        assert_eq!(third.path, dir.path().join("c (2).txt"));
        assert_eq!(std::fs::read_to_string(first.path).unwrap(), "one");
        assert!(second.id > first.id);
    }

    #[test]
    fn test_overwrite_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let writer = DownloadWriter::new(dir.path());

        writer
            .save(&options("o.txt", data_url("old"), ConflictAction::Overwrite))
            .unwrap();
        let saved = writer
            .save(&options("o.txt", data_url("new"), ConflictAction::Overwrite))
            .unwrap();

        assert_eq!(saved.path, dir.path().join("o.txt"));
        assert_eq!(std::fs::read_to_string(saved.path).unwrap(), "new");
    }

    #[test]
    fn test_uniquify_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes"), "x").unwrap();
        assert_eq!(uniquify(dir.path(), "notes"), dir.path().join("notes (1)"));
    }

    #[test]
    fn test_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let writer = DownloadWriter::new(dir.path());
        let err = writer
            .save(&options("../evil.txt", data_url("x"), ConflictAction::Uniquify))
            .unwrap_err();
        assert!(err.to_string().contains("Invalid filename"));
    }
}
