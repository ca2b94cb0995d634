use crate::config::{HISTOGRAM_STORE_VERSION, MAX_UNIQUE_PER_PAGE};
use crate::models::CompactEntry;
use anyhow::{bail, Context, Result};
use bincode::Options;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

pub type PageHistograms = FxHashMap<String, Vec<CompactEntry>>;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreMetadata {
    pub version: u32,
    pub input_path: String,
    pub page_count: usize,
    pub max_unique_per_page: usize,
}

#[derive(Deserialize)]
struct HistogramStoreDe {
    metadata: StoreMetadata,
    pages: PageHistograms,
}

/// Borrows the histograms so a large collection is written without cloning.
#[derive(Serialize)]
struct HistogramStoreSer<'a> {
    metadata: StoreMetadata,
    pages: &'a PageHistograms,
}

/// Writes the histograms atomically via a temp file and rename.
pub fn save_histograms(path: &Path, input_path: &str, pages: &PageHistograms) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
    }

    let store = HistogramStoreSer {
        metadata: StoreMetadata {
            version: HISTOGRAM_STORE_VERSION,
            input_path: input_path.to_string(),
            page_count: pages.len(),
            max_unique_per_page: MAX_UNIQUE_PER_PAGE,
        },
        pages,
    };

    let tmp_path = path.with_extension("tmp");
    let file = File::create(&tmp_path)
        .with_context(|| format!("Failed to create temp histogram file: {:?}", tmp_path))?;
    write_store(file, &store)?;

    fs::rename(&tmp_path, path)
        .with_context(|| format!("Failed to rename temp histogram file to: {:?}", path))?;

    info!(pages = pages.len(), path = ?path, "Page histograms saved");
    Ok(())
}

// Flushes explicitly so a short write fails here instead of being renamed into place.
fn write_store<W: Write>(inner: W, store: &HistogramStoreSer) -> Result<()> {
    let mut writer = BufWriter::with_capacity(256 * 1024, inner);
    bincode::DefaultOptions::new()
        .serialize_into(&mut writer, store)
        .context("Failed to serialize page histograms")?;
    writer.flush().context("Failed to flush page histograms")?;
    Ok(())
}

pub fn load_histograms(path: &Path) -> Result<(StoreMetadata, PageHistograms)> {
    if !path.exists() {
        bail!("Histogram file does not exist: {:?}", path);
    }

    let file_size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    let file = File::open(path)
        .with_context(|| format!("Failed to open histogram file: {:?}", path))?;
    let reader = BufReader::with_capacity(256 * 1024, file);

    let options = bincode::options().with_limit(file_size.saturating_add(1024));
    let store: HistogramStoreDe = options
        .deserialize_from(reader)
        .context("Failed to deserialize page histograms")?;

    if store.metadata.version != HISTOGRAM_STORE_VERSION {
        bail!(
            "Histogram file version {} does not match expected {}",
            store.metadata.version,
            HISTOGRAM_STORE_VERSION
        );
    }

    info!(pages = store.metadata.page_count, "Page histograms loaded");
    Ok((store.metadata, store.pages))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use tempfile::TempDir;

    /// Accepts nothing; every write reports a full disk.
    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("no space left on device"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn sample() -> PageHistograms {
        let mut pages = PageHistograms::default();
        pages.insert(
            "中国".to_string(),
            vec![
                CompactEntry::saturating('中', 3),
                CompactEntry::saturating('国', 2),
            ],
        );
        pages.insert("空".to_string(), vec![CompactEntry::saturating('空', 1)]);
        pages
    }

    #[test]
    fn save_then_load_restores_pages() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("histograms.bin");

        save_histograms(&path, "zhwiki.xml.bz2", &sample()).unwrap();
        let (metadata, pages) = load_histograms(&path).unwrap();

        assert_eq!(metadata.version, HISTOGRAM_STORE_VERSION);
        assert_eq!(metadata.input_path, "zhwiki.xml.bz2");
        assert_eq!(metadata.page_count, 2);
        assert_eq!(metadata.max_unique_per_page, MAX_UNIQUE_PER_PAGE);
        assert_eq!(pages, sample());
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deep").join("histograms.bin");
        save_histograms(&path, "in", &sample()).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn write_error_on_final_flush_is_reported() {
        let pages = sample();
        let store = HistogramStoreSer {
            metadata: StoreMetadata {
                version: HISTOGRAM_STORE_VERSION,
                input_path: "in".to_string(),
                page_count: pages.len(),
                max_unique_per_page: MAX_UNIQUE_PER_PAGE,
            },
            pages: &pages,
        };
        // small enough to sit in the buffer until the flush
        let err = write_store(FullDisk, &store).unwrap_err();
        assert!(format!("{:#}", err).contains("no space left"));
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        assert!(load_histograms(&dir.path().join("missing.bin")).is_err());
    }

    #[test]
    fn load_corrupt_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("histograms.bin");
        let mut file = File::create(&path).unwrap();
        file.write_all(b"not valid bincode data").unwrap();

        assert!(load_histograms(&path).is_err());
    }
}
