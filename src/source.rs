//! Picks a raw or bzip2-decoded byte stream for a dump file.

use crate::config::{COMPRESSED_SUFFIX, READ_BUFFER_SIZE};
use crate::error::{CodecFailure, DumpError};
use bzip2::read::MultiBzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Buffered byte stream over the (possibly decompressed) dump. Dropping it closes the file.
pub type DumpStream = Box<dyn BufRead>;

pub fn is_compressed(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(COMPRESSED_SUFFIX))
}

/// Opens `path`, wrapping it in a bzip2 decoder when it carries the `.bz2` suffix.
///
/// Only the open itself can fail here. A malformed compressed stream is reported
/// on the first read, as a [`DumpError::Codec`] once it passes through the parser.
pub fn open(path: impl AsRef<Path>) -> Result<DumpStream, DumpError> {
    let path = path.as_ref();
    let file = File::open(path)?;

    if is_compressed(path) {
        debug!(path = %path.display(), "Opening bzip2 dump");
        let decoder = CodecStream::new(MultiBzDecoder::new(file));
        Ok(Box::new(BufReader::with_capacity(READ_BUFFER_SIZE, decoder)))
    } else {
        debug!(path = %path.display(), "Opening plain XML dump");
        Ok(Box::new(BufReader::with_capacity(READ_BUFFER_SIZE, file)))
    }
}

/// Tags decoder failures so they stay distinguishable from file read errors.
struct CodecStream<R> {
    inner: R,
}

impl<R> CodecStream<R> {
    fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: Read> Read for CodecStream<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf).map_err(|e| {
            let from_codec = e.get_ref().is_some_and(|inner| inner.is::<bzip2::Error>())
                || matches!(
                    e.kind(),
                    io::ErrorKind::InvalidInput
                        | io::ErrorKind::InvalidData
                        | io::ErrorKind::UnexpectedEof
                );
            if from_codec {
                io::Error::new(io::ErrorKind::InvalidData, CodecFailure(e.to_string()))
            } else {
                e
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bzip2::write::BzEncoder;
    use bzip2::Compression;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn suffix_selects_codec() {
        assert!(is_compressed(Path::new("zhwiki-latest-pages-articles.xml.bz2")));
        assert!(is_compressed(Path::new("dump.BZ2")));
        assert!(!is_compressed(Path::new("dump.xml")));
        assert!(!is_compressed(Path::new("bz2")));
    }

    #[test]
    fn open_missing_file_is_io_error() {
        let err = match open("/nonexistent/dump.xml.bz2") {
            Ok(_) => panic!("open should fail"),
            Err(e) => e,
        };
        assert!(matches!(err, DumpError::Io(_)));
    }

    #[test]
    fn open_plain_reads_bytes_verbatim() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dump.xml");
        std::fs::write(&path, "<mediawiki/>").unwrap();

        let mut out = String::new();
        open(&path).unwrap().read_to_string(&mut out).unwrap();
        assert_eq!(out, "<mediawiki/>");
    }

    #[test]
    fn open_bz2_decompresses() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dump.xml.bz2");
        let mut encoder = BzEncoder::new(Vec::new(), Compression::fast());
        encoder.write_all("<mediawiki>中文</mediawiki>".as_bytes()).unwrap();
        std::fs::write(&path, encoder.finish().unwrap()).unwrap();

        let mut out = String::new();
        open(&path).unwrap().read_to_string(&mut out).unwrap();
        assert_eq!(out, "<mediawiki>中文</mediawiki>");
    }

    #[test]
    fn malformed_bz2_fails_on_read_not_open() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dump.xml.bz2");
        std::fs::write(&path, b"this is not bzip2 data at all").unwrap();

        let mut stream = open(&path).unwrap();
        let mut out = Vec::new();
        let err = stream.read_to_end(&mut out).unwrap_err();
        assert!(DumpError::from_stream(&err).is_codec());
    }
}
