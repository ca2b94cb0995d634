use std::fmt;
use std::io;
use thiserror::Error;

/// Fatal conditions that end a run. Skipped pages are not errors and never show up here.
#[derive(Debug, Error)]
pub enum DumpError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Decompression error: {0}")]
    Codec(String),

    #[error("Dump parse error: {0}")]
    Parse(String),
}

/// Marker carried inside an `io::Error` raised by the decompressor, so the
/// codec failure can be told apart from a plain read failure once the
/// XML reader hands it back.
#[derive(Debug)]
pub(crate) struct CodecFailure(pub String);

impl fmt::Display for CodecFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for CodecFailure {}

impl DumpError {
    /// Classifies an I/O error coming out of the byte stream.
    pub(crate) fn from_stream(e: &io::Error) -> Self {
        match e.get_ref().and_then(|inner| inner.downcast_ref::<CodecFailure>()) {
            Some(codec) => DumpError::Codec(codec.0.clone()),
            None => DumpError::Io(io::Error::new(e.kind(), e.to_string())),
        }
    }

    pub fn is_codec(&self) -> bool {
        matches!(self, DumpError::Codec(_))
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, DumpError::Parse(_))
    }
}

impl From<quick_xml::Error> for DumpError {
    fn from(e: quick_xml::Error) -> Self {
        match e {
            quick_xml::Error::Io(io) => DumpError::from_stream(&io),
            other => DumpError::Parse(other.to_string()),
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for DumpError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        DumpError::Parse(e.to_string())
    }
}
