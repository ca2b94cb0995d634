/// Pages with more distinct Han code points than this are dropped by the histogram collector
pub const MAX_UNIQUE_PER_PAGE: usize = 1500;

/// Namespace number of regular articles
pub const MAIN_NAMESPACE: i32 = 0;

/// File extension that selects bzip2 decoding
pub const COMPRESSED_SUFFIX: &str = "bz2";

/// Buffer size for the dump reader (decompressed side)
pub const READ_BUFFER_SIZE: usize = 1024 * 1024;

/// Progress update interval (tick every N pages)
pub const PROGRESS_INTERVAL: u64 = 1000;

/// Code points below this are never counted
pub const ASCII_LIMIT: u32 = 0x80;

/// Bumped whenever the on-disk histogram layout changes
pub const HISTOGRAM_STORE_VERSION: u32 = 1;
