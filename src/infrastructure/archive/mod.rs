//! Archive infrastructure - zip output

mod zip_builder;

pub use zip_builder::{ZipArchiveBuilder, MAX_COMPRESSION_LEVEL};
