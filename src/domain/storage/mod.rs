//! Storage domain - durable object storage abstraction

mod blob;

pub use blob::{BlobStore, ZIP_CONTENT_TYPE};

#[cfg(test)]
pub use blob::MockBlobStore;
