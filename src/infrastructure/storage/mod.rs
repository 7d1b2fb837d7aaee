//! Storage infrastructure - local package store and durable backends

mod factory;
mod http_blob;
mod package_store;

pub use factory::{BlobStoreFactory, BlobStoreSettings, BlobStoreType};
pub use http_blob::{HttpBlobStore, HttpBlobStoreConfig};
pub use package_store::{spawn_cleanup, PackageStore, Resolution};
