//! Infrastructure layer - Filesystem, archive and storage implementations

pub mod archive;
pub mod logging;
pub mod services;
pub mod storage;
pub mod template;
