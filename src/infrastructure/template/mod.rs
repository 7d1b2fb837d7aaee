//! Template infrastructure - filesystem-backed template source

mod fs_source;

pub use fs_source::FsTemplateSource;
