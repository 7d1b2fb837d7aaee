//! Template domain - the static file tree packages are built from

mod entry;
mod source;

pub use entry::{
    is_excluded_dir, is_text_file, TemplateEntry, BINARY_EXTENSIONS, EXCLUDED_DIRS,
};
pub use source::{TemplateSource, TemplateStatus};

#[cfg(test)]
pub use source::MockTemplateSource;
