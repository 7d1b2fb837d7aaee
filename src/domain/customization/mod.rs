//! Customization domain - rule-driven rewriting of template text files

mod customizer;
mod rule;

pub use customizer::{format_generation_date, ContentCustomizer};
pub use rule::{
    FileSelector, RenderContext, RenderFn, ReplaceMode, Replacement, SubstitutionRule,
    DEFAULT_RULES,
};
