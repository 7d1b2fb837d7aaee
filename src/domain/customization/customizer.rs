//! Content customizer bound to one generation

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone};

use super::rule::{RenderContext, SubstitutionRule, DEFAULT_RULES};
use crate::domain::package::PackageConfig;

/// Format used for the `{{GENERATION_DATE}}` placeholder
pub fn format_generation_date<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

/// Applies the rule table to text files for a single package config
#[derive(Debug, Clone)]
pub struct ContentCustomizer {
    rules: Arc<[SubstitutionRule]>,
    config: PackageConfig,
    generated_at: String,
}

impl ContentCustomizer {
    /// Customizer using the default rules, stamped with the current local time
    pub fn new(config: PackageConfig) -> Self {
        Self::with_rules(DEFAULT_RULES.clone(), config, format_generation_date(&Local::now()))
    }

    pub fn with_rules(
        rules: Arc<[SubstitutionRule]>,
        config: PackageConfig,
        generated_at: impl Into<String>,
    ) -> Self {
        Self {
            rules,
            config,
            generated_at: generated_at.into(),
        }
    }

    pub fn config(&self) -> &PackageConfig {
        &self.config
    }

    pub fn generated_at(&self) -> &str {
        &self.generated_at
    }

    /// Whether any rule selects this file name
    pub fn has_rules_for(&self, filename: &str) -> bool {
        self.rules.iter().any(|r| r.matches(filename))
    }

    /// Apply every matching rule in table order. Unmatched files are returned unchanged.
    pub fn customize(&self, content: &str, filename: &str) -> String {
        let ctx = RenderContext {
            config: &self.config,
            generated_at: &self.generated_at,
        };

        let mut current = content.to_string();
        for rule in self.rules.iter().filter(|r| r.matches(filename)) {
            current = rule.apply(&current, &ctx);
        }
        current
    }

    /// Customize raw file bytes. Content that is not valid UTF-8 passes through untouched.
    pub fn customize_bytes(&self, bytes: Vec<u8>, filename: &str) -> Vec<u8> {
        if !self.has_rules_for(filename) {
            return bytes;
        }

        match String::from_utf8(bytes) {
            Ok(text) => self.customize(&text, filename).into_bytes(),
            Err(e) => e.into_bytes(),
        }
    }
}
