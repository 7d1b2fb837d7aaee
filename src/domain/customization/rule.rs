//! Declarative substitution rules
//!
//! A rule pairs a [`FileSelector`] with an ordered list of [`Replacement`]s.
//! New customizable file types are added to [`DEFAULT_RULES`], not to
//! control flow.

use std::borrow::Cow;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

use crate::domain::package::PackageConfig;

/// Values available to a replacement when rendering
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub config: &'a PackageConfig,
    /// Fixed once per generation
    pub generated_at: &'a str,
}

pub type RenderFn = fn(&RenderContext<'_>) -> String;

/// How many matches a replacement rewrites
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceMode {
    /// Only the first match; for a single known assignment in source code
    First,
    /// Every match; for purpose-built placeholder tokens
    Global,
}

/// Tests the bare file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSelector {
    Exact(Vec<String>),
    Suffix(String),
}

impl FileSelector {
    pub fn exact<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Exact(names.into_iter().map(Into::into).collect())
    }

    pub fn suffix(suffix: impl Into<String>) -> Self {
        Self::Suffix(suffix.into())
    }

    pub fn matches(&self, filename: &str) -> bool {
        match self {
            Self::Exact(names) => names.iter().any(|n| n == filename),
            Self::Suffix(suffix) => filename.ends_with(suffix.as_str()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Replacement {
    pattern: Regex,
    mode: ReplaceMode,
    render: RenderFn,
}

impl Replacement {
    pub fn new(pattern: Regex, mode: ReplaceMode, render: RenderFn) -> Self {
        Self {
            pattern,
            mode,
            render,
        }
    }

    /// First-occurrence replacement of a regex
    pub fn first(pattern: &str, render: RenderFn) -> Result<Self, regex::Error> {
        Ok(Self::new(Regex::new(pattern)?, ReplaceMode::First, render))
    }

    /// Global replacement of a literal `{{TOKEN}}` placeholder
    pub fn placeholder(token: &str, render: RenderFn) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&regex::escape(&format!("{{{{{}}}}}", token)))?;
        Ok(Self::new(pattern, ReplaceMode::Global, render))
    }

    pub fn mode(&self) -> ReplaceMode {
        self.mode
    }

    pub fn apply<'c>(&self, content: &'c str, ctx: &RenderContext<'_>) -> Cow<'c, str> {
        if !self.pattern.is_match(content) {
            return Cow::Borrowed(content);
        }

        let value = (self.render)(ctx);
        match self.mode {
            ReplaceMode::First => self.pattern.replace(content, NoExpand(&value)),
            ReplaceMode::Global => self.pattern.replace_all(content, NoExpand(&value)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SubstitutionRule {
    pub selector: FileSelector,
    pub replacements: Vec<Replacement>,
}

impl SubstitutionRule {
    pub fn new(selector: FileSelector, replacements: Vec<Replacement>) -> Self {
        Self {
            selector,
            replacements,
        }
    }

    pub fn matches(&self, filename: &str) -> bool {
        self.selector.matches(filename)
    }

    /// Apply each replacement in order
    pub fn apply(&self, content: &str, ctx: &RenderContext<'_>) -> String {
        let mut current = content.to_string();
        for replacement in &self.replacements {
            let replaced = match replacement.apply(&current, ctx) {
                Cow::Owned(next) => Some(next),
                Cow::Borrowed(_) => None,
            };
            if let Some(next) = replaced {
                current = next;
            }
        }
        current
    }
}

/// Process-wide rule table
pub static DEFAULT_RULES: Lazy<Arc<[SubstitutionRule]>> =
    Lazy::new(|| default_rules().expect("built-in substitution patterns are valid").into());

fn default_rules() -> Result<Vec<SubstitutionRule>, regex::Error> {
    Ok(vec![
        SubstitutionRule::new(
            FileSelector::exact(["train_sphere_agent.py"]),
            vec![
                Replacement::first(r"total_timesteps\s*=\s*\d+", |c| {
                    format!("total_timesteps = {}", c.config.training_steps)
                })?,
                Replacement::first(r"maze_rooms\s*=\s*\d+", |c| {
                    format!("maze_rooms = {}", c.config.maze_rooms)
                })?,
                Replacement::first(r#"algorithm\s*=\s*["'][^"']*["']"#, |c| {
                    format!("algorithm = \"{}\"", c.config.algorithm)
                })?,
            ],
        ),
        SubstitutionRule::new(
            FileSelector::suffix(".js"),
            vec![
                Replacement::first(r"mazeRooms:\s*\d+", |c| {
                    format!("mazeRooms: {}", c.config.maze_rooms)
                })?,
                Replacement::first(r"trainingSteps:\s*\d+", |c| {
                    format!("trainingSteps: {}", c.config.training_steps)
                })?,
                Replacement::first(r#"algorithm:\s*['"][^'"]*['"]"#, |c| {
                    format!("algorithm: '{}'", c.config.algorithm)
                })?,
            ],
        ),
        SubstitutionRule::new(
            FileSelector::exact(["INSTRUCTIONS.txt", "INSTRUCTIONS.TXT"]),
            vec![
                Replacement::placeholder("MAZE_ROOMS", |c| c.config.maze_rooms.to_string())?,
                Replacement::placeholder("TRAINING_STEPS", |c| {
                    c.config.training_steps.to_string()
                })?,
                Replacement::placeholder("ALGORITHM", |c| c.config.algorithm.clone())?,
                Replacement::placeholder("GENERATION_DATE", |c| c.generated_at.to_string())?,
            ],
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(config: &PackageConfig) -> RenderContext<'_> {
        RenderContext {
            config,
            generated_at: "1/2/2026, 3:04:05 PM",
        }
    }

    #[test]
    fn test_selector_exact_and_suffix() {
        let exact = FileSelector::exact(["INSTRUCTIONS.txt", "INSTRUCTIONS.TXT"]);
        assert!(exact.matches("INSTRUCTIONS.txt"));
        assert!(exact.matches("INSTRUCTIONS.TXT"));
        assert!(!exact.matches("instructions.txt"));

        let suffix = FileSelector::suffix(".js");
        assert!(suffix.matches("maze.js"));
        assert!(!suffix.matches("maze.json"));
    }

    #[test]
    fn test_first_replaces_only_first_match() {
        let config = PackageConfig::new(5, 100, "PPO");
        let replacement = Replacement::first(r"mazeRooms:\s*\d+", |c| {
            format!("mazeRooms: {}", c.config.maze_rooms)
        })
        .unwrap();

        let out = replacement.apply("mazeRooms: 1, mazeRooms:2", &ctx(&config));
        assert_eq!(out, "mazeRooms: 5, mazeRooms:2");
        assert_eq!(replacement.mode(), ReplaceMode::First);
    }

    #[test]
    fn test_placeholder_replaces_all_matches() {
        let config = PackageConfig::new(5, 100, "PPO");
        let replacement =
            Replacement::placeholder("ALGORITHM", |c| c.config.algorithm.clone()).unwrap();

        let out = replacement.apply("{{ALGORITHM}} and {{ALGORITHM}}", &ctx(&config));
        assert_eq!(out, "PPO and PPO");
        assert_eq!(replacement.mode(), ReplaceMode::Global);
    }

    #[test]
    fn test_rendered_value_is_inserted_literally() {
        let config = PackageConfig::new(5, 100, "$1${name}");
        let replacement =
            Replacement::placeholder("ALGORITHM", |c| c.config.algorithm.clone()).unwrap();

        let out = replacement.apply("algo={{ALGORITHM}}", &ctx(&config));
        assert_eq!(out, "algo=$1${name}");
    }

    #[test]
    fn test_no_match_borrows() {
        let config = PackageConfig::new(5, 100, "PPO");
        let replacement =
            Replacement::placeholder("MAZE_ROOMS", |c| c.config.maze_rooms.to_string()).unwrap();

        assert!(matches!(
            replacement.apply("nothing here", &ctx(&config)),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn test_default_table_shape() {
        assert_eq!(DEFAULT_RULES.len(), 3);
        assert!(DEFAULT_RULES[0].matches("train_sphere_agent.py"));
        assert!(DEFAULT_RULES[1].matches("config.js"));
        assert!(DEFAULT_RULES[2].matches("INSTRUCTIONS.TXT"));
        assert!(
            DEFAULT_RULES[2]
                .replacements
                .iter()
                .all(|r| r.mode() == ReplaceMode::Global)
        );
    }
}
