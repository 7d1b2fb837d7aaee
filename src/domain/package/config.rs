//! User-supplied package parameters and their validation

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::DomainError;

/// Algorithm used when the request does not name one
pub const DEFAULT_ALGORITHM: &str = "PPO";

/// Unvalidated configuration as it arrives from a request body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPackageConfig {
    #[serde(default)]
    pub maze_rooms: Option<Value>,
    #[serde(default)]
    pub training_steps: Option<Value>,
    #[serde(default)]
    pub algorithm: Option<String>,
}

impl RawPackageConfig {
    pub fn new(maze_rooms: u64, training_steps: u64) -> Self {
        Self {
            maze_rooms: Some(Value::from(maze_rooms)),
            training_steps: Some(Value::from(training_steps)),
            algorithm: None,
        }
    }

    pub fn with_algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = Some(algorithm.into());
        self
    }

    /// Validate into a [`PackageConfig`]. Performs no I/O.
    pub fn validate(self) -> Result<PackageConfig, DomainError> {
        let maze_rooms = required_positive("mazeRooms", self.maze_rooms.as_ref())?;
        let maze_rooms = u32::try_from(maze_rooms).map_err(|_| {
            DomainError::config_invalid(format!("mazeRooms must not exceed {}", u32::MAX))
        })?;
        let training_steps = required_positive("trainingSteps", self.training_steps.as_ref())?;

        let algorithm = match self.algorithm {
            Some(a) if !a.trim().is_empty() => a,
            _ => DEFAULT_ALGORITHM.to_string(),
        };

        Ok(PackageConfig {
            maze_rooms,
            training_steps,
            algorithm,
        })
    }
}

/// Validated package configuration, consumed read-only by the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageConfig {
    pub maze_rooms: u32,
    pub training_steps: u64,
    pub algorithm: String,
}

impl PackageConfig {
    pub fn new(maze_rooms: u32, training_steps: u64, algorithm: impl Into<String>) -> Self {
        Self {
            maze_rooms,
            training_steps,
            algorithm: algorithm.into(),
        }
    }
}

/// Absent, null, false, empty and zero values all count as missing.
fn required_positive(field: &str, value: Option<&Value>) -> Result<u64, DomainError> {
    let missing = || DomainError::config_invalid(format!("{} is required", field));

    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Err(missing()),
        Some(Value::String(s)) if s.is_empty() => Err(missing()),
        Some(Value::Number(n)) => match n
            .as_u64()
            .or_else(|| n.as_f64().and_then(whole_number))
        {
            Some(0) => Err(missing()),
            Some(v) => Ok(v),
            None if n.as_f64() == Some(0.0) => Err(missing()),
            None => Err(DomainError::config_invalid(format!(
                "{} must be a positive integer",
                field
            ))),
        },
        Some(_) => Err(DomainError::config_invalid(format!(
            "{} must be a positive integer",
            field
        ))),
    }
}

/// `1e5` and `100000.0` are the same count as `100000`.
fn whole_number(f: f64) -> Option<u64> {
    if f.fract() == 0.0 && f >= 0.0 && f <= u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}
