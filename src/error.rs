//! Simulation-specific error types.
//!
//! The combat core itself never fails: absent collaborators are skipped and
//! out-of-range gameplay values are clamped.  Configuration is the one
//! fallible boundary, and these types describe what went wrong there so the
//! loader can log it and fall back to compiled defaults.
//!
//! ## Usage
//!
//! ```rust
//! use paper_skirmish::config::CombatConfig;
//! use paper_skirmish::error::SimResult;
//!
//! fn load(text: &str) -> SimResult<CombatConfig> {
//!     let config = CombatConfig::from_toml_str(text)?;
//!     Ok(config)
//! }
//! ```

use std::fmt;

/// Top-level error enum for the combat simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// The config file exists but could not be read.
    ConfigRead {
        path: String,
        message: String,
    },

    /// The config text is not valid TOML for [`crate::config::CombatConfig`].
    ConfigParse {
        message: String,
    },

    /// A weapon entry is unusable as written.
    InvalidWeapon {
        /// Weapon name from the config.
        name: String,
        /// Human-readable description of the problem.
        reason: &'static str,
    },

    /// A named weapon (default or loadout slot) is missing from the catalog.
    UnknownWeapon {
        name: String,
    },

    /// Constant is outside its safe operating range.
    UnsafeConstant {
        /// Name of the constant (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::ConfigRead { path, message } => {
                write!(f, "failed to read '{}': {}", path, message)
            }
            SimError::ConfigParse { message } => {
                write!(f, "failed to parse combat config: {}", message)
            }
            SimError::InvalidWeapon { name, reason } => {
                write!(f, "weapon '{}' is invalid: {}", name, reason)
            }
            SimError::UnknownWeapon { name } => {
                write!(f, "weapon '{}' is not defined in the catalog", name)
            }
            SimError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "constant '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
        }
    }
}

impl std::error::Error for SimError {}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error unless `value` is strictly positive.
pub fn validate_positive(name: &'static str, value: f32) -> SimResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(SimError::UnsafeConstant {
            name,
            value,
            safe_range: "(0.0, ∞)",
        })
    }
}

/// Returns an error if `value` is negative or not finite.
pub fn validate_non_negative(name: &'static str, value: f32) -> SimResult<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(SimError::UnsafeConstant {
            name,
            value,
            safe_range: "[0.0, ∞)",
        })
    }
}
