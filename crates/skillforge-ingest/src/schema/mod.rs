//! Tolerant payload schemas
//!
//! Generated and imported documents are parsed into these loosely typed
//! shapes first, then validated field by field into core types so that a
//! bad payload is reported with the path of the offending field.

pub mod content;
pub mod node;
pub mod tree;

use serde::Deserialize;
use std::fmt;

pub use content::RawContent;
pub use tree::{RawSubtree, RawTree};

/// Validation settings for one conversion
#[derive(Debug, Clone, Copy)]
pub struct Rules {
    /// Deepest nesting accepted (root-level nodes have depth 1); `None` for no limit
    pub max_depth: Option<usize>,
    /// Keep statuses and awarded XP from the payload (imports); otherwise lock everything
    pub keep_progress: bool,
}

/// Require a non-blank string field
pub(crate) fn required(value: Option<String>, path: &str) -> crate::Result<String> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(crate::Error::MissingField(path.to_string())),
    }
}

/// An XP number as written in a payload
///
/// Whole numbers are kept exact over the full `u64` range; anything else is
/// read as a float and rounded.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawXp {
    Whole(u64),
    Fraction(f64),
}

impl fmt::Display for RawXp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawXp::Whole(n) => write!(f, "{}", n),
            RawXp::Fraction(x) => write!(f, "{}", x),
        }
    }
}

/// Convert an XP number into a non-negative integer no larger than `max`
pub(crate) fn xp_value(value: RawXp, max: u64, path: &str) -> crate::Result<u64> {
    let amount = match value {
        RawXp::Whole(n) => Some(n),
        RawXp::Fraction(x) if x.is_finite() && x >= 0.0 && x.round() <= max as f64 => {
            Some(x.round() as u64)
        }
        RawXp::Fraction(_) => None,
    };
    match amount {
        Some(n) if n <= max => Ok(n),
        _ => Err(crate::Error::InvalidSchema(format!(
            "{}: expected a non-negative XP amount up to {}, got {}",
            path, max, value
        ))),
    }
}

/// A per-node reward, bounded like `Node::xp_reward`
pub(crate) fn reward_value(value: RawXp, path: &str) -> crate::Result<u32> {
    let amount = xp_value(value, u64::from(u32::MAX), path)?;
    u32::try_from(amount).map_err(|_| crate::Error::InvalidSchema(path.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required() {
        assert_eq!(required(Some("x".into()), "a.b").unwrap(), "x");
        assert!(matches!(
            required(Some("  ".into()), "a.b"),
            Err(crate::Error::MissingField(p)) if p == "a.b"
        ));
        assert!(required(None, "a.b").is_err());
    }

    #[test]
    fn test_xp_value() {
        assert_eq!(reward_value(RawXp::Whole(150), "xp").unwrap(), 150);
        assert_eq!(reward_value(RawXp::Fraction(12.6), "xp").unwrap(), 13);
        assert!(reward_value(RawXp::Fraction(-1.0), "xp").is_err());
        assert!(reward_value(RawXp::Fraction(f64::NAN), "xp").is_err());
        assert!(reward_value(RawXp::Whole(u64::from(u32::MAX) + 1), "xp").is_err());
    }

    #[test]
    fn test_total_xp_keeps_u64_range() {
        assert_eq!(xp_value(RawXp::Whole(u64::MAX), u64::MAX, "totalXp").unwrap(), u64::MAX);
        let parsed: RawXp = serde_json::from_str("5000000000").unwrap();
        assert_eq!(xp_value(parsed, u64::MAX, "totalXp").unwrap(), 5_000_000_000);
        let negative: RawXp = serde_json::from_str("-3").unwrap();
        assert!(matches!(
            xp_value(negative, u64::MAX, "totalXp"),
            Err(crate::Error::InvalidSchema(ref m)) if m.starts_with("totalXp")
        ));
    }
}
