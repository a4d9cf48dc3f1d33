//! Node status and difficulty tier

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Progress status of a node
///
/// Statuses only move forward: `Locked -> Available -> Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "&'static str", from = "String")]
pub enum Status {
    #[default]
    Locked,
    Available,
    Completed,
}

impl Status {
    /// Parse a status case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "locked" => Some(Status::Locked),
            "available" => Some(Status::Available),
            "completed" => Some(Status::Completed),
            _ => None,
        }
    }

    /// Parse a status, falling back to `Locked` for unrecognized input
    pub fn parse_or_locked(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| {
            warn!(value = s, "unrecognized node status, defaulting to locked");
            Status::Locked
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Locked => "locked",
            Status::Available => "available",
            Status::Completed => "completed",
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Status::Completed)
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, Status::Locked)
    }

    /// Position in the forward-only status order
    pub fn rank(&self) -> u8 {
        match self {
            Status::Locked => 0,
            Status::Available => 1,
            Status::Completed => 2,
        }
    }
}

impl From<String> for Status {
    fn from(s: String) -> Self {
        Status::parse_or_locked(&s)
    }
}

impl From<Status> for &'static str {
    fn from(status: Status) -> Self {
        status.as_str()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Difficulty tier of a node
///
/// The ordering is descriptive; the engine never enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum Tier {
    Basic,
    Intermediate,
    Advanced,
    Expert,
    Master,
}

impl Tier {
    pub const ALL: [Tier; 5] = [
        Tier::Basic,
        Tier::Intermediate,
        Tier::Advanced,
        Tier::Expert,
        Tier::Master,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Basic => "Basic",
            Tier::Intermediate => "Intermediate",
            Tier::Advanced => "Advanced",
            Tier::Expert => "Expert",
            Tier::Master => "Master",
        }
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Tier::ALL
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown tier: {}", s))
    }
}

impl TryFrom<String> for Tier {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Tier> for &'static str {
    fn from(tier: Tier) -> Self {
        tier.as_str()
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_case_insensitive() {
        assert_eq!(Status::parse("LOCKED"), Some(Status::Locked));
        assert_eq!(Status::parse(" Available "), Some(Status::Available));
        assert_eq!(Status::parse("completed"), Some(Status::Completed));
        assert_eq!(Status::parse("in-progress"), None);
    }

    #[test]
    fn test_status_unknown_defaults_to_locked() {
        assert_eq!(Status::parse_or_locked("in-progress"), Status::Locked);
        let status: Status = serde_json::from_str("\"Completed\"").unwrap();
        assert_eq!(status, Status::Completed);
        let status: Status = serde_json::from_str("\"done\"").unwrap();
        assert_eq!(status, Status::Locked);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Status::Available).unwrap(), "\"available\"");
    }

    #[test]
    fn test_status_rank_is_forward_order() {
        assert!(Status::Locked.rank() < Status::Available.rank());
        assert!(Status::Available.rank() < Status::Completed.rank());
    }

    #[test]
    fn test_tier_parse() {
        assert_eq!("intermediate".parse::<Tier>(), Ok(Tier::Intermediate));
        assert_eq!("Master".parse::<Tier>(), Ok(Tier::Master));
        assert!("Legendary".parse::<Tier>().is_err());
        assert!(Tier::Basic < Tier::Expert);
    }

    #[test]
    fn test_tier_rejects_unknown_on_deserialize() {
        assert!(serde_json::from_str::<Tier>("\"ADVANCED\"").is_ok());
        assert!(serde_json::from_str::<Tier>("\"Godlike\"").is_err());
    }
}
