use crate::strain::Strain;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Call {
    Pass,
    Bid { level: u8, strain: Strain },
    Double,
    Redouble,
}

impl Call {
    pub fn bid(level: u8, strain: Strain) -> Self {
        Call::Bid { level, strain }
    }

    pub fn render(self) -> String {
        match self {
            Call::Pass => "P".to_string(),
            Call::Double => "X".to_string(),
            Call::Redouble => "XX".to_string(),
            Call::Bid { level, strain } => format!("{}{}", level, strain),
        }
    }

    pub fn is_bid(self) -> bool {
        matches!(self, Call::Bid { .. })
    }

    pub fn level(self) -> Option<u8> {
        match self {
            Call::Bid { level, .. } => Some(level),
            _ => None,
        }
    }

    pub fn strain(self) -> Option<Strain> {
        match self {
            Call::Bid { strain, .. } => Some(strain),
            _ => None,
        }
    }

    /// True when both are bids and `self` ranks above `other` by (level, strain).
    pub fn outranks(self, other: Call) -> bool {
        match (self, other) {
            (
                Call::Bid { level, strain },
                Call::Bid {
                    level: other_level,
                    strain: other_strain,
                },
            ) => (level, strain) > (other_level, other_strain),
            _ => false,
        }
    }

    pub fn is_game_bid(self) -> bool {
        match self {
            Call::Bid { level, strain } => level >= strain.game_level(),
            _ => false,
        }
    }

    pub fn is_slam_bid(self) -> bool {
        match self {
            Call::Bid { level, .. } => level >= 6,
            _ => false,
        }
    }

    pub fn is_major(self) -> bool {
        match self {
            Call::Bid { strain, .. } => strain.is_major(),
            _ => false,
        }
    }

    pub fn is_minor(self) -> bool {
        match self {
            Call::Bid { strain, .. } => strain.is_minor(),
            _ => false,
        }
    }
}

impl FromStr for Call {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_uppercase();
        if s == "P" || s == "PASS" {
            return Ok(Call::Pass);
        }
        if s == "X" || s == "DBL" || s == "DOUBLE" {
            return Ok(Call::Double);
        }
        if s == "XX" || s == "RDBL" || s == "REDOUBLE" {
            return Ok(Call::Redouble);
        }
        let mut chars = s.chars();
        let level = chars.next().and_then(|c| c.to_digit(10)).ok_or(())? as u8;
        let strain = chars.next().and_then(Strain::from_char).ok_or(())?;
        let rest = chars.as_str();
        let suffix_ok = rest.is_empty() || (strain == Strain::NoTrump && rest == "T");
        if !(1..=7).contains(&level) || !suffix_ok {
            return Err(());
        }
        Ok(Call::Bid { level, strain })
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}
