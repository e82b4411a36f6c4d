//! Control states and motion kinds

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ScrambleError;

/// Manager control state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum ControlState {
    /// Idle at the initial pose
    #[default]
    None,
    /// Idle at the target pose
    Stop,
    /// Moving every node from its start pose to its target pose
    Scramble,
    /// Moving every node from its target pose back to its initial pose
    Revert,
}

impl ControlState {
    /// Motion states ignore external transition requests until they finish
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Scramble | Self::Revert)
    }

    /// Motion kind driven while in this state, if any
    pub fn motion(self) -> Option<MoveKind> {
        match self {
            Self::Scramble => Some(MoveKind::Target),
            Self::Revert => Some(MoveKind::Initial),
            Self::None | Self::Stop => None,
        }
    }

    /// Resting state entered once every node completes this state's motion
    pub fn completion(self) -> Option<Self> {
        match self {
            Self::Scramble => Some(Self::Stop),
            Self::Revert => Some(Self::None),
            Self::None | Self::Stop => None,
        }
    }
}

impl fmt::Display for ControlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "NONE",
            Self::Stop => "STOP",
            Self::Scramble => "SCRAMBLE",
            Self::Revert => "REVERT",
        })
    }
}

impl FromStr for ControlState {
    type Err = ScrambleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "stop" => Ok(Self::Stop),
            "scramble" => Ok(Self::Scramble),
            "revert" => Ok(Self::Revert),
            _ => Err(ScrambleError::UnknownState(s.to_string())),
        }
    }
}

/// Direction of a node's motion segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MoveKind {
    /// Start pose towards target pose
    Target,
    /// Target pose back towards initial pose
    Initial,
}
