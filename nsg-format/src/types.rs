//! Packet category and direction enumerations

use crate::error::NsgError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Radio technology or protocol layer a packet belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// No category on the wire
    Unknown,
    /// GSM radio resource / mobility
    Gsm,
    /// WCDMA (UMTS)
    Wcdma,
    /// LTE RRC
    Lte,
    /// 5G NR RRC
    Nr,
    /// EPS session management (NAS)
    Esm,
    /// EPS mobility management (NAS)
    Emm,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Category; 7] = [
        Category::Unknown,
        Category::Gsm,
        Category::Wcdma,
        Category::Lte,
        Category::Nr,
        Category::Esm,
        Category::Emm,
    ];

    /// Lowercase wire name of the category.
    pub fn value(&self) -> &'static str {
        match self {
            Category::Unknown => "unknown",
            Category::Gsm => "gsm",
            Category::Wcdma => "wcdma",
            Category::Lte => "lte",
            Category::Nr => "nr",
            Category::Esm => "esm",
            Category::Emm => "emm",
        }
    }

    /// Look up a category by wire name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.value().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl FromStr for Category {
    type Err = NsgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| {
            NsgError::schema(
                crate::constants::KEY_CATEGORY,
                format!("has unknown value '{}'", s),
            )
        })
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.value())
    }
}

/// Link direction of a packet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Direction {
    /// Handset to network
    Up = 0,
    /// Network to handset
    Down = 1,
}

impl Direction {
    /// Numeric code of the direction.
    pub fn value(&self) -> u8 {
        *self as u8
    }

    /// Name written back to NSG JSON.
    pub fn name(&self) -> &'static str {
        match self {
            Direction::Up => "Up",
            Direction::Down => "Down",
        }
    }

    /// Look up a direction by name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("up") {
            Some(Direction::Up)
        } else if name.eq_ignore_ascii_case("down") {
            Some(Direction::Down)
        } else {
            None
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = NsgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| {
            NsgError::schema(
                crate::constants::KEY_DIRECTION,
                format!("has unknown value '{}'", s),
            )
        })
    }
}

impl Serialize for Direction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
