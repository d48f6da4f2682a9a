//! Packet predicates

use crate::packet::Packet;
use crate::types::{Category, Direction};

/// Conjunction of optional packet criteria; an empty filter matches all
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PacketFilter {
    /// Exact channel number
    pub frequency: Option<u32>,
    /// Exact category
    pub category: Option<Category>,
    /// Exact direction
    pub direction: Option<Direction>,
    /// Case-insensitive substring of the title
    pub title_contains: Option<String>,
}

impl PacketFilter {
    /// Filter matching a single channel number.
    pub fn frequency(frequency: u32) -> Self {
        Self {
            frequency: Some(frequency),
            ..Self::default()
        }
    }

    /// True when no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.frequency.is_none()
            && self.category.is_none()
            && self.direction.is_none()
            && self.title_contains.is_none()
    }

    /// Whether `packet` satisfies every criterion.
    pub fn matches(&self, packet: &Packet) -> bool {
        if let Some(frequency) = self.frequency {
            if packet.frequency != Some(frequency) {
                return false;
            }
        }
        if let Some(category) = self.category {
            if packet.category != category {
                return false;
            }
        }
        if let Some(direction) = self.direction {
            if packet.direction != direction {
                return false;
            }
        }
        if let Some(needle) = &self.title_contains {
            if !packet
                .title
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        true
    }
}
