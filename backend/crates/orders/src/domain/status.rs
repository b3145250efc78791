//! Order Status
//!
//! Stored and serialized with the shop's Italian labels. English variant
//! names are accepted on input.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{OrderError, OrderResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    InPreparation,
    Completed,
    /// Legacy terminal state; readable, never set by staff
    Concluded,
}

impl OrderStatus {
    /// States staff may set through the API
    pub const SETTABLE: [OrderStatus; 3] = [
        OrderStatus::Pending,
        OrderStatus::InPreparation,
        OrderStatus::Completed,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "In attesa",
            OrderStatus::InPreparation => "In preparazione",
            OrderStatus::Completed => "Completato",
            OrderStatus::Concluded => "Concluso",
        }
    }

    /// Position in the workflow; transitions never decrease it
    const fn rank(&self) -> u8 {
        match self {
            OrderStatus::Pending => 0,
            OrderStatus::InPreparation => 1,
            OrderStatus::Completed => 2,
            OrderStatus::Concluded => 3,
        }
    }

    /// Any stored value, wire label or English alias
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "In attesa" | "Pending" => Some(OrderStatus::Pending),
            "In preparazione" | "InPreparation" => Some(OrderStatus::InPreparation),
            "Completato" | "Completed" => Some(OrderStatus::Completed),
            "Concluso" | "Concluded" => Some(OrderStatus::Concluded),
            _ => None,
        }
    }

    /// A status staff may set
    pub fn parse_settable(raw: Option<&str>) -> OrderResult<Self> {
        raw.and_then(Self::parse)
            .filter(|s| Self::SETTABLE.contains(s))
            .ok_or(OrderError::InvalidStatus)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, OrderStatus::Pending)
    }

    /// Forward or unchanged
    pub fn check_transition(&self, next: OrderStatus) -> OrderResult<()> {
        if next.rank() < self.rank() {
            return Err(OrderError::BackwardTransition {
                from: self.as_str(),
                to: next.as_str(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
