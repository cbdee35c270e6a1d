use serde::{Deserialize, Serialize};

/// Per-user counters. Only ever incremented; cleared by a full reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserStats {
    /// Cases opened
    pub opened: u32,
    /// Prizes claimed from other donors
    pub won: u32,
    /// Gifts donated
    pub added: u32,
}
