use rust_decimal::Decimal;

use super::Donor;

/// A donated item sitting in exactly one case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gift {
    pub id: u64,
    pub name: String,
    /// Paid out to the winner on claim.
    pub value: Decimal,
    pub description: String,
    pub donor: Donor,
}

impl Gift {
    pub fn new(
        id: u64,
        name: impl Into<String>,
        value: Decimal,
        description: impl Into<String>,
        donor: Donor,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            value,
            description: description.into(),
            donor,
        }
    }
}
