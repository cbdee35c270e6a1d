use rust_decimal::Decimal;

use super::Gift;

/// A purchasable container of gifts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    pub id: u64,
    pub name: String,
    pub description: String,
    /// Entry fee before commission.
    pub price: Decimal,
    /// Display only.
    pub color: String,
    /// Display only, never touched by the engines.
    pub participants: u32,
    pub gifts: Vec<Gift>,
}

impl Case {
    /// A case with no gifts cannot be opened.
    pub fn is_openable(&self) -> bool {
        !self.gifts.is_empty()
    }

    pub fn gift(&self, gift_id: u64) -> Option<&Gift> {
        self.gifts.iter().find(|g| g.id == gift_id)
    }

    /// Remove a gift by id. Returns the removed gift or None.
    /// Removing an unknown id is a no-op.
    pub fn remove_gift(&mut self, gift_id: u64) -> Option<Gift> {
        let idx = self.gifts.iter().position(|g| g.id == gift_id)?;
        Some(self.gifts.remove(idx))
    }

    /// Sum of all gift values in the case.
    pub fn total_value(&self) -> Decimal {
        self.gifts.iter().map(|g| g.value).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Donor;
    use rust_decimal_macros::dec;

    fn case_with_gifts() -> Case {
        Case {
            id: 1,
            name: "Test".to_string(),
            description: String::new(),
            price: dec!(100),
            color: "#ff6b6b".to_string(),
            participants: 0,
            gifts: vec![
                Gift::new(1, "A", dec!(50), "a", Donor::Anonymous),
                Gift::new(2, "B", dec!(70), "b", Donor::Anonymous),
            ],
        }
    }

    #[test]
    fn test_remove_gift() {
        let mut case = case_with_gifts();
        let removed = case.remove_gift(1);
        assert_eq!(removed.map(|g| g.name), Some("A".to_string()));
        assert_eq!(case.gifts.len(), 1);
        assert!(case.gift(1).is_none());
    }

    #[test]
    fn test_remove_gift_unknown_is_noop() {
        let mut case = case_with_gifts();
        assert!(case.remove_gift(99).is_none());
        assert_eq!(case.gifts.len(), 2);

        case.remove_gift(2);
        assert!(case.remove_gift(2).is_none());
        assert_eq!(case.gifts.len(), 1);
    }

    #[test]
    fn test_openable() {
        let mut case = case_with_gifts();
        assert!(case.is_openable());
        assert_eq!(case.total_value(), dec!(120));
        case.gifts.clear();
        assert!(!case.is_openable());
    }
}
