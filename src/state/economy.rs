use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{Case, Donor, Gift, Ledger, UserStats};

/// Balance every fresh session starts with.
pub const STARTING_BALANCE: Decimal = dec!(1000);

/// Root of all economic state. Every mutation goes through here and is
/// followed by a persistence flush.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EconomyState {
    pub balance: Decimal,
    pub cases: Vec<Case>,
    pub ledger: Ledger,
    pub stats: UserStats,
    /// Case currently being viewed. Transient, never persisted.
    pub focused: Option<u64>,
}

impl Default for EconomyState {
    fn default() -> Self {
        Self {
            balance: STARTING_BALANCE,
            cases: default_cases(),
            ledger: Ledger::new(),
            stats: UserStats::default(),
            focused: None,
        }
    }
}

impl EconomyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn case(&self, case_id: u64) -> Option<&Case> {
        self.cases.iter().find(|c| c.id == case_id)
    }

    pub fn case_mut(&mut self, case_id: u64) -> Option<&mut Case> {
        self.cases.iter_mut().find(|c| c.id == case_id)
    }

    pub fn focused_case(&self) -> Option<&Case> {
        self.focused.and_then(|id| self.case(id))
    }

    /// Next free case id.
    pub fn next_case_id(&self) -> u64 {
        self.cases.iter().map(|c| c.id).max().unwrap_or(0) + 1
    }

    /// Next free gift id, unique across every case.
    pub fn next_gift_id(&self) -> u64 {
        self.cases
            .iter()
            .flat_map(|c| c.gifts.iter())
            .map(|g| g.id)
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Back to a fresh session: seeded cases, starting balance, empty history.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn seeded_gift(
    id: u64,
    name: &str,
    value: Decimal,
    description: &str,
    donor: &str,
    donor_id: u64,
) -> Gift {
    Gift::new(
        id,
        name,
        value,
        description,
        Donor::User {
            id: donor_id,
            name: donor.to_string(),
        },
    )
}

/// The three cases a new session starts with.
pub fn default_cases() -> Vec<Case> {
    vec![
        Case {
            id: 1,
            name: "🎮 Gaming case".to_string(),
            description: "Gaming gifts and gear".to_string(),
            price: dec!(100),
            color: "#ff6b6b".to_string(),
            participants: 15,
            gifts: vec![
                seeded_gift(1, "PlayStation 5", dec!(500), "Game console", "Ivan I.", 123),
                seeded_gift(2, "Nintendo Switch", dec!(300), "Handheld console", "Anna S.", 456),
                seeded_gift(3, "Gaming mouse", dec!(50), "Pro gaming mouse", "Petr K.", 789),
            ],
        },
        Case {
            id: 2,
            name: "📱 Tech".to_string(),
            description: "Modern gadgets".to_string(),
            price: dec!(250),
            color: "#4ecdc4".to_string(),
            participants: 8,
            gifts: vec![
                seeded_gift(4, "AirPods Pro", dec!(200), "Wireless earbuds", "Maria L.", 321),
                seeded_gift(
                    5,
                    "Smart watch",
                    dec!(150),
                    "Watch with smart features",
                    "Alexey V.",
                    654,
                ),
            ],
        },
        Case {
            id: 3,
            name: "💎 Premium".to_string(),
            description: "Exclusive expensive gifts".to_string(),
            price: dec!(500),
            color: "#45b7d1".to_string(),
            participants: 5,
            gifts: vec![
                seeded_gift(6, "MacBook Air", dec!(1000), "Apple laptop", "Sergey M.", 987),
                seeded_gift(7, "Camera", dec!(800), "DSLR camera", "Olga P.", 246),
            ],
        },
    ]
}
