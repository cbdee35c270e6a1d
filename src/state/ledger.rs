use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Maximum number of entries kept in the ledger.
pub const LEDGER_CAP: usize = 50;

/// What caused a balance change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionKind {
    CaseOpened,
    GiftWon,
    GiftAdded,
    Deposit,
    /// Label written by something else; kept verbatim.
    Other(String),
}

impl TransactionKind {
    pub fn label(&self) -> &str {
        match self {
            Self::CaseOpened => "case opened",
            Self::GiftWon => "gift won",
            Self::GiftAdded => "gift added",
            Self::Deposit => "deposit",
            Self::Other(label) => label,
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label {
            "case opened" => Self::CaseOpened,
            "gift won" => Self::GiftWon,
            "gift added" => Self::GiftAdded,
            "deposit" => Self::Deposit,
            other => Self::Other(other.to_string()),
        }
    }
}

/// One balance-affecting event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Epoch milliseconds of creation, bumped to stay unique.
    pub id: i64,
    pub kind: TransactionKind,
    /// Positive = credit, negative = debit.
    pub amount: Decimal,
    pub description: String,
    pub at: DateTime<Utc>,
}

impl Transaction {
    pub fn is_credit(&self) -> bool {
        self.amount > Decimal::ZERO
    }
}

/// Newest-first transaction history, capped at [`LEDGER_CAP`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    entries: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted entries (already newest-first).
    /// Anything beyond the cap is dropped.
    pub fn from_entries(mut entries: Vec<Transaction>) -> Self {
        entries.truncate(LEDGER_CAP);
        Self { entries }
    }

    /// Record a new entry at index 0 and drop the oldest past the cap.
    pub fn record(
        &mut self,
        kind: TransactionKind,
        amount: Decimal,
        description: impl Into<String>,
        at: DateTime<Utc>,
    ) -> &Transaction {
        // Stored with millisecond precision.
        let at = DateTime::from_timestamp_millis(at.timestamp_millis()).unwrap_or(at);
        let mut id = at.timestamp_millis();
        if let Some(newest) = self.entries.first() {
            if id <= newest.id {
                id = newest.id + 1;
            }
        }
        self.push(Transaction {
            id,
            kind,
            amount,
            description: description.into(),
            at,
        });
        &self.entries[0]
    }

    /// Prepend an entry and enforce the cap.
    pub fn push(&mut self, entry: Transaction) {
        self.entries.insert(0, entry);
        self.entries.truncate(LEDGER_CAP);
    }

    pub fn entries(&self) -> &[Transaction] {
        &self.entries
    }

    pub fn newest(&self) -> Option<&Transaction> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
