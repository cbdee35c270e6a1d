//! On-disk JSON layout. Field names follow the camelCase schema the web
//! client wrote, so old blobs stay readable.
//!
//! Amounts are JSON numbers (f64). They are rounded back to the money scale
//! on load, which is lossless because everything stored is already at it.

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::engine::normalize_amount;
use crate::state::{
    default_cases, Case, Donor, EconomyState, Gift, Ledger, Transaction, TransactionKind,
    UserStats, STARTING_BALANCE,
};

/// Whole persisted record. Every field is optional so a blob missing a
/// section still loads, with that section defaulted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedState {
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub balance: Option<Decimal>,
    #[serde(default)]
    pub cases: Option<Vec<CaseRecord>>,
    #[serde(default)]
    pub transactions: Option<Vec<TransactionRecord>>,
    #[serde(default)]
    pub user_stats: Option<UserStats>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseRecord {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub participants: u32,
    #[serde(default)]
    pub gifts: Vec<GiftRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftRecord {
    pub id: u64,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub donor: String,
    /// 0 = anonymous
    #[serde(default)]
    pub donor_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(default)]
    pub description: String,
    /// ISO-8601
    #[serde(default)]
    pub date: Option<String>,
    /// Epoch milliseconds
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl SavedState {
    /// Snapshot of `state` stamped with `now`. The focused case is left out.
    pub fn capture(state: &EconomyState, now: DateTime<Utc>) -> Self {
        Self {
            balance: Some(state.balance),
            cases: Some(state.cases.iter().map(CaseRecord::from).collect()),
            transactions: Some(
                state
                    .ledger
                    .entries()
                    .iter()
                    .map(TransactionRecord::from)
                    .collect(),
            ),
            user_stats: Some(state.stats),
            last_updated: Some(iso8601(now)),
        }
    }

    /// Rebuild the economy, defaulting any missing section.
    pub fn into_state(self) -> EconomyState {
        let cases = match self.cases {
            Some(records) => records.into_iter().map(Case::from).collect(),
            None => default_cases(),
        };
        let entries = self
            .transactions
            .unwrap_or_default()
            .into_iter()
            .map(Transaction::from)
            .collect();
        EconomyState {
            balance: self.balance.map_or(STARTING_BALANCE, normalize_amount),
            cases,
            ledger: Ledger::from_entries(entries),
            stats: self.user_stats.unwrap_or_default(),
            focused: None,
        }
    }
}

fn iso8601(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl From<&Case> for CaseRecord {
    fn from(case: &Case) -> Self {
        Self {
            id: case.id,
            name: case.name.clone(),
            description: case.description.clone(),
            price: case.price,
            color: case.color.clone(),
            participants: case.participants,
            gifts: case.gifts.iter().map(GiftRecord::from).collect(),
        }
    }
}

impl From<CaseRecord> for Case {
    fn from(record: CaseRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            description: record.description,
            price: normalize_amount(record.price),
            color: record.color,
            participants: record.participants,
            gifts: record.gifts.into_iter().map(Gift::from).collect(),
        }
    }
}

impl From<&Gift> for GiftRecord {
    fn from(gift: &Gift) -> Self {
        Self {
            id: gift.id,
            name: gift.name.clone(),
            value: gift.value,
            description: gift.description.clone(),
            donor: gift.donor.name().to_string(),
            donor_id: gift.donor.id(),
        }
    }
}

impl From<GiftRecord> for Gift {
    fn from(record: GiftRecord) -> Self {
        let donor = match record.donor_id {
            0 => Donor::Anonymous,
            id => Donor::User {
                id,
                name: record.donor,
            },
        };
        let value = normalize_amount(record.value);
        Gift::new(record.id, record.name, value, record.description, donor)
    }
}

impl From<&Transaction> for TransactionRecord {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id,
            kind: tx.kind.label().to_string(),
            amount: tx.amount,
            description: tx.description.clone(),
            date: Some(iso8601(tx.at)),
            timestamp: Some(tx.at.timestamp_millis()),
        }
    }
}

impl From<TransactionRecord> for Transaction {
    fn from(record: TransactionRecord) -> Self {
        // timestamp, then date, then the time-derived id
        let at = record
            .timestamp
            .and_then(DateTime::from_timestamp_millis)
            .or_else(|| {
                record
                    .date
                    .as_deref()
                    .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
                    .map(|d| d.with_timezone(&Utc))
            })
            .or_else(|| DateTime::from_timestamp_millis(record.id))
            .unwrap_or_default();
        Self {
            id: record.id,
            kind: TransactionKind::from_label(&record.kind),
            amount: normalize_amount(record.amount),
            description: record.description,
            at,
        }
    }
}
