use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use tracing::info;

use crate::error::EconomyError;
use crate::state::{EconomyState, Gift, Transaction, TransactionKind};

/// Fee added on top of every spend (opening or donating).
pub const COMMISSION_RATE: Decimal = dec!(0.05);

/// Smallest value a donated gift may have.
pub const MIN_GIFT_VALUE: Decimal = dec!(10);

/// Decimal places kept on every amount that enters the economy.
pub const MONEY_DP: u32 = 2;

/// Round an amount to the money scale, halves away from zero.
///
/// Amounts are persisted as JSON numbers, so anything finer than this would
/// not survive a save/load cycle.
pub fn normalize_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Commission on a spend, rounded to whole units, halves away from zero.
///
/// 100 -> 5, 250 -> 13 (12.5 rounds up).
pub fn compute_commission(amount: Decimal) -> Decimal {
    (amount * COMMISSION_RATE).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Amount plus its commission.
pub fn total_with_commission(amount: Decimal) -> Decimal {
    amount + compute_commission(amount)
}

/// Record a ledger entry stamped with the current time.
pub fn append_transaction(
    state: &mut EconomyState,
    kind: TransactionKind,
    amount: Decimal,
    description: impl Into<String>,
) -> &Transaction {
    state.ledger.record(kind, amount, description, Utc::now())
}

fn ensure_funds(state: &EconomyState, required: Decimal) -> Result<(), EconomyError> {
    if state.balance < required {
        return Err(EconomyError::InsufficientFunds {
            required,
            available: state.balance,
        });
    }
    Ok(())
}

/// Charge the entry fee for opening a case.
///
/// Debits price + commission, records a `case opened` entry and bumps
/// `opened`. Returns the total charged. Nothing changes on failure.
pub fn charge_for_open(state: &mut EconomyState, case_id: u64) -> Result<Decimal, EconomyError> {
    let case = state
        .case(case_id)
        .ok_or(EconomyError::CaseNotFound(case_id))?;
    let total = total_with_commission(case.price);
    ensure_funds(state, total)?;
    if !case.is_openable() {
        return Err(EconomyError::EmptyCase);
    }
    let description = format!("Case: {}", case.name);

    state.balance -= total;
    append_transaction(state, TransactionKind::CaseOpened, -total, description);
    state.stats.opened += 1;

    info!(case_id, %total, balance = %state.balance, "Charged for case opening");
    Ok(total)
}

/// Pay out a won gift. Credits always succeed.
pub fn credit_for_gift(state: &mut EconomyState, gift: &Gift) {
    state.balance += gift.value;
    append_transaction(state, TransactionKind::GiftWon, gift.value, gift.name.clone());
    info!(gift_id = gift.id, value = %gift.value, balance = %state.balance, "Credited gift");
}

/// Top up the balance. Callers confirm with the user first.
pub fn deposit(state: &mut EconomyState, amount: Decimal) {
    let amount = normalize_amount(amount);
    state.balance += amount;
    append_transaction(state, TransactionKind::Deposit, amount, "Deposit");
    info!(%amount, balance = %state.balance, "Deposit credited");
}

/// A validated, affordable gift donation that has not been applied yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GiftQuote {
    pub name: String,
    pub description: String,
    pub value: Decimal,
    pub commission: Decimal,
}

impl GiftQuote {
    pub fn total(&self) -> Decimal {
        self.value + self.commission
    }
}

/// Validate a donation without touching the state.
///
/// Checked in order: name, value, description, funds. The first failure wins.
pub fn quote_gift_addition(
    state: &EconomyState,
    name: &str,
    value: Decimal,
    description: &str,
) -> Result<GiftQuote, EconomyError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(EconomyError::InvalidName);
    }
    let value = normalize_amount(value);
    if value < MIN_GIFT_VALUE {
        return Err(EconomyError::ValueTooLow {
            min: MIN_GIFT_VALUE,
        });
    }
    let description = description.trim();
    if description.is_empty() {
        return Err(EconomyError::InvalidDescription);
    }
    let quote = GiftQuote {
        name: name.to_string(),
        description: description.to_string(),
        value,
        commission: compute_commission(value),
    };
    ensure_funds(state, quote.total())?;
    Ok(quote)
}

/// Apply a quote: debit value + commission, record `gift added`, bump `added`.
pub(crate) fn apply_gift_quote(state: &mut EconomyState, quote: &GiftQuote) {
    let total = quote.total();
    state.balance -= total;
    append_transaction(state, TransactionKind::GiftAdded, -total, quote.name.clone());
    state.stats.added += 1;
}

/// Validate and charge for donating a gift. Returns the total charged.
pub fn charge_for_gift_addition(
    state: &mut EconomyState,
    name: &str,
    value: Decimal,
    description: &str,
) -> Result<Decimal, EconomyError> {
    let quote = quote_gift_addition(state, name, value, description)?;
    apply_gift_quote(state, &quote);
    Ok(quote.total())
}
