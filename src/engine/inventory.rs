use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;

use super::accounting::{apply_gift_quote, quote_gift_addition};
use crate::error::EconomyError;
use crate::state::{Case, Donor, EconomyState, Gift, User};

/// Cheapest case that can be created.
pub const MIN_CASE_PRICE: Decimal = dec!(10);

/// Used when a case is created without a description.
pub const DEFAULT_CASE_DESCRIPTION: &str = "A new case with gifts";

/// Used when a case is created without a color.
pub const DEFAULT_CASE_COLOR: &str = "#ff6b6b";

/// Create an empty case. Free of charge. Returns the new case id.
///
/// Prices are whole units; any fraction is dropped before validation.
pub fn create_case(
    state: &mut EconomyState,
    name: &str,
    price: Decimal,
    description: &str,
    color: &str,
) -> Result<u64, EconomyError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(EconomyError::InvalidName);
    }
    let price = price.trunc();
    if price < MIN_CASE_PRICE {
        return Err(EconomyError::PriceTooLow {
            min: MIN_CASE_PRICE,
        });
    }

    let description = match description.trim() {
        "" => DEFAULT_CASE_DESCRIPTION,
        d => d,
    };
    let color = match color.trim() {
        "" => DEFAULT_CASE_COLOR,
        c => c,
    };

    let id = state.next_case_id();
    state.cases.push(Case {
        id,
        name: name.to_string(),
        description: description.to_string(),
        price,
        color: color.to_string(),
        participants: 0,
        gifts: Vec::new(),
    });

    info!(case_id = id, %price, "Case created");
    Ok(id)
}

/// Donate a gift to a case, paying its value plus commission.
///
/// Validation and the funds check run before anything is touched, so the
/// gift, the debit, the ledger entry and the `added` counter land together
/// or not at all. Returns the new gift id.
pub fn add_gift_to_case(
    state: &mut EconomyState,
    case_id: u64,
    name: &str,
    value: Decimal,
    description: &str,
    user: Option<&User>,
) -> Result<u64, EconomyError> {
    let quote = quote_gift_addition(state, name, value, description)?;
    if state.case(case_id).is_none() {
        return Err(EconomyError::CaseNotFound(case_id));
    }

    let gift = Gift::new(
        state.next_gift_id(),
        quote.name.clone(),
        quote.value,
        quote.description.clone(),
        Donor::from_user(user),
    );
    let gift_id = gift.id;

    apply_gift_quote(state, &quote);
    if let Some(case) = state.case_mut(case_id) {
        case.gifts.push(gift);
    }

    info!(case_id, gift_id, total = %quote.total(), "Gift added");
    Ok(gift_id)
}

/// Take a gift out of a case. `GiftNotFound` means nothing changed.
pub fn remove_gift(
    state: &mut EconomyState,
    case_id: u64,
    gift_id: u64,
) -> Result<Gift, EconomyError> {
    let case = state
        .case_mut(case_id)
        .ok_or(EconomyError::CaseNotFound(case_id))?;
    case.remove_gift(gift_id).ok_or(EconomyError::GiftNotFound)
}
