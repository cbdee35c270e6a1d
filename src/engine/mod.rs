mod accounting;
mod draw;
mod inventory;

pub use accounting::{
    append_transaction, charge_for_gift_addition, charge_for_open, compute_commission,
    credit_for_gift, deposit, normalize_amount, quote_gift_addition, total_with_commission,
    GiftQuote, COMMISSION_RATE, MIN_GIFT_VALUE, MONEY_DP,
};
pub use draw::{draw, Claim, DrawEngine, DrawPhase, Outcome};
pub use inventory::{
    add_gift_to_case, create_case, remove_gift, DEFAULT_CASE_COLOR, DEFAULT_CASE_DESCRIPTION,
    MIN_CASE_PRICE,
};
