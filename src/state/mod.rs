mod case;
mod economy;
mod gift;
mod ledger;
mod stats;
mod user;

pub use case::Case;
pub use economy::{default_cases, EconomyState, STARTING_BALANCE};
pub use gift::Gift;
pub use ledger::{Ledger, Transaction, TransactionKind, LEDGER_CAP};
pub use stats::UserStats;
pub use user::{Donor, User};
