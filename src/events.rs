use rust_decimal::Decimal;

// Everything the session loop reacts to. User actions come from the front
// end; SpinFinished is posted by the session's own spin task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // Redraw the case list
    ShowCases,

    // Open the detail view of a case (sets the focused case)
    ViewCase { case_id: u64 },

    // Leave the detail view
    CloseCase,

    // Pay the entry fee and start spinning
    OpenCase { case_id: u64 },

    // Spin timer elapsed for this case
    SpinFinished { case_id: u64 },

    // Take the revealed prize
    Claim,

    // Leave the revealed prize unclaimed
    CloseResult,

    // Leave the result and go back to the case it came from
    TryAgain,

    // Donate a gift to a case
    AddGift {
        case_id: u64,
        name: String,
        value: Decimal,
        description: String,
    },

    // Create a new, empty case
    CreateCase {
        name: String,
        price: Decimal,
        description: String,
        color: String,
    },

    // Ask for a top-up (confirmed through the platform)
    Deposit,

    // Show the ledger
    ShowHistory,

    // Wipe everything back to a fresh session
    Reset,

    // End of input or quit command
    Shutdown,
}
