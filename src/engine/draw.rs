use rand::Rng;
use tracing::{debug, info};

use super::accounting::{charge_for_open, credit_for_gift};
use crate::error::EconomyError;
use crate::state::{Case, EconomyState, Gift, User};
use rust_decimal::Decimal;

/// Pick one gift uniformly at random. None for an empty case.
pub fn draw<'a, R: Rng + ?Sized>(case: &'a Case, rng: &mut R) -> Option<&'a Gift> {
    if case.gifts.is_empty() {
        return None;
    }
    let idx = rng.random_range(0..case.gifts.len());
    case.gifts.get(idx)
}

/// Result of a finished spin, before the prize is claimed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub case_id: u64,
    pub prize: Gift,
    /// The current user donated this gift themselves.
    pub own: bool,
}

impl Outcome {
    /// Informational notice about charging the donor. Local only: no other
    /// user's state is touched. None for own gifts.
    pub fn donor_notice(&self) -> Option<String> {
        if self.own {
            return None;
        }
        Some(format!(
            "{} was charged {} for {}",
            self.prize.donor.name(),
            self.prize.value,
            self.prize.name
        ))
    }
}

/// What a claim did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claim {
    /// Someone else's gift: paid out and removed from the case.
    Won(Gift),
    /// The user's own gift: taken back without payout.
    Reclaimed(Gift),
}

impl Claim {
    pub fn gift(&self) -> &Gift {
        match self {
            Claim::Won(g) | Claim::Reclaimed(g) => g,
        }
    }
}

/// Where the session is in the open -> spin -> claim cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DrawPhase {
    #[default]
    Idle,
    /// Entry fee paid, spin running.
    Drawing { case_id: u64 },
    /// Prize revealed, waiting for claim or abandon.
    Resolved(Outcome),
}

/// Single-flight draw state machine: Idle -> Drawing -> Resolved -> Idle.
#[derive(Debug, Default)]
pub struct DrawEngine {
    phase: DrawPhase,
}

impl DrawEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &DrawPhase {
        &self.phase
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, DrawPhase::Idle)
    }

    /// Outcome waiting for a claim, if any.
    pub fn pending(&self) -> Option<&Outcome> {
        match &self.phase {
            DrawPhase::Resolved(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Pay the entry fee and start spinning. Only allowed from Idle.
    /// Returns the total charged.
    pub fn begin(
        &mut self,
        state: &mut EconomyState,
        case_id: u64,
    ) -> Result<Decimal, EconomyError> {
        if !self.is_idle() {
            return Err(EconomyError::DrawInProgress);
        }
        let charged = charge_for_open(state, case_id)?;
        self.phase = DrawPhase::Drawing { case_id };
        info!(case_id, "Draw started");
        Ok(charged)
    }

    /// End the spin and reveal the prize. Inventory is left untouched.
    pub fn finish<R: Rng + ?Sized>(
        &mut self,
        state: &EconomyState,
        user: Option<&User>,
        rng: &mut R,
    ) -> Result<Outcome, EconomyError> {
        let case_id = match self.phase {
            DrawPhase::Drawing { case_id } => case_id,
            _ => return Err(EconomyError::NoPendingPrize),
        };
        self.phase = DrawPhase::Idle;

        let case = state.case(case_id).ok_or(EconomyError::CaseNotFound(case_id))?;
        let prize = draw(case, rng).ok_or(EconomyError::EmptyCase)?.clone();
        let own = prize.donor.is(user);
        debug!(case_id, gift_id = prize.id, own, "Prize drawn");

        let outcome = Outcome { case_id, prize, own };
        self.phase = DrawPhase::Resolved(outcome.clone());
        Ok(outcome)
    }

    /// Settle the revealed prize. One shot: the phase returns to Idle.
    ///
    /// Someone else's gift bumps `won`, pays out its value and leaves the
    /// case. The user's own gift just leaves the case.
    pub fn claim(&mut self, state: &mut EconomyState) -> Result<Claim, EconomyError> {
        let outcome = match std::mem::take(&mut self.phase) {
            DrawPhase::Resolved(outcome) => outcome,
            other => {
                self.phase = other;
                return Err(EconomyError::NoPendingPrize);
            }
        };

        let case = state
            .case_mut(outcome.case_id)
            .ok_or(EconomyError::CaseNotFound(outcome.case_id))?;
        let gift = case
            .remove_gift(outcome.prize.id)
            .ok_or(EconomyError::GiftNotFound)?;

        if outcome.own {
            info!(gift_id = gift.id, "Own gift reclaimed");
            return Ok(Claim::Reclaimed(gift));
        }

        state.stats.won += 1;
        credit_for_gift(state, &gift);
        Ok(Claim::Won(gift))
    }

    /// Leave a revealed result unclaimed. The entry fee stays spent and the
    /// gift stays in its case.
    pub fn abandon(&mut self) -> Option<Outcome> {
        match std::mem::take(&mut self.phase) {
            DrawPhase::Resolved(outcome) => {
                info!(case_id = outcome.case_id, gift_id = outcome.prize.id, "Result abandoned");
                Some(outcome)
            }
            other => {
                self.phase = other;
                None
            }
        }
    }
}
