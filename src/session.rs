use rand::rngs::StdRng;
use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::engine::{self, Claim, DrawEngine, DrawPhase};
use crate::error::EconomyError;
use crate::events::Event;
use crate::platform::{DialogOption, Notice, Platform, Renderer};
use crate::state::EconomyState;
use crate::storage::{Persistence, Storage};

/// Whether the loop keeps going after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Owns the economy for one session and turns events into engine calls.
///
/// Every successful mutation is saved, then the affected view is rendered.
pub struct Session<S, P, R> {
    state: EconomyState,
    draw: DrawEngine,
    persistence: Persistence<S>,
    platform: P,
    renderer: R,
    rng: StdRng,
    config: SessionConfig,
    /// Loops back into our own event channel for the spin timer.
    events: mpsc::Sender<Event>,
}

impl<S, P, R> Session<S, P, R>
where
    S: Storage,
    P: Platform,
    R: Renderer,
{
    /// Rehydrate from storage (or start fresh) and draw the case list.
    pub fn start(
        persistence: Persistence<S>,
        platform: P,
        renderer: R,
        config: SessionConfig,
        events: mpsc::Sender<Event>,
        rng: StdRng,
    ) -> Self {
        let state = match persistence.load() {
            Ok(Some(state)) => {
                info!(balance = %state.balance, cases = state.cases.len(), "Loaded saved state");
                state
            }
            Ok(None) => {
                info!("No saved state, starting fresh");
                EconomyState::new()
            }
            Err(e) => {
                warn!(error = %e, "Storage unavailable, starting fresh in memory");
                EconomyState::new()
            }
        };

        let mut session = Self {
            state,
            draw: DrawEngine::new(),
            persistence,
            platform,
            renderer,
            rng,
            config,
            events,
        };
        session.renderer.render_cases(&session.state);
        session
    }

    pub fn state(&self) -> &EconomyState {
        &self.state
    }

    pub fn phase(&self) -> &DrawPhase {
        self.draw.phase()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    /// Process events until Shutdown or until every sender is gone.
    pub async fn run(mut self, mut rx: mpsc::Receiver<Event>) -> EconomyState {
        while let Some(event) = rx.recv().await {
            if self.handle(event).await == Flow::Stop {
                break;
            }
        }
        info!("Session ended");
        self.state
    }

    pub async fn handle(&mut self, event: Event) -> Flow {
        debug!(?event, "Handling event");
        match event {
            Event::ShowCases => self.renderer.render_cases(&self.state),
            Event::ViewCase { case_id } => self.view_case(case_id),
            Event::CloseCase => {
                self.state.focused = None;
                self.renderer.render_cases(&self.state);
            }
            Event::OpenCase { case_id } => self.open_case(case_id),
            Event::SpinFinished { case_id } => self.finish_spin(case_id),
            Event::Claim => self.claim(),
            Event::CloseResult => {
                self.draw.abandon();
                self.renderer.render_cases(&self.state);
            }
            Event::TryAgain => {
                let case_id = self.draw.abandon().map(|o| o.case_id).or(self.state.focused);
                match case_id {
                    Some(id) => self.view_case(id),
                    None => self.renderer.render_cases(&self.state),
                }
            }
            Event::AddGift {
                case_id,
                name,
                value,
                description,
            } => self.add_gift(case_id, &name, value, &description),
            Event::CreateCase {
                name,
                price,
                description,
                color,
            } => self.create_case(&name, price, &description, &color),
            Event::Deposit => self.deposit().await,
            Event::ShowHistory => self.renderer.render_transactions(&self.state.ledger),
            Event::Reset => self.reset(),
            Event::Shutdown => return Flow::Stop,
        }
        Flow::Continue
    }

    fn view_case(&mut self, case_id: u64) {
        if self.state.case(case_id).is_none() {
            return self.fail(EconomyError::CaseNotFound(case_id));
        }
        self.state.focused = Some(case_id);
        if let Some(case) = self.state.case(case_id) {
            self.renderer.render_gifts(case);
        }
    }

    fn open_case(&mut self, case_id: u64) {
        // Opening again from a revealed result walks away from it.
        self.draw.abandon();

        match self.draw.begin(&mut self.state, case_id) {
            Ok(charged) => {
                self.persist();
                self.renderer
                    .notify(&Notice::info(format!("Paid {}, spinning...", charged)));
                self.schedule_spin(case_id);
            }
            Err(e) => self.fail(e),
        }
    }

    /// The spin always runs to completion; there is no cancellation.
    fn schedule_spin(&self, case_id: u64) {
        let tx = self.events.clone();
        let delay = self.config.spin_duration();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(Event::SpinFinished { case_id }).await.is_err() {
                debug!(case_id, "Session closed before the spin finished");
            }
        });
    }

    fn finish_spin(&mut self, case_id: u64) {
        if self.draw.phase() != &(DrawPhase::Drawing { case_id }) {
            warn!(case_id, phase = ?self.draw.phase(), "Stray spin completion");
            return;
        }
        let user = self.platform.current_user();
        match self.draw.finish(&self.state, user.as_ref(), &mut self.rng) {
            Ok(outcome) => {
                self.renderer.render_prize(&outcome);
                if let Some(notice) = outcome.donor_notice() {
                    self.renderer.notify(&Notice::info(notice));
                }
            }
            Err(e) => {
                warn!(case_id, error = %e, "Spin could not be resolved");
                self.fail(e);
            }
        }
    }

    fn claim(&mut self) {
        match self.draw.claim(&mut self.state) {
            Ok(claim) => {
                self.persist();
                let notice = match &claim {
                    Claim::Won(gift) => {
                        Notice::success(format!("Congratulations! You won {}", gift.name))
                    }
                    Claim::Reclaimed(gift) => Notice::info(format!("You took {} back", gift.name)),
                };
                self.renderer.notify(&notice);
                self.renderer.render_cases(&self.state);
            }
            Err(e) => self.fail(e),
        }
    }

    fn add_gift(&mut self, case_id: u64, name: &str, value: Decimal, description: &str) {
        let user = self.platform.current_user();
        let added = engine::add_gift_to_case(
            &mut self.state,
            case_id,
            name,
            value,
            description,
            user.as_ref(),
        );
        match added {
            Ok(_) => {
                self.persist();
                self.renderer.notify(&Notice::success("Gift added"));
                self.view_case(case_id);
            }
            Err(e) => self.fail(e),
        }
    }

    fn create_case(&mut self, name: &str, price: Decimal, description: &str, color: &str) {
        match engine::create_case(&mut self.state, name, price, description, color) {
            Ok(_) => {
                self.persist();
                self.renderer.notify(&Notice::success("Case created"));
                self.renderer.render_cases(&self.state);
            }
            Err(e) => self.fail(e),
        }
    }

    async fn deposit(&mut self) {
        let amount = self.config.deposit_amount;
        let options = [
            DialogOption::new("cancel", "Cancel"),
            DialogOption::new("ok", "Deposit"),
        ];
        let answer = self
            .platform
            .confirm(
                "Deposit",
                &format!("Add {} to your balance?", amount),
                &options,
            )
            .await;

        if answer.as_deref() != Some("ok") {
            debug!(?answer, "Deposit declined");
            return;
        }
        engine::deposit(&mut self.state, amount);
        self.persist();
        self.renderer.notify(&Notice::success("Balance topped up"));
        self.renderer.render_cases(&self.state);
    }

    fn reset(&mut self) {
        if matches!(self.draw.phase(), DrawPhase::Drawing { .. }) {
            self.fail(EconomyError::DrawInProgress);
            return;
        }
        self.draw.abandon();
        self.state.reset();
        info!("State reset");
        self.persist();
        self.renderer.render_cases(&self.state);
    }

    /// Save, or warn and carry on in memory.
    fn persist(&mut self) {
        if let Err(e) = self.persistence.save(&self.state) {
            warn!(error = %e, "Failed to save state");
            self.renderer
                .notify(&Notice::warning("Could not save; changes are kept in memory only"));
        }
    }

    fn fail(&mut self, error: EconomyError) {
        debug!(%error, "Rejected");
        self.renderer.notify(&Notice::error(error.to_string()));
    }
}
