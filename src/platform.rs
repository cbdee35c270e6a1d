//! Seams to the host platform and the presentation layer. The engines never
//! call these; the session does, after each state change.

use std::future::Future;

use crate::engine::Outcome;
use crate::state::{Case, EconomyState, Ledger, User};

/// One button in a confirmation dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogOption {
    pub id: String,
    pub text: String,
}

impl DialogOption {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Capabilities the host platform provides.
pub trait Platform {
    /// Ask the user to pick one of `options`. Resolves to the chosen option
    /// id, or None if the dialog was dismissed.
    fn confirm(
        &self,
        title: &str,
        message: &str,
        options: &[DialogOption],
    ) -> impl Future<Output = Option<String>> + Send;

    /// Identity of the current user, if the platform knows it.
    fn current_user(&self) -> Option<User>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Warning,
    Info,
}

/// Short message surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Views the session keeps up to date.
pub trait Renderer {
    /// Case list plus balance and stats.
    fn render_cases(&mut self, state: &EconomyState);

    /// Detail view of one case.
    fn render_gifts(&mut self, case: &Case);

    fn render_transactions(&mut self, ledger: &Ledger);

    /// Spin finished, prize revealed.
    fn render_prize(&mut self, outcome: &Outcome);

    fn notify(&mut self, notice: &Notice);
}
