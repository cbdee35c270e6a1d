use serde::Deserialize;

/// Identity of the person using the app, as reported by the host platform.
/// Read-only for the whole session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: u64,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub photo_url: Option<String>,
}

impl User {
    /// "First Last", trimmed. Empty when the platform sent no names.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Initials shown in place of a missing avatar.
    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .take(1)
            .chain(self.last_name.chars().take(1))
            .collect()
    }
}

/// Who donated a gift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Donor {
    /// System-seeded or added without a known user (donorId 0).
    Anonymous,
    User { id: u64, name: String },
}

impl Donor {
    pub const ANONYMOUS_NAME: &'static str = "Anonymous";

    /// Donor for a gift added by `user`. Id 0 is reserved for anonymous.
    pub fn from_user(user: Option<&User>) -> Self {
        match user {
            Some(u) if u.id != 0 => Donor::User {
                id: u.id,
                name: u.display_name(),
            },
            _ => Donor::Anonymous,
        }
    }

    /// Persisted donor id; 0 is anonymous.
    pub fn id(&self) -> u64 {
        match self {
            Donor::Anonymous => 0,
            Donor::User { id, .. } => *id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Donor::Anonymous => Self::ANONYMOUS_NAME,
            Donor::User { name, .. } => name,
        }
    }

    /// True if `user` donated this gift. Anonymous gifts belong to nobody.
    pub fn is(&self, user: Option<&User>) -> bool {
        match (self, user) {
            (Donor::User { id, .. }, Some(u)) => *id == u.id,
            _ => false,
        }
    }
}
