//! Per-session state, passed explicitly into every request.

use crate::{advisor::Conversation, auth::AuthSession, inventory::Inventory};

#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    session: Option<AuthSession>,
    pub conversation: Conversation,
    pub inventory: Inventory,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&AuthSession> {
        self.session.as_ref()
    }

    pub fn user_email(&self) -> Option<&str> {
        self.session.as_ref().and_then(|s| s.user.email.as_deref())
    }

    pub fn set_session(&mut self, session: AuthSession) {
        log::info!("signed in as {}", session.user.email.as_deref().unwrap_or(&session.user.id));
        self.session = Some(session);
    }

    /// Drop the signed-in session. Chat and inventory edits survive.
    pub fn clear_session(&mut self) {
        if self.session.take().is_some() {
            log::info!("signed out");
        }
    }
}
