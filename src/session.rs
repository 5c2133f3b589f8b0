//! Session Guard.
//!
//! Anonymous → Authenticated → Anonymous. Login always mints a fresh
//! identifier (any prior session the caller presents is discarded, which
//! closes fixation), `check` answers the gating question, and logout clears
//! both the live context and the persisted record.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use rand_core::{OsRng, RngCore};

use crate::directory::AdminDirectory;
use crate::types::{now_unix_s, AdminId, AdminSession, SESSION_TTL_SECS};

#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_id: String,
    pub admin_id: AdminId,
    pub created_at_unix_s: u64,
    pub expires_at_unix_s: u64,
}

pub struct SessionGuard {
    sessions: Mutex<BTreeMap<String, SessionContext>>,
    directory: Arc<dyn AdminDirectory>,
    ttl_secs: u64,
}

impl SessionGuard {
    pub fn new(directory: Arc<dyn AdminDirectory>) -> Self {
        Self {
            sessions: Mutex::new(BTreeMap::new()),
            directory,
            ttl_secs: SESSION_TTL_SECS,
        }
    }

    fn random_session_id() -> String {
        let mut buf = [0u8; 32];
        OsRng.fill_bytes(&mut buf);
        hex::encode(buf)
    }

    /// Establishes an authenticated session and returns its identifier.
    /// A prior identifier, if presented, is invalidated first.
    pub fn login(
        &self,
        prior_session_id: Option<&str>,
        admin_id: AdminId,
        ip_address: &str,
        user_agent: &str,
    ) -> String {
        if let Some(prior) = prior_session_id {
            self.logout(prior);
        }

        let now = now_unix_s();
        let context = SessionContext {
            session_id: Self::random_session_id(),
            admin_id,
            created_at_unix_s: now,
            expires_at_unix_s: now.saturating_add(self.ttl_secs),
        };

        self.directory.insert_session(AdminSession {
            session_id: context.session_id.clone(),
            admin_id,
            ip_address: ip_address.to_string(),
            user_agent: user_agent.to_string(),
            created_at_unix_s: context.created_at_unix_s,
            expires_at_unix_s: context.expires_at_unix_s,
        });

        let session_id = context.session_id.clone();
        self.sessions
            .lock()
            .expect("session lock")
            .insert(session_id.clone(), context);
        session_id
    }

    /// True iff the identifier maps to a live, unexpired admin session.
    pub fn check(&self, session_id: &str) -> bool {
        self.context(session_id).is_some()
    }

    pub fn context(&self, session_id: &str) -> Option<SessionContext> {
        let sessions = self.sessions.lock().expect("session lock");
        sessions
            .get(session_id)
            .filter(|ctx| now_unix_s() < ctx.expires_at_unix_s)
            .cloned()
    }

    /// Clears the session context and the persisted record. Returns whether
    /// a context existed.
    pub fn logout(&self, session_id: &str) -> bool {
        let removed = self
            .sessions
            .lock()
            .expect("session lock")
            .remove(session_id)
            .is_some();
        self.directory.delete_session(session_id);
        removed
    }
}
