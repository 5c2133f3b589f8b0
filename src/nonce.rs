//! Single-use login challenges.
//!
//! Issues 256-bit random nonces with a bounded lifetime and consumes them
//! atomically. Expiry is evaluated at consumption time; there is no
//! background sweep, and stale-row cleanup is an operational concern of the
//! backing store.

use std::collections::BTreeMap;
use std::sync::Mutex;

use rand_core::{OsRng, RngCore};

use crate::types::{now_unix_s, AdminId, NonceEntry, NONCE_TTL_SECS};

pub struct NonceService {
    pub entries: Mutex<BTreeMap<String, NonceEntry>>,
    ttl_secs: u64,
}

impl Default for NonceService {
    fn default() -> Self {
        Self::new(NONCE_TTL_SECS)
    }
}

impl NonceService {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
            ttl_secs,
        }
    }

    /// Issues a fresh nonce and returns its hex value. The nonce is not
    /// bound to any admin until a verification succeeds.
    pub fn issue(&self) -> String {
        self.issue_with_ttl(self.ttl_secs)
    }

    pub fn issue_with_ttl(&self, ttl_secs: u64) -> String {
        let mut buf = [0u8; 32];
        OsRng.fill_bytes(&mut buf);
        let value = hex::encode(buf);

        let now = now_unix_s();
        let entry = NonceEntry {
            value: value.clone(),
            issued_at_unix_s: now,
            expires_at_unix_s: now.saturating_add(ttl_secs),
            consumed: false,
            bound_admin_id: None,
        };

        let mut map = self.entries.lock().expect("nonce lock");
        map.insert(value.clone(), entry);
        value
    }

    /// Atomically consumes a nonce for the given admin. Existence,
    /// non-expiry and the consumed flag are checked and the flag flipped
    /// under one lock acquisition, so two racing calls cannot both win.
    /// Unknown, expired and replayed nonces all report the same `false`.
    pub fn consume(&self, value: &str, admin_id: AdminId) -> bool {
        let mut map = self.entries.lock().expect("nonce lock");
        let Some(entry) = map.get_mut(value) else {
            return false;
        };
        if entry.consumed || now_unix_s() >= entry.expires_at_unix_s {
            return false;
        }
        entry.consumed = true;
        entry.bound_admin_id = Some(admin_id);
        true
    }
}
