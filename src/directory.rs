//! Admin Directory contract.
//!
//! The directory is an external collaborator: it resolves wallet addresses
//! to admin records and persists session rows. The core only needs this
//! lookup/insert/delete surface; the in-memory implementation backs tests
//! and the demo binary.

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::types::{AdminId, AdminSession, AdminWallet, WalletAddress};

pub trait AdminDirectory: Send + Sync {
    fn admin_by_wallet(&self, address: &WalletAddress) -> Option<AdminWallet>;
    fn insert_session(&self, session: AdminSession);
    fn delete_session(&self, session_id: &str);
}

#[derive(Default)]
pub struct InMemoryDirectory {
    pub admins: Mutex<BTreeMap<WalletAddress, AdminWallet>>,
    pub sessions: Mutex<BTreeMap<String, AdminSession>>,
}

impl InMemoryDirectory {
    pub fn with_admins(entries: impl IntoIterator<Item = (AdminId, WalletAddress)>) -> Self {
        let directory = Self::default();
        {
            let mut admins = directory.admins.lock().expect("admin lock");
            for (admin_id, wallet_address) in entries {
                admins.insert(
                    wallet_address,
                    AdminWallet {
                        admin_id,
                        wallet_address,
                        authorized: true,
                    },
                );
            }
        }
        directory
    }
}

impl AdminDirectory for InMemoryDirectory {
    fn admin_by_wallet(&self, address: &WalletAddress) -> Option<AdminWallet> {
        self.admins.lock().expect("admin lock").get(address).cloned()
    }

    fn insert_session(&self, session: AdminSession) {
        self.sessions
            .lock()
            .expect("session lock")
            .insert(session.session_id.clone(), session);
    }

    fn delete_session(&self, session_id: &str) {
        self.sessions.lock().expect("session lock").remove(session_id);
    }
}
