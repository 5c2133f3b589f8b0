use serde::{Deserialize, Serialize};

/// Fixed template the wallet signs. Byte-exact on both sides: any deviation,
/// including whitespace, fails verification rather than being normalized.
pub const LOGIN_MESSAGE_PREFIX: &str = "AIRewardrop Admin Login\nNonce: ";

pub const NONCE_TTL_SECS: u64 = 300;
pub const SESSION_TTL_SECS: u64 = 86_400;
pub const SESSION_COOKIE: &str = "admin_session";

pub type AdminId = u64;
pub type WalletAddress = [u8; 20];
pub type Digest256 = [u8; 32];

/// The exact message a wallet must sign for the given nonce value.
pub fn login_message(nonce: &str) -> String {
    format!("{}{}", LOGIN_MESSAGE_PREFIX, nonce)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminWallet {
    pub admin_id: AdminId,
    pub wallet_address: WalletAddress,
    pub authorized: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSession {
    pub session_id: String,
    pub admin_id: AdminId,
    pub ip_address: String,
    pub user_agent: String,
    pub created_at_unix_s: u64,
    pub expires_at_unix_s: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NonceEntry {
    pub value: String,
    pub issued_at_unix_s: u64,
    pub expires_at_unix_s: u64,
    pub consumed: bool,
    pub bound_admin_id: Option<AdminId>,
}

pub fn now_unix_s() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
