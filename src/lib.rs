pub mod directory;
pub mod errors;
pub mod keccak;
pub mod nonce;
pub mod session;
pub mod signature;
pub mod types;
pub mod web_api;

pub use directory::{AdminDirectory, InMemoryDirectory};
pub use errors::{AuthError, ErrorCode};
pub use keccak::keccak256;
pub use nonce::NonceService;
pub use session::SessionGuard;
pub use signature::verify_wallet_signature;
pub use types::*;

#[cfg(test)]
mod tests {
    use crate::signature::{address_from_verifying_key, checksum_address, personal_message_digest};
    use crate::*;
    use k256::ecdsa::SigningKey;
    use std::sync::Arc;

    fn signing_key(seed: u8) -> SigningKey {
        SigningKey::from_slice(&[seed; 32]).expect("valid key bytes")
    }

    fn sign_login_message(sk: &SigningKey, nonce: &str) -> String {
        let digest = personal_message_digest(&login_message(nonce));
        let (sig, recid) = sk.sign_prehash_recoverable(&digest).expect("sign");
        let mut bytes = sig.to_vec();
        bytes.push(recid.to_byte() + 27);
        format!("0x{}", hex::encode(bytes))
    }

    #[test]
    fn wallet_login_happy_path() {
        let sk = signing_key(5);
        let wallet = address_from_verifying_key(sk.verifying_key());
        let address = checksum_address(&wallet);

        let directory = Arc::new(InMemoryDirectory::with_admins([(1, wallet)]));
        let nonces = NonceService::default();
        let guard = SessionGuard::new(directory.clone());

        let nonce = nonces.issue();
        let sig_hex = sign_login_message(&sk, &nonce);

        let recovered =
            verify_wallet_signature(&login_message(&nonce), &address, &sig_hex).unwrap();
        let admin = directory.admin_by_wallet(&recovered).unwrap();
        assert!(admin.authorized);
        assert!(nonces.consume(&nonce, admin.admin_id));

        let sid = guard.login(None, admin.admin_id, "127.0.0.1", "test");
        assert!(guard.check(&sid));
    }

    #[test]
    fn nonce_replay_rejected_after_full_login() {
        let sk = signing_key(6);
        let address = checksum_address(&address_from_verifying_key(sk.verifying_key()));

        let nonces = NonceService::default();
        let nonce = nonces.issue();
        let sig_hex = sign_login_message(&sk, &nonce);

        assert!(verify_wallet_signature(&login_message(&nonce), &address, &sig_hex).is_ok());
        assert!(nonces.consume(&nonce, 1));

        // The replayed signature still recovers, but the nonce is spent.
        assert!(verify_wallet_signature(&login_message(&nonce), &address, &sig_hex).is_ok());
        assert!(!nonces.consume(&nonce, 1));
    }

    #[test]
    fn signature_over_wrong_nonce_rejected() {
        let sk = signing_key(7);
        let address = checksum_address(&address_from_verifying_key(sk.verifying_key()));

        let nonces = NonceService::default();
        let issued = nonces.issue();
        let other = nonces.issue();

        let sig_hex = sign_login_message(&sk, &other);
        let err =
            verify_wallet_signature(&login_message(&issued), &address, &sig_hex).unwrap_err();
        assert!(matches!(err, AuthError::SignatureInvalid));
    }

    #[test]
    fn unknown_wallet_is_not_authorized() {
        let sk = signing_key(8);
        let wallet = address_from_verifying_key(sk.verifying_key());

        let directory = InMemoryDirectory::with_admins([(1, [0xEE; 20])]);
        assert!(directory.admin_by_wallet(&wallet).is_none());
    }
}
