//! EVM wallet signature verification.
//!
//! Recovers the signer of a personal-message signature and derives their
//! address. Stateless: every call stands alone and is safe to run on any
//! worker thread.

use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};

use crate::errors::AuthError;
use crate::keccak::{keccak256, Keccak};
use crate::types::{Digest256, WalletAddress};

const PERSONAL_MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// Digest a wallet actually signs: the fixed ASCII prefix, the decimal byte
/// length of the message, then the message itself, through Keccak-256.
pub fn personal_message_digest(message: &str) -> Digest256 {
    let mut hasher = Keccak::v256();
    hasher.update(PERSONAL_MESSAGE_PREFIX.as_bytes());
    hasher.update(message.len().to_string().as_bytes());
    hasher.update(message.as_bytes());
    let out = hasher.finalize();
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&out);
    digest
}

/// Parsed 65-byte signature: `r ‖ s ‖ v`.
#[derive(Debug, Clone)]
pub struct WalletSignature {
    pub r: [u8; 32],
    pub s: [u8; 32],
    pub recovery_id: u8,
}

impl WalletSignature {
    pub fn parse(bytes: &[u8]) -> Result<Self, AuthError> {
        if bytes.len() != 65 {
            return Err(AuthError::SignatureInvalid);
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);

        // Wallets emit v as 27/28; raw recovery ids 0/1 are also accepted.
        let recovery_id = match bytes[64] {
            0 | 27 => 0,
            1 | 28 => 1,
            _ => return Err(AuthError::SignatureInvalid),
        };

        Ok(Self { r, s, recovery_id })
    }

    pub fn parse_hex(text: &str) -> Result<Self, AuthError> {
        let stripped = text.strip_prefix("0x").unwrap_or(text);
        let bytes = hex::decode(stripped).map_err(|_| AuthError::SignatureInvalid)?;
        Self::parse(&bytes)
    }
}

/// Strict address parse: `0x` + 40 hex digits, any case. Comparing parsed
/// bytes makes case irrelevant and leaves malformed strings nothing to
/// compare equal to.
pub fn parse_address(text: &str) -> Result<WalletAddress, AuthError> {
    let stripped = text
        .strip_prefix("0x")
        .ok_or(AuthError::SignatureInvalid)?;
    if stripped.len() != 40 {
        return Err(AuthError::SignatureInvalid);
    }
    let bytes = hex::decode(stripped).map_err(|_| AuthError::SignatureInvalid)?;
    let mut address = [0u8; 20];
    address.copy_from_slice(&bytes);
    Ok(address)
}

/// EIP-55 mixed-case rendering, used for display and allow-list seeding.
pub fn checksum_address(address: &WalletAddress) -> String {
    let lower = hex::encode(address);
    let digest = keccak256(lower.as_bytes());

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, ch) in lower.chars().enumerate() {
        let nibble = (digest[i / 2] >> (4 * (1 - i % 2))) & 0x0f;
        if ch.is_ascii_alphabetic() && nibble >= 8 {
            out.push(ch.to_ascii_uppercase());
        } else {
            out.push(ch);
        }
    }
    out
}

pub fn address_from_verifying_key(key: &VerifyingKey) -> WalletAddress {
    let point = key.to_encoded_point(false);
    // Keccak over the 64-byte public key, 0x04 prefix stripped; the address
    // is the low 20 bytes of the digest.
    let digest = keccak256(&point.as_bytes()[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&digest[12..]);
    address
}

/// Recovers the signer address from a prehashed digest. Out-of-range
/// scalars and failed recovery collapse into one error.
pub fn recover_address(
    digest: &Digest256,
    signature: &WalletSignature,
) -> Result<WalletAddress, AuthError> {
    let mut sig_bytes = [0u8; 64];
    sig_bytes[..32].copy_from_slice(&signature.r);
    sig_bytes[32..].copy_from_slice(&signature.s);

    let sig = Signature::from_slice(&sig_bytes).map_err(|_| AuthError::SignatureInvalid)?;
    let recovery_id =
        RecoveryId::try_from(signature.recovery_id).map_err(|_| AuthError::SignatureInvalid)?;

    let key = VerifyingKey::recover_from_prehash(digest, &sig, recovery_id)
        .map_err(|_| AuthError::SignatureInvalid)?;

    Ok(address_from_verifying_key(&key))
}

/// Full verification pipeline: build the personal-message digest, recover
/// the signer, compare against the claimed address. Returns the recovered
/// address so callers can log or persist it.
pub fn verify_wallet_signature(
    message: &str,
    claimed_address: &str,
    signature_hex: &str,
) -> Result<WalletAddress, AuthError> {
    let claimed = parse_address(claimed_address)?;
    let signature = WalletSignature::parse_hex(signature_hex)?;
    let digest = personal_message_digest(message);
    let recovered = recover_address(&digest, &signature)?;

    if recovered != claimed {
        return Err(AuthError::SignatureInvalid);
    }
    Ok(recovered)
}
