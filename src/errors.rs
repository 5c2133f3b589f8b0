use thiserror::Error;

#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ErrMalformedPayload = 2001,
    ErrMissingField = 2002,
    ErrSignatureInvalid = 2003,
    ErrAddressNotAuthorized = 2004,
    ErrNonceInvalidOrExpired = 2005,
    ErrSessionInvalid = 2006,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("malformed payload")]
    MalformedPayload,
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("signature invalid")]
    SignatureInvalid,
    #[error("address not authorized")]
    AddressNotAuthorized,
    #[error("nonce invalid or expired")]
    NonceInvalidOrExpired,
    #[error("session invalid")]
    SessionInvalid,
}

impl AuthError {
    pub fn code(&self) -> u16 {
        match self {
            AuthError::MalformedPayload => ErrorCode::ErrMalformedPayload as u16,
            AuthError::MissingField(_) => ErrorCode::ErrMissingField as u16,
            AuthError::SignatureInvalid => ErrorCode::ErrSignatureInvalid as u16,
            AuthError::AddressNotAuthorized => ErrorCode::ErrAddressNotAuthorized as u16,
            AuthError::NonceInvalidOrExpired => ErrorCode::ErrNonceInvalidOrExpired as u16,
            AuthError::SessionInvalid => ErrorCode::ErrSessionInvalid as u16,
        }
    }

    /// Stable string identifier used in the HTTP error envelope.
    pub fn code_str(&self) -> &'static str {
        match self {
            AuthError::MalformedPayload => "BAD_PAYLOAD",
            AuthError::MissingField(_) => "MISSING_FIELD",
            AuthError::SignatureInvalid => "SIGNATURE_INVALID",
            AuthError::AddressNotAuthorized => "ADDRESS_NOT_AUTHORIZED",
            AuthError::NonceInvalidOrExpired => "NONCE_INVALID",
            AuthError::SessionInvalid => "SESSION_INVALID",
        }
    }
}
