use thiserror::Error;

/// Failures while assembling or checking a PromptPay payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// Amount is present but not a non-negative decimal number.
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),

    /// Currency has no numeric code under the active scheme.
    #[error("unsupported currency: {0}")]
    UnsupportedCurrency(String),

    /// A two-digit length prefix cannot describe the value.
    #[error("value for tag {tag} is {len} characters, max is 99")]
    FieldTooLong { tag: String, len: usize },

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("checksum mismatch: expected {expected}, found {found}")]
    ChecksumMismatch { expected: String, found: String },
}

/// Failures from the QR image collaborator.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("payload does not fit a QR symbol: {0}")]
    Encode(#[from] qrcode::types::QrError),

    #[error("failed to encode PNG: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, PayloadError>;
