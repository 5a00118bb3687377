//! PromptPay payload generation for Thailand's interbank QR payment scheme.
//!
//! ```
//! use promptpay::{generate_payload, PaymentRequest};
//!
//! let payload = generate_payload(&PaymentRequest::new("0812345678").amount("50")).unwrap();
//! assert!(payload.as_str().starts_with("000201010212"));
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod payload;
pub mod render;
pub mod server;
pub mod types;

pub use config::{Config, CurrencyPolicy, SchemeConfig};
pub use error::{PayloadError, RenderError};
pub use payload::{generate_payload, verify, AccountIdentifier, Payload, PayloadBuilder};
pub use render::{PngDataUrlRenderer, QrRenderer, RenderOptions};
pub use types::PaymentRequest;
