//! PromptPay payload construction.
//!
//! A payload is a flat run of EMVCo tag-length-value fields closed by a
//! CRC-16 field:
//!
//! ```text
//! 00 format | 01 initiation | 29/39 merchant | 58 country | 53 currency | 54 amount | 63 crc
//! ```

use std::fmt;

use serde::Serialize;
use tracing::debug;

pub mod account;
pub mod amount;
pub mod crc;
pub mod tlv;

pub use account::AccountIdentifier;
pub use amount::format_amount;
pub use crc::{checksum, crc16_ccitt_false};
pub use tlv::{parse_fields, TlvField};

use crate::config::{CurrencyPolicy, SchemeConfig};
use crate::error::{PayloadError, Result};
use crate::types::PaymentRequest;

pub const TAG_FORMAT_INDICATOR: &str = "00";
pub const TAG_INITIATION_METHOD: &str = "01";
pub const TAG_COUNTRY: &str = "58";
pub const TAG_CURRENCY: &str = "53";
pub const TAG_AMOUNT: &str = "54";
pub const TAG_CRC: &str = "63";

const FORMAT_VERSION: &str = "01";
const INITIATION_STATIC: &str = "11";
const INITIATION_DYNAMIC: &str = "12";
const CRC_PREFIX: &str = "6304";

/// A finished payload, checksum included.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Payload(String);

impl Payload {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// The trailing four hex digits.
    pub fn checksum(&self) -> &str {
        &self.0[self.0.len() - 4..]
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Payload> for String {
    fn from(payload: Payload) -> Self {
        payload.0
    }
}

impl AsRef<str> for Payload {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub struct PayloadBuilder<'a> {
    scheme: &'a SchemeConfig,
}

impl<'a> PayloadBuilder<'a> {
    pub fn new(scheme: &'a SchemeConfig) -> Self {
        Self { scheme }
    }

    /// Everything up to and including the `6304` checksum header.
    pub fn build_unsigned(&self, req: &PaymentRequest) -> Result<String> {
        let account = AccountIdentifier::classify(&req.account);
        debug!(kind = account.kind(), one_time = req.one_time, "building payload");

        let initiation = if req.one_time { INITIATION_DYNAMIC } else { INITIATION_STATIC };

        let mut fields = vec![
            TlvField::new(TAG_FORMAT_INDICATOR, FORMAT_VERSION)?,
            TlvField::new(TAG_INITIATION_METHOD, initiation)?,
            account.merchant_field(self.scheme)?,
            TlvField::new(TAG_COUNTRY, self.country(req))?,
        ];

        if let Some(numeric) = self.currency_numeric(req)? {
            fields.push(TlvField::new(TAG_CURRENCY, numeric)?);
        }

        if let Some(amount) = format_amount(&req.amount)? {
            fields.push(TlvField::new(TAG_AMOUNT, amount)?);
        }

        let mut unsigned = tlv::encode_all(&fields);
        unsigned.push_str(CRC_PREFIX);
        Ok(unsigned)
    }

    pub fn build(&self, req: &PaymentRequest) -> Result<Payload> {
        let mut unsigned = self.build_unsigned(req)?;
        let sum = checksum(&unsigned)?;
        unsigned.push_str(&sum);
        Ok(Payload(unsigned))
    }

    fn country<'r>(&self, req: &'r PaymentRequest) -> &'r str
    where
        'a: 'r,
    {
        match req.country.as_deref() {
            Some(country) if !country.is_empty() => country,
            _ => self.scheme.default_country.as_str(),
        }
    }

    fn currency_numeric(&self, req: &PaymentRequest) -> Result<Option<&'static str>> {
        let currency = match req.currency.as_deref() {
            Some(currency) if !currency.is_empty() => currency,
            _ => self.scheme.default_currency.as_str(),
        };
        if currency.eq_ignore_ascii_case(&self.scheme.default_currency) {
            return self.scheme.currency_numeric().map(Some);
        }
        match self.scheme.currency_policy {
            CurrencyPolicy::Omit => {
                debug!(currency, "currency not supported by scheme, omitting field");
                Ok(None)
            }
            CurrencyPolicy::Strict => Err(PayloadError::UnsupportedCurrency(currency.to_string())),
        }
    }
}

/// Builds a payload under the default PromptPay scheme.
pub fn generate_payload(req: &PaymentRequest) -> Result<Payload> {
    PayloadBuilder::new(&SchemeConfig::default()).build(req)
}

/// Checks that `payload` ends in a `63` field whose value matches the
/// CRC of everything before it.
pub fn verify(payload: &str) -> Result<()> {
    let fields = parse_fields(payload)?;
    let last = fields
        .last()
        .ok_or_else(|| PayloadError::MalformedPayload("empty payload".to_string()))?;

    if last.tag() != TAG_CRC || last.value().len() != 4 {
        return Err(PayloadError::MalformedPayload(
            "payload must end with a 4-character CRC field".to_string(),
        ));
    }

    let body = &payload[..payload.len() - 4];
    let expected = checksum(body)?;
    if !expected.eq_ignore_ascii_case(last.value()) {
        return Err(PayloadError::ChecksumMismatch {
            expected,
            found: last.value().to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_mobile() {
        let req = PaymentRequest::new("0812345678").one_time(false);
        let payload = generate_payload(&req).unwrap();
        assert_eq!(
            payload.as_str(),
            "00020101021129370016A000000677010111011300668123456785802TH530376463045D82"
        );
        assert_eq!(payload.checksum(), "5D82");
    }

    #[test]
    fn test_unsigned_ends_with_crc_header() {
        let req = PaymentRequest::new("0812345678");
        let unsigned = PayloadBuilder::new(&SchemeConfig::default())
            .build_unsigned(&req)
            .unwrap();
        assert!(unsigned.ends_with("6304"));
        assert!(generate_payload(&req).unwrap().as_str().starts_with(&unsigned));
    }

    #[test]
    fn test_strict_currency_policy() {
        let scheme = SchemeConfig {
            currency_policy: CurrencyPolicy::Strict,
            ..SchemeConfig::default()
        };
        let req = PaymentRequest::new("0812345678").currency("USD");
        assert_eq!(
            PayloadBuilder::new(&scheme).build(&req),
            Err(PayloadError::UnsupportedCurrency("USD".to_string()))
        );
    }

    #[test]
    fn test_missing_country_and_currency_use_scheme_defaults() {
        let scheme = SchemeConfig {
            default_country: "SG".to_string(),
            default_currency: "SGD".to_string(),
            ..SchemeConfig::default()
        };
        let payload = PayloadBuilder::new(&scheme)
            .build(&PaymentRequest::new("0812345678").amount("5"))
            .unwrap();
        assert!(payload.as_str().contains("5802SG53037025404"));

        let payload = PayloadBuilder::new(&scheme)
            .build(&PaymentRequest::new("0812345678").country("").currency(""))
            .unwrap();
        assert!(payload.as_str().contains("5802SG5303702"));
    }

    #[test]
    fn test_request_currency_never_borrows_scheme_code() {
        let scheme = SchemeConfig {
            default_currency: "USD".to_string(),
            ..SchemeConfig::default()
        };
        let payload = PayloadBuilder::new(&scheme)
            .build(&PaymentRequest::new("0812345678").currency("USD").amount("5"))
            .unwrap();
        assert!(payload.as_str().contains("5303840"));
        assert!(!payload.as_str().contains("5303764"));
    }

    #[test]
    fn test_unknown_scheme_currency_is_rejected() {
        let scheme = SchemeConfig {
            default_currency: "XXX".to_string(),
            ..SchemeConfig::default()
        };
        assert_eq!(
            PayloadBuilder::new(&scheme).build(&PaymentRequest::new("0812345678")),
            Err(PayloadError::UnsupportedCurrency("XXX".to_string()))
        );
    }

    #[test]
    fn test_lowercase_currency_matches() {
        let req = PaymentRequest::new("0812345678").currency("thb");
        assert!(generate_payload(&req).unwrap().as_str().contains("5303764"));
    }

    #[test]
    fn test_verify_detects_tampering() {
        let payload = generate_payload(&PaymentRequest::new("0812345678").amount("10")).unwrap();
        assert!(verify(payload.as_str()).is_ok());

        let tampered = payload.as_str().replace("540510.00", "540599.00");
        assert!(matches!(
            verify(&tampered),
            Err(PayloadError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_verify_requires_crc_field() {
        assert!(matches!(
            verify("0002015802TH"),
            Err(PayloadError::MalformedPayload(_))
        ));
    }
}
