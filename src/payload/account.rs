use serde::Serialize;

use super::tlv::TlvField;
use crate::config::SchemeConfig;
use crate::error::Result;

/// Merchant account tag for mobile numbers and national IDs.
pub const TAG_MERCHANT_PERSONAL: &str = "29";
/// Merchant account tag for e-wallet and reference numbers.
pub const TAG_MERCHANT_REFERENCE: &str = "39";

const SUB_TAG_AID: &str = "00";
const SUB_TAG_MOBILE: &str = "01";
const SUB_TAG_NATIONAL_ID: &str = "02";
const SUB_TAG_REFERENCE: &str = "03";
const SUB_TAG_CURRENCY: &str = "53";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AccountIdentifier {
    /// Ten-digit local mobile number, e.g. `0812345678`.
    Mobile(String),
    /// Thirteen-digit citizen or tax ID with hyphens removed.
    NationalId(String),
    /// Anything else, kept verbatim.
    Reference(String),
}

impl AccountIdentifier {
    /// Classification never fails. Ten ASCII digits is a mobile number,
    /// thirteen digits once hyphens are dropped is a national ID, and every
    /// other input falls through to a reference.
    pub fn classify(raw: &str) -> Self {
        if raw.len() == 10 && is_digits(raw) {
            return AccountIdentifier::Mobile(raw.to_string());
        }

        let stripped: String = raw.chars().filter(|c| *c != '-').collect();
        if stripped.len() == 13 && is_digits(&stripped) {
            return AccountIdentifier::NationalId(stripped);
        }

        AccountIdentifier::Reference(raw.to_string())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AccountIdentifier::Mobile(_) => "mobile",
            AccountIdentifier::NationalId(_) => "national_id",
            AccountIdentifier::Reference(_) => "reference",
        }
    }

    /// Outer merchant account information tag.
    pub fn merchant_tag(&self) -> &'static str {
        match self {
            AccountIdentifier::Mobile(_) | AccountIdentifier::NationalId(_) => TAG_MERCHANT_PERSONAL,
            AccountIdentifier::Reference(_) => TAG_MERCHANT_REFERENCE,
        }
    }

    pub fn sub_tag(&self) -> &'static str {
        match self {
            AccountIdentifier::Mobile(_) => SUB_TAG_MOBILE,
            AccountIdentifier::NationalId(_) => SUB_TAG_NATIONAL_ID,
            AccountIdentifier::Reference(_) => SUB_TAG_REFERENCE,
        }
    }

    /// Identifier sub-fields that follow the application ID.
    pub fn sub_fields(&self, scheme: &SchemeConfig) -> Result<Vec<TlvField>> {
        match self {
            AccountIdentifier::Mobile(number) => {
                // Leading trunk digit is replaced by the international prefix.
                let value = format!("{}{}", scheme.mobile_prefix, &number[1..]);
                Ok(vec![TlvField::new(SUB_TAG_MOBILE, value)?])
            }
            AccountIdentifier::NationalId(id) => Ok(vec![TlvField::new(SUB_TAG_NATIONAL_ID, id.as_str())?]),
            AccountIdentifier::Reference(reference) => Ok(vec![
                TlvField::new(SUB_TAG_REFERENCE, reference.as_str())?,
                TlvField::new(SUB_TAG_CURRENCY, scheme.currency_numeric()?)?,
            ]),
        }
    }

    /// The complete merchant account information field.
    pub fn merchant_field(&self, scheme: &SchemeConfig) -> Result<TlvField> {
        let mut value = TlvField::new(SUB_TAG_AID, scheme.application_id.as_str())?.encode();
        for field in self.sub_fields(scheme)? {
            value.push_str(&field.encode());
        }
        TlvField::new(self.merchant_tag(), value)
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
