use std::fmt;

use crate::error::{PayloadError, Result};

/// Largest value a two-digit length prefix can describe.
pub const MAX_VALUE_LEN: usize = 99;

/// A single tag-length-value field. The length is always derived from the
/// value so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlvField {
    tag: String,
    value: String,
}

impl TlvField {
    pub fn new(tag: &str, value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.len() > MAX_VALUE_LEN {
            return Err(PayloadError::FieldTooLong {
                tag: tag.to_string(),
                len: value.len(),
            });
        }
        Ok(Self {
            tag: tag.to_string(),
            value,
        })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Zero-padded two-digit length.
    pub fn length(&self) -> String {
        format!("{:02}", self.value.len())
    }

    pub fn encode(&self) -> String {
        format!("{}{}{}", self.tag, self.length(), self.value)
    }
}

impl fmt::Display for TlvField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02}{}", self.tag, self.value.len(), self.value)
    }
}

/// Concatenates already-validated fields in order.
pub fn encode_all(fields: &[TlvField]) -> String {
    fields.iter().map(TlvField::encode).collect()
}

/// Splits a flat TLV string into its top-level fields.
pub fn parse_fields(input: &str) -> Result<Vec<TlvField>> {
    if !input.is_ascii() {
        return Err(PayloadError::MalformedPayload(
            "payload contains non-ASCII characters".to_string(),
        ));
    }

    let mut fields = Vec::new();
    let mut rest = input;

    while !rest.is_empty() {
        if rest.len() < 4 {
            return Err(PayloadError::MalformedPayload(format!(
                "truncated field header {:?}",
                rest
            )));
        }

        let (tag, tail) = rest.split_at(2);
        let (len, tail) = tail.split_at(2);
        if !len.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PayloadError::MalformedPayload(format!("bad length {:?} for tag {}", len, tag)));
        }
        let len: usize = len
            .parse()
            .map_err(|_| PayloadError::MalformedPayload(format!("bad length {:?} for tag {}", len, tag)))?;

        if tail.len() < len {
            return Err(PayloadError::MalformedPayload(format!(
                "tag {} declares {} characters but only {} remain",
                tag,
                len,
                tail.len()
            )));
        }

        let (value, tail) = tail.split_at(len);
        fields.push(TlvField::new(tag, value)?);
        rest = tail;
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_pads_length() {
        let field = TlvField::new("58", "TH").unwrap();
        assert_eq!(field.length(), "02");
        assert_eq!(field.encode(), "5802TH");
        assert_eq!(field.to_string(), field.encode());
    }

    #[test]
    fn test_value_at_limit() {
        let value = "9".repeat(99);
        let field = TlvField::new("54", value.clone()).unwrap();
        assert_eq!(field.encode(), format!("5499{}", value));
    }

    #[test]
    fn test_value_over_limit() {
        let err = TlvField::new("54", "9".repeat(100)).unwrap_err();
        assert_eq!(
            err,
            PayloadError::FieldTooLong {
                tag: "54".to_string(),
                len: 100
            }
        );
    }

    #[test]
    fn test_parse_fields() {
        let fields = parse_fields("0002015802TH5303764").unwrap();
        let tags: Vec<&str> = fields.iter().map(|f| f.tag()).collect();
        assert_eq!(tags, vec!["00", "58", "53"]);
        assert_eq!(fields[2].value(), "764");
    }

    #[test]
    fn test_parse_fields_truncated() {
        assert!(matches!(
            parse_fields("5805TH"),
            Err(PayloadError::MalformedPayload(_))
        ));
        assert!(matches!(
            parse_fields("000"),
            Err(PayloadError::MalformedPayload(_))
        ));
        assert!(matches!(
            parse_fields("00xx01"),
            Err(PayloadError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_parse_fields_rejects_signed_length() {
        assert!(matches!(
            parse_fields("00+1X"),
            Err(PayloadError::MalformedPayload(_))
        ));
        assert!(matches!(
            parse_fields("00-1X"),
            Err(PayloadError::MalformedPayload(_))
        ));
    }
}
