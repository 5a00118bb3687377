use std::collections::HashMap;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use anyhow::{Result, anyhow};

use crate::error::PayloadError;
use crate::render::RenderOptions;

/// PromptPay application identifier registered with EMVCo.
pub const PROMPTPAY_AID: &str = "A000000677010111";

lazy_static! {
    /// ISO 4217 alphabetic to numeric codes.
    static ref CURRENCY_NUMERIC: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("THB", "764");
        m.insert("USD", "840");
        m.insert("EUR", "978");
        m.insert("GBP", "826");
        m.insert("JPY", "392");
        m.insert("CNY", "156");
        m.insert("SGD", "702");
        m.insert("MYR", "458");
        m.insert("IDR", "360");
        m.insert("PHP", "608");
        m.insert("VND", "704");
        m.insert("KHR", "116");
        m.insert("LAK", "418");
        m.insert("MMK", "104");
        m.insert("INR", "356");
        m
    };
}

/// Numeric code for an alphabetic currency code, case-insensitive.
pub fn currency_numeric(alpha: &str) -> Option<&'static str> {
    CURRENCY_NUMERIC.get(alpha.to_ascii_uppercase().as_str()).copied()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrencyPolicy {
    /// Drop the currency field for anything but the scheme currency.
    Omit,
    /// Reject anything but the scheme currency.
    Strict,
}

/// Scheme constants. Swapping these is enough to target another national
/// scheme that shares the field layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeConfig {
    pub application_id: String,
    /// Used when a request names no country.
    pub default_country: String,
    /// The one currency the scheme settles in; also used when a request
    /// names no currency.
    pub default_currency: String,
    /// Replaces the leading trunk digit of a mobile number.
    pub mobile_prefix: String,
    pub currency_policy: CurrencyPolicy,
}

impl SchemeConfig {
    /// Numeric code of the scheme currency.
    pub fn currency_numeric(&self) -> std::result::Result<&'static str, PayloadError> {
        currency_numeric(&self.default_currency)
            .ok_or_else(|| PayloadError::UnsupportedCurrency(self.default_currency.clone()))
    }
}

impl Default for SchemeConfig {
    fn default() -> Self {
        Self {
            application_id: PROMPTPAY_AID.to_string(),
            default_country: "TH".to_string(),
            default_currency: "THB".to_string(),
            mobile_prefix: "0066".to_string(),
            currency_policy: CurrencyPolicy::Omit,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub http_host: String,
    pub http_port: u16,
    pub scheme: SchemeConfig,
    pub render: RenderOptions,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let mut scheme = SchemeConfig::default();
        if let Ok(country) = std::env::var("PROMPTPAY_COUNTRY") {
            if country.len() != 2 || !country.bytes().all(|b| b.is_ascii_alphabetic()) {
                return Err(anyhow!("PROMPTPAY_COUNTRY must be a 2-letter code, got {:?}", country));
            }
            scheme.default_country = country.to_uppercase();
        }
        if let Ok(currency) = std::env::var("PROMPTPAY_CURRENCY") {
            if currency_numeric(&currency).is_none() {
                return Err(anyhow!("PROMPTPAY_CURRENCY has no known ISO 4217 numeric code: {:?}", currency));
            }
            scheme.default_currency = currency.to_uppercase();
        }
        if let Ok(strict) = std::env::var("PROMPTPAY_STRICT_CURRENCY") {
            scheme.currency_policy = match strict.as_str() {
                "1" | "true" | "yes" => CurrencyPolicy::Strict,
                "0" | "false" | "no" | "" => CurrencyPolicy::Omit,
                other => return Err(anyhow!("Invalid PROMPTPAY_STRICT_CURRENCY: {}", other)),
            };
        }

        let defaults = RenderOptions::default();

        Ok(Config {
            http_host: std::env::var("HTTP_HOST")
                .unwrap_or_else(|_| "127.0.0.1".to_string()),
            http_port: std::env::var("HTTP_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|e| anyhow!("Invalid HTTP_PORT: {}", e))?,
            scheme,
            render: RenderOptions {
                module_size: match std::env::var("QR_MODULE_SIZE") {
                    Ok(v) => v.parse().map_err(|e| anyhow!("Invalid QR_MODULE_SIZE: {}", e))?,
                    Err(_) => defaults.module_size,
                },
                margin: match std::env::var("QR_MARGIN") {
                    Ok(v) => v.parse().map_err(|e| anyhow!("Invalid QR_MARGIN: {}", e))?,
                    Err(_) => defaults.margin,
                },
            },
        })
    }
}
