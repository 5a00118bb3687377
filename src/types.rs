use serde::{Deserialize, Serialize};

fn default_one_time() -> bool {
    true
}

/// Caller input for a single payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// Mobile number, national ID, or e-wallet/reference number.
    pub account: String,
    #[serde(default = "default_one_time")]
    pub one_time: bool,
    /// Falls back to the scheme's default country when absent or empty.
    #[serde(default)]
    pub country: Option<String>,
    /// Decimal amount, empty for a static code.
    #[serde(default, alias = "money")]
    pub amount: String,
    /// Falls back to the scheme's currency when absent or empty.
    #[serde(default)]
    pub currency: Option<String>,
}

impl PaymentRequest {
    pub fn new(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            one_time: default_one_time(),
            country: None,
            amount: String::new(),
            currency: None,
        }
    }

    pub fn one_time(mut self, one_time: bool) -> Self {
        self.one_time = one_time;
        self
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = amount.into();
        self
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }
}
