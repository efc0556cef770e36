//! Canonical store of everything the applicant has entered

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current persisted layout version
pub const SCHEMA_VERSION: u32 = 1;

pub const DEFAULT_LOAN_AMOUNT: f64 = 1_000_000.0;
pub const DEFAULT_INTEREST_RATE: f64 = 8.5;
pub const DEFAULT_TENURE: u32 = 84;

/// Field keys, as persisted
pub mod keys {
    pub const LOAN_AMOUNT: &str = "loanAmount";
    pub const INTEREST_RATE: &str = "interestRate";
    pub const TENURE: &str = "tenure";

    pub const FULL_NAME: &str = "fullName";
    pub const MOBILE: &str = "mobile";
    pub const PAN_NUMBER: &str = "panNumber";
    pub const AGREE_OVD: &str = "agreeOVD";

    pub const ADDRESS: &str = "address";
    pub const DOB: &str = "dob";
    pub const FATHER_NAME: &str = "fatherName";
    pub const AADHAR_NUMBER: &str = "aadharNumber";
    pub const EMAIL: &str = "email";
    pub const GENDER: &str = "gender";
    pub const EXISTING_CUSTOMER: &str = "existingCustomer";
    pub const CIF_NUMBER: &str = "cifNumber";
    pub const RESIDENCE_TYPE: &str = "residenceType";
    pub const YEARS_AT_RESIDENCE: &str = "yearsAtResidence";

    pub const EMPLOYER_NAME: &str = "employerName";
    pub const GROSS_MONTHLY_INCOME: &str = "grossMonthlyIncome";
    pub const BONUS_OVERTIME_ARREAR: &str = "bonusOvertimeArrear";
    pub const TOTAL_MONTHLY_OBLIGATION: &str = "totalMonthlyObligation";
    pub const YEARS_AT_EMPLOYER: &str = "yearsAtEmployer";
    pub const OFFICIAL_EMAIL_ID: &str = "officialEmailID";

    /// Selection group holding the loan product
    pub const LOAN_TYPE_GROUP: &str = "loan_type";
    /// Selection group shown only for vehicle loans
    pub const LOAN_SUB_TYPE_GROUP: &str = "loan_sub_type";
}

/// A free-form field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Trimmed text form; flags render as `true`/`false`
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Text(s) => s.trim().to_string(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Flag(b) => b.to_string(),
        }
    }

    pub fn as_flag(&self) -> bool {
        match self {
            FieldValue::Flag(b) => *b,
            FieldValue::Text(s) => s == "true",
            FieldValue::Number(_) => false,
        }
    }

    /// Numeric reading; blank or malformed text is `None`
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            FieldValue::Flag(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Applicant data with typed loan parameters and an open field map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormData {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// Principal in rupees; `None` while the applicant has cleared the input
    pub loan_amount: Option<f64>,
    /// Percent per annum
    pub interest_rate: f64,
    /// Months
    pub tenure: u32,
    /// Selection group label -> chosen option value
    #[serde(default)]
    pub selections: BTreeMap<String, String>,
    /// Every other form field, flat
    #[serde(flatten)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl Default for FormData {
    fn default() -> Self {
        Self::with_defaults(DEFAULT_LOAN_AMOUNT, DEFAULT_INTEREST_RATE, DEFAULT_TENURE)
    }
}

impl FormData {
    /// Empty form with the given loan parameters
    pub fn with_defaults(loan_amount: f64, interest_rate: f64, tenure: u32) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            loan_amount: Some(loan_amount),
            interest_rate,
            tenure,
            selections: BTreeMap::new(),
            fields: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Trimmed text of a field, empty when unset
    pub fn text(&self, key: &str) -> String {
        self.fields.get(key).map(FieldValue::as_text).unwrap_or_default()
    }

    pub fn flag(&self, key: &str) -> bool {
        self.fields.get(key).is_some_and(FieldValue::as_flag)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.fields.get(key).and_then(FieldValue::as_number)
    }

    pub fn set(&mut self, key: &str, value: impl Into<FieldValue>) {
        self.fields.insert(key.to_string(), value.into());
    }

    pub fn remove(&mut self, key: &str) {
        self.fields.remove(key);
    }

    pub fn selection(&self, group: &str) -> Option<&str> {
        self.selections.get(group).map(String::as_str)
    }

    /// Principal used for the offer, falling back to the default when cleared
    pub fn effective_loan_amount(&self) -> f64 {
        self.loan_amount
            .filter(|amount| *amount > 0.0)
            .unwrap_or(DEFAULT_LOAN_AMOUNT)
    }

    /// First broken invariant of the loan parameters, if any.
    /// A cleared loan amount is allowed.
    pub fn invariant_violation(&self) -> Option<&'static str> {
        if self
            .loan_amount
            .is_some_and(|amount| !amount.is_finite() || amount <= 0.0)
        {
            return Some("loan amount must be greater than zero");
        }
        if !self.interest_rate.is_finite() || self.interest_rate < 0.0 {
            return Some("interest rate must be zero or more");
        }
        if self.tenure == 0 {
            return Some("tenure must be greater than zero");
        }
        None
    }
}
