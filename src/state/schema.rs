//! Field layout of each data-entry step

use super::form_data::keys;
use super::step::WizardStep;

/// How a field is edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Letters are upper-cased as typed
    Upper,
    /// Digits only, at most `max` of them
    Digits { max: usize },
    /// Decimal number, sign allowed
    Number,
    /// Whole rupees
    Amount,
    Checkbox,
    /// One of a fixed set of `(value, label)` options
    Choice(&'static [(&'static str, &'static str)]),
}

/// A single input on a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    const fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { key, label, kind }
    }

    /// Whether `c` may be typed into this field
    pub fn accepts(&self, c: char, current: &str) -> bool {
        match self.kind {
            FieldKind::Text | FieldKind::Upper => !c.is_control(),
            FieldKind::Digits { max } => c.is_ascii_digit() && current.len() < max,
            FieldKind::Amount => c.is_ascii_digit(),
            FieldKind::Number => {
                c.is_ascii_digit()
                    || (c == '.' && !current.contains('.'))
                    || (c == '-' && current.is_empty())
            }
            FieldKind::Checkbox | FieldKind::Choice(_) => false,
        }
    }
}

pub const GENDER_OPTIONS: &[(&str, &str)] =
    &[("male", "Male"), ("female", "Female"), ("other", "Other")];

pub const YES_NO_OPTIONS: &[(&str, &str)] = &[("yes", "Yes"), ("no", "No")];

pub const RESIDENCE_OPTIONS: &[(&str, &str)] = &[
    ("owned", "Owned"),
    ("rented", "Rented"),
    ("family", "Family owned"),
    ("company", "Company provided"),
];

pub const LOAN_TYPE_OPTIONS: &[(&str, &str)] = &[
    ("personal", "Personal Loan"),
    ("vehicle", "Vehicle Loan"),
    ("home", "Home Loan"),
    ("business", "Business Loan"),
];

pub const LOAN_SUB_TYPE_OPTIONS: &[(&str, &str)] = &[
    ("new_car", "New Car"),
    ("used_car", "Used Car"),
    ("two_wheeler", "Two Wheeler"),
];

/// A row of mutually exclusive buttons on the loan selection step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionGroup {
    pub key: &'static str,
    pub label: &'static str,
    pub options: &'static [(&'static str, &'static str)],
}

pub const SELECTION_GROUPS: &[SelectionGroup] = &[
    SelectionGroup {
        key: keys::LOAN_TYPE_GROUP,
        label: "Loan Type",
        options: LOAN_TYPE_OPTIONS,
    },
    SelectionGroup {
        key: keys::LOAN_SUB_TYPE_GROUP,
        label: "Loan Sub Type",
        options: LOAN_SUB_TYPE_OPTIONS,
    },
];

const BASIC_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(keys::FULL_NAME, "Full Name (as per PAN)", FieldKind::Text),
    FieldSpec::new(keys::MOBILE, "Mobile Number", FieldKind::Digits { max: 10 }),
    FieldSpec::new(keys::LOAN_AMOUNT, "Loan Amount (Rs.)", FieldKind::Amount),
    FieldSpec::new(keys::PAN_NUMBER, "PAN Number", FieldKind::Upper),
    FieldSpec::new(
        keys::AGREE_OVD,
        "I agree to validate my OVD details",
        FieldKind::Checkbox,
    ),
];

const PERSONAL_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(keys::ADDRESS, "Current Address", FieldKind::Text),
    FieldSpec::new(keys::DOB, "Date of Birth (YYYY-MM-DD)", FieldKind::Text),
    FieldSpec::new(keys::FATHER_NAME, "Father's Name", FieldKind::Text),
    FieldSpec::new(keys::AADHAR_NUMBER, "Aadhar Number", FieldKind::Text),
    FieldSpec::new(keys::EMAIL, "Email", FieldKind::Text),
    FieldSpec::new(keys::GENDER, "Gender", FieldKind::Choice(GENDER_OPTIONS)),
    FieldSpec::new(
        keys::EXISTING_CUSTOMER,
        "Existing Customer",
        FieldKind::Choice(YES_NO_OPTIONS),
    ),
    FieldSpec::new(keys::CIF_NUMBER, "CIF Number", FieldKind::Text),
    FieldSpec::new(
        keys::RESIDENCE_TYPE,
        "Residence Type",
        FieldKind::Choice(RESIDENCE_OPTIONS),
    ),
    FieldSpec::new(
        keys::YEARS_AT_RESIDENCE,
        "Years at Current Residence",
        FieldKind::Number,
    ),
];

const INCOME_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(keys::EMPLOYER_NAME, "Employer Name", FieldKind::Text),
    FieldSpec::new(
        keys::GROSS_MONTHLY_INCOME,
        "Gross Monthly Income",
        FieldKind::Number,
    ),
    FieldSpec::new(
        keys::BONUS_OVERTIME_ARREAR,
        "Bonus / Overtime / Arrear",
        FieldKind::Number,
    ),
    FieldSpec::new(
        keys::TOTAL_MONTHLY_OBLIGATION,
        "Total Monthly Obligation",
        FieldKind::Number,
    ),
    FieldSpec::new(
        keys::YEARS_AT_EMPLOYER,
        "Years at Current Employer",
        FieldKind::Number,
    ),
    FieldSpec::new(
        keys::OFFICIAL_EMAIL_ID,
        "Official Email ID",
        FieldKind::Text,
    ),
];

/// Every input declared for `step`, in display order
pub fn fields_for(step: WizardStep) -> &'static [FieldSpec] {
    match step {
        WizardStep::BasicDetails => BASIC_FIELDS,
        WizardStep::PersonalDetails => PERSONAL_FIELDS,
        WizardStep::IncomeDetails => INCOME_FIELDS,
        _ => &[],
    }
}

/// Look up a field by key on any step
pub fn find_field(key: &str) -> Option<&'static FieldSpec> {
    [BASIC_FIELDS, PERSONAL_FIELDS, INCOME_FIELDS]
        .into_iter()
        .flatten()
        .find(|f| f.key == key)
}

/// Label for an option value, falling back to the value itself
pub fn option_label(options: &'static [(&'static str, &'static str)], value: &str) -> String {
    options
        .iter()
        .find(|(v, _)| *v == value)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| value.to_string())
}
