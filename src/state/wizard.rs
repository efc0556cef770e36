//! The wizard state machine: current step, form data and documents

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::form_data::{keys, FieldValue, FormData};
use super::schema::{find_field, SELECTION_GROUPS};
use super::step::WizardStep;
use super::uploads::{DocumentId, DocumentMeta, UploadTracker};
use super::validation::{FieldError, ValidationResult};
use crate::calculator::{IncomeSummary, OfferSummary};
use crate::error::WizardError;
use crate::store::PersistenceStore;
use crate::validators::{validate_aadhar, validate_email, validate_mobile, validate_pan};

/// Loan parameters a fresh application starts from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanDefaults {
    pub loan_amount: f64,
    pub interest_rate: f64,
    pub tenure: u32,
    pub tenure_min: u32,
    pub tenure_max: u32,
    pub tenure_step: u32,
}

impl Default for LoanDefaults {
    fn default() -> Self {
        Self {
            loan_amount: super::form_data::DEFAULT_LOAN_AMOUNT,
            interest_rate: super::form_data::DEFAULT_INTEREST_RATE,
            tenure: super::form_data::DEFAULT_TENURE,
            tenure_min: 12,
            tenure_max: 84,
            tenure_step: 6,
        }
    }
}

impl LoanDefaults {
    fn empty_form(&self) -> FormData {
        FormData::with_defaults(self.loan_amount, self.interest_rate, self.tenure)
    }
}

/// Identifies the step visit a delayed operation was started from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StepToken {
    pub step: WizardStep,
    pub generation: u64,
}

/// Owns the application in progress
pub struct Wizard {
    current_step: WizardStep,
    form: FormData,
    uploads: UploadTracker,
    store: PersistenceStore,
    defaults: LoanDefaults,
    last_validation: ValidationResult,
    /// Bumped on every step change and reset
    generation: u64,
    verified_mobile: Option<String>,
    application_ref: Option<Uuid>,
    submitted_at: Option<DateTime<Utc>>,
}

impl Wizard {
    /// Start from the saved snapshot, or defaults when there is none
    pub fn new(store: PersistenceStore, defaults: LoanDefaults) -> Self {
        let form = store.load().unwrap_or_else(|| defaults.empty_form());
        let uploads = store.load_documents().unwrap_or_default();
        tracing::info!(
            "Wizard initialised with {} saved fields and {} documents",
            form.fields.len(),
            uploads.uploaded_count()
        );
        Self {
            current_step: WizardStep::LoanSelection,
            form,
            uploads,
            store,
            defaults,
            last_validation: ValidationResult::Valid,
            generation: 0,
            verified_mobile: None,
            application_ref: None,
            submitted_at: None,
        }
    }

    pub fn current_step(&self) -> WizardStep {
        self.current_step
    }

    pub fn form(&self) -> &FormData {
        &self.form
    }

    pub fn uploads(&self) -> &UploadTracker {
        &self.uploads
    }

    pub fn defaults(&self) -> &LoanDefaults {
        &self.defaults
    }

    /// Failures from the most recent advance attempt on this step
    pub fn last_validation(&self) -> &ValidationResult {
        &self.last_validation
    }

    pub fn token(&self) -> StepToken {
        StepToken {
            step: self.current_step,
            generation: self.generation,
        }
    }

    /// Whether a delayed operation started under `token` may still apply
    pub fn is_current(&self, token: StepToken) -> bool {
        self.token() == token
    }

    pub fn application_ref(&self) -> Option<Uuid> {
        self.application_ref
    }

    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    fn move_to(&mut self, step: WizardStep) {
        tracing::info!("Step {:?} -> {:?}", self.current_step, step);
        self.current_step = step;
        self.generation += 1;
        self.last_validation = ValidationResult::Valid;
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.form) {
            tracing::warn!("Failed to save application: {e}");
        }
    }

    fn persist_documents(&self) {
        if let Err(e) = self.store.save_documents(&self.uploads) {
            tracing::warn!("Failed to save document list: {e}");
        }
    }

    /// Validate the current step and move to its successor if it passes
    pub fn advance(&mut self) -> ValidationResult {
        let Some(next) = self.current_step.successor() else {
            return ValidationResult::Valid;
        };

        let result = self.validate(self.current_step);
        if !result.is_valid() {
            tracing::debug!(
                "Advance from {:?} blocked by {:?}",
                self.current_step,
                result.failed_fields()
            );
            self.last_validation = result.clone();
            return result;
        }

        self.persist();
        if next == WizardStep::ThankYou {
            let reference = Uuid::new_v4();
            tracing::info!("Application submitted with reference {reference}");
            self.application_ref = Some(reference);
            self.submitted_at = Some(Utc::now());
        }
        self.move_to(next);
        result
    }

    /// Move back one step; never validates
    pub fn retreat(&mut self) {
        if let Some(previous) = self.current_step.predecessor() {
            self.move_to(previous);
        }
    }

    /// Clear everything and return to loan selection
    pub fn reset(&mut self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!("Failed to clear saved application: {e}");
        }
        self.form = self.defaults.empty_form();
        self.uploads.clear();
        self.verified_mobile = None;
        self.application_ref = None;
        self.submitted_at = None;
        self.move_to(WizardStep::LoanSelection);
        tracing::info!("Application reset");
    }

    /// Run the checks bound to `step`, reporting every failure
    pub fn validate(&self, step: WizardStep) -> ValidationResult {
        let errors = match step {
            WizardStep::LoanSelection => self.check_loan_selection(),
            WizardStep::BasicDetails => self.check_basic_details(),
            WizardStep::PersonalDetails => self.check_personal_details(),
            WizardStep::IncomeDetails => self.check_income_details(),
            WizardStep::DocumentUpload => self.check_documents(),
            WizardStep::Offer | WizardStep::FinalApproval | WizardStep::ThankYou => Vec::new(),
        };
        ValidationResult::from_errors(errors)
    }

    fn check_loan_selection(&self) -> Vec<FieldError> {
        SELECTION_GROUPS
            .iter()
            .filter(|group| self.is_group_visible(group.key))
            .filter(|group| self.form.selection(group.key).is_none())
            .map(|group| {
                FieldError::new(
                    group.key,
                    format!(
                        "Please select a {} to continue",
                        group.label.to_lowercase()
                    ),
                )
            })
            .collect()
    }

    fn check_basic_details(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.form.text(keys::FULL_NAME).is_empty() {
            errors.push(FieldError::new(keys::FULL_NAME, "Please enter your full name"));
        }
        if !validate_mobile(&self.form.text(keys::MOBILE)) {
            errors.push(FieldError::new(
                keys::MOBILE,
                "Please enter a valid 10-digit mobile number",
            ));
        }
        if !self.form.loan_amount.is_some_and(|amount| amount > 0.0) {
            errors.push(FieldError::new(
                keys::LOAN_AMOUNT,
                "Please enter a valid loan amount",
            ));
        }
        if !validate_pan(&self.form.text(keys::PAN_NUMBER)) {
            errors.push(FieldError::new(
                keys::PAN_NUMBER,
                "Please enter a valid PAN number (e.g., ABCDE1234F)",
            ));
        }
        if !self.form.flag(keys::AGREE_OVD) {
            errors.push(FieldError::new(
                keys::AGREE_OVD,
                "Please agree to validate OVD details",
            ));
        }
        errors
    }

    fn check_personal_details(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        let required = [
            (keys::ADDRESS, "Please enter your address"),
            (keys::DOB, "Please select your date of birth"),
            (keys::FATHER_NAME, "Please enter your father's name"),
        ];
        for (key, message) in required {
            if self.form.text(key).is_empty() {
                errors.push(FieldError::new(key, message));
            }
        }
        if !validate_aadhar(&self.form.text(keys::AADHAR_NUMBER)) {
            errors.push(FieldError::new(
                keys::AADHAR_NUMBER,
                "Please enter a valid 12-digit Aadhar number",
            ));
        }
        if !validate_email(&self.form.text(keys::EMAIL)) {
            errors.push(FieldError::new(
                keys::EMAIL,
                "Please enter a valid email address",
            ));
        }
        if self.form.text(keys::GENDER).is_empty() {
            errors.push(FieldError::new(keys::GENDER, "Please select your gender"));
        }
        let existing = self.form.text(keys::EXISTING_CUSTOMER);
        if existing.is_empty() {
            errors.push(FieldError::new(
                keys::EXISTING_CUSTOMER,
                "Please specify if you are an existing customer",
            ));
        }
        if existing == "yes" && self.form.text(keys::CIF_NUMBER).is_empty() {
            errors.push(FieldError::new(
                keys::CIF_NUMBER,
                "Please enter your CIF number",
            ));
        }
        if self.form.text(keys::RESIDENCE_TYPE).is_empty() {
            errors.push(FieldError::new(
                keys::RESIDENCE_TYPE,
                "Please select your residence type",
            ));
        }
        if !self
            .form
            .number(keys::YEARS_AT_RESIDENCE)
            .is_some_and(|years| years >= 0.0)
        {
            errors.push(FieldError::new(
                keys::YEARS_AT_RESIDENCE,
                "Please enter valid years at current residence",
            ));
        }
        errors
    }

    fn check_income_details(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.form.text(keys::EMPLOYER_NAME).is_empty() {
            errors.push(FieldError::new(
                keys::EMPLOYER_NAME,
                "Please enter your employer name",
            ));
        }
        let numeric = [
            (
                keys::GROSS_MONTHLY_INCOME,
                false,
                "Please enter a valid gross monthly income",
            ),
            (
                keys::TOTAL_MONTHLY_OBLIGATION,
                true,
                "Please enter valid total monthly obligation",
            ),
            (
                keys::YEARS_AT_EMPLOYER,
                true,
                "Please enter valid years at current employer",
            ),
        ];
        for (key, zero_allowed, message) in numeric {
            let ok = self.form.number(key).is_some_and(|n| {
                if zero_allowed {
                    n >= 0.0
                } else {
                    n > 0.0
                }
            });
            if !ok {
                errors.push(FieldError::new(key, message));
            }
        }
        if !validate_email(&self.form.text(keys::OFFICIAL_EMAIL_ID)) {
            errors.push(FieldError::new(
                keys::OFFICIAL_EMAIL_ID,
                "Please enter a valid official email address",
            ));
        }
        errors
    }

    fn check_documents(&self) -> Vec<FieldError> {
        if self.uploads.is_complete() {
            return Vec::new();
        }
        vec![FieldError::new(
            "documents",
            format!(
                "Please upload all required documents. {} documents remaining.",
                self.uploads.remaining_count()
            ),
        )]
    }

    /// Current value of a field as editable text
    pub fn field_text(&self, key: &str) -> String {
        match key {
            keys::LOAN_AMOUNT => self
                .form
                .loan_amount
                .map(|amount| amount.to_string())
                .unwrap_or_default(),
            keys::INTEREST_RATE => self.form.interest_rate.to_string(),
            keys::TENURE => self.form.tenure.to_string(),
            _ => match self.form.get(key) {
                Some(FieldValue::Text(s)) => s.clone(),
                Some(other) => other.as_text(),
                None => String::new(),
            },
        }
    }

    /// Merge one field into the form and persist
    pub fn set_field(&mut self, key: &str, value: impl Into<FieldValue>) -> Result<(), WizardError> {
        let value = value.into();
        match key {
            keys::LOAN_AMOUNT => {
                // Zero or negative amounts are stored as cleared
                self.form.loan_amount = match &value {
                    FieldValue::Text(s) if s.trim().is_empty() => None,
                    other => other
                        .as_number()
                        .filter(|amount| amount.is_finite())
                        .ok_or(WizardError::InvalidValue {
                            field: keys::LOAN_AMOUNT,
                            requirement: "a number",
                        })
                        .map(|amount| Some(amount).filter(|a| *a > 0.0))?,
                };
            }
            keys::INTEREST_RATE => {
                let rate = value
                    .as_number()
                    .filter(|rate| *rate >= 0.0)
                    .ok_or(WizardError::InvalidValue {
                        field: keys::INTEREST_RATE,
                        requirement: "zero or more",
                    })?;
                self.form.interest_rate = rate;
            }
            keys::TENURE => {
                let months = value
                    .as_number()
                    .filter(|m| *m >= 1.0 && m.fract() == 0.0 && *m <= u32::MAX as f64)
                    .ok_or(WizardError::InvalidValue {
                        field: keys::TENURE,
                        requirement: "a whole number of months greater than zero",
                    })?;
                self.form.tenure = months as u32;
            }
            keys::EXISTING_CUSTOMER => {
                if value.as_text() != "yes" {
                    self.form.remove(keys::CIF_NUMBER);
                }
                self.form.set(key, value);
            }
            keys::MOBILE => {
                if self.verified_mobile.as_deref() != Some(value.as_text().as_str()) {
                    self.verified_mobile = None;
                }
                self.form.set(key, value);
            }
            _ => self.form.set(key, value),
        }
        self.persist();
        Ok(())
    }

    /// Flip a checkbox field
    pub fn toggle_flag(&mut self, key: &str) {
        let flipped = !self.form.flag(key);
        self.form.set(key, flipped);
        self.persist();
    }

    /// Record the active button of a selection group and persist
    pub fn select_option(&mut self, group: &str, value: &str) {
        if group == keys::LOAN_TYPE_GROUP {
            self.select_loan_type(value);
            return;
        }
        self.form
            .selections
            .insert(group.to_string(), value.to_string());
        self.persist();
    }

    /// Choose the loan product; only vehicle loans keep a sub-type
    pub fn select_loan_type(&mut self, value: &str) {
        self.form
            .selections
            .insert(keys::LOAN_TYPE_GROUP.to_string(), value.to_string());
        if value != "vehicle" {
            self.form.selections.remove(keys::LOAN_SUB_TYPE_GROUP);
        }
        tracing::debug!("Loan type {value}, sub-type visible: {}", self.is_sub_type_visible());
        self.persist();
    }

    /// Whether the rendering layer must show the loan sub-type group
    pub fn is_sub_type_visible(&self) -> bool {
        self.form.selection(keys::LOAN_TYPE_GROUP) == Some("vehicle")
    }

    pub fn is_group_visible(&self, group: &str) -> bool {
        group != keys::LOAN_SUB_TYPE_GROUP || self.is_sub_type_visible()
    }

    /// Whether the CIF input applies
    pub fn is_cif_visible(&self) -> bool {
        self.form.text(keys::EXISTING_CUSTOMER) == "yes"
    }

    /// Move the tenure by `steps` slider notches, clamped to the allowed range
    pub fn adjust_tenure(&mut self, steps: i32) {
        let d = &self.defaults;
        let target = self.form.tenure as i64 + steps as i64 * d.tenure_step as i64;
        let clamped = target.clamp(d.tenure_min as i64, d.tenure_max as i64) as u32;
        if clamped != self.form.tenure {
            self.form.tenure = clamped;
            self.persist();
        }
    }

    pub fn record_upload(&mut self, id: DocumentId, meta: DocumentMeta) {
        tracing::info!("Recorded {id}: {} ({} bytes)", meta.name, meta.byte_size);
        self.uploads.record_upload(id, meta);
        self.persist_documents();
    }

    pub fn offer(&self) -> OfferSummary {
        OfferSummary::new(
            self.form.effective_loan_amount(),
            self.form.interest_rate,
            self.form.tenure,
        )
    }

    pub fn income_summary(&self) -> IncomeSummary {
        IncomeSummary::new(
            self.form.number(keys::GROSS_MONTHLY_INCOME).unwrap_or(0.0),
            self.form.number(keys::BONUS_OVERTIME_ARREAR).unwrap_or(0.0),
            self.form
                .number(keys::TOTAL_MONTHLY_OBLIGATION)
                .unwrap_or(0.0),
        )
    }

    pub fn mark_mobile_verified(&mut self, mobile: &str) {
        if self.form.text(keys::MOBILE) == mobile {
            self.verified_mobile = Some(mobile.to_string());
        }
    }

    pub fn is_mobile_verified(&self) -> bool {
        self.verified_mobile
            .as_deref()
            .is_some_and(|m| m == self.form.text(keys::MOBILE))
    }

    /// Prefill the basic details step
    pub fn fill_demo_data(&mut self) {
        self.form.set(keys::FULL_NAME, "John Doe");
        self.form.set(keys::MOBILE, "9876543210");
        self.form.loan_amount = Some(500_000.0);
        self.form.set(keys::PAN_NUMBER, "ABCDE1234F");
        self.form.set(keys::AGREE_OVD, true);
        self.persist();
    }

    /// Plain-text summary for download
    pub fn summary_text(&self, application_date: &str) -> String {
        let offer = self.offer();
        let mut lines = vec![
            "LOAN APPLICATION SUMMARY".to_string(),
            format!("Date: {application_date}"),
        ];
        if let Some(reference) = self.application_ref {
            lines.push(format!("Reference: {reference}"));
        }
        if let Some(at) = self.submitted_at {
            lines.push(format!("Submitted: {}", at.format("%d/%m/%Y %H:%M UTC")));
        }
        for (group, value) in &self.form.selections {
            lines.push(format!("{group}: {value}"));
        }
        for key in [
            keys::FULL_NAME,
            keys::MOBILE,
            keys::PAN_NUMBER,
            keys::EMAIL,
            keys::EMPLOYER_NAME,
        ] {
            let label = find_field(key).map_or(key, |field| field.label);
            lines.push(format!("{label}: {}", self.form.text(key)));
        }
        lines.push(format!("Loan Amount: {}", offer.loan_amount_display()));
        lines.push(format!("Interest Rate: {}%", offer.interest_rate_display()));
        lines.push(format!("Tenure: {} months", offer.tenure_months));
        lines.push(format!("EMI: {}", offer.emi_display()));
        lines.push(String::from("Documents:"));
        for (id, meta) in self.uploads.iter() {
            lines.push(format!("  {}: {}", id.label(), meta.name));
        }
        lines.join("\n") + "\n"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryBackend, FORM_DATA_KEY};
    use pretty_assertions::assert_eq;

    fn wizard() -> Wizard {
        Wizard::new(
            PersistenceStore::new(MemoryBackend::default()),
            LoanDefaults::default(),
        )
    }

    fn wizard_with_backend(backend: &MemoryBackend) -> Wizard {
        Wizard::new(
            PersistenceStore::new(backend.clone()),
            LoanDefaults::default(),
        )
    }

    fn meta(name: &str) -> DocumentMeta {
        DocumentMeta {
            name: name.to_string(),
            byte_size: 100,
            mime_type: "application/pdf".to_string(),
            upload_timestamp: Utc::now(),
        }
    }

    fn fill_basic(w: &mut Wizard) {
        w.set_field(keys::FULL_NAME, "John Doe").unwrap();
        w.set_field(keys::MOBILE, "9876543210").unwrap();
        w.set_field(keys::LOAN_AMOUNT, "500000").unwrap();
        w.set_field(keys::PAN_NUMBER, "ABCDE1234F").unwrap();
        w.set_field(keys::AGREE_OVD, true).unwrap();
    }

    fn fill_personal(w: &mut Wizard) {
        w.set_field(keys::ADDRESS, "12 MG Road, Pune").unwrap();
        w.set_field(keys::DOB, "1990-01-01").unwrap();
        w.set_field(keys::FATHER_NAME, "Richard Doe").unwrap();
        w.set_field(keys::AADHAR_NUMBER, "1234 5678 9012").unwrap();
        w.set_field(keys::EMAIL, "john@example.com").unwrap();
        w.set_field(keys::GENDER, "male").unwrap();
        w.set_field(keys::EXISTING_CUSTOMER, "no").unwrap();
        w.set_field(keys::RESIDENCE_TYPE, "owned").unwrap();
        w.set_field(keys::YEARS_AT_RESIDENCE, "5").unwrap();
    }

    fn fill_income(w: &mut Wizard) {
        w.set_field(keys::EMPLOYER_NAME, "Acme").unwrap();
        w.set_field(keys::GROSS_MONTHLY_INCOME, "90000").unwrap();
        w.set_field(keys::TOTAL_MONTHLY_OBLIGATION, "0").unwrap();
        w.set_field(keys::YEARS_AT_EMPLOYER, "2").unwrap();
        w.set_field(keys::OFFICIAL_EMAIL_ID, "john@acme.com").unwrap();
    }

    fn upload_all(w: &mut Wizard) {
        for id in DocumentId::REQUIRED {
            w.record_upload(id, meta(id.as_str()));
        }
    }

    /// Walk a fresh wizard up to `target` through valid data
    fn advance_to(w: &mut Wizard, target: WizardStep) {
        while w.current_step() != target {
            match w.current_step() {
                WizardStep::LoanSelection => w.select_loan_type("personal"),
                WizardStep::BasicDetails => fill_basic(w),
                WizardStep::PersonalDetails => fill_personal(w),
                WizardStep::IncomeDetails => fill_income(w),
                WizardStep::DocumentUpload => upload_all(w),
                _ => {}
            }
            assert!(w.advance().is_valid(), "stuck at {:?}", w.current_step());
        }
    }

    mod navigation {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_starts_at_loan_selection() {
            let w = wizard();
            assert_eq!(w.current_step(), WizardStep::LoanSelection);
            assert_eq!(w.form().loan_amount, Some(1_000_000.0));
        }

        #[test]
        fn test_retreat_at_start_is_idempotent() {
            let mut w = wizard();
            for _ in 0..5 {
                w.retreat();
                assert_eq!(w.current_step(), WizardStep::LoanSelection);
            }
        }

        #[test]
        fn test_full_happy_path() {
            let mut w = wizard();
            advance_to(&mut w, WizardStep::ThankYou);
            assert!(w.application_ref().is_some());
            assert!(w.submitted_at().is_some());
            // No successor or predecessor once submitted
            assert!(w.advance().is_valid());
            w.retreat();
            assert_eq!(w.current_step(), WizardStep::ThankYou);
        }

        #[test]
        fn test_offer_always_valid_and_jumps_to_upload() {
            let mut w = wizard();
            advance_to(&mut w, WizardStep::Offer);
            assert!(w.advance().is_valid());
            assert_eq!(w.current_step(), WizardStep::DocumentUpload);
            w.retreat();
            assert_eq!(w.current_step(), WizardStep::Offer);
        }

        #[test]
        fn test_retreat_skips_validation() {
            let mut w = wizard();
            advance_to(&mut w, WizardStep::PersonalDetails);
            w.set_field(keys::FULL_NAME, "").unwrap();
            w.retreat();
            assert_eq!(w.current_step(), WizardStep::BasicDetails);
        }

        #[test]
        fn test_step_change_invalidates_token() {
            let mut w = wizard();
            advance_to(&mut w, WizardStep::BasicDetails);
            let token = w.token();
            assert!(w.is_current(token));
            w.retreat();
            assert!(!w.is_current(token));
            w.select_loan_type("home");
            w.advance();
            // Same step, new visit
            assert_eq!(w.current_step(), token.step);
            assert!(!w.is_current(token));
        }
    }

    mod validation {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_loan_selection_requires_a_type() {
            let mut w = wizard();
            let result = w.advance();
            assert_eq!(result.failed_fields(), vec!["loan_type"]);
            assert_eq!(
                result.error_for("loan_type"),
                Some("Please select a loan type to continue")
            );
            assert_eq!(w.current_step(), WizardStep::LoanSelection);
            assert_eq!(w.last_validation(), &result);
        }

        #[test]
        fn test_vehicle_loan_requires_sub_type() {
            let mut w = wizard();
            w.select_loan_type("vehicle");
            let result = w.advance();
            assert_eq!(result.failed_fields(), vec!["loan_sub_type"]);

            w.select_option(keys::LOAN_SUB_TYPE_GROUP, "used_car");
            assert!(w.advance().is_valid());
            assert_eq!(w.current_step(), WizardStep::BasicDetails);
        }

        #[test]
        fn test_empty_basic_details_reports_all_five() {
            let mut w = wizard();
            advance_to(&mut w, WizardStep::BasicDetails);
            w.set_field(keys::LOAN_AMOUNT, "").unwrap();

            let result = w.advance();
            assert_eq!(
                result.failed_fields(),
                vec!["fullName", "mobile", "loanAmount", "panNumber", "agreeOVD"]
            );
            assert_eq!(w.current_step(), WizardStep::BasicDetails);
        }

        #[test]
        fn test_basic_details_field_checks() {
            let mut w = wizard();
            advance_to(&mut w, WizardStep::BasicDetails);
            fill_basic(&mut w);
            w.set_field(keys::MOBILE, "5876543210").unwrap();
            w.set_field(keys::PAN_NUMBER, "ABCD1234F").unwrap();
            w.set_field(keys::LOAN_AMOUNT, "0").unwrap();
            w.set_field(keys::AGREE_OVD, false).unwrap();

            let result = w.advance();
            assert_eq!(
                result.failed_fields(),
                vec!["mobile", "loanAmount", "panNumber", "agreeOVD"]
            );
        }

        #[test]
        fn test_personal_details_cif_required_for_existing_customers() {
            let mut w = wizard();
            advance_to(&mut w, WizardStep::PersonalDetails);
            fill_personal(&mut w);
            w.set_field(keys::EXISTING_CUSTOMER, "yes").unwrap();

            let result = w.advance();
            assert_eq!(result.failed_fields(), vec!["cifNumber"]);

            w.set_field(keys::CIF_NUMBER, "CIF123").unwrap();
            assert!(w.advance().is_valid());
        }

        #[test]
        fn test_personal_details_exhaustive() {
            let mut w = wizard();
            advance_to(&mut w, WizardStep::PersonalDetails);
            w.set_field(keys::AADHAR_NUMBER, "12345").unwrap();
            w.set_field(keys::EMAIL, "nope").unwrap();
            w.set_field(keys::YEARS_AT_RESIDENCE, "-1").unwrap();

            let result = w.advance();
            assert_eq!(
                result.failed_fields(),
                vec![
                    "address",
                    "dob",
                    "fatherName",
                    "aadharNumber",
                    "email",
                    "gender",
                    "existingCustomer",
                    "residenceType",
                    "yearsAtResidence"
                ]
            );
        }

        #[test]
        fn test_income_details_bounds() {
            let mut w = wizard();
            advance_to(&mut w, WizardStep::IncomeDetails);
            fill_income(&mut w);
            w.set_field(keys::GROSS_MONTHLY_INCOME, "0").unwrap();
            w.set_field(keys::TOTAL_MONTHLY_OBLIGATION, "-5").unwrap();
            w.set_field(keys::YEARS_AT_EMPLOYER, "abc").unwrap();
            w.set_field(keys::OFFICIAL_EMAIL_ID, "john@acme").unwrap();

            let result = w.advance();
            assert_eq!(
                result.failed_fields(),
                vec![
                    "grossMonthlyIncome",
                    "totalMonthlyObligation",
                    "yearsAtEmployer",
                    "officialEmailID"
                ]
            );
        }

        #[test]
        fn test_document_upload_blocks_until_complete() {
            let mut w = wizard();
            advance_to(&mut w, WizardStep::DocumentUpload);
            w.record_upload(DocumentId::BankStatement, meta("a.pdf"));
            w.record_upload(DocumentId::GstDoc, meta("b.pdf"));
            w.record_upload(DocumentId::ItrDoc, meta("c.pdf"));

            let result = w.advance();
            assert_eq!(
                result.error_for("documents"),
                Some("Please upload all required documents. 1 documents remaining.")
            );
            assert_eq!(w.current_step(), WizardStep::DocumentUpload);

            w.record_upload(DocumentId::DealerInvoice, meta("d.pdf"));
            assert!(w.advance().is_valid());
            assert_eq!(w.current_step(), WizardStep::FinalApproval);
        }

        #[test]
        fn test_errors_cleared_after_step_change() {
            let mut w = wizard();
            advance_to(&mut w, WizardStep::BasicDetails);
            assert!(!w.advance().is_valid());
            assert!(!w.last_validation().is_valid());
            w.retreat();
            assert!(w.last_validation().is_valid());
        }
    }

    mod fields {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_loan_amount_parsing() {
            let mut w = wizard();
            w.set_field(keys::LOAN_AMOUNT, "750000").unwrap();
            assert_eq!(w.form().loan_amount, Some(750_000.0));
            assert_eq!(w.field_text(keys::LOAN_AMOUNT), "750000");

            w.set_field(keys::LOAN_AMOUNT, "").unwrap();
            assert_eq!(w.form().loan_amount, None);
            assert_eq!(w.field_text(keys::LOAN_AMOUNT), "");

            let err = w.set_field(keys::LOAN_AMOUNT, "lots").unwrap_err();
            assert!(matches!(err, WizardError::InvalidValue { field: "loanAmount", .. }));
        }

        #[test]
        fn test_non_positive_loan_amount_is_never_stored() {
            let mut w = wizard();
            w.set_field(keys::LOAN_AMOUNT, "-5").unwrap();
            assert_eq!(w.form().loan_amount, None);
            w.set_field(keys::LOAN_AMOUNT, 0.0).unwrap();
            assert_eq!(w.form().loan_amount, None);
            assert_eq!(w.form().invariant_violation(), None);
            assert!(w.set_field(keys::LOAN_AMOUNT, "inf").is_err());
        }

        #[test]
        fn test_toggle_flag_persists() {
            let backend = MemoryBackend::default();
            let mut w = wizard_with_backend(&backend);
            w.toggle_flag(keys::AGREE_OVD);
            assert!(w.form().flag(keys::AGREE_OVD));
            let saved = backend.raw(FORM_DATA_KEY).unwrap();
            assert!(saved.contains("\"agreeOVD\":true"));
            w.toggle_flag(keys::AGREE_OVD);
            assert!(!w.form().flag(keys::AGREE_OVD));
        }

        #[test]
        fn test_reserved_invariants() {
            let mut w = wizard();
            assert!(w.set_field(keys::TENURE, 0.0).is_err());
            assert!(w.set_field(keys::TENURE, "12.5").is_err());
            assert!(w.set_field(keys::INTEREST_RATE, -1.0).is_err());
            w.set_field(keys::TENURE, "36").unwrap();
            w.set_field(keys::INTEREST_RATE, 0.0).unwrap();
            assert_eq!(w.form().tenure, 36);
            assert_eq!(w.form().interest_rate, 0.0);
        }

        #[test]
        fn test_leaving_existing_customer_clears_cif() {
            let mut w = wizard();
            w.set_field(keys::EXISTING_CUSTOMER, "yes").unwrap();
            assert!(w.is_cif_visible());
            w.set_field(keys::CIF_NUMBER, "CIF1").unwrap();
            w.set_field(keys::EXISTING_CUSTOMER, "no").unwrap();
            assert!(!w.is_cif_visible());
            assert_eq!(w.field_text(keys::CIF_NUMBER), "");
        }

        #[test]
        fn test_toggle_flag() {
            let mut w = wizard();
            w.toggle_flag(keys::AGREE_OVD);
            assert!(w.form().flag(keys::AGREE_OVD));
            w.toggle_flag(keys::AGREE_OVD);
            assert!(!w.form().flag(keys::AGREE_OVD));
        }

        #[test]
        fn test_select_loan_type_controls_sub_type() {
            let mut w = wizard();
            w.select_loan_type("vehicle");
            assert!(w.is_sub_type_visible());
            w.select_option(keys::LOAN_SUB_TYPE_GROUP, "new_car");

            w.select_loan_type("personal");
            assert!(!w.is_sub_type_visible());
            assert_eq!(w.form().selection(keys::LOAN_SUB_TYPE_GROUP), None);
        }

        #[test]
        fn test_select_option_routes_loan_type() {
            let mut w = wizard();
            w.select_option(keys::LOAN_TYPE_GROUP, "vehicle");
            assert!(w.is_sub_type_visible());
        }

        #[test]
        fn test_tenure_slider_clamps() {
            let mut w = wizard();
            w.adjust_tenure(1);
            assert_eq!(w.form().tenure, 84);
            w.adjust_tenure(-2);
            assert_eq!(w.form().tenure, 72);
            w.adjust_tenure(-100);
            assert_eq!(w.form().tenure, 12);
        }

        #[test]
        fn test_mobile_verification_follows_number() {
            let mut w = wizard();
            w.set_field(keys::MOBILE, "9876543210").unwrap();
            w.mark_mobile_verified("9876543210");
            assert!(w.is_mobile_verified());
            w.set_field(keys::MOBILE, "9876543211").unwrap();
            assert!(!w.is_mobile_verified());
        }

        #[test]
        fn test_verification_for_stale_number_is_ignored() {
            let mut w = wizard();
            w.set_field(keys::MOBILE, "9876543211").unwrap();
            w.mark_mobile_verified("9876543210");
            assert!(!w.is_mobile_verified());
        }

        #[test]
        fn test_income_summary() {
            let mut w = wizard();
            w.set_field(keys::GROSS_MONTHLY_INCOME, "100000").unwrap();
            w.set_field(keys::BONUS_OVERTIME_ARREAR, "10000").unwrap();
            w.set_field(keys::TOTAL_MONTHLY_OBLIGATION, "").unwrap();
            let summary = w.income_summary();
            assert_eq!(summary.total_income, 90_000.0);
            assert_eq!(summary.net_monthly_salary, 90_000.0);
        }

        #[test]
        fn test_offer_uses_form_parameters() {
            let mut w = wizard();
            assert_eq!(w.offer().emi_rounded(), 15_836);
            w.set_field(keys::LOAN_AMOUNT, "").unwrap();
            assert_eq!(w.offer().principal, 1_000_000.0);
            w.set_field(keys::INTEREST_RATE, 0.0).unwrap();
            assert_eq!(w.offer().emi, 1_000_000.0 / 84.0);
        }
    }

    mod persistence {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_every_mutation_is_saved() {
            let backend = MemoryBackend::default();
            let mut w = wizard_with_backend(&backend);
            w.set_field(keys::FULL_NAME, "Jane").unwrap();
            assert!(backend.raw(FORM_DATA_KEY).unwrap().contains("\"fullName\":\"Jane\""));

            w.select_loan_type("home");
            assert!(backend.raw(FORM_DATA_KEY).unwrap().contains("\"loan_type\":\"home\""));
        }

        #[test]
        fn test_restores_saved_state() {
            let backend = MemoryBackend::default();
            {
                let mut w = wizard_with_backend(&backend);
                w.set_field(keys::FULL_NAME, "Jane").unwrap();
                w.select_loan_type("vehicle");
                w.record_upload(DocumentId::GstDoc, meta("gst.pdf"));
            }
            let w = wizard_with_backend(&backend);
            assert_eq!(w.form().text(keys::FULL_NAME), "Jane");
            assert!(w.is_sub_type_visible());
            assert!(w.uploads().is_uploaded(DocumentId::GstDoc));
            assert_eq!(w.current_step(), WizardStep::LoanSelection);
        }

        #[test]
        fn test_inconsistent_snapshot_falls_back_to_defaults() {
            let backend = MemoryBackend::default();
            backend.put_raw(
                FORM_DATA_KEY,
                r#"{"loanAmount": -5, "interestRate": -3, "tenure": 0}"#,
            );
            let w = wizard_with_backend(&backend);
            assert_eq!(w.form(), &FormData::default());
            assert_eq!(w.offer().tenure_months, 84);
        }

        #[test]
        fn test_corrupt_snapshot_falls_back_to_defaults() {
            let backend = MemoryBackend::default();
            backend.put_raw(FORM_DATA_KEY, "]]garbage");
            let w = wizard_with_backend(&backend);
            assert_eq!(w.form(), &FormData::default());
        }

        #[test]
        fn test_reset_clears_everything() {
            let backend = MemoryBackend::default();
            let mut w = wizard_with_backend(&backend);
            advance_to(&mut w, WizardStep::FinalApproval);
            let token = w.token();

            w.reset();
            assert_eq!(w.current_step(), WizardStep::LoanSelection);
            assert_eq!(w.form(), &FormData::default());
            assert_eq!(w.uploads().remaining_count(), 4);
            assert!(!w.is_current(token));
            assert_eq!(backend.raw(FORM_DATA_KEY), None);
        }

        #[test]
        fn test_configured_defaults_apply_after_reset() {
            let defaults = LoanDefaults {
                loan_amount: 200_000.0,
                interest_rate: 10.0,
                tenure: 36,
                ..LoanDefaults::default()
            };
            let mut w = Wizard::new(PersistenceStore::new(MemoryBackend::default()), defaults);
            assert_eq!(w.form().tenure, 36);
            w.set_field(keys::TENURE, "60").unwrap();
            w.reset();
            assert_eq!(w.form().tenure, 36);
            assert_eq!(w.form().loan_amount, Some(200_000.0));
        }
    }

    #[test]
    fn test_summary_text_lists_offer_and_documents() {
        let mut w = wizard();
        advance_to(&mut w, WizardStep::ThankYou);
        let summary = w.summary_text("16/10/2026");
        assert!(summary.contains("Date: 16/10/2026"));
        assert!(summary.contains("Full Name (as per PAN): John Doe"));
        assert!(summary.contains("Employer Name: Acme"));
        assert!(summary.contains("Submitted: "));
        assert!(summary.contains("Loan Amount: 5.0 Lakhs"));
        assert!(summary.contains("Reference: "));
        assert!(summary.contains("Dealer Invoice: dealerInvoice"));
    }
}
