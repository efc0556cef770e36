//! Application state and core logic

use crate::calculator::format_en_in_date;
use crate::config::WizardConfig;
use crate::state::{
    fields_for, keys, DocumentId, FieldKind, FieldSpec, LoanDefaults, SelectionGroup, Wizard,
    WizardStep, SELECTION_GROUPS,
};
use crate::store::{FileBackend, PersistenceStore};
use crate::tasks::{PendingAction, TaskScheduler};
use crate::uploads::stage_upload;
use crate::validators::validate_mobile;
use anyhow::Result;
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Confirmation text shown before discarding an application
pub const RESTART_PROMPT: &str =
    "Are you sure you want to start a new application? All current data will be lost.";

/// Severity of a transient message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    /// How long a message of this kind stays on screen
    pub fn ttl(self) -> Duration {
        match self {
            ToastKind::Success => Duration::from_secs(3),
            ToastKind::Error => Duration::from_secs(5),
        }
    }
}

/// A transient message in the corner of the screen
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    shown_at: Instant,
}

impl Toast {
    pub fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            message: message.into(),
            kind,
            shown_at: Instant::now(),
        }
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= self.kind.ttl()
    }
}

/// Main application struct
pub struct App {
    /// Application in progress
    pub wizard: Wizard,
    pub config: WizardConfig,
    /// Where downloaded summaries are written
    data_dir: PathBuf,
    scheduler: TaskScheduler,
    /// Current transient message
    pub toast: Option<Toast>,
    /// Restart confirmation is open
    pub confirm_restart: bool,
    /// Focused field, selection group or document on the current step
    pub focus: usize,
    /// Path typed on the document upload step
    pub upload_path: String,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Create a new App writing snapshots under the configured data directory
    pub fn new(config: WizardConfig) -> Result<Self> {
        let data_dir = config.data_dir();
        fs::create_dir_all(&data_dir)?;
        tracing::info!("Using data directory {}", data_dir.display());
        let store = PersistenceStore::new(FileBackend::new(&data_dir));
        Ok(Self::with_store(config, store, data_dir))
    }

    pub fn with_store(config: WizardConfig, store: PersistenceStore, data_dir: PathBuf) -> Self {
        let defaults: LoanDefaults = config.loan_defaults();
        Self {
            wizard: Wizard::new(store, defaults),
            config,
            data_dir,
            scheduler: TaskScheduler::new(),
            toast: None,
            confirm_restart: false,
            focus: 0,
            upload_path: String::new(),
            quit: false,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn is_busy(&self) -> bool {
        self.scheduler.is_busy()
    }

    /// Label of the operation in flight, if any
    pub fn busy_label(&self) -> Option<&'static str> {
        self.scheduler.busy_label()
    }

    pub fn push_error(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast::new(message, ToastKind::Error));
    }

    pub fn push_success(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast::new(message, ToastKind::Success));
    }

    /// Today's date as shown on the application
    pub fn application_date(&self) -> String {
        format_en_in_date(Local::now().date_naive())
    }

    /// Inputs shown on the current step
    pub fn visible_fields(&self) -> Vec<&'static FieldSpec> {
        fields_for(self.wizard.current_step())
            .iter()
            .filter(|f| f.key != keys::CIF_NUMBER || self.wizard.is_cif_visible())
            .collect()
    }

    /// Selection groups shown on the loan selection step
    pub fn visible_groups(&self) -> Vec<&'static SelectionGroup> {
        SELECTION_GROUPS
            .iter()
            .filter(|g| self.wizard.is_group_visible(g.key))
            .collect()
    }

    fn focus_len(&self) -> usize {
        match self.wizard.current_step() {
            WizardStep::LoanSelection => self.visible_groups().len(),
            WizardStep::DocumentUpload => DocumentId::REQUIRED.len(),
            _ => self.visible_fields().len(),
        }
    }

    /// Focus index clamped to what the step currently shows
    pub fn focus_index(&self) -> usize {
        self.focus.min(self.focus_len().saturating_sub(1))
    }

    pub fn focused_field(&self) -> Option<&'static FieldSpec> {
        self.visible_fields().get(self.focus_index()).copied()
    }

    pub fn focused_document(&self) -> DocumentId {
        DocumentId::REQUIRED[self.focus.min(DocumentId::REQUIRED.len() - 1)]
    }

    fn next_focus(&mut self) {
        let len = self.focus_len();
        if len > 0 {
            self.focus = (self.focus_index() + 1) % len;
        }
    }

    fn prev_focus(&mut self) {
        let len = self.focus_len();
        if len > 0 {
            self.focus = (self.focus_index() + len - 1) % len;
        }
    }

    /// Apply finished delayed operations and expire messages; call every frame
    pub fn poll_tasks(&mut self) {
        if self
            .toast
            .as_ref()
            .is_some_and(|t| t.is_expired_at(Instant::now()))
        {
            self.toast = None;
        }

        for completion in self.scheduler.drain_completed() {
            if !self.wizard.is_current(completion.token) {
                tracing::info!(
                    "Dropping stale completion {:?} from {:?}",
                    completion.action,
                    completion.token
                );
                continue;
            }
            self.apply(completion.action);
        }
    }

    fn apply(&mut self, action: PendingAction) {
        match action {
            PendingAction::VerifyMobile { mobile } => {
                self.wizard.mark_mobile_verified(&mobile);
                if self.wizard.is_mobile_verified() {
                    self.push_success("Mobile number verified successfully");
                }
            }
            PendingAction::RecordUpload { id, meta } => {
                let name = meta.name.clone();
                let verb = if self.wizard.uploads().is_uploaded(id) {
                    "replaced"
                } else {
                    "uploaded"
                };
                self.wizard.record_upload(id, meta);
                self.upload_path.clear();
                self.push_success(format!("{name} {verb} successfully"));
            }
            PendingAction::Submit => {
                let before = self.wizard.token();
                if self.wizard.advance().is_valid() {
                    self.after_navigation(before);
                    self.push_success("Application submitted successfully");
                }
            }
            PendingAction::DownloadSummary { path } => match self.write_summary(&path) {
                Ok(()) => self.push_success(format!("Summary saved to {}", path.display())),
                Err(e) => {
                    tracing::warn!("Failed to write summary: {e:#}");
                    self.push_error(format!("Could not save summary: {e}"));
                }
            },
        }
    }

    fn write_summary(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.wizard.summary_text(&self.application_date()))?;
        tracing::info!("Wrote application summary to {}", path.display());
        Ok(())
    }

    /// Reset focus and drop in-flight work once the step visit changes
    fn after_navigation(&mut self, before: crate::state::StepToken) {
        if !self.wizard.is_current(before) {
            self.scheduler.cancel_all();
            self.focus = 0;
            self.upload_path.clear();
        }
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Restart confirmation is modal
        if self.confirm_restart {
            match key.code {
                KeyCode::Enter | KeyCode::Char('y') => {
                    self.confirm_restart = false;
                    self.restart();
                }
                KeyCode::Esc | KeyCode::Char('n') => self.confirm_restart = false,
                _ => {}
            }
            return Ok(());
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('r') if ctrl => {
                self.confirm_restart = true;
                return Ok(());
            }
            KeyCode::Char('d') if ctrl && !self.is_busy() => {
                self.fill_demo_data();
                return Ok(());
            }
            _ => {}
        }

        // Only cancellation while something is in flight
        if self.is_busy() {
            if key.code == KeyCode::Esc {
                let cancelled = self.scheduler.cancel_all();
                if cancelled > 0 {
                    self.push_error("Operation cancelled");
                }
            }
            return Ok(());
        }

        let before = self.wizard.token();
        match self.wizard.current_step() {
            WizardStep::LoanSelection => self.handle_loan_selection_key(key),
            WizardStep::BasicDetails | WizardStep::PersonalDetails | WizardStep::IncomeDetails => {
                self.handle_form_key(key)
            }
            WizardStep::Offer => self.handle_offer_key(key),
            WizardStep::DocumentUpload => self.handle_upload_key(key),
            WizardStep::FinalApproval => self.handle_final_approval_key(key),
            WizardStep::ThankYou => self.handle_thank_you_key(key),
        }
        self.after_navigation(before);
        Ok(())
    }

    /// Validate and move forward, focusing the first failing input
    fn advance(&mut self) {
        let result = self.wizard.advance();
        if let Some(first) = result.errors().first() {
            let pos = match self.wizard.current_step() {
                WizardStep::LoanSelection => self
                    .visible_groups()
                    .iter()
                    .position(|g| g.key == first.field),
                _ => self
                    .visible_fields()
                    .iter()
                    .position(|f| f.key == first.field),
            };
            if let Some(pos) = pos {
                self.focus = pos;
            }
            if self.wizard.current_step() == WizardStep::DocumentUpload {
                self.push_error(first.message.clone());
            }
        }
    }

    fn handle_loan_selection_key(&mut self, key: KeyEvent) {
        let groups = self.visible_groups();
        let Some(group) = groups.get(self.focus_index()).copied() else {
            return;
        };
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.next_focus(),
            KeyCode::BackTab | KeyCode::Up => self.prev_focus(),
            KeyCode::Left => self.cycle_selection(group, -1),
            KeyCode::Right | KeyCode::Char(' ') => self.cycle_selection(group, 1),
            KeyCode::Char(c @ '1'..='9') => {
                let idx = c as usize - '1' as usize;
                if let Some((value, _)) = group.options.get(idx) {
                    self.wizard.select_option(group.key, value);
                }
            }
            KeyCode::Enter => self.advance(),
            _ => {}
        }
    }

    fn cycle_selection(&mut self, group: &SelectionGroup, delta: isize) {
        let options = group.options;
        let current = self
            .wizard
            .form()
            .selection(group.key)
            .and_then(|v| options.iter().position(|(o, _)| *o == v));
        let next = match current {
            Some(idx) => (idx as isize + delta).rem_euclid(options.len() as isize) as usize,
            None if delta < 0 => options.len() - 1,
            None => 0,
        };
        self.wizard.select_option(group.key, options[next].0);
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let Some(field) = self.focused_field() else {
            return;
        };
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.next_focus(),
            KeyCode::BackTab | KeyCode::Up => self.prev_focus(),
            KeyCode::Enter => self.advance(),
            KeyCode::Esc => self.wizard.retreat(),
            KeyCode::Char('v') if ctrl && self.wizard.current_step() == WizardStep::BasicDetails => {
                self.verify_mobile()
            }
            KeyCode::Char(' ') if field.kind == FieldKind::Checkbox => {
                self.wizard.toggle_flag(field.key)
            }
            KeyCode::Left | KeyCode::Right => {
                if let FieldKind::Choice(options) = field.kind {
                    let delta = if key.code == KeyCode::Left { -1 } else { 1 };
                    self.cycle_choice(field.key, options, delta);
                }
            }
            KeyCode::Char(c) if !ctrl => self.type_char(field, c),
            KeyCode::Backspace => {
                let mut text = self.wizard.field_text(field.key);
                if text.pop().is_some() {
                    self.set_text(field.key, text);
                }
            }
            _ => {}
        }
    }

    fn type_char(&mut self, field: &FieldSpec, c: char) {
        let mut text = self.wizard.field_text(field.key);
        if !field.accepts(c, &text) {
            return;
        }
        if field.kind == FieldKind::Upper {
            text.push(c.to_ascii_uppercase());
        } else {
            text.push(c);
        }
        self.set_text(field.key, text);
    }

    fn set_text(&mut self, key: &str, text: String) {
        if let Err(e) = self.wizard.set_field(key, text) {
            self.push_error(e.to_string());
        }
    }

    fn cycle_choice(&mut self, key: &str, options: &[(&str, &str)], delta: isize) {
        let current = self.wizard.form().text(key);
        let next = match options.iter().position(|(v, _)| *v == current) {
            Some(idx) => (idx as isize + delta).rem_euclid(options.len() as isize) as usize,
            None if delta < 0 => options.len() - 1,
            None => 0,
        };
        self.set_text(key, options[next].0.to_string());
    }

    fn handle_offer_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left | KeyCode::Char('-') => self.wizard.adjust_tenure(-1),
            KeyCode::Right | KeyCode::Char('+') => self.wizard.adjust_tenure(1),
            KeyCode::Enter => self.advance(),
            KeyCode::Esc => self.wizard.retreat(),
            _ => {}
        }
    }

    fn handle_upload_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.next_focus(),
            KeyCode::BackTab | KeyCode::Up => self.prev_focus(),
            KeyCode::Enter if !self.upload_path.trim().is_empty() => self.start_upload(),
            KeyCode::Enter => self.advance(),
            KeyCode::Esc => self.wizard.retreat(),
            KeyCode::Backspace => {
                self.upload_path.pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.upload_path.push(c)
            }
            _ => {}
        }
    }

    fn handle_final_approval_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.scheduler.schedule(
                    self.wizard.token(),
                    self.config.submit_delay(),
                    PendingAction::Submit,
                );
            }
            KeyCode::Esc => self.wizard.retreat(),
            _ => {}
        }
    }

    fn handle_thank_you_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('d') => self.download_summary(),
            KeyCode::Char('n') => self.confirm_restart = true,
            KeyCode::Char('q') => self.quit = true,
            _ => {}
        }
    }

    /// Start the simulated verification of the entered mobile number
    pub fn verify_mobile(&mut self) {
        let mobile = self.wizard.form().text(keys::MOBILE);
        if !validate_mobile(&mobile) {
            self.push_error("Please enter a valid 10-digit mobile number");
            return;
        }
        self.scheduler.schedule(
            self.wizard.token(),
            self.config.verify_delay(),
            PendingAction::VerifyMobile { mobile },
        );
    }

    /// Check the typed path and start the simulated upload for the focused document
    pub fn start_upload(&mut self) {
        let id = self.focused_document();
        let path = PathBuf::from(self.upload_path.trim());
        match stage_upload(&path, self.config.max_upload_bytes()) {
            Ok(meta) => {
                tracing::info!("Uploading {} as {id}", path.display());
                self.scheduler.schedule(
                    self.wizard.token(),
                    self.config.upload_delay(),
                    PendingAction::RecordUpload { id, meta },
                );
            }
            Err(e) => {
                tracing::info!("Upload for {id} rejected: {e}");
                self.push_error(e.to_string());
            }
        }
    }

    /// Start the simulated download of the application summary
    pub fn download_summary(&mut self) {
        let name = match self.wizard.application_ref() {
            Some(reference) => format!("loan-application-{reference}.txt"),
            None => "loan-application-summary.txt".to_string(),
        };
        self.scheduler.schedule(
            self.wizard.token(),
            self.config.download_delay(),
            PendingAction::DownloadSummary {
                path: self.data_dir.join(name),
            },
        );
    }

    fn fill_demo_data(&mut self) {
        self.wizard.fill_demo_data();
        self.push_success("Demo data filled");
    }

    /// Discard everything and start over
    pub fn restart(&mut self) {
        self.scheduler.cancel_all();
        self.wizard.reset();
        self.focus = 0;
        self.upload_path.clear();
        self.toast = None;
    }
}
