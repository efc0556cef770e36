//! UI module for rendering the TUI
//!
//! Rendering only reads wizard state; every change goes through `App`.

mod approval;
mod components;
mod documents;
mod forms;
mod layout;
mod offer;
mod selection;

use crate::app::{App, RESTART_PROMPT};
use crate::state::WizardStep;
use components::{render_confirm_dialog, render_loading_dialog, render_toast};
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let step = app.wizard.current_step();
    let screen = layout::create_layout(frame.area(), step.shows_progress());

    layout::draw_header(frame, screen.header, app);
    if let Some(area) = screen.progress {
        layout::draw_progress(frame, area, step);
    }

    // Exactly one step is visible
    match step {
        WizardStep::LoanSelection => selection::draw(frame, screen.body, app),
        WizardStep::BasicDetails | WizardStep::PersonalDetails | WizardStep::IncomeDetails => {
            forms::draw_details_form(frame, screen.body, app)
        }
        WizardStep::Offer => offer::draw(frame, screen.body, app),
        WizardStep::DocumentUpload => documents::draw(frame, screen.body, app),
        WizardStep::FinalApproval => approval::draw_final_approval(frame, screen.body, app),
        WizardStep::ThankYou => approval::draw_thank_you(frame, screen.body, app),
    }

    layout::draw_status_bar(frame, screen.status, app);

    // Overlays
    if let Some(label) = app.busy_label() {
        let millis = chrono::Utc::now().timestamp_subsec_millis();
        render_loading_dialog(frame, label, millis);
    }
    if let Some(toast) = &app.toast {
        render_toast(frame, toast);
    }
    if app.confirm_restart {
        render_confirm_dialog(frame, "Start Over?", RESTART_PROMPT);
    }
}
