//! Wizard steps and the transition table between them

use serde::{Deserialize, Serialize};

/// One page of the loan application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WizardStep {
    #[default]
    LoanSelection,
    BasicDetails,
    PersonalDetails,
    IncomeDetails,
    Offer,
    DocumentUpload,
    FinalApproval,
    ThankYou,
}

impl WizardStep {
    /// Steps tracked by the progress indicator, in order
    pub const CORE: [WizardStep; 4] = [
        WizardStep::BasicDetails,
        WizardStep::PersonalDetails,
        WizardStep::IncomeDetails,
        WizardStep::Offer,
    ];

    /// Target of a successful advance
    pub fn successor(self) -> Option<Self> {
        match self {
            Self::LoanSelection => Some(Self::BasicDetails),
            Self::BasicDetails => Some(Self::PersonalDetails),
            Self::PersonalDetails => Some(Self::IncomeDetails),
            Self::IncomeDetails => Some(Self::Offer),
            Self::Offer => Some(Self::DocumentUpload),
            Self::DocumentUpload => Some(Self::FinalApproval),
            Self::FinalApproval => Some(Self::ThankYou),
            Self::ThankYou => None,
        }
    }

    /// Target of a retreat. A submitted application cannot be walked back.
    pub fn predecessor(self) -> Option<Self> {
        match self {
            Self::LoanSelection => None,
            Self::BasicDetails => Some(Self::LoanSelection),
            Self::PersonalDetails => Some(Self::BasicDetails),
            Self::IncomeDetails => Some(Self::PersonalDetails),
            Self::Offer => Some(Self::IncomeDetails),
            Self::DocumentUpload => Some(Self::Offer),
            Self::FinalApproval => Some(Self::DocumentUpload),
            Self::ThankYou => None,
        }
    }

    /// 1-based position in the progress indicator, if shown
    pub fn core_index(self) -> Option<usize> {
        Self::CORE.iter().position(|s| *s == self).map(|i| i + 1)
    }

    pub fn shows_progress(self) -> bool {
        self.core_index().is_some()
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::LoanSelection => "Choose Your Loan",
            Self::BasicDetails => "Basic Details",
            Self::PersonalDetails => "Personal Details",
            Self::IncomeDetails => "Income Details",
            Self::Offer => "Your Offer",
            Self::DocumentUpload => "Upload Documents",
            Self::FinalApproval => "Final Approval",
            Self::ThankYou => "Thank You",
        }
    }

    /// Short label for the progress indicator
    pub fn stepper_label(self) -> &'static str {
        match self {
            Self::BasicDetails => "Basic",
            Self::PersonalDetails => "Personal",
            Self::IncomeDetails => "Income",
            Self::Offer => "Offer",
            _ => "",
        }
    }
}
