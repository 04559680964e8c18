//! State behind the quick expense form.

use std::rc::Rc;

use crate::amount::coerce_number;
use crate::bridge::{HostBridge, MainButton};
use crate::budget::{Phase, SaveOutcome, OPEN_VIA_BOT};
use crate::error::{WebAppError, WebAppResult};
use crate::payload::{IncomingPayload, OutgoingMessage};

/// Select value meaning "I want a category that is not listed".
pub const ADD_NEW_CATEGORY: &str = "__ADD_NEW__";
pub const MAIN_BUTTON_TEXT: &str = "Save Expense";
pub const SAVE_HINT: &str = "Saving your expense…";
pub const OPEN_BUDGET_HINT: &str = "To add a new category, please open Budget and set it first.";

#[derive(Clone)]
pub struct ExpenseModel {
    host: Rc<dyn HostBridge>,
    pub amount: String,
    pub description: String,
    pub category: String,
    categories: Vec<String>,
    phase: Phase,
}

impl ExpenseModel {
    pub fn new(host: Rc<dyn HostBridge>) -> Self {
        ExpenseModel {
            host,
            amount: String::new(),
            description: String::new(),
            category: String::new(),
            categories: Vec::new(),
            phase: Phase::Loading,
        }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// Only categories the bot listed are offered; there is no sample list.
    pub fn load(&mut self, payload: Option<&IncomingPayload>) {
        if self.phase != Phase::Loading {
            return;
        }
        self.categories = payload
            .map(|p| p.items().iter().filter_map(|item| item.name.clone()).collect())
            .unwrap_or_default();
        self.phase = Phase::Ready;
    }

    fn ensure_ready(&self) -> WebAppResult<()> {
        match self.phase {
            Phase::Ready => Ok(()),
            Phase::Loading => Err(WebAppError::Validation("expense form is still loading".to_string())),
            Phase::Submitted => Err(WebAppError::Validation("expense was already sent".to_string())),
        }
    }

    pub fn set_amount(&mut self, raw: &str) -> WebAppResult<()> {
        self.ensure_ready()?;
        self.amount = raw.to_string();
        Ok(())
    }

    pub fn set_description(&mut self, raw: &str) -> WebAppResult<()> {
        self.ensure_ready()?;
        self.description = raw.to_string();
        Ok(())
    }

    pub fn select_category(&mut self, value: &str) -> WebAppResult<()> {
        self.ensure_ready()?;
        self.category = value.to_string();
        Ok(())
    }

    pub fn wants_new_category(&self) -> bool {
        self.category == ADD_NEW_CATEGORY
    }

    fn parsed_amount(&self) -> Option<f64> {
        coerce_number(&self.amount).filter(|v| *v > 0.0)
    }

    pub fn is_valid(&self) -> bool {
        self.parsed_amount().is_some() && !self.category.is_empty() && !self.wants_new_category()
    }

    pub fn main_button(&self) -> MainButton {
        if self.phase == Phase::Ready && self.is_valid() {
            MainButton::Visible {
                text: MAIN_BUTTON_TEXT.to_string(),
            }
        } else {
            MainButton::Hidden
        }
    }

    pub fn add_message(&self) -> WebAppResult<OutgoingMessage> {
        let amount = self
            .parsed_amount()
            .ok_or_else(|| WebAppError::Validation("amount must be greater than zero".to_string()))?;
        if self.category.is_empty() || self.wants_new_category() {
            return Err(WebAppError::Validation("choose a category".to_string()));
        }
        Ok(OutgoingMessage::ExpenseAdd {
            amount,
            description: self.description.clone(),
            category: self.category.clone(),
        })
    }

    fn submit(&mut self, message: OutgoingMessage, hint: Option<&str>) -> WebAppResult<SaveOutcome> {
        if !self.host.is_available() {
            self.host.show_alert(OPEN_VIA_BOT);
            return Err(WebAppError::HostUnavailable("sendData"));
        }
        let result = message.to_json().and_then(|json| {
            if let Some(hint) = hint {
                self.host.show_alert(hint);
            }
            self.host.send_data(&json)
        });
        match result {
            Ok(()) => {
                self.phase = Phase::Submitted;
                self.host.close();
                Ok(SaveOutcome::Sent)
            }
            Err(e) => {
                tracing::error!("expense message not sent: {}", e);
                self.host.show_alert(&format!("Error: {}", e));
                Err(e)
            }
        }
    }

    pub fn save(&mut self) -> WebAppResult<SaveOutcome> {
        if self.phase != Phase::Ready {
            return Ok(SaveOutcome::Skipped);
        }
        let message = self.add_message()?;
        let outcome = self.submit(message, Some(SAVE_HINT))?;
        tracing::info!("expense sent for category {}", self.category);
        Ok(outcome)
    }

    pub fn view_last_10(&mut self) -> WebAppResult<SaveOutcome> {
        if self.phase != Phase::Ready {
            return Ok(SaveOutcome::Skipped);
        }
        self.submit(OutgoingMessage::ExpenseView, None)
    }

    /// Points the user at the budget form, the only place categories are created.
    pub fn open_budget_hint(&self) {
        self.host.show_alert(OPEN_BUDGET_HINT);
        self.host.close();
    }
}
