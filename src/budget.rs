//! State behind the monthly budget table.

use std::collections::HashSet;
use std::rc::Rc;

use crate::amount::coerce_number;
use crate::bridge::HostBridge;
use crate::error::{WebAppError, WebAppResult};
use crate::payload::{IncomingPayload, OutgoingMessage, RowId, SavedBudget};

pub const SEND_HINT: &str = "Sending your budget to the bot…";
pub const OPEN_VIA_BOT: &str = "Open this page via Telegram bot button to save.";

const FALLBACK_ROWS: [(i64, &str, f64, f64); 3] = [
    (1, "Food", 150.0, 42.5),
    (2, "Transport", 80.0, 20.0),
    (3, "Entertainment", 50.0, 35.0),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Submitted,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BudgetRow {
    pub id: RowId,
    pub name: String,
    /// `None` while the input field is cleared.
    pub set_budget: Option<f64>,
    pub used: f64,
    pub in_hand: f64,
}

impl BudgetRow {
    fn new(id: RowId, name: String, set_budget: f64, used: f64) -> Self {
        let mut row = BudgetRow {
            id,
            name,
            set_budget: Some(set_budget.max(0.0)),
            used: used.max(0.0),
            in_hand: 0.0,
        };
        row.recompute();
        row
    }

    fn recompute(&mut self) {
        self.in_hand = self.budget() - self.used;
    }

    /// The budget as a number, a cleared field counting as zero.
    pub fn budget(&self) -> f64 {
        self.set_budget.unwrap_or(0.0)
    }

    /// Text for the budget input: empty while cleared.
    pub fn budget_input(&self) -> String {
        self.set_budget.map(|v| v.to_string()).unwrap_or_default()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Totals {
    pub set_sum: f64,
    pub used_sum: f64,
    pub in_hand: f64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    Sent,
    Skipped,
}

#[derive(Clone)]
pub struct BudgetModel {
    host: Rc<dyn HostBridge>,
    rows: Vec<BudgetRow>,
    dirty: bool,
    phase: Phase,
}

impl BudgetModel {
    pub fn new(host: Rc<dyn HostBridge>) -> Self {
        BudgetModel {
            host,
            rows: Vec::new(),
            dirty: false,
            phase: Phase::Loading,
        }
    }

    pub fn rows(&self) -> &[BudgetRow] {
        &self.rows
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn can_save(&self) -> bool {
        self.dirty && self.phase == Phase::Ready
    }

    /// Fills the table from a `budget.init` payload, or the sample rows when
    /// there is nothing usable.
    pub fn load(&mut self, payload: Option<&IncomingPayload>) {
        if self.phase != Phase::Loading {
            return;
        }

        // ids double as list keys, so `1` and `"1"` count as the same id
        let mut seen = HashSet::new();
        let rows = match payload {
            Some(IncomingPayload::BudgetInit { items, .. }) => items
                .iter()
                .filter_map(|item| {
                    let name = item.name.clone()?;
                    let id = match item.id.clone() {
                        Some(id) if seen.insert(id.to_string()) => id,
                        _ => RowId::fresh(),
                    };
                    Some(BudgetRow::new(id, name, item.set_budget, item.used))
                })
                .collect(),
            _ => Vec::new(),
        };

        self.rows = if rows.is_empty() {
            tracing::debug!("no budget.init rows, loading sample categories");
            FALLBACK_ROWS
                .iter()
                .map(|(id, name, set, used)| BudgetRow::new(RowId::Number(*id), name.to_string(), *set, *used))
                .collect()
        } else {
            rows
        };
        self.phase = Phase::Ready;
    }

    fn ensure_ready(&self) -> WebAppResult<()> {
        match self.phase {
            Phase::Ready => Ok(()),
            Phase::Loading => Err(WebAppError::Validation("budget is still loading".to_string())),
            Phase::Submitted => Err(WebAppError::Validation("budget was already sent".to_string())),
        }
    }

    /// Applies an edit of the budget input. An empty field stays empty; any
    /// other value is clamped to zero or more.
    pub fn set_budget(&mut self, index: usize, raw: &str) -> WebAppResult<()> {
        self.ensure_ready()?;
        let row = self
            .rows
            .get_mut(index)
            .ok_or_else(|| WebAppError::Validation(format!("no budget row at {}", index)))?;

        row.set_budget = if raw.is_empty() {
            None
        } else {
            Some(coerce_number(raw).unwrap_or(0.0).max(0.0))
        };
        row.recompute();
        self.dirty = true;
        Ok(())
    }

    pub fn add_category(&mut self, name: &str) -> WebAppResult<()> {
        self.ensure_ready()?;
        let name = name.trim();
        if name.is_empty() {
            return Err(WebAppError::Validation("category name is required".to_string()));
        }
        self.rows.push(BudgetRow::new(RowId::fresh(), name.to_string(), 0.0, 0.0));
        self.dirty = true;
        Ok(())
    }

    pub fn totals(&self) -> Totals {
        let set_sum: f64 = self.rows.iter().map(BudgetRow::budget).sum();
        let used_sum: f64 = self.rows.iter().map(|r| r.used).sum();
        Totals {
            set_sum,
            used_sum,
            in_hand: set_sum - used_sum,
        }
    }

    pub fn save_message(&self) -> OutgoingMessage {
        OutgoingMessage::BudgetSave {
            items: self
                .rows
                .iter()
                .map(|r| SavedBudget {
                    id: r.id.clone(),
                    name: r.name.clone(),
                    amount: r.budget(),
                })
                .collect(),
        }
    }

    /// Sends the table to the bot and asks the host to close the view.
    /// Failures are shown to the user as alerts and also returned.
    pub fn save(&mut self) -> WebAppResult<SaveOutcome> {
        if !self.can_save() {
            return Ok(SaveOutcome::Skipped);
        }
        if !self.host.is_available() {
            self.host.show_alert(OPEN_VIA_BOT);
            return Err(WebAppError::HostUnavailable("sendData"));
        }

        let result = self.save_message().to_json().and_then(|json| {
            self.host.show_alert(SEND_HINT);
            self.host.send_data(&json)
        });
        match result {
            Ok(()) => {
                tracing::info!("budget sent ({} categories)", self.rows.len());
                self.phase = Phase::Submitted;
                self.host.close();
                Ok(SaveOutcome::Sent)
            }
            Err(e) => {
                tracing::error!("budget save failed: {}", e);
                self.host.show_alert(&format!("Save error: {}", e));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::testing::{HostCall, RecordingBridge};
    use serde_json::json;

    fn loaded(payload: Option<serde_json::Value>) -> (Rc<RecordingBridge>, BudgetModel) {
        let host = RecordingBridge::new();
        let mut model = BudgetModel::new(host.clone());
        let payload = payload.map(|v| IncomingPayload::from_json(&v).unwrap());
        model.load(payload.as_ref());
        (host, model)
    }

    #[test]
    fn test_fallback_rows_and_totals() {
        let (_, model) = loaded(None);
        assert_eq!(model.phase(), Phase::Ready);
        let names: Vec<&str> = model.rows().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Food", "Transport", "Entertainment"]);
        assert_eq!(model.rows()[0].in_hand, 107.5);
        assert_eq!(
            model.totals(),
            Totals {
                set_sum: 280.0,
                used_sum: 97.5,
                in_hand: 182.5
            }
        );
        assert!(!model.is_dirty());
    }

    #[test]
    fn test_budget_init_payload() {
        let (_, model) = loaded(Some(json!({
            "type": "budget.init",
            "items": [{"name": "Food", "setBudget": 100, "used": 30}]
        })));
        assert_eq!(model.rows().len(), 1);
        let row = &model.rows()[0];
        assert_eq!(row.in_hand, 70.0);
        assert!(matches!(row.id, RowId::Text(_)));
        let totals = model.totals();
        assert_eq!((totals.set_sum, totals.used_sum, totals.in_hand), (100.0, 30.0, 70.0));
    }

    #[test]
    fn test_other_payloads_fall_back() {
        let (_, model) = loaded(Some(json!({"ui": "budget", "items": [{"name": "Rent", "setBudget": 900}]})));
        assert_eq!(model.rows().len(), 3);

        let (_, model) = loaded(Some(json!({"type": "budget.init", "items": []})));
        assert_eq!(model.rows().len(), 3);

        let (_, model) = loaded(Some(json!({"type": "budget.init", "items": [{"setBudget": 5}]})));
        assert_eq!(model.rows().len(), 3);
    }

    #[test]
    fn test_duplicate_ids_are_replaced() {
        let (_, model) = loaded(Some(json!({
            "type": "budget.init",
            "items": [
                {"id": 1, "name": "Food"},
                {"id": 1, "name": "Rent"},
                {"id": "1", "name": "Gas"}
            ]
        })));
        let keys: Vec<String> = model.rows().iter().map(|r| r.id.to_string()).collect();
        assert_eq!(keys.len(), 3);
        assert_eq!(keys[0], "1");
        let unique: HashSet<&String> = keys.iter().collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn test_load_happens_once() {
        let (_, mut model) = loaded(None);
        let payload = IncomingPayload::from_json(&json!({
            "type": "budget.init",
            "items": [{"name": "Food"}]
        }))
        .unwrap();
        model.load(Some(&payload));
        assert_eq!(model.rows().len(), 3);
    }

    #[test]
    fn test_set_budget_recomputes_in_hand() {
        let (_, mut model) = loaded(None);
        model.set_budget(1, "100").unwrap();
        assert_eq!(model.rows()[1].in_hand, 80.0);
        model.set_budget(1, "-40").unwrap();
        assert_eq!(model.rows()[1].set_budget, Some(0.0));
        assert_eq!(model.rows()[1].in_hand, -20.0);
        model.set_budget(1, "12.25").unwrap();
        assert_eq!(model.rows()[1].in_hand, 12.25 - 20.0);
        assert!(model.is_dirty());
    }

    #[test]
    fn test_cleared_field_counts_as_zero() {
        let (host, mut model) = loaded(None);
        model.set_budget(0, "").unwrap();
        let row = &model.rows()[0];
        assert_eq!(row.set_budget, None);
        assert_eq!(row.budget_input(), "");
        assert_eq!(row.in_hand, -42.5);
        assert_eq!(model.totals().set_sum, 130.0);

        model.save().unwrap();
        assert_eq!(host.sent()[0]["items"][0]["amount"], json!(0.0));
    }

    #[test]
    fn test_set_budget_out_of_range() {
        let (_, mut model) = loaded(None);
        assert!(model.set_budget(9, "10").is_err());
        assert!(!model.is_dirty());
    }

    #[test]
    fn test_add_category() {
        let (_, mut model) = loaded(None);
        assert!(model.add_category("  ").is_err());
        model.add_category("Gifts").unwrap();
        model.add_category("Books").unwrap();
        let rows = model.rows();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[3].name, "Gifts");
        assert_eq!((rows[3].budget(), rows[3].used, rows[3].in_hand), (0.0, 0.0, 0.0));
        assert_ne!(rows[3].id, rows[4].id);
        assert!(model.is_dirty());
    }

    #[test]
    fn test_save_is_skipped_while_clean() {
        let (host, mut model) = loaded(None);
        assert!(!model.can_save());
        assert_eq!(model.save(), Ok(SaveOutcome::Skipped));
        assert!(host.calls().is_empty());

        model.set_budget(0, "150").unwrap();
        assert!(model.can_save());
    }

    #[test]
    fn test_save_sends_and_closes() {
        let (host, mut model) = loaded(None);
        model.set_budget(2, "60").unwrap();
        assert_eq!(model.save(), Ok(SaveOutcome::Sent));

        assert_eq!(
            host.sent(),
            vec![json!({
                "type": "budget.save",
                "items": [
                    {"id": 1, "name": "Food", "amount": 150.0},
                    {"id": 2, "name": "Transport", "amount": 80.0},
                    {"id": 3, "name": "Entertainment", "amount": 60.0}
                ]
            })]
        );
        assert_eq!(host.calls().last(), Some(&HostCall::Close));
        assert_eq!(host.alerts(), vec![SEND_HINT.to_string()]);
        assert_eq!(model.phase(), Phase::Submitted);
        assert!(model.set_budget(0, "1").is_err());
        assert_eq!(model.save(), Ok(SaveOutcome::Skipped));
    }

    #[test]
    fn test_save_without_host_alerts() {
        let host = RecordingBridge::absent();
        let mut model = BudgetModel::new(host.clone());
        model.load(None);
        model.set_budget(0, "10").unwrap();
        assert_eq!(model.save(), Err(WebAppError::HostUnavailable("sendData")));
        assert_eq!(host.alerts(), vec![OPEN_VIA_BOT.to_string()]);
        assert_eq!(model.phase(), Phase::Ready);
    }

    #[test]
    fn test_send_failure_is_alerted() {
        let host = RecordingBridge::failing("WebAppDataInvalid");
        let mut model = BudgetModel::new(host.clone());
        model.load(None);
        model.add_category("Gifts").unwrap();
        assert!(model.save().is_err());
        assert_eq!(
            host.alerts(),
            vec![SEND_HINT.to_string(), "Save error: WebAppDataInvalid".to_string()]
        );
        assert!(!host.calls().contains(&HostCall::Close));
        assert!(model.can_save());
    }
}
