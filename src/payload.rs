//! Typed views of the messages exchanged with the bot.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::amount::coerce_value;
use crate::error::{WebAppError, WebAppResult};
use crate::resolver::ViewChoice;

pub const BUDGET_INIT: &str = "budget.init";

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RowId {
    Number(i64),
    Text(String),
}

impl RowId {
    pub fn fresh() -> Self {
        RowId::Text(uuid::Uuid::new_v4().to_string())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(RowId::Number),
            Value::String(s) if !s.is_empty() => Some(RowId::Text(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Number(n) => write!(f, "{}", n),
            RowId::Text(s) => f.write_str(s),
        }
    }
}

/// One entry of a payload's `items` array, read leniently.
#[derive(Clone, Debug, PartialEq)]
pub struct PayloadItem {
    pub id: Option<RowId>,
    pub name: Option<String>,
    pub set_budget: f64,
    pub used: f64,
}

impl PayloadItem {
    fn from_value(value: &Value) -> Self {
        let field = |key: &str| value.as_object().and_then(|obj| obj.get(key));
        PayloadItem {
            id: field("id").and_then(RowId::from_value),
            name: field("name")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            set_budget: coerce_value(field("setBudget")),
            used: coerce_value(field("used")),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum IncomingPayload {
    BudgetInit {
        ui: Option<ViewChoice>,
        items: Vec<PayloadItem>,
    },
    /// Any object without a recognized `type`.
    Unrecognized {
        ui: Option<ViewChoice>,
        items: Vec<PayloadItem>,
    },
}

impl IncomingPayload {
    /// Validates the shape of a decoded payload once.
    pub fn from_json(value: &Value) -> WebAppResult<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| WebAppError::Parse("payload is not a JSON object".to_string()))?;

        let ui = obj.get("ui").and_then(Value::as_str).and_then(ViewChoice::parse);
        let items = obj
            .get("items")
            .and_then(Value::as_array)
            .map(|arr| arr.iter().map(PayloadItem::from_value).collect())
            .unwrap_or_default();

        match obj.get("type").and_then(Value::as_str) {
            Some(BUDGET_INIT) => Ok(IncomingPayload::BudgetInit { ui, items }),
            _ => Ok(IncomingPayload::Unrecognized { ui, items }),
        }
    }

    pub fn ui(&self) -> Option<ViewChoice> {
        match self {
            IncomingPayload::BudgetInit { ui, .. } | IncomingPayload::Unrecognized { ui, .. } => *ui,
        }
    }

    pub fn items(&self) -> &[PayloadItem] {
        match self {
            IncomingPayload::BudgetInit { items, .. }
            | IncomingPayload::Unrecognized { items, .. } => items,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SavedBudget {
    pub id: RowId,
    pub name: String,
    pub amount: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum OutgoingMessage {
    #[serde(rename = "budget.save")]
    BudgetSave { items: Vec<SavedBudget> },
    #[serde(rename = "expense.add")]
    ExpenseAdd {
        amount: f64,
        description: String,
        category: String,
    },
    #[serde(rename = "expense.view")]
    ExpenseView,
}

impl OutgoingMessage {
    pub fn to_json(&self) -> WebAppResult<String> {
        serde_json::to_string(self).map_err(|e| WebAppError::Parse(e.to_string()))
    }
}
