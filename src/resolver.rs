//! Picks which form a session shows.

use std::fmt;

use crate::config::LaunchParams;
use crate::payload::IncomingPayload;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewChoice {
    Budget,
    Expense,
}

impl ViewChoice {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "budget" => Some(ViewChoice::Budget),
            "expense" => Some(ViewChoice::Expense),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewChoice::Budget => "budget",
            ViewChoice::Expense => "expense",
        }
    }
}

impl fmt::Display for ViewChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every hint that was considered, kept for the debug overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution {
    pub choice: ViewChoice,
    pub from_payload: Option<ViewChoice>,
    pub from_query: Option<ViewChoice>,
    pub from_path: Option<ViewChoice>,
    pub from_hash: Option<ViewChoice>,
}

fn view_from_path(path: &str) -> Option<ViewChoice> {
    let path = path.trim_end_matches('/');
    if path.ends_with("/expense") {
        Some(ViewChoice::Expense)
    } else if path.ends_with("/budget") {
        Some(ViewChoice::Budget)
    } else {
        None
    }
}

fn view_from_hash(hash: &str) -> Option<ViewChoice> {
    let hash = hash.strip_prefix('#').unwrap_or(hash);
    let hash = hash.strip_prefix('/').unwrap_or(hash);
    ViewChoice::parse(hash.trim())
}

/// Precedence: `payload.ui`, `?view=`, path suffix, hash, then budget.
pub fn resolve_with_trace(payload: Option<&IncomingPayload>, params: &LaunchParams) -> Resolution {
    let from_payload = payload.and_then(IncomingPayload::ui);
    let from_query = params.param("view").and_then(ViewChoice::parse);
    let from_path = view_from_path(&params.path);
    let from_hash = view_from_hash(&params.hash);

    let choice = from_payload
        .or(from_query)
        .or(from_path)
        .or(from_hash)
        .unwrap_or(ViewChoice::Budget);

    Resolution {
        choice,
        from_payload,
        from_query,
        from_path,
        from_hash,
    }
}

pub fn resolve(payload: Option<&IncomingPayload>, params: &LaunchParams) -> ViewChoice {
    resolve_with_trace(payload, params).choice
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(href: &str) -> LaunchParams {
        LaunchParams::from_href(href).unwrap()
    }

    fn payload(value: serde_json::Value) -> IncomingPayload {
        IncomingPayload::from_json(&value).unwrap()
    }

    #[test]
    fn test_defaults_to_budget() {
        assert_eq!(resolve(None, &params("https://bot.example/")), ViewChoice::Budget);
        assert_eq!(resolve(None, &LaunchParams::default()), ViewChoice::Budget);
    }

    #[test]
    fn test_payload_ui_beats_query() {
        let p = payload(json!({"ui": "expense", "items": [{"name": "Food"}]}));
        let trace = resolve_with_trace(Some(&p), &params("https://bot.example/?view=budget"));
        assert_eq!(trace.choice, ViewChoice::Expense);
        assert_eq!(trace.from_query, Some(ViewChoice::Budget));
    }

    #[test]
    fn test_unknown_payload_ui_falls_through_to_query() {
        let p = payload(json!({"ui": "settings"}));
        assert_eq!(
            resolve(Some(&p), &params("https://bot.example/?view=expense")),
            ViewChoice::Expense
        );
    }

    #[test]
    fn test_query_beats_path_and_hash() {
        assert_eq!(
            resolve(None, &params("https://bot.example/budget?view=expense#budget")),
            ViewChoice::Expense
        );
    }

    #[test]
    fn test_unknown_query_falls_through_to_path() {
        assert_eq!(
            resolve(None, &params("https://bot.example/app/expense/?view=charts")),
            ViewChoice::Expense
        );
    }

    #[test]
    fn test_path_suffix_must_match_exactly() {
        assert_eq!(view_from_path("/expense.html"), None);
        assert_eq!(view_from_path("/myexpense"), None);
        assert_eq!(view_from_path("/app/budget"), Some(ViewChoice::Budget));
    }

    #[test]
    fn test_hash_fragment() {
        assert_eq!(resolve(None, &params("https://bot.example/#expense")), ViewChoice::Expense);
        assert_eq!(resolve(None, &params("https://bot.example/#/expense")), ViewChoice::Expense);
        assert_eq!(resolve(None, &params("https://bot.example/#expenses")), ViewChoice::Budget);
    }
}
