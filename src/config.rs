//! Launch parameters read from the page URL.

use std::collections::HashMap;

use url::Url;

use crate::error::{WebAppError, WebAppResult};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LaunchParams {
    pub href: String,
    pub query: HashMap<String, String>,
    pub path: String,
    pub hash: String,
}

impl LaunchParams {
    pub fn from_href(href: &str) -> WebAppResult<Self> {
        let url = Url::parse(href).map_err(|e| WebAppError::Parse(e.to_string()))?;
        // first occurrence wins, like URLSearchParams.get
        let mut query = HashMap::new();
        for (key, value) in url.query_pairs() {
            query.entry(key.into_owned()).or_insert_with(|| value.into_owned());
        }
        Ok(LaunchParams {
            href: href.to_string(),
            query,
            path: url.path().to_string(),
            hash: url.fragment().unwrap_or_default().to_string(),
        })
    }

    /// Reads the current browser location. Outside a browser this is empty.
    pub fn from_location() -> Self {
        let href = web_sys::window().and_then(|w| w.location().href().ok());
        match href {
            Some(href) => Self::from_href(&href).unwrap_or_else(|e| {
                tracing::warn!("ignoring unparseable location {}: {}", href, e);
                LaunchParams::default()
            }),
            None => LaunchParams::default(),
        }
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    pub fn payload(&self) -> Option<&str> {
        self.param("payload")
    }

    pub fn debug(&self) -> bool {
        self.param("debug") == Some("1")
    }
}
