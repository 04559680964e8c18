//! Access to the chat platform's WebApp object.
//!
//! Every capability is optional: the page may be opened in a plain browser,
//! in which case alerts and prompts fall back to the window and everything
//! else is a no-op.

use std::rc::Rc;

use js_sys::{Array, Function, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

use crate::error::{WebAppError, WebAppResult};

#[derive(Clone, Debug, PartialEq)]
pub enum MainButton {
    Hidden,
    Visible { text: String },
}

/// Keeps a host event handler registered until dropped.
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn none() -> Self {
        Subscription { release: None }
    }

    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Subscription {
            release: Some(Box::new(release)),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

pub trait HostBridge {
    /// Whether the page runs inside the chat platform.
    fn is_available(&self) -> bool;
    fn ready(&self);
    fn show_alert(&self, message: &str);
    fn send_data(&self, data: &str) -> WebAppResult<()>;
    fn close(&self);
    fn set_main_button(&self, state: &MainButton);
    fn on_main_button_click(&self, handler: Rc<dyn Fn()>) -> Subscription;
    fn prompt(&self, message: &str) -> Option<String>;
}

/// Shared handle handed to the pages through context.
#[derive(Clone)]
pub struct HostHandle(pub Rc<dyn HostBridge>);

impl PartialEq for HostHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

fn property(target: &JsValue, key: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

fn js_error_message(err: &JsValue) -> String {
    if let Some(err) = err.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

fn call_method(target: &JsValue, name: &'static str, args: &[JsValue]) -> WebAppResult<JsValue> {
    let func = property(target, name)
        .and_then(|f| f.dyn_into::<Function>().ok())
        .ok_or(WebAppError::HostUnavailable(name))?;
    let args = args.iter().collect::<Array>();
    Reflect::apply(&func, target, &args).map_err(|e| WebAppError::Host(js_error_message(&e)))
}

pub struct TelegramBridge {
    web_app: Option<JsValue>,
}

impl TelegramBridge {
    /// Looks up `window.Telegram.WebApp`.
    pub fn detect() -> Self {
        let web_app = web_sys::window()
            .and_then(|w| property(&JsValue::from(w), "Telegram"))
            .and_then(|tg| property(&tg, "WebApp"));
        if web_app.is_none() {
            tracing::info!("Telegram WebApp not found, running standalone");
        }
        TelegramBridge { web_app }
    }

    fn call(&self, name: &'static str, args: &[JsValue]) -> WebAppResult<JsValue> {
        let web_app = self.web_app.as_ref().ok_or(WebAppError::HostUnavailable(name))?;
        call_method(web_app, name, args)
    }

    fn window_alert(message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
}

impl HostBridge for TelegramBridge {
    fn is_available(&self) -> bool {
        self.web_app.is_some()
    }

    fn ready(&self) {
        if let Err(e) = self.call("ready", &[]) {
            tracing::debug!("ready() skipped: {}", e);
        }
    }

    fn show_alert(&self, message: &str) {
        if let Err(e) = self.call("showAlert", &[JsValue::from_str(message)]) {
            tracing::debug!("showAlert unavailable ({}), using window.alert", e);
            Self::window_alert(message);
        }
    }

    fn send_data(&self, data: &str) -> WebAppResult<()> {
        self.call("sendData", &[JsValue::from_str(data)]).map(|_| ())
    }

    fn close(&self) {
        if let Err(e) = self.call("close", &[]) {
            tracing::debug!("close() skipped: {}", e);
        }
    }

    fn set_main_button(&self, state: &MainButton) {
        let Some(button) = self.web_app.as_ref().and_then(|w| property(w, "MainButton")) else {
            return;
        };
        let result = match state {
            MainButton::Hidden => call_method(&button, "hide", &[]),
            MainButton::Visible { text } => call_method(&button, "setText", &[JsValue::from_str(text)])
                .and_then(|_| call_method(&button, "show", &[])),
        };
        if let Err(e) = result {
            tracing::debug!("main button update skipped: {}", e);
        }
    }

    fn on_main_button_click(&self, handler: Rc<dyn Fn()>) -> Subscription {
        let Some(web_app) = self.web_app.clone() else {
            return Subscription::none();
        };
        let closure = Closure::wrap(Box::new(move || handler()) as Box<dyn Fn()>);
        let event = JsValue::from_str("mainButtonClicked");
        let callback: JsValue = closure.as_ref().clone();
        if let Err(e) = call_method(&web_app, "onEvent", &[event.clone(), callback.clone()]) {
            tracing::debug!("main button click not subscribed: {}", e);
            return Subscription::none();
        }
        Subscription::new(move || {
            let _ = call_method(&web_app, "offEvent", &[event, callback]);
            drop(closure);
        })
    }

    fn prompt(&self, message: &str) -> Option<String> {
        web_sys::window()
            .and_then(|w| w.prompt_with_message(message).ok().flatten())
    }
}
