use std::rc::Rc;

use yew::prelude::*;

use crate::bridge::{HostHandle, TelegramBridge};
use crate::codec::decode_payload;
use crate::config::LaunchParams;
use crate::payload::IncomingPayload;
use crate::resolver::{resolve, resolve_with_trace, ViewChoice};
use crate::views::{BudgetPage, DebugBanner, ExpensePage};

/// Decodes the `payload` parameter. Anything unusable is logged and treated
/// as if no payload had been sent, so the pages fall back to their defaults.
pub fn load_payload(params: &LaunchParams) -> Option<IncomingPayload> {
    let value = match decode_payload(params.payload()) {
        Ok(value) => value?,
        Err(e) => {
            tracing::warn!("ignoring payload: {}", e);
            return None;
        }
    };
    match IncomingPayload::from_json(&value) {
        Ok(payload) => Some(payload),
        Err(e) => {
            tracing::warn!("ignoring payload: {}", e);
            None
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub params: LaunchParams,
    pub payload: Option<IncomingPayload>,
    pub host: HostHandle,
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let resolution = resolve_with_trace(props.payload.as_ref(), &props.params);

    let content = match resolution.choice {
        ViewChoice::Budget => html! { <BudgetPage payload={props.payload.clone()} /> },
        ViewChoice::Expense => html! { <ExpensePage payload={props.payload.clone()} /> },
    };

    let banner = if props.params.debug() {
        html! { <DebugBanner resolution={resolution.clone()} href={props.params.href.clone()} /> }
    } else {
        html! {}
    };

    html! {
        <ContextProvider<HostHandle> context={props.host.clone()}>
            { content }
            { banner }
        </ContextProvider<HostHandle>>
    }
}

pub fn launch() {
    let params = LaunchParams::from_location();
    let payload = load_payload(&params);
    let choice = resolve(payload.as_ref(), &params);
    tracing::info!("starting {} view", choice);

    let host = HostHandle(Rc::new(TelegramBridge::detect()));
    yew::Renderer::<App>::with_props(AppProps { params, payload, host }).render();
}
