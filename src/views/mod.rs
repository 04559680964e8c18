use std::rc::Rc;

use yew::prelude::*;

use crate::bridge::{HostHandle, TelegramBridge};
use crate::payload::IncomingPayload;
use crate::resolver::{Resolution, ViewChoice};

mod budget_page;
mod expense_page;

pub use budget_page::BudgetPage;
pub use expense_page::ExpensePage;

#[derive(Properties, PartialEq)]
pub struct PageProps {
    pub payload: Option<IncomingPayload>,
}

/// The host shared by `App`, or a freshly detected one outside of it.
#[hook]
fn use_host() -> HostHandle {
    let host = use_context::<HostHandle>();
    host.unwrap_or_else(|| HostHandle(Rc::new(TelegramBridge::detect())))
}

fn page_shell(title: &'static str, children: Html) -> Html {
    html! {
        <div class="p-4 text-sm" style="font-family: system-ui, Arial">
            <h2 class="text-xl mb-3">{ title }</h2>
            { children }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct DebugBannerProps {
    pub resolution: Resolution,
    pub href: String,
}

fn hint(view: Option<ViewChoice>) -> &'static str {
    view.map(|v| v.as_str()).unwrap_or("")
}

#[function_component(DebugBanner)]
pub fn debug_banner(props: &DebugBannerProps) -> Html {
    let r = &props.resolution;
    html! {
        <div style="position: fixed; bottom: 0; left: 0; right: 0; padding: 8px; background: #222; color: #fff; font-size: 12px; z-index: 9999">
            <div>
                <b>{"DEBUG"}</b>
                { format!(
                    " choice={} ui={} q={} p={} h={}",
                    r.choice,
                    hint(r.from_payload),
                    hint(r.from_query),
                    hint(r.from_path),
                    hint(r.from_hash),
                ) }
            </div>
            <div>{ format!("href={}", props.href) }</div>
        </div>
    }
}
