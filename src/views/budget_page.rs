use web_sys::HtmlInputElement;
use yew::prelude::*;

use super::{page_shell, use_host, PageProps};
use crate::amount::format_amount;
use crate::budget::BudgetModel;

#[function_component(BudgetPage)]
pub fn budget_page(props: &PageProps) -> Html {
    let host = use_host();
    let model = {
        let host = host.clone();
        use_state(move || BudgetModel::new(host.0))
    };

    {
        let model = model.clone();
        let host = host.clone();
        let payload = props.payload.clone();
        use_effect_with_deps(
            move |_| {
                host.0.ready();
                let mut next = (*model).clone();
                next.load(payload.as_ref());
                model.set(next);
                || ()
            },
            (),
        );
    }

    let on_add_category = {
        let model = model.clone();
        Callback::from(move |_| {
            let name = match host.0.prompt("New category name") {
                Some(name) if !name.trim().is_empty() => name,
                _ => return,
            };
            let mut next = (*model).clone();
            match next.add_category(&name) {
                Ok(()) => model.set(next),
                Err(e) => tracing::warn!("category not added: {}", e),
            }
        })
    };

    let on_save = {
        let model = model.clone();
        Callback::from(move |_| {
            let mut next = (*model).clone();
            if let Err(e) = next.save() {
                tracing::warn!("budget not saved: {}", e);
            }
            model.set(next);
        })
    };

    if model.is_loading() {
        return page_shell("Monthly Budget", html! { <div>{"Loading…"}</div> });
    }

    let totals = model.totals();
    let dirty = model.is_dirty();
    page_shell(
        "Monthly Budget",
        html! {
            <div class="space-y-3">
                <div class="border rounded">
                    <div class="grid grid-cols-4 font-semibold p-2 bg-gray-100">
                        <div>{"Category"}</div>
                        <div>{"Set Budget"}</div>
                        <div>{"Used"}</div>
                        <div>{"In Hand"}</div>
                    </div>
                    { for model.rows().iter().enumerate().map(|(idx, row)| {
                        let on_input = {
                            let model = model.clone();
                            Callback::from(move |e: InputEvent| {
                                let input: HtmlInputElement = e.target_unchecked_into();
                                let mut next = (*model).clone();
                                match next.set_budget(idx, &input.value()) {
                                    Ok(()) => model.set(next),
                                    Err(e) => tracing::warn!("budget edit ignored: {}", e),
                                }
                            })
                        };
                        html! {
                            <div key={row.id.to_string()} class="grid grid-cols-4 p-2 border-t items-center">
                                <div>{ row.name.clone() }</div>
                                <div>
                                    <input type="number" min="0" value={row.budget_input()} oninput={on_input} class="w-full border rounded p-1" />
                                </div>
                                <div>{ format_amount(row.used) }</div>
                                <div>{ format_amount(row.in_hand) }</div>
                            </div>
                        }
                    }) }
                    <div class="grid grid-cols-4 p-2 border-t font-semibold">
                        <div>{"Total"}</div>
                        <div>{ format_amount(totals.set_sum) }</div>
                        <div>{ format_amount(totals.used_sum) }</div>
                        <div>{ format_amount(totals.in_hand) }</div>
                    </div>
                </div>

                <div class="flex gap-2">
                    <button onclick={on_add_category} class="border rounded px-3 py-2">{"Add New Category"}</button>
                    <button disabled=true class="border rounded px-3 py-2">{"Edit Budget"}</button>
                    <button disabled={!model.can_save()} onclick={on_save} class={classes!("border", "rounded", "px-3", "py-2", (!dirty).then_some("opacity-50"))}>{"Save"}</button>
                </div>
            </div>
        },
    )
}
