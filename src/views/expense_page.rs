use std::rc::Rc;

use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use super::{page_shell, use_host, PageProps};
use crate::expense::{ExpenseModel, ADD_NEW_CATEGORY};

#[function_component(ExpensePage)]
pub fn expense_page(props: &PageProps) -> Html {
    let host = use_host();
    let model = {
        let host = host.clone();
        use_state(move || ExpenseModel::new(host.0))
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

    {
        let host = host.clone();
        use_effect_with_deps(
            move |state| {
                host.0.set_main_button(state);
                || ()
            },
            model.main_button(),
        );
    }

    // re-subscribed on every draft change so the click sees the current draft
    {
        let model = model.clone();
        let host = host.clone();
        let draft = (model.amount.clone(), model.description.clone(), model.category.clone());
        use_effect_with_deps(
            move |_| {
                let handler: Rc<dyn Fn()> = Rc::new(move || {
                    let mut next = (*model).clone();
                    if let Err(e) = next.save() {
                        tracing::warn!("expense not saved: {}", e);
                    }
                    model.set(next);
                });
                let subscription = host.0.on_main_button_click(handler);
                move || drop(subscription)
            },
            draft,
        );
    }

    let on_amount = {
        let model = model.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*model).clone();
            match next.set_amount(&input.value()) {
                Ok(()) => model.set(next),
                Err(e) => tracing::warn!("expense amount edit ignored: {}", e),
            }
        })
    };

    let on_description = {
        let model = model.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*model).clone();
            match next.set_description(&input.value()) {
                Ok(()) => model.set(next),
                Err(e) => tracing::warn!("expense description edit ignored: {}", e),
            }
        })
    };

    let on_category = {
        let model = model.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let mut next = (*model).clone();
            match next.select_category(&select.value()) {
                Ok(()) => model.set(next),
                Err(e) => tracing::warn!("expense category edit ignored: {}", e),
            }
        })
    };

    let on_save = {
        let model = model.clone();
        Callback::from(move |_| {
            let mut next = (*model).clone();
            if let Err(e) = next.save() {
                tracing::warn!("expense not saved: {}", e);
            }
            model.set(next);
        })
    };

    let on_view_last_10 = {
        let model = model.clone();
        Callback::from(move |_| {
            let mut next = (*model).clone();
            if let Err(e) = next.view_last_10() {
                tracing::warn!("expense history not requested: {}", e);
            }
            model.set(next);
        })
    };

    let on_open_budget = {
        let model = model.clone();
        Callback::from(move |_| model.open_budget_hint())
    };

    if model.is_loading() {
        return page_shell("Quick Expense", html! { <div>{"Loading…"}</div> });
    }

    page_shell(
        "Quick Expense",
        html! {
            <>
                <div style="margin-top: 12px">
                    <label style="width: 120px; display: inline-block">{"Amount"}</label>
                    <input type="number" step="0.01" placeholder="0.00" value={model.amount.clone()} oninput={on_amount} style="padding: 8px; width: 180px" />
                </div>

                <div style="margin-top: 12px">
                    <label style="width: 120px; display: inline-block">{"Description"}</label>
                    <input type="text" placeholder="optional note" value={model.description.clone()} oninput={on_description} style="padding: 8px; width: 240px" />
                </div>

                <div style="margin-top: 12px">
                    <label style="width: 120px; display: inline-block">{"Category"}</label>
                    <select onchange={on_category} style="padding: 8px; width: 200px">
                        <option value="" selected={model.category.is_empty()}>{"-- select --"}</option>
                        { for model.categories().iter().map(|c| html! {
                            <option key={c.clone()} value={c.clone()} selected={model.category == *c}>{ c.clone() }</option>
                        }) }
                        <option value={ADD_NEW_CATEGORY} selected={model.wants_new_category()}>{"➕ Add New Category"}</option>
                    </select>
                    {
                        if model.wants_new_category() {
                            html! {
                                <div style="margin-top: 8px">
                                    <button onclick={on_open_budget}>{"Open Budget"}</button>
                                </div>
                            }
                        } else { html!{} }
                    }
                </div>

                <div style="margin-top: 16px; display: flex; gap: 8px">
                    <button onclick={on_save} disabled={!model.is_valid()}>{"Save"}</button>
                    <button onclick={on_view_last_10}>{"View last 10"}</button>
                </div>

                <p style="margin-top: 12px; opacity: 0.7">
                    {"Only categories that have a monthly budget appear here."}
                </p>
            </>
        },
    )
}
