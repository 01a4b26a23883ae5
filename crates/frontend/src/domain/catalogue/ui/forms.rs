use contracts::domain::a001_category::aggregate::{
    Category, CreateCategoryDto, CATEGORY_NAME_MAX_CHARS,
};
use contracts::domain::a002_site::aggregate::{CreateSiteDto, Site, UpdateSiteDto};
use leptos::prelude::*;

use super::notice::Notice;
use crate::domain::catalogue::hook::CatalogueClient;

fn optional(value: String) -> Option<String> {
    Some(value.trim().to_string()).filter(|v| !v.is_empty())
}

#[component]
pub fn AddSiteForm(client: CatalogueClient, notice: RwSignal<Option<Notice>>) -> impl IntoView {
    let signals = *client.sink();
    let name = RwSignal::new(String::new());
    let url = RwSignal::new(String::new());
    let description = RwSignal::new(String::new());
    let icon = RwSignal::new(String::new());
    let category = RwSignal::new(String::new());

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let dto = CreateSiteDto {
            name: optional(name.get_untracked()),
            url: optional(url.get_untracked()),
            description: optional(description.get_untracked()),
            category_id: category.get_untracked().parse().ok(),
            icon: optional(icon.get_untracked()),
        };
        // те же правила, что и на сервере
        if let Err(e) = dto.validate() {
            notice.set(Some(Notice::error(e.to_string())));
            return;
        }

        let client = client.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = client.add_site(dto).await;
            if outcome.success {
                name.set(String::new());
                url.set(String::new());
                description.set(String::new());
                icon.set(String::new());
            }
            notice.set(Some(Notice::from_outcome(&outcome)));
        });
    };

    view! {
        <form class="add-site" on:submit=submit>
            <input
                type="text"
                placeholder="Name"
                prop:value=move || name.get()
                on:input=move |ev| name.set(event_target_value(&ev))
            />
            <input
                type="url"
                placeholder="https://"
                prop:value=move || url.get()
                on:input=move |ev| url.set(event_target_value(&ev))
            />
            <input
                type="text"
                placeholder="Description"
                prop:value=move || description.get()
                on:input=move |ev| description.set(event_target_value(&ev))
            />
            <input
                type="text"
                placeholder="Icon (optional)"
                prop:value=move || icon.get()
                on:input=move |ev| icon.set(event_target_value(&ev))
            />
            <select on:change=move |ev| category.set(event_target_value(&ev))>
                <option value="">"Category…"</option>
                <For
                    each=move || signals.document_or_bundled().categories
                    key=|c: &Category| c.clone()
                    children=move |c: Category| {
                        view! { <option value=c.id.to_string()>{c.icon} " " {c.name}</option> }
                    }
                />
            </select>
            <button type="submit">"Add site"</button>
        </form>
    }
}

#[component]
pub fn AddCategoryForm(
    client: CatalogueClient,
    notice: RwSignal<Option<Notice>>,
) -> impl IntoView {
    let name = RwSignal::new(String::new());
    let icon = RwSignal::new(String::new());

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let dto = CreateCategoryDto {
            name: optional(name.get_untracked()),
            icon: optional(icon.get_untracked()),
        };
        if let Err(e) = dto.validate() {
            notice.set(Some(Notice::error(e.to_string())));
            return;
        }

        let client = client.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = client.add_category(dto).await;
            if outcome.success {
                name.set(String::new());
                icon.set(String::new());
            }
            notice.set(Some(Notice::from_outcome(&outcome)));
        });
    };

    view! {
        <form class="add-category" on:submit=submit>
            <input
                type="text"
                placeholder="Category name"
                maxlength=CATEGORY_NAME_MAX_CHARS.to_string()
                prop:value=move || name.get()
                on:input=move |ev| name.set(event_target_value(&ev))
            />
            <input
                type="text"
                placeholder="Icon, e.g. 📚"
                prop:value=move || icon.get()
                on:input=move |ev| icon.set(event_target_value(&ev))
            />
            <button type="submit">"Add category"</button>
        </form>
    }
}

/// Правка сайта на месте; отправляет только изменённые поля
#[component]
pub fn EditSiteForm(
    site: Site,
    client: CatalogueClient,
    notice: RwSignal<Option<Notice>>,
    editing: RwSignal<bool>,
) -> impl IntoView {
    let signals = *client.sink();
    let original = StoredValue::new(site.clone());
    let name = RwSignal::new(site.name);
    let url = RwSignal::new(site.url);
    let description = RwSignal::new(site.description);
    let icon = RwSignal::new(site.icon);
    let category = RwSignal::new(site.category_id.to_string());

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let original = original.get_value();
        let Ok(category_id) = category.get_untracked().parse::<i64>() else {
            notice.set(Some(Notice::error("Choose a category")));
            return;
        };
        let edited = Site {
            name: name.get_untracked(),
            url: url.get_untracked(),
            description: description.get_untracked(),
            icon: icon.get_untracked(),
            category_id,
            ..original.clone()
        };

        let dto = UpdateSiteDto::changes(&original, &edited);
        if dto.is_empty() {
            editing.set(false);
            return;
        }
        // URL проверяется так же, как на сервере
        if let Err(e) = original.clone().apply(&dto) {
            notice.set(Some(Notice::error(e.to_string())));
            return;
        }

        let client = client.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = client.update_site(original.id, dto).await;
            if outcome.success {
                editing.set(false);
            }
            notice.set(Some(Notice::from_outcome(&outcome)));
        });
    };

    view! {
        <form class="edit-site" on:submit=submit>
            <input
                type="text"
                placeholder="Name"
                prop:value=move || name.get()
                on:input=move |ev| name.set(event_target_value(&ev))
            />
            <input
                type="url"
                placeholder="https://"
                prop:value=move || url.get()
                on:input=move |ev| url.set(event_target_value(&ev))
            />
            <input
                type="text"
                placeholder="Description"
                prop:value=move || description.get()
                on:input=move |ev| description.set(event_target_value(&ev))
            />
            <input
                type="text"
                placeholder="Icon"
                prop:value=move || icon.get()
                on:input=move |ev| icon.set(event_target_value(&ev))
            />
            <select
                prop:value=move || category.get()
                on:change=move |ev| category.set(event_target_value(&ev))
            >
                <For
                    each=move || signals.document_or_bundled().categories
                    key=|c: &Category| c.clone()
                    children=move |c: Category| {
                        view! { <option value=c.id.to_string()>{c.icon} " " {c.name}</option> }
                    }
                />
            </select>
            <button type="submit">"Save"</button>
            <button type="button" on:click=move |_| editing.set(false)>
                "Cancel"
            </button>
        </form>
    }
}
