use contracts::domain::a001_category::aggregate::Category;
use contracts::domain::a002_site::aggregate::Site;
use contracts::domain::catalogue::SiteFilter;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;

use super::forms::{AddCategoryForm, AddSiteForm, EditSiteForm};
use super::notice::Notice;
use crate::domain::catalogue::hook::{use_catalogue, CatalogueClient};
use crate::domain::catalogue::sync::SyncState;
use crate::shared::query::{current_query, is_edit_mode};

pub const SEARCH_DEBOUNCE_MS: u32 = 300;

/// Главная страница: категории, поиск, список сайтов; в режиме `?edit=1` ещё и формы
#[component]
pub fn CatalogueView() -> impl IntoView {
    let client = use_catalogue();
    let signals = *client.sink();
    let edit_mode = is_edit_mode(&current_query());

    // 0 = все категории
    let selected_category = RwSignal::new(0_i64);
    let search_term = RwSignal::new(String::new());
    let search_generation = StoredValue::new(0_u32);
    let notice = RwSignal::new(None::<Notice>);

    // поиск применяется через SEARCH_DEBOUNCE_MS после последнего ввода
    let on_search = move |ev: leptos::ev::Event| {
        let value = event_target_value(&ev);
        let generation = search_generation.get_value().wrapping_add(1);
        search_generation.set_value(generation);
        wasm_bindgen_futures::spawn_local(async move {
            TimeoutFuture::new(SEARCH_DEBOUNCE_MS).await;
            if search_generation.get_value() == generation {
                search_term.set(value);
            }
        });
    };

    let visible_sites = move || {
        let document = signals.document_or_bundled();
        SiteFilter::new(Some(selected_category.get()), search_term.get())
            .apply(&document)
            .into_iter()
            .cloned()
            .collect::<Vec<Site>>()
    };

    let status = move || match signals.state.get() {
        SyncState::Idle | SyncState::Ready => String::new(),
        SyncState::Loading => "Loading…".to_string(),
        SyncState::Error(e) => e,
    };

    let category_client = client.clone();
    let site_client = client.clone();

    view! {
        <main class="sitedir">
            <h1>"Site Directory"</h1>
            <p class="status">{status}</p>
            {move || {
                notice
                    .get()
                    .map(|n| {
                        let class = if n.ok { "notice ok" } else { "notice error" };
                        view! { <div class=class>{n.text}</div> }
                    })
            }}
            <input type="search" placeholder="Search sites" on:input=on_search />
            <nav class="categories">
                <button
                    class:active=move || selected_category.get() == 0
                    on:click=move |_| selected_category.set(0)
                >
                    "All"
                </button>
                <For
                    each=move || signals.document_or_bundled().categories
                    // ключ по всему значению: переименованная категория перерисуется
                    key=|c: &Category| c.clone()
                    children=move |category: Category| {
                        view! {
                            <CategoryButton
                                category=category
                                selected=selected_category
                                edit_mode=edit_mode
                                client=category_client.clone()
                                notice=notice
                            />
                        }
                    }
                />
            </nav>
            <ul class="sites">
                <For
                    each=visible_sites
                    key=|s: &Site| s.clone()
                    children=move |site: Site| {
                        view! {
                            <SiteRow
                                site=site
                                edit_mode=edit_mode
                                client=site_client.clone()
                                notice=notice
                            />
                        }
                    }
                />
            </ul>
            {edit_mode
                .then(|| {
                    view! {
                        <section class="edit-panel">
                            <h2>"Edit"</h2>
                            <AddSiteForm client=client.clone() notice=notice />
                            <AddCategoryForm client=client.clone() notice=notice />
                        </section>
                    }
                })}
        </main>
    }
}

#[component]
fn CategoryButton(
    category: Category,
    selected: RwSignal<i64>,
    edit_mode: bool,
    client: CatalogueClient,
    notice: RwSignal<Option<Notice>>,
) -> impl IntoView {
    let id = category.id;
    let delete = move |_: leptos::ev::MouseEvent| {
        let client = client.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = client.delete_category(id).await;
            if outcome.success && selected.get_untracked() == id {
                selected.set(0);
            }
            notice.set(Some(Notice::from_outcome(&outcome)));
        });
    };

    view! {
        <span class="category">
            <button class:active=move || selected.get() == id on:click=move |_| selected.set(id)>
                {category.icon} " " {category.name}
            </button>
            {edit_mode
                .then(|| {
                    view! {
                        <button class="delete" title="Delete category" on:click=delete>
                            "×"
                        </button>
                    }
                })}
        </span>
    }
}

#[component]
fn SiteRow(
    site: Site,
    edit_mode: bool,
    client: CatalogueClient,
    notice: RwSignal<Option<Notice>>,
) -> impl IntoView {
    let id = site.id;
    let editing = RwSignal::new(false);
    let delete_client = client.clone();
    let delete = move |_: leptos::ev::MouseEvent| {
        let client = delete_client.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = client.delete_site(id).await;
            notice.set(Some(Notice::from_outcome(&outcome)));
        });
    };

    // иконка это путь/URL картинки или просто символ
    let icon = if site.icon.starts_with('/') || site.icon.starts_with("http") {
        view! { <img class="site-icon" src=site.icon.clone() alt="" /> }.into_any()
    } else {
        view! { <span class="site-icon">{site.icon.clone()}</span> }.into_any()
    };

    let edit_site = site.clone();
    view! {
        <li>
            {icon}
            <a href=site.url target="_blank" rel="noopener noreferrer">
                {site.name}
            </a>
            " "
            <span class="description">{site.description}</span>
            {edit_mode
                .then(|| {
                    view! {
                        <button class="edit" title="Edit site" on:click=move |_| editing.set(true)>
                            "✎"
                        </button>
                        <button class="delete" title="Delete site" on:click=delete>
                            "×"
                        </button>
                    }
                })}
            {move || {
                editing
                    .get()
                    .then(|| {
                        view! {
                            <EditSiteForm
                                site=edit_site.clone()
                                client=client.clone()
                                notice=notice
                                editing=editing
                            />
                        }
                    })
            }}
        </li>
    }
}
