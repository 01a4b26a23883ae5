use crate::domain::catalogue::ui::CatalogueView;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <CatalogueView />
    }
}
