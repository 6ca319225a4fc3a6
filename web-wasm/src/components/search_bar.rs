//! 검색창 컴포넌트

use leptos::prelude::*;

#[component]
pub fn SearchBar(query: ReadSignal<String>, set_query: WriteSignal<String>) -> impl IntoView {
    view! {
        <div class="search-bar">
            <input
                type="search"
                id="bakery-search"
                placeholder="빵집 이름이나 메뉴로 검색 (예: 크루아상)"
                prop:value=move || query.get()
                on:input=move |ev| {
                    set_query.set(event_target_value(&ev));
                }
            />
            <Show when=move || !query.get().is_empty()>
                <button class="btn btn-tertiary btn-small" on:click=move |_| set_query.set(String::new())>
                    "✕"
                </button>
            </Show>
        </div>
    }
}
