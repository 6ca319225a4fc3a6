//! 선택된 빵집 카드 (위시리스트 토글)

use bakery_map_common::Bakery;
use leptos::prelude::*;

pub fn wishlist_label(is_wishlisted: bool) -> &'static str {
    if is_wishlisted {
        "💛 위시리스트에서 빼기"
    } else {
        "🤍 위시리스트에 담기"
    }
}

#[component]
pub fn BakeryCard<FT, FC>(
    bakery: Bakery,
    signed_in: RwSignal<bool>,
    busy: RwSignal<bool>,
    on_toggle: FT,
    on_close: FC,
) -> impl IntoView
where
    FT: Fn(String) + 'static + Clone,
    FC: Fn(()) + 'static + Clone,
{
    let id = bakery.id.clone();
    let label = wishlist_label(bakery.is_wishlisted);
    let tags = bakery.bread_tags.clone();

    view! {
        <div class="bakery-card">
            <button class="btn btn-tertiary btn-small card-close" on:click=move |_| on_close(())>
                "✕"
            </button>
            <h2>{bakery.name.clone()}</h2>
            <p class="bakery-meta">
                {bakery.district.clone()} " · " {format!("★{:.1}", bakery.rating)}
            </p>
            <p class="text-muted">{bakery.address.clone()}</p>
            <Show when={
                let summary = bakery.summary.clone();
                move || !summary.is_empty()
            }>
                <p class="bakery-summary">{bakery.summary.clone()}</p>
            </Show>
            <div class="bakery-tags">
                {tags.into_iter().map(|t| view! { <span class="tag small">{t}</span> }).collect_view()}
            </div>
            <button
                class="btn btn-primary"
                disabled=move || busy.get() || !signed_in.get()
                title=move || if signed_in.get() { "" } else { "로그인이 필요합니다" }
                on:click=move |_| on_toggle(id.clone())
            >
                {label}
            </button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wishlist_label() {
        assert!(wishlist_label(true).contains("빼기"));
        assert!(wishlist_label(false).contains("담기"));
    }
}
