//! 빵집 목록 컴포넌트
//!
//! 번호는 지도 마커 라벨의 번호와 같다.

use bakery_map_common::Bakery;
use leptos::prelude::*;

#[component]
pub fn BakeryList<F>(
    bakeries: Memo<Vec<Bakery>>,
    selected: RwSignal<Option<Bakery>>,
    on_select: F,
) -> impl IntoView
where
    F: Fn(Bakery) + 'static + Clone,
{
    view! {
        <Show
            when=move || !bakeries.with(|list| list.is_empty())
            fallback=|| view! { <p class="text-muted">"조건에 맞는 빵집이 없습니다"</p> }
        >
            <ul class="bakery-list">
                <For
                    each=move || bakeries.get().into_iter().enumerate()
                    key=|(index, bakery)| (*index, bakery.id.clone(), bakery.is_wishlisted)
                    children={
                        let on_select = on_select.clone();
                        move |(index, bakery): (usize, Bakery)| {
                            let on_select = on_select.clone();
                            let id = bakery.id.clone();
                            let is_selected = move || selected.with(|s| s.as_ref().is_some_and(|s| s.id == id));
                            let mappable = bakery.is_mappable();
                            let heart = if bakery.is_wishlisted { "💛" } else { "" };
                            let name = bakery.name.clone();
                            let summary = bakery.summary.clone();
                            let rating = format!("★{:.1}", bakery.rating);
                            view! {
                                <li
                                    class=move || if is_selected() { "bakery-item selected" } else { "bakery-item" }
                                    on:click=move |_| on_select(bakery.clone())
                                >
                                    <span class="bakery-number">{format!("{}.", index + 1)}</span>
                                    <div class="bakery-info">
                                        <p class="bakery-name">{name} " " {heart}</p>
                                        <p class="bakery-meta">{rating}</p>
                                        <p class="text-muted">{summary}</p>
                                        <Show when=move || !mappable>
                                            <p class="text-muted">"(위치 정보 없음)"</p>
                                        </Show>
                                    </div>
                                </li>
                            }
                        }
                    }
                />
            </ul>
        </Show>
    }
}
