//! 메인 애플리케이션 컴포넌트
//!
//! 데이터 로드, 필터 상태, 지도 컨트롤러를 한곳에서 묶는다.
//! 마커는 보이는 빵집 id 목록이 바뀔 때만 다시 만든다 (위시리스트 토글은 재빌드하지 않는다).

use crate::api::FetchApi;
use crate::components::{
    bakery_card::BakeryCard, bakery_list::BakeryList, header::Header, map_view::MapView,
    search_bar::SearchBar, tag_filter::TagFilter,
};
use crate::config;
use crate::geolocation;
use crate::kakao::KakaoRuntime;
use crate::scheduler::GlooScheduler;
use bakery_map_common::{
    find_by_id, load_all, tag_counts, wishlist, Bakery, BakeryFilter, BakeryQuery, BreadTag,
    BuildOutcome, Error, MapController, SelectionEvent, WishlistSet,
};
use futures::StreamExt;
use gloo::console;
use gloo::dialogs::alert;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::rc::Rc;

/// 위시리스트 변경 실패 메시지
pub fn wishlist_error_message(error: &Error) -> String {
    if error.is_unauthorized() {
        "로그인이 필요합니다.".to_string()
    } else {
        format!("위시리스트를 변경하지 못했습니다: {}", error)
    }
}

/// 지도 선택을 다시 적용할지 가르는 키
pub fn selection_key(selected: &Option<Bakery>) -> Option<String> {
    selected.as_ref().map(|b| b.id.clone())
}

#[component]
pub fn App() -> impl IntoView {
    let api = FetchApi::new(config::api_base());
    let (controller, mut events) = MapController::new(
        KakaoRuntime::new(config::kakao_app_key()),
        GlooScheduler,
        config::map_config(),
    );
    let controller = StoredValue::new_local(Rc::new(controller));

    // 데이터
    let bakeries = RwSignal::new(Vec::<Bakery>::new());
    let tags = RwSignal::new(Vec::<BreadTag>::new());
    let wishlist_set = RwSignal::new(WishlistSet::default());
    let signed_in = RwSignal::new(false);
    let loading = RwSignal::new(true);
    let load_error = RwSignal::new(None::<String>);

    // 필터/선택
    let (query, set_query) = signal(String::new());
    let (tag, set_tag) = signal(None::<String>);
    let selected = RwSignal::new(None::<Bakery>);
    let toggling = RwSignal::new(false);

    // 지도
    let map_ready = RwSignal::new(false);
    let map_error = RwSignal::new(None::<String>);

    let visible = Memo::new(move |_| BakeryFilter::new(query.get(), tag.get()).apply(&bakeries.get()));
    let visible_ids = Memo::new(move |_| visible.with(|list| list.iter().map(|b| b.id.clone()).collect::<Vec<_>>()));
    let counts = Signal::derive(move || tags.with(|t| bakeries.with(|b| tag_counts(b, t))));

    {
        let api = api.clone();
        spawn_local(async move {
            match load_all(&api, &BakeryQuery::default()).await {
                Ok(data) => {
                    bakeries.set(data.bakeries);
                    tags.set(data.tags);
                    wishlist_set.set(data.wishlist);
                    signed_in.set(data.signed_in);
                }
                Err(e) => {
                    console::error!(format!("빵집 데이터 로드 실패: {}", e));
                    load_error.set(Some(format!("빵집 목록을 불러오지 못했습니다: {}", e)));
                }
            }
            loading.set(false);
        });
    }

    let start_map = move || {
        let controller = controller.get_value();
        map_error.set(None);
        spawn_local(async move {
            match controller.bootstrap().await {
                Ok(()) => map_ready.set(true),
                Err(e) => {
                    console::error!(e.to_string());
                    map_error.set(Some(e.to_string()));
                }
            }
        });
    };
    start_map();

    // 마커 재빌드
    Effect::new(move |_| {
        visible_ids.track();
        if !map_ready.get() {
            return;
        }
        let list = visible.get_untracked();
        let controller = controller.get_value();
        spawn_local(async move {
            if let BuildOutcome::Completed { markers } = controller.build_markers(&list).await {
                console::log!(format!("마커 {}개 표시", markers));
            }
        });
    });

    // 선택 → 지도 강조/이동. 같은 빵집의 필드 변경(위시리스트 등)으로는 다시 옮기지 않는다
    let selected_id = Memo::new(move |_| selected.with(selection_key));
    Effect::new(move |_| {
        selected_id.track();
        let current = selected.get_untracked();
        controller.with_value(|c| c.select(current.as_ref()));
    });

    // 마커 클릭 → 선택
    spawn_local(async move {
        while let Some(SelectionEvent::MarkerClicked { bakery_id }) = events.next().await {
            let found = visible.with_untracked(|list| find_by_id(list, &bakery_id).cloned());
            if found.is_some() {
                selected.set(found);
            }
        }
    });

    let on_select = move |bakery: Bakery| selected.set(Some(bakery));

    let on_toggle_wishlist = {
        let api = api.clone();
        move |bakery_id: String| {
            if !signed_in.get_untracked() {
                alert("로그인이 필요합니다.");
                return;
            }
            if toggling.get_untracked() {
                return;
            }
            toggling.set(true);
            let api = api.clone();
            spawn_local(async move {
                let mut set = wishlist_set.get_untracked();
                let mut list = bakeries.get_untracked();
                match wishlist::toggle(&api, &mut set, &mut list, &bakery_id).await {
                    Ok(now) => {
                        wishlist_set.set(set);
                        bakeries.set(list);
                        selected.update(|current| {
                            if let Some(b) = current.as_mut().filter(|b| b.id == bakery_id) {
                                b.is_wishlisted = now;
                            }
                        });
                    }
                    Err(e) => {
                        if e.is_unauthorized() {
                            signed_in.set(false);
                        }
                        alert(&wishlist_error_message(&e));
                    }
                }
                toggling.set(false);
            });
        }
    };

    let on_locate = move |_: ()| {
        let controller = controller.get_value();
        spawn_local(async move {
            let position = geolocation::current_position().await;
            if let Err(message) = controller.recenter_on_user(position) {
                alert(&message);
            }
        });
    };

    view! {
        <div class="app">
            <Header signed_in=signed_in on_locate=on_locate />

            <div class="layout">
                <aside class="sidebar">
                    <SearchBar query=query set_query=set_query />
                    <TagFilter counts=counts selected=tag set_selected=set_tag />

                    <Show when=move || loading.get()>
                        <p class="text-muted">"빵집 정보를 불러오는 중..."</p>
                    </Show>
                    {move || load_error.get().map(|message| view! { <p class="error">{message}</p> })}

                    <BakeryList bakeries=visible selected=selected on_select=on_select />
                </aside>

                <main class="map-area">
                    <MapView error=map_error on_retry=move |_| start_map() />
                    {move || {
                        let on_toggle = on_toggle_wishlist.clone();
                        selected.get().map(|bakery| view! {
                            <BakeryCard
                                bakery=bakery
                                signed_in=signed_in
                                busy=toggling
                                on_toggle=on_toggle
                                on_close=move |_| selected.set(None)
                            />
                        })
                    }}
                </main>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wishlist_flip_keeps_selection_key() {
        let before = Some(Bakery { id: "b1".into(), is_wishlisted: false, ..Default::default() });
        let mut after = before.clone();
        if let Some(b) = after.as_mut() {
            b.is_wishlisted = true;
        }

        assert_eq!(selection_key(&before), selection_key(&after));
        assert_ne!(selection_key(&before), selection_key(&None));
        assert_ne!(
            selection_key(&before),
            selection_key(&Some(Bakery { id: "b2".into(), ..Default::default() }))
        );
    }

    #[test]
    fn test_wishlist_error_message() {
        let unauthorized = Error::Api { status: 401, detail: "Not authenticated".into() };
        assert_eq!(wishlist_error_message(&unauthorized), "로그인이 필요합니다.");

        let other = Error::Network("offline".into());
        assert!(wishlist_error_message(&other).starts_with("위시리스트를 변경하지 못했습니다"));
    }
}
