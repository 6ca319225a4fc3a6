//! 지도 컨테이너와 초기화 실패 오버레이

use crate::kakao::MAP_CONTAINER_ID;
use leptos::prelude::*;

#[component]
pub fn MapView<F>(error: RwSignal<Option<String>>, on_retry: F) -> impl IntoView
where
    F: Fn(()) + 'static + Clone,
{
    view! {
        <div class="map-wrapper">
            <div id=MAP_CONTAINER_ID class="map-container"></div>
            {move || {
                let on_retry = on_retry.clone();
                error.get().map(|message| view! {
                    <div class="map-error">
                        <p>"지도를 불러오지 못했습니다"</p>
                        <p class="text-muted">{message}</p>
                        <button class="btn btn-primary" on:click=move |_| on_retry(())>
                            "다시 시도"
                        </button>
                    </div>
                })
            }}
        </div>
    }
}
