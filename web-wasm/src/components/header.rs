//! 헤더 컴포넌트

use leptos::prelude::*;

#[component]
pub fn Header<F>(signed_in: RwSignal<bool>, on_locate: F) -> impl IntoView
where
    F: Fn(()) + 'static + Clone,
{
    view! {
        <header class="header">
            <h1>"🥐 빵집 지도"</h1>
            <div class="header-actions">
                <button
                    class="btn btn-secondary btn-small"
                    on:click={
                        let on_locate = on_locate.clone();
                        move |_| on_locate(())
                    }
                >
                    "📍 내 위치"
                </button>
                <span class="session-status">
                    {move || if signed_in.get() { "로그인됨" } else { "로그인하면 위시리스트를 쓸 수 있어요" }}
                </span>
            </div>
        </header>
    }
}
