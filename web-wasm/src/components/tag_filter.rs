//! 빵 종류 태그 필터

use leptos::prelude::*;

/// 같은 태그를 다시 누르면 해제
pub fn next_tag(current: Option<&str>, clicked: &str) -> Option<String> {
    if current == Some(clicked) {
        None
    } else {
        Some(clicked.to_string())
    }
}

#[component]
pub fn TagFilter(
    counts: Signal<Vec<(String, usize)>>,
    selected: ReadSignal<Option<String>>,
    set_selected: WriteSignal<Option<String>>,
) -> impl IntoView {
    view! {
        <div class="tag-filter">
            <button
                class=move || if selected.get().is_none() { "tag active" } else { "tag" }
                on:click=move |_| set_selected.set(None)
            >
                "전체"
            </button>
            <For
                each=move || counts.get()
                key=|(name, count)| (name.clone(), *count)
                children=move |(name, count)| {
                    let active_name = name.clone();
                    let label = format!("{} {}", name, count);
                    view! {
                        <button
                            class=move || {
                                if selected.get().as_deref() == Some(active_name.as_str()) { "tag active" } else { "tag" }
                            }
                            disabled=count == 0
                            on:click=move |_| {
                                set_selected.update(|current| *current = next_tag(current.as_deref(), &name));
                            }
                        >
                            {label}
                        </button>
                    }
                }
            />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_tag_toggles() {
        assert_eq!(next_tag(None, "소금빵"), Some("소금빵".to_string()));
        assert_eq!(next_tag(Some("소금빵"), "소금빵"), None);
        assert_eq!(next_tag(Some("소금빵"), "카눌레"), Some("카눌레".to_string()));
    }
}
