//! Kakao Maps SDK 바인딩
//!
//! `kakao.maps`에서 쓰는 생성자/메서드만 선언하고 `MapRuntime`으로 감싼다.
//! SDK는 `autoload=false`로 주입한 뒤 `kakao.maps.load` 콜백에서 준비 완료로 본다.

use bakery_map_common::map::{ClickSink, MapOptions, MapRuntime, OverlaySpec};
use bakery_map_common::LatLng;
use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// 지도 컨테이너 요소 id
pub const MAP_CONTAINER_ID: &str = "bakery-map";

const SDK_URL: &str = "//dapi.kakao.com/v2/maps/sdk.js";

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["kakao", "maps"], js_name = LatLng)]
    pub type KakaoLatLng;

    #[wasm_bindgen(constructor, js_namespace = ["kakao", "maps"], js_class = "LatLng")]
    fn new(lat: f64, lng: f64) -> KakaoLatLng;

    #[wasm_bindgen(js_namespace = ["kakao", "maps"], js_name = Map)]
    #[derive(Clone)]
    pub type KakaoMap;

    #[wasm_bindgen(catch, constructor, js_namespace = ["kakao", "maps"], js_class = "Map")]
    fn new(container: &web_sys::HtmlElement, options: &JsValue) -> Result<KakaoMap, JsValue>;

    #[wasm_bindgen(method, js_name = panTo)]
    fn pan_to(this: &KakaoMap, position: &KakaoLatLng);

    #[wasm_bindgen(js_namespace = ["kakao", "maps"], js_name = CustomOverlay)]
    pub type CustomOverlay;

    #[wasm_bindgen(constructor, js_namespace = ["kakao", "maps"], js_class = "CustomOverlay")]
    fn new(options: &JsValue) -> CustomOverlay;

    #[wasm_bindgen(method, js_name = setMap)]
    fn set_map(this: &CustomOverlay, map: &JsValue);

    #[wasm_bindgen(method, js_name = setZIndex)]
    fn set_z_index(this: &CustomOverlay, z_index: i32);

    #[wasm_bindgen(js_namespace = ["kakao", "maps"], js_name = MarkerClusterer)]
    pub type MarkerClusterer;

    #[wasm_bindgen(catch, constructor, js_namespace = ["kakao", "maps"], js_class = "MarkerClusterer")]
    fn new(options: &JsValue) -> Result<MarkerClusterer, JsValue>;

    #[wasm_bindgen(method, js_name = addMarkers)]
    fn add_markers(this: &MarkerClusterer, markers: &js_sys::Array);

    #[wasm_bindgen(method)]
    fn clear(this: &MarkerClusterer);

    #[wasm_bindgen(js_namespace = ["kakao", "maps"], js_name = load)]
    fn maps_load(callback: &js_sys::Function);
}

/// 앱 키로 SDK 스크립트 주소를 만든다
pub fn sdk_url(app_key: &str) -> String {
    format!("{}?appkey={}&autoload=false&libraries=clusterer", SDK_URL, app_key)
}

fn js_error(value: JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{:?}", value))
}

fn object(entries: &[(&str, &JsValue)]) -> JsValue {
    let obj = js_sys::Object::new();
    for (key, value) in entries {
        let _ = js_sys::Reflect::set(&obj, &JsValue::from_str(key), value);
    }
    obj.into()
}

/// `window.kakao.maps.<name>`이 있는지
fn has_maps_member(name: &str) -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    ["kakao", "maps", name]
        .iter()
        .try_fold(JsValue::from(window), |parent, key| {
            js_sys::Reflect::get(&parent, &JsValue::from_str(key))
                .ok()
                .filter(|v| !v.is_undefined() && !v.is_null())
        })
        .is_some()
}

/// 생성된 오버레이와 그 DOM 노드
pub struct KakaoOverlay {
    overlay: CustomOverlay,
    content: web_sys::HtmlElement,
    _on_click: Closure<dyn FnMut()>,
}

pub struct KakaoRuntime {
    app_key: String,
}

impl KakaoRuntime {
    pub fn new(app_key: impl Into<String>) -> Self {
        Self { app_key: app_key.into() }
    }

    fn container(&self) -> Option<web_sys::HtmlElement> {
        web_sys::window()?
            .document()?
            .get_element_by_id(MAP_CONTAINER_ID)?
            .dyn_into::<web_sys::HtmlElement>()
            .ok()
    }
}

impl MapRuntime for KakaoRuntime {
    type Map = KakaoMap;
    type Overlay = KakaoOverlay;
    type Clusterer = MarkerClusterer;

    fn is_loaded(&self) -> bool {
        has_maps_member("Map")
    }

    fn load_script(&self) -> LocalBoxFuture<'static, Result<(), String>> {
        let url = sdk_url(&self.app_key);
        async move {
            if url.contains("appkey=&") {
                return Err("Kakao 지도 앱 키가 설정되지 않았습니다".to_string());
            }

            let document = web_sys::window()
                .and_then(|w| w.document())
                .ok_or("document 없음")?;
            let script: web_sys::HtmlScriptElement = document
                .create_element("script")
                .map_err(js_error)?
                .dyn_into()
                .map_err(|_| "script 요소 생성 실패".to_string())?;
            script.set_src(&url);
            script.set_async(true);

            let (tx, rx) = oneshot::channel::<Result<(), String>>();
            let tx = Rc::new(RefCell::new(Some(tx)));

            let on_load = {
                let tx = tx.clone();
                Closure::<dyn FnMut()>::new(move || {
                    if let Some(tx) = tx.borrow_mut().take() {
                        let _ = tx.send(Ok(()));
                    }
                })
            };
            let on_error = {
                let tx = tx.clone();
                Closure::<dyn FnMut()>::new(move || {
                    if let Some(tx) = tx.borrow_mut().take() {
                        let _ = tx.send(Err("Kakao 지도 SDK를 불러오지 못했습니다".to_string()));
                    }
                })
            };
            script.set_onload(Some(on_load.as_ref().unchecked_ref()));
            script.set_onerror(Some(on_error.as_ref().unchecked_ref()));

            let head = document.head().ok_or("head 없음")?;
            head.append_child(&script).map_err(js_error)?;

            rx.await.map_err(|_| "SDK 로드가 취소되었습니다".to_string())??;
            script.set_onload(None);
            script.set_onerror(None);

            // autoload=false: 실제 모듈은 load 콜백에서 준비된다
            let (ready_tx, ready_rx) = oneshot::channel::<()>();
            let mut ready_tx = Some(ready_tx);
            let on_ready = Closure::<dyn FnMut()>::new(move || {
                if let Some(tx) = ready_tx.take() {
                    let _ = tx.send(());
                }
            });
            maps_load(on_ready.as_ref().unchecked_ref());
            ready_rx.await.map_err(|_| "SDK 초기화가 취소되었습니다".to_string())?;
            Ok(())
        }
        .boxed_local()
    }

    fn container_mounted(&self) -> bool {
        self.container().is_some()
    }

    fn create_map(&self, options: &MapOptions) -> Result<KakaoMap, String> {
        let container = self.container().ok_or("지도 컨테이너 없음")?;
        let center: JsValue = KakaoLatLng::new(options.center.lat, options.center.lng).into();
        let opts = object(&[("center", &center), ("level", &JsValue::from(options.level))]);
        KakaoMap::new(&container, &opts).map_err(js_error)
    }

    fn create_overlay(&self, spec: &OverlaySpec<'_>, on_click: ClickSink) -> Result<KakaoOverlay, String> {
        let content: web_sys::HtmlElement = gloo::utils::document()
            .create_element("div")
            .map_err(js_error)?
            .dyn_into()
            .map_err(|_| "마커 요소 생성 실패".to_string())?;
        content.set_inner_html(spec.content);

        let handler = Closure::<dyn FnMut()>::new(move || on_click.click());
        content
            .add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())
            .map_err(js_error)?;

        let position: JsValue = KakaoLatLng::new(spec.position.lat, spec.position.lng).into();
        let node: &JsValue = content.as_ref();
        let overlay = CustomOverlay::new(&object(&[
            ("position", &position),
            ("content", node),
            ("yAnchor", &JsValue::from(1)),
            ("clickable", &JsValue::TRUE),
        ]));

        Ok(KakaoOverlay { overlay, content, _on_click: handler })
    }

    fn set_content(&self, overlay: &KakaoOverlay, content: &str) {
        overlay.content.set_inner_html(content);
    }

    fn set_z_index(&self, overlay: &KakaoOverlay, z_index: i32) {
        overlay.overlay.set_z_index(z_index);
    }

    fn attach(&self, map: &KakaoMap, overlay: &KakaoOverlay) {
        let map: &JsValue = map.as_ref();
        overlay.overlay.set_map(map);
    }

    fn detach(&self, overlay: &KakaoOverlay) {
        overlay.overlay.set_map(&JsValue::NULL);
    }

    fn pan_to(&self, map: &KakaoMap, position: LatLng) {
        map.pan_to(&KakaoLatLng::new(position.lat, position.lng));
    }

    fn create_clusterer(&self, map: &KakaoMap, min_level: u8) -> Option<MarkerClusterer> {
        if !has_maps_member("MarkerClusterer") {
            return None;
        }
        let map: &JsValue = map.as_ref();
        let opts = object(&[
            ("map", map),
            ("averageCenter", &JsValue::TRUE),
            ("minLevel", &JsValue::from(min_level)),
        ]);
        match MarkerClusterer::new(&opts) {
            Ok(clusterer) => Some(clusterer),
            Err(e) => {
                gloo::console::warn!(format!("클러스터러 생성 실패, 직접 배치: {}", js_error(e)));
                None
            }
        }
    }

    fn cluster_add(&self, clusterer: &MarkerClusterer, overlays: &[&KakaoOverlay]) {
        let markers: js_sys::Array = overlays.iter().map(|o| JsValue::clone(o.overlay.as_ref())).collect();
        clusterer.add_markers(&markers);
    }

    fn cluster_clear(&self, clusterer: &MarkerClusterer) {
        clusterer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sdk_url() {
        let url = sdk_url("abc123");
        assert_eq!(
            url,
            "//dapi.kakao.com/v2/maps/sdk.js?appkey=abc123&autoload=false&libraries=clusterer"
        );
    }

    #[test]
    fn test_sdk_url_without_key() {
        assert!(sdk_url("").contains("appkey=&"));
    }
}
