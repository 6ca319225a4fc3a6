//! 현재 위치 조회

use bakery_map_common::LatLng;
use futures::channel::oneshot;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

fn number_at(value: &JsValue, path: &[&str]) -> Option<f64> {
    path.iter()
        .try_fold(value.clone(), |parent, key| {
            js_sys::Reflect::get(&parent, &JsValue::from_str(key)).ok()
        })
        .and_then(|v| v.as_f64())
}

/// 브라우저 위치 권한으로 현재 좌표를 한 번 가져온다
pub async fn current_position() -> Result<LatLng, String> {
    let geolocation = web_sys::window()
        .ok_or("window 없음")?
        .navigator()
        .geolocation()
        .map_err(|_| "이 브라우저는 위치 정보를 지원하지 않습니다".to_string())?;

    let (tx, rx) = oneshot::channel::<Result<LatLng, String>>();
    let tx = Rc::new(RefCell::new(Some(tx)));

    let on_success = {
        let tx = tx.clone();
        Closure::<dyn FnMut(JsValue)>::new(move |position: JsValue| {
            let lat = number_at(&position, &["coords", "latitude"]);
            let lng = number_at(&position, &["coords", "longitude"]);
            let result = match (lat, lng) {
                (Some(lat), Some(lng)) => Ok(LatLng::new(lat, lng)),
                _ => Err("좌표를 읽을 수 없습니다".to_string()),
            };
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(result);
            }
        })
    };
    let on_error = {
        let tx = tx.clone();
        Closure::<dyn FnMut(JsValue)>::new(move |error: JsValue| {
            let message = js_sys::Reflect::get(&error, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
                .unwrap_or_else(|| "위치 조회 실패".to_string());
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(Err(message));
            }
        })
    };

    geolocation
        .get_current_position_with_error_callback(
            on_success.as_ref().unchecked_ref(),
            Some(on_error.as_ref().unchecked_ref()),
        )
        .map_err(|_| "위치 조회를 시작할 수 없습니다".to_string())?;

    rx.await.map_err(|_| "위치 조회가 취소되었습니다".to_string())?
}
