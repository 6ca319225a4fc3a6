//! REST API 클라이언트 (fetch)
//!
//! 세션 쿠키를 싣도록 모든 요청을 `credentials: include`로 보낸다.

use bakery_map_common::api::{decode_body, WishlistAdd};
use bakery_map_common::types::{BakeryRecord, BreadTag, UserProfile, VisitRecord, WishlistItem};
use bakery_map_common::{
    parse_error_detail, BakeryApi, BakeryQuery, Error, NewVisitRecord, Result, SearchQuery, VisitRecordUpdate,
    WishlistUpdate,
};
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestCredentials, RequestInit, RequestMode, Response, UrlSearchParams};

fn network(e: JsValue) -> Error {
    Error::Network(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

/// 2xx 본문 디코드. 빈 본문(204, 빈 200)은 `null`, 형식이 틀리면 `Error::Json`
async fn read_success<T: DeserializeOwned>(resp: &Response) -> Result<T> {
    let text = JsFuture::from(resp.text().map_err(network)?)
        .await
        .map_err(network)?;
    decode_body(&text.as_string().unwrap_or_default())
}

#[derive(Debug, Clone)]
pub struct FetchApi {
    base: String,
}

impl FetchApi {
    pub fn new(base: &str) -> Self {
        Self { base: base.trim_end_matches('/').to_string() }
    }

    /// 경로 조각은 URI 인코딩, 쿼리는 `URLSearchParams`로 붙인다
    fn url(&self, segments: &[&str], query: &[(&'static str, String)]) -> Result<String> {
        let mut url = self.base.clone();
        for segment in segments {
            url.push('/');
            url.push_str(&String::from(js_sys::encode_uri_component(segment)));
        }

        if !query.is_empty() {
            let params = UrlSearchParams::new().map_err(network)?;
            for (key, value) in query {
                params.append(key, value);
            }
            url.push('?');
            url.push_str(&String::from(params.to_string()));
        }
        Ok(url)
    }

    async fn request<T: DeserializeOwned>(&self, method: &str, url: &str, body: Option<String>) -> Result<T> {
        let opts = RequestInit::new();
        opts.set_method(method);
        opts.set_mode(RequestMode::Cors);
        opts.set_credentials(RequestCredentials::Include);
        if let Some(body) = &body {
            opts.set_body(&JsValue::from_str(body));
        }

        let request = Request::new_with_str_and_init(url, &opts).map_err(network)?;
        request.headers().set("Accept", "application/json").map_err(network)?;
        if body.is_some() {
            request.headers().set("Content-Type", "application/json").map_err(network)?;
        }

        let window = web_sys::window().ok_or_else(|| Error::Network("window 없음".into()))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(network)?;
        let resp: Response = resp_value.dyn_into().map_err(network)?;

        if !resp.ok() {
            let text = match resp.text() {
                Ok(promise) => JsFuture::from(promise).await.ok().and_then(|v| v.as_string()),
                Err(_) => None,
            };
            return Err(parse_error_detail(resp.status(), &resp.status_text(), &text.unwrap_or_default()));
        }

        read_success(&resp).await
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str], query: &[(&'static str, String)]) -> Result<T> {
        let url = self.url(segments, query)?;
        self.request("GET", &url, None).await
    }
}

impl BakeryApi for FetchApi {
    fn bakeries<'a>(&'a self, query: &'a BakeryQuery) -> LocalBoxFuture<'a, Result<Vec<BakeryRecord>>> {
        async move { self.get(&["bakeries"], &query.pairs()).await }.boxed_local()
    }

    fn search<'a>(&'a self, query: &'a SearchQuery) -> LocalBoxFuture<'a, Result<Vec<BakeryRecord>>> {
        async move { self.get(&["bakeries", "search"], &query.pairs()).await }.boxed_local()
    }

    fn bakery<'a>(&'a self, id: &'a str) -> LocalBoxFuture<'a, Result<BakeryRecord>> {
        async move { self.get(&["bakeries", id], &[]).await }.boxed_local()
    }

    fn tags(&self) -> LocalBoxFuture<'_, Result<Vec<BreadTag>>> {
        async move { self.get(&["tags"], &[]).await }.boxed_local()
    }

    fn tag_bakeries<'a>(&'a self, tag: &'a str) -> LocalBoxFuture<'a, Result<Vec<BakeryRecord>>> {
        async move { self.get(&["tags", tag, "bakeries"], &[]).await }.boxed_local()
    }

    fn current_user(&self) -> LocalBoxFuture<'_, Result<Option<UserProfile>>> {
        async move {
            match self.get::<UserProfile>(&["me"], &[]).await {
                Ok(user) => Ok(Some(user)),
                Err(e) if e.is_unauthorized() => Ok(None),
                Err(e) => Err(e),
            }
        }
        .boxed_local()
    }

    fn wishlist(&self) -> LocalBoxFuture<'_, Result<Vec<WishlistItem>>> {
        async move { self.get(&["wishlist"], &[]).await }.boxed_local()
    }

    fn add_wishlist<'a>(&'a self, bakery_id: &'a str) -> LocalBoxFuture<'a, Result<WishlistItem>> {
        async move {
            let url = self.url(&["wishlist"], &[])?;
            let body = serde_json::to_string(&WishlistAdd { bakery_id })?;
            self.request("POST", &url, Some(body)).await
        }
        .boxed_local()
    }

    fn update_wishlist<'a>(
        &'a self,
        item_id: &'a str,
        update: &'a WishlistUpdate,
    ) -> LocalBoxFuture<'a, Result<WishlistItem>> {
        async move {
            let url = self.url(&["wishlist", item_id], &[])?;
            let body = serde_json::to_string(update)?;
            self.request("PATCH", &url, Some(body)).await
        }
        .boxed_local()
    }

    fn remove_wishlist<'a>(&'a self, item_id: &'a str) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let url = self.url(&["wishlist", item_id], &[])?;
            let _: serde_json::Value = self.request("DELETE", &url, None).await?;
            Ok(())
        }
        .boxed_local()
    }

    fn visit_records(&self) -> LocalBoxFuture<'_, Result<Vec<VisitRecord>>> {
        async move { self.get(&["visit-records"], &[]).await }.boxed_local()
    }

    fn add_visit_record<'a>(&'a self, record: &'a NewVisitRecord) -> LocalBoxFuture<'a, Result<VisitRecord>> {
        async move {
            let url = self.url(&["visit-records"], &[])?;
            let body = serde_json::to_string(record)?;
            self.request("POST", &url, Some(body)).await
        }
        .boxed_local()
    }

    fn update_visit_record<'a>(
        &'a self,
        record_id: &'a str,
        update: &'a VisitRecordUpdate,
    ) -> LocalBoxFuture<'a, Result<VisitRecord>> {
        async move {
            let url = self.url(&["visit-records", record_id], &[])?;
            let body = serde_json::to_string(update)?;
            self.request("PATCH", &url, Some(body)).await
        }
        .boxed_local()
    }

    fn remove_visit_record<'a>(&'a self, record_id: &'a str) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let url = self.url(&["visit-records", record_id], &[])?;
            let _: serde_json::Value = self.request("DELETE", &url, None).await?;
            Ok(())
        }
        .boxed_local()
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn wasm_url_encodes_segments_and_query() {
        let api = FetchApi::new("/api/v1/");
        let url = api
            .url(&["tags", "크루아상", "bakeries"], &[("limit", "10".to_string())])
            .expect("URL 생성 실패");
        assert!(url.starts_with("/api/v1/tags/%ED%81%AC"));
        assert!(url.ends_with("/bakeries?limit=10"));
    }

    #[wasm_bindgen_test]
    async fn wasm_empty_success_body_decodes_as_null() {
        let resp = Response::new_with_opt_str(Some("")).expect("응답 생성 실패");
        assert_eq!(resp.status(), 200);
        let value: serde_json::Value = read_success(&resp).await.expect("빈 본문 디코드 실패");
        assert!(value.is_null());
    }

    #[wasm_bindgen_test]
    async fn wasm_malformed_success_body_is_json_error() {
        let resp = Response::new_with_opt_str(Some("{not json")).expect("응답 생성 실패");
        let result: Result<Vec<BreadTag>> = read_success(&resp).await;
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[wasm_bindgen_test]
    fn wasm_url_without_query() {
        let api = FetchApi::new("/api/v1");
        assert_eq!(api.url(&["wishlist"], &[]).expect("URL 생성 실패"), "/api/v1/wishlist");
    }
}
