//! REST API 클라이언트 (reqwest)
//!
//! 쿠키 저장소를 켜 두고, 설정에 세션 쿠키가 있으면 모든 요청에 싣는다.

use crate::config::Config;
use crate::error::{BakeryMapError, Result};
use bakery_map_common::api::{decode_body, WishlistAdd};
use bakery_map_common::types::{BakeryRecord, BreadTag, UserProfile, VisitRecord, WishlistItem};
use bakery_map_common::{
    parse_error_detail, BakeryApi, BakeryQuery, NewVisitRecord, SearchQuery, VisitRecordUpdate, WishlistUpdate,
};
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

type ApiResult<T> = bakery_map_common::Result<T>;

pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let base = Url::parse(config.api_base()?)
            .map_err(|e| BakeryMapError::Config(format!("API 주소 해석 실패: {}", e)))?;

        let mut headers = HeaderMap::new();
        if let Some(cookie) = config.session_cookie.as_deref().filter(|c| !c.trim().is_empty()) {
            let value = HeaderValue::from_str(cookie.trim())
                .map_err(|_| BakeryMapError::Config("세션 쿠키 형식이 올바르지 않습니다".into()))?;
            headers.insert(COOKIE, value);
        }

        let http = Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds.max(1)))
            .build()?;

        Ok(Self { http, base })
    }

    /// 기본 주소 뒤에 경로 조각을 붙인다 (조각은 퍼센트 인코딩됨)
    fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| bakery_map_common::Error::Config(format!("잘못된 API 주소: {}", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| bakery_map_common::Error::Network(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| bakery_map_common::Error::Network(e.to_string()))?;

        tracing::debug!(status = status.as_u16(), bytes = body.len(), "api response");

        if !status.is_success() {
            return Err(parse_error_detail(
                status.as_u16(),
                status.canonical_reason().unwrap_or(""),
                &body,
            ));
        }
        decode_body(&body)
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str], query: &[(&'static str, String)]) -> ApiResult<T> {
        let url = self.endpoint(segments)?;
        self.send(self.http.get(url).query(query)).await
    }
}

impl BakeryApi for ApiClient {
    fn bakeries<'a>(&'a self, query: &'a BakeryQuery) -> LocalBoxFuture<'a, ApiResult<Vec<BakeryRecord>>> {
        async move { self.get(&["bakeries"], &query.pairs()).await }.boxed_local()
    }

    fn search<'a>(&'a self, query: &'a SearchQuery) -> LocalBoxFuture<'a, ApiResult<Vec<BakeryRecord>>> {
        async move { self.get(&["bakeries", "search"], &query.pairs()).await }.boxed_local()
    }

    fn bakery<'a>(&'a self, id: &'a str) -> LocalBoxFuture<'a, ApiResult<BakeryRecord>> {
        async move { self.get(&["bakeries", id], &[]).await }.boxed_local()
    }

    fn tags(&self) -> LocalBoxFuture<'_, ApiResult<Vec<BreadTag>>> {
        async move { self.get(&["tags"], &[]).await }.boxed_local()
    }

    fn tag_bakeries<'a>(&'a self, tag: &'a str) -> LocalBoxFuture<'a, ApiResult<Vec<BakeryRecord>>> {
        async move { self.get(&["tags", tag, "bakeries"], &[]).await }.boxed_local()
    }

    fn current_user(&self) -> LocalBoxFuture<'_, ApiResult<Option<UserProfile>>> {
        async move {
            match self.get::<UserProfile>(&["me"], &[]).await {
                Ok(user) => Ok(Some(user)),
                Err(e) if e.is_unauthorized() => Ok(None),
                Err(e) => Err(e),
            }
        }
        .boxed_local()
    }

    fn wishlist(&self) -> LocalBoxFuture<'_, ApiResult<Vec<WishlistItem>>> {
        async move { self.get(&["wishlist"], &[]).await }.boxed_local()
    }

    fn add_wishlist<'a>(&'a self, bakery_id: &'a str) -> LocalBoxFuture<'a, ApiResult<WishlistItem>> {
        async move {
            let url = self.endpoint(&["wishlist"])?;
            self.send(self.http.post(url).json(&WishlistAdd { bakery_id })).await
        }
        .boxed_local()
    }

    fn update_wishlist<'a>(
        &'a self,
        item_id: &'a str,
        update: &'a WishlistUpdate,
    ) -> LocalBoxFuture<'a, ApiResult<WishlistItem>> {
        async move {
            let url = self.endpoint(&["wishlist", item_id])?;
            self.send(self.http.patch(url).json(update)).await
        }
        .boxed_local()
    }

    fn remove_wishlist<'a>(&'a self, item_id: &'a str) -> LocalBoxFuture<'a, ApiResult<()>> {
        async move {
            let url = self.endpoint(&["wishlist", item_id])?;
            let _: serde_json::Value = self.send(self.http.delete(url)).await?;
            Ok(())
        }
        .boxed_local()
    }

    fn visit_records(&self) -> LocalBoxFuture<'_, ApiResult<Vec<VisitRecord>>> {
        async move { self.get(&["visit-records"], &[]).await }.boxed_local()
    }

    fn add_visit_record<'a>(&'a self, record: &'a NewVisitRecord) -> LocalBoxFuture<'a, ApiResult<VisitRecord>> {
        async move {
            let url = self.endpoint(&["visit-records"])?;
            self.send(self.http.post(url).json(record)).await
        }
        .boxed_local()
    }

    fn update_visit_record<'a>(
        &'a self,
        record_id: &'a str,
        update: &'a VisitRecordUpdate,
    ) -> LocalBoxFuture<'a, ApiResult<VisitRecord>> {
        async move {
            let url = self.endpoint(&["visit-records", record_id])?;
            self.send(self.http.patch(url).json(update)).await
        }
        .boxed_local()
    }

    fn remove_visit_record<'a>(&'a self, record_id: &'a str) -> LocalBoxFuture<'a, ApiResult<()>> {
        async move {
            let url = self.endpoint(&["visit-records", record_id])?;
            let _: serde_json::Value = self.send(self.http.delete(url)).await?;
            Ok(())
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        let config = Config { api_base: base.into(), ..Config::default() };
        ApiClient::new(&config).expect("클라이언트 생성 실패")
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let client = client("http://localhost:8000/api/v1/");
        let url = client.endpoint(&["bakeries", "search"]).expect("URL 생성 실패");
        assert_eq!(url.as_str(), "http://localhost:8000/api/v1/bakeries/search");
    }

    #[test]
    fn test_endpoint_encodes_tag() {
        let client = client("http://localhost:8000/api/v1");
        let url = client.endpoint(&["tags", "크루아상", "bakeries"]).expect("URL 생성 실패");
        assert!(url.as_str().starts_with("http://localhost:8000/api/v1/tags/%ED%81%AC"));
        assert!(url.as_str().ends_with("/bakeries"));
    }

    #[test]
    fn test_endpoint_visit_record() {
        let client = client("http://localhost:8000/api/v1");
        let url = client.endpoint(&["visit-records", "v-12"]).expect("URL 생성 실패");
        assert_eq!(url.as_str(), "http://localhost:8000/api/v1/visit-records/v-12");
    }

    #[test]
    fn test_rejects_relative_base() {
        let config = Config { api_base: "/api/v1".into(), ..Config::default() };
        assert!(matches!(ApiClient::new(&config), Err(BakeryMapError::Config(_))));
    }

    #[test]
    fn test_rejects_bad_session_cookie() {
        let config = Config { session_cookie: Some("bad\ncookie".into()), ..Config::default() };
        assert!(matches!(ApiClient::new(&config), Err(BakeryMapError::Config(_))));
    }
}
