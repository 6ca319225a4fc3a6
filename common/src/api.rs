//! REST API 계약
//!
//! 브라우저(fetch)와 CLI(reqwest) 구현이 같은 트레이트를 구현한다.
//! UI 스레드 하나에서만 쓰므로 Future는 Send가 아니어도 된다.

use crate::error::{Error, Result};
use crate::types::{BakeryRecord, BreadTag, UserProfile, VisitRecord, WishlistItem};
use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "/api/v1";

/// `GET /bakeries` 쿼리
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BakeryQuery {
    pub district: Option<String>,
    pub rating: Option<f32>,
    pub limit: Option<u32>,
}

impl BakeryQuery {
    /// 쿼리 문자열 쌍 (값이 있는 것만)
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(district) = self.district.as_deref().filter(|d| !d.is_empty()) {
            pairs.push(("district", district.to_string()));
        }
        if let Some(rating) = self.rating.filter(|r| *r > 0.0) {
            pairs.push(("rating", rating.to_string()));
        }
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

/// `GET /bakeries/search` 쿼리
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub name: Option<String>,
    pub tag: Option<String>,
    pub limit: Option<u32>,
}

impl SearchQuery {
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            pairs.push(("name", name.to_string()));
        }
        if let Some(tag) = self.tag.as_deref().filter(|t| !t.is_empty()) {
            pairs.push(("tag", tag.to_string()));
        }
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

/// `POST /wishlist` 본문
#[derive(Debug, Clone, Serialize)]
pub struct WishlistAdd<'a> {
    pub bakery_id: &'a str,
}

/// `PATCH /wishlist/{id}` 본문
#[derive(Debug, Clone, Default, Serialize)]
pub struct WishlistUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visited: Option<bool>,
}

/// `POST /visit-records` 본문. 빵집은 id 또는 이름 중 하나로 지정한다
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewVisitRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bakery_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bakery_name: Option<String>,
    pub visit_date: String,
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bread_purchased: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
}

/// `PATCH /visit-records/{id}` 본문
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VisitRecordUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visit_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bread_purchased: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
}

impl VisitRecordUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// 에러 응답 본문
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiErrorBody {
    pub detail: Option<serde_json::Value>,
}

/// 빵집 백엔드 API
pub trait BakeryApi {
    fn bakeries<'a>(&'a self, query: &'a BakeryQuery) -> LocalBoxFuture<'a, Result<Vec<BakeryRecord>>>;

    fn search<'a>(&'a self, query: &'a SearchQuery) -> LocalBoxFuture<'a, Result<Vec<BakeryRecord>>>;

    fn bakery<'a>(&'a self, id: &'a str) -> LocalBoxFuture<'a, Result<BakeryRecord>>;

    fn tags(&self) -> LocalBoxFuture<'_, Result<Vec<BreadTag>>>;

    fn tag_bakeries<'a>(&'a self, tag: &'a str) -> LocalBoxFuture<'a, Result<Vec<BakeryRecord>>>;

    /// 로그인 사용자. 401이면 `Ok(None)`
    fn current_user(&self) -> LocalBoxFuture<'_, Result<Option<UserProfile>>>;

    fn wishlist(&self) -> LocalBoxFuture<'_, Result<Vec<WishlistItem>>>;

    fn add_wishlist<'a>(&'a self, bakery_id: &'a str) -> LocalBoxFuture<'a, Result<WishlistItem>>;

    fn update_wishlist<'a>(
        &'a self,
        item_id: &'a str,
        update: &'a WishlistUpdate,
    ) -> LocalBoxFuture<'a, Result<WishlistItem>>;

    fn remove_wishlist<'a>(&'a self, item_id: &'a str) -> LocalBoxFuture<'a, Result<()>>;

    fn visit_records(&self) -> LocalBoxFuture<'_, Result<Vec<VisitRecord>>>;

    fn add_visit_record<'a>(&'a self, record: &'a NewVisitRecord) -> LocalBoxFuture<'a, Result<VisitRecord>>;

    fn update_visit_record<'a>(
        &'a self,
        record_id: &'a str,
        update: &'a VisitRecordUpdate,
    ) -> LocalBoxFuture<'a, Result<VisitRecord>>;

    fn remove_visit_record<'a>(&'a self, record_id: &'a str) -> LocalBoxFuture<'a, Result<()>>;
}

/// 2xx 이외 응답을 `Error::Api`로 변환
///
/// 본문이 `{"detail": "..."}`이면 그 문자열, 아니면 본문 그대로,
/// 본문도 비어 있으면 상태 텍스트를 쓴다.
pub fn parse_error_detail(status: u16, status_text: &str, body: &str) -> Error {
    let fallback = if status_text.trim().is_empty() {
        "API error".to_string()
    } else {
        status_text.trim().to_string()
    };

    let detail = match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(ApiErrorBody { detail: Some(serde_json::Value::String(s)) }) => s,
        // FastAPI 검증 오류는 detail이 배열로 온다
        Ok(ApiErrorBody { detail: Some(value) }) if !value.is_null() => value.to_string(),
        Ok(_) => fallback,
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => fallback,
    };

    Error::Api { status, detail }
}

/// 응답 본문 디코드. 빈 본문은 JSON `null`로 취급
pub fn decode_body<T: serde::de::DeserializeOwned>(body: &str) -> Result<T> {
    let body = if body.trim().is_empty() { "null" } else { body };
    Ok(serde_json::from_str(body)?)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bakery_query_pairs() {
        let query = BakeryQuery {
            district: Some("팔달구".into()),
            rating: Some(4.5),
            limit: Some(20),
        };
        assert_eq!(query.pairs(), vec![
            ("district", "팔달구".to_string()),
            ("rating", "4.5".to_string()),
            ("limit", "20".to_string()),
        ]);
        assert!(BakeryQuery::default().pairs().is_empty());
    }

    #[test]
    fn test_search_query_skips_empty() {
        let query = SearchQuery { name: Some(String::new()), tag: Some("소금빵".into()), limit: None };
        assert_eq!(query.pairs(), vec![("tag", "소금빵".to_string())]);
    }

    #[test]
    fn test_wishlist_update_serialize_skips_none() {
        let update = WishlistUpdate { note: None, visited: Some(true) };
        let json = serde_json::to_string(&update).expect("직렬화 실패");
        assert_eq!(json, r#"{"visited":true}"#);
    }

    #[test]
    fn test_new_visit_record_serialize() {
        let record = NewVisitRecord {
            bakery_name: Some("빵굽는날".into()),
            visit_date: "2024-11-25".into(),
            rating: 5,
            ..Default::default()
        };
        let json = serde_json::to_string(&record).expect("직렬화 실패");
        assert_eq!(json, r#"{"bakery_name":"빵굽는날","visit_date":"2024-11-25","rating":5}"#);
    }

    #[test]
    fn test_visit_record_update_is_empty() {
        assert!(VisitRecordUpdate::default().is_empty());
        assert!(!VisitRecordUpdate { rating: Some(4), ..Default::default() }.is_empty());
    }

    #[test]
    fn test_parse_error_detail_string() {
        let err = parse_error_detail(409, "Conflict", r#"{"detail": "이미 위시리스트에 있습니다"}"#);
        match err {
            Error::Api { status, detail } => {
                assert_eq!(status, 409);
                assert_eq!(detail, "이미 위시리스트에 있습니다");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_detail_fallbacks() {
        let err = parse_error_detail(502, "Bad Gateway", "");
        assert_eq!(err.to_string(), "API error (502): Bad Gateway");

        let err = parse_error_detail(500, "", "upstream exploded");
        assert_eq!(err.to_string(), "API error (500): upstream exploded");

        let err = parse_error_detail(404, "", "{}");
        assert_eq!(err.to_string(), "API error (404): API error");
    }

    #[test]
    fn test_parse_error_detail_validation_array() {
        let body = r#"{"detail": [{"loc": ["body", "bakery_id"], "msg": "field required"}]}"#;
        let err = parse_error_detail(422, "Unprocessable Entity", body);
        assert!(err.to_string().contains("field required"));
    }

    #[test]
    fn test_decode_body_empty_as_null() {
        let value: Option<BreadTag> = decode_body("").expect("디코드 실패");
        assert!(value.is_none());
        let tags: Vec<BreadTag> = decode_body(r#"[{"id": "1", "name": "식빵"}]"#).expect("디코드 실패");
        assert_eq!(tags[0].name, "식빵");
    }

    #[test]
    fn test_decode_body_delete_responses() {
        // DELETE는 빈 200, 204, `{"ok": true}` 중 무엇이 와도 성공
        for body in ["", "  ", r#"{"ok": true}"#] {
            let value: serde_json::Value = decode_body(body).expect("디코드 실패");
            assert!(value.is_null() || value["ok"] == true);
        }
    }

    #[test]
    fn test_decode_body_malformed_is_json_error() {
        let result: Result<Vec<BreadTag>> = decode_body("{not json");
        assert!(matches!(result, Err(Error::Json(_))));
    }
}
