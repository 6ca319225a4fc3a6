//! 빵집 데이터 타입 정의
//!
//! REST API 응답 형태(snake_case)와 화면에서 쓰는 형태를 분리:
//! - BakeryRecord: `/bakeries` 응답 레코드
//! - Bakery: 위시리스트 여부가 합쳐진 화면용 레코드
//! - BreadTag / WishlistItem / VisitRecord / UserProfile: 그 외 API 응답

use serde::{Deserialize, Serialize};

/// 위경도 좌표
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// 지도에 표시 가능한 좌표인지
    ///
    /// (0, 0)은 "좌표 없음" 센티널로 취급한다.
    pub fn is_valid(&self) -> bool {
        if !self.lat.is_finite() || !self.lng.is_finite() {
            return false;
        }
        if self.lat == 0.0 || self.lng == 0.0 {
            return false;
        }
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// `/bakeries` 응답 레코드
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BakeryRecord {
    pub id: String,
    pub name: String,
    pub address: String,
    pub district: Option<String>,
    pub rating: f32,
    pub bread_tags: Option<Vec<String>>,
    pub ai_summary: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// 화면용 빵집 레코드
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bakery {
    pub id: String,
    pub name: String,
    pub address: String,
    pub district: String,
    pub rating: f32,
    /// 대표 메뉴 요약 (API의 ai_summary)
    pub summary: String,
    pub lat: f64,
    pub lng: f64,
    /// 빵 종류 태그 (중복 없음, 순서 무관)
    pub bread_tags: Vec<String>,
    /// 위시리스트 멤버십에서 파생되는 값
    pub is_wishlisted: bool,
}

impl Bakery {
    /// API 레코드에서 변환. 좌표가 없으면 (0, 0) 센티널
    pub fn from_record(record: BakeryRecord, is_wishlisted: bool) -> Self {
        let mut bread_tags: Vec<String> = Vec::new();
        for tag in record.bread_tags.unwrap_or_default() {
            let tag = tag.trim().to_string();
            if !tag.is_empty() && !bread_tags.contains(&tag) {
                bread_tags.push(tag);
            }
        }

        // 한쪽만 있는 좌표는 좌표 없음과 같다
        let (lat, lng) = match (record.latitude, record.longitude) {
            (Some(lat), Some(lng)) => (lat, lng),
            _ => (0.0, 0.0),
        };

        Self {
            id: record.id,
            name: record.name,
            address: record.address,
            district: record.district.unwrap_or_default(),
            rating: record.rating,
            summary: record.ai_summary.unwrap_or_default(),
            lat,
            lng,
            bread_tags,
            is_wishlisted,
        }
    }

    /// 유효한 좌표가 있으면 반환
    pub fn position(&self) -> Option<LatLng> {
        let pos = LatLng::new(self.lat, self.lng);
        pos.is_valid().then_some(pos)
    }

    pub fn is_mappable(&self) -> bool {
        self.position().is_some()
    }

    /// 대소문자 무시 태그 포함 여부
    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.trim().to_lowercase();
        self.bread_tags.iter().any(|t| t.to_lowercase() == tag)
    }
}

/// `/tags` 응답
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreadTag {
    pub id: String,
    pub name: String,
}

/// `/wishlist` 응답
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WishlistItem {
    pub id: String,
    pub user_id: String,
    pub bakery_id: String,
    pub bakery_name: String,
    pub bakery_address: String,
    pub bread_types: Vec<String>,
    pub note: Option<String>,
    pub visited: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// `/visit-records` 응답
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisitRecord {
    pub id: String,
    pub user_id: String,
    pub bakery_id: String,
    pub bakery_name: String,
    pub bakery_address: String,
    /// `YYYY-MM-DD`
    pub visit_date: String,
    pub rating: u8,
    /// 쉼표로 구분된 구매 품목
    pub bread_purchased: Option<String>,
    pub review: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl VisitRecord {
    /// `"소금빵, 크루아상"` → `["소금빵", "크루아상"]`
    pub fn purchased_items(&self) -> Vec<String> {
        self.bread_purchased
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// `/me` 응답
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub profile_image: Option<String>,
    pub created_at: String,
    pub visit_records_count: u32,
    pub wishlist_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latlng_valid() {
        assert!(LatLng::new(37.28, 127.01).is_valid());
        assert!(!LatLng::new(0.0, 0.0).is_valid());
        assert!(!LatLng::new(37.28, 0.0).is_valid());
        assert!(!LatLng::new(f64::NAN, 127.0).is_valid());
        assert!(!LatLng::new(91.0, 127.0).is_valid());
        assert!(!LatLng::new(37.0, 181.0).is_valid());
    }

    #[test]
    fn test_bakery_record_deserialize_minimal() {
        let json = r#"{"id": "1", "name": "르뱅드마리", "address": "경기 수원시 팔달구 행궁로 30"}"#;
        let record: BakeryRecord = serde_json::from_str(json).expect("역직렬화 실패");
        assert_eq!(record.name, "르뱅드마리");
        assert!(record.latitude.is_none());
        assert!(record.bread_tags.is_none());
        assert_eq!(record.rating, 0.0);
    }

    #[test]
    fn test_bakery_from_record() {
        let json = r#"{
            "id": "2",
            "name": "베이커리카페 밀",
            "address": "경기 수원시 영통구 광교중앙로 248",
            "district": "영통구",
            "rating": 4.6,
            "bread_tags": ["소금빵", "카눌레", "소금빵", " "],
            "ai_summary": "소금빵, 카눌레",
            "latitude": 37.2975,
            "longitude": 127.0456
        }"#;
        let record: BakeryRecord = serde_json::from_str(json).expect("역직렬화 실패");
        let bakery = Bakery::from_record(record, true);

        assert_eq!(bakery.district, "영통구");
        assert_eq!(bakery.summary, "소금빵, 카눌레");
        assert_eq!(bakery.bread_tags, vec!["소금빵".to_string(), "카눌레".to_string()]);
        assert!(bakery.is_wishlisted);
        assert_eq!(bakery.position(), Some(LatLng::new(37.2975, 127.0456)));
    }

    #[test]
    fn test_bakery_missing_coordinates_is_sentinel() {
        let record = BakeryRecord {
            id: "3".into(),
            name: "빵굽는날".into(),
            latitude: Some(37.27),
            longitude: None,
            ..Default::default()
        };
        let bakery = Bakery::from_record(record, false);
        assert_eq!((bakery.lat, bakery.lng), (0.0, 0.0));
        assert!(!bakery.is_mappable());
    }

    #[test]
    fn test_bakery_has_tag_case_insensitive() {
        let bakery = Bakery {
            bread_tags: vec!["Croissant".into(), "바게트".into()],
            ..Default::default()
        };
        assert!(bakery.has_tag("croissant"));
        assert!(bakery.has_tag(" 바게트 "));
        assert!(!bakery.has_tag("식빵"));
    }

    #[test]
    fn test_wishlist_item_deserialize() {
        let json = r#"{
            "id": "w1",
            "user_id": "u1",
            "bakery_id": "1",
            "bakery_name": "르뱅드마리",
            "bakery_address": "경기 수원시 팔달구 행궁로 30",
            "bread_types": ["크루아상"],
            "note": null,
            "visited": false,
            "created_at": "2024-11-15T09:00:00Z",
            "updated_at": "2024-11-15T09:00:00Z"
        }"#;
        let item: WishlistItem = serde_json::from_str(json).expect("역직렬화 실패");
        assert_eq!(item.bakery_id, "1");
        assert!(item.note.is_none());
    }

    #[test]
    fn test_visit_record_purchased_items() {
        let record = VisitRecord {
            bread_purchased: Some("소금빵, 크루아상 ,,  바게트".into()),
            ..Default::default()
        };
        assert_eq!(record.purchased_items(), vec!["소금빵", "크루아상", "바게트"]);
        assert!(VisitRecord::default().purchased_items().is_empty());
    }

    #[test]
    fn test_visit_record_deserialize_nulls() {
        let json = r#"{"id": "v1", "bakery_name": "빵굽는날", "visit_date": "2024-11-25", "rating": 5, "bread_purchased": null, "review": null}"#;
        let record: VisitRecord = serde_json::from_str(json).expect("파싱 실패");
        assert_eq!(record.rating, 5);
        assert!(record.review.is_none());
        assert!(record.bakery_id.is_empty());
    }
}
