//! 초기 데이터 로드
//!
//! 빵집 목록, 태그 어휘, (로그인 시) 위시리스트를 동시에 가져와 합친다.
//! 태그/위시리스트 실패는 빈 값으로 대체하고, 빵집 목록 실패만 전체 실패로 본다.

use crate::api::{BakeryApi, BakeryQuery};
use crate::error::Result;
use crate::types::{Bakery, BreadTag, WishlistItem};
use crate::wishlist::WishlistSet;

/// 로드 결과
#[derive(Debug, Clone, Default)]
pub struct LoadedData {
    pub bakeries: Vec<Bakery>,
    pub tags: Vec<BreadTag>,
    pub wishlist: WishlistSet,
    pub signed_in: bool,
}

pub async fn load_all<A: BakeryApi + ?Sized>(api: &A, query: &BakeryQuery) -> Result<LoadedData> {
    let wishlist_fut = async {
        match api.current_user().await {
            Ok(Some(_)) => {}
            Ok(None) => return (false, Vec::new()),
            Err(e) => {
                tracing::debug!(error = %e, "session check failed, continuing signed out");
                return (false, Vec::new());
            }
        }

        let items: Vec<WishlistItem> = match api.wishlist().await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(error = %e, "wishlist fetch failed, using empty wishlist");
                Vec::new()
            }
        };
        (true, items)
    };

    let tags_fut = async {
        match api.tags().await {
            Ok(tags) => tags,
            Err(e) => {
                tracing::warn!(error = %e, "tag fetch failed, using empty vocabulary");
                Vec::new()
            }
        }
    };

    let (records, tags, (signed_in, items)) =
        futures::join!(api.bakeries(query), tags_fut, wishlist_fut);
    let records = records?;

    let wishlist = WishlistSet::from_items(&items);
    let bakeries: Vec<Bakery> = records
        .into_iter()
        .map(|record| {
            let wishlisted = wishlist.contains(&record.id);
            Bakery::from_record(record, wishlisted)
        })
        .collect();

    tracing::info!(
        bakeries = bakeries.len(),
        mappable = bakeries.iter().filter(|b| b.is_mappable()).count(),
        tags = tags.len(),
        wishlist = wishlist.len(),
        "bakery data loaded"
    );

    Ok(LoadedData { bakeries, tags, wishlist, signed_in })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::FakeApi;
    use crate::types::BakeryRecord;
    use futures::executor::block_on;

    fn record(id: &str, lat: Option<f64>, lng: Option<f64>) -> BakeryRecord {
        BakeryRecord {
            id: id.into(),
            name: format!("빵집{}", id),
            latitude: lat,
            longitude: lng,
            ..Default::default()
        }
    }

    fn api() -> FakeApi {
        FakeApi {
            records: vec![
                record("1", Some(37.28), Some(127.01)),
                record("2", None, None),
            ],
            tags: vec![BreadTag { id: "t1".into(), name: "소금빵".into() }],
            wishlist: vec![WishlistItem { id: "w1".into(), bakery_id: "1".into(), ..Default::default() }],
            signed_in: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_load_merges_wishlist() {
        let data = block_on(load_all(&api(), &BakeryQuery::default())).expect("로드 실패");
        assert!(data.signed_in);
        assert_eq!(data.tags.len(), 1);
        assert!(data.bakeries[0].is_wishlisted);
        assert!(!data.bakeries[1].is_wishlisted);
        // 좌표 없는 빵집도 목록에는 남는다
        assert_eq!(data.bakeries.len(), 2);
        assert!(!data.bakeries[1].is_mappable());
    }

    #[test]
    fn test_load_signed_out_skips_wishlist() {
        let api = FakeApi { signed_in: false, ..api() };
        let data = block_on(load_all(&api, &BakeryQuery::default())).expect("로드 실패");
        assert!(!data.signed_in);
        assert!(data.wishlist.is_empty());
        assert_eq!(api.wishlist_calls(), 0);
    }

    #[test]
    fn test_load_tolerates_tag_and_wishlist_failure() {
        let api = FakeApi { fail_tags: true, fail_wishlist: true, ..api() };
        let data = block_on(load_all(&api, &BakeryQuery::default())).expect("로드 실패");
        assert!(data.tags.is_empty());
        assert!(data.wishlist.is_empty());
        assert_eq!(data.bakeries.len(), 2);
    }

    #[test]
    fn test_load_fails_when_bakeries_fail() {
        let api = FakeApi { fail_bakeries: true, ..api() };
        assert!(block_on(load_all(&api, &BakeryQuery::default())).is_err());
    }
}
