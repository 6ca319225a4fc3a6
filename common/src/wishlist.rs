//! 위시리스트 멤버십
//!
//! `Bakery::is_wishlisted`는 이 집합의 투영이다. 집합이 바뀌면 `project`로 다시 계산한다.
//! 변경은 서버가 성공을 응답한 뒤에만 로컬 상태에 반영한다.

use crate::api::BakeryApi;
use crate::error::Result;
use crate::types::{Bakery, WishlistItem};
use std::collections::HashMap;

/// 빵집 ID → 위시리스트 항목 ID
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WishlistSet {
    items: HashMap<String, String>,
}

impl WishlistSet {
    pub fn from_items(items: &[WishlistItem]) -> Self {
        Self {
            items: items
                .iter()
                .map(|item| (item.bakery_id.clone(), item.id.clone()))
                .collect(),
        }
    }

    pub fn contains(&self, bakery_id: &str) -> bool {
        self.items.contains_key(bakery_id)
    }

    pub fn item_id(&self, bakery_id: &str) -> Option<&str> {
        self.items.get(bakery_id).map(String::as_str)
    }

    pub fn insert(&mut self, bakery_id: impl Into<String>, item_id: impl Into<String>) {
        self.items.insert(bakery_id.into(), item_id.into());
    }

    pub fn remove(&mut self, bakery_id: &str) -> Option<String> {
        self.items.remove(bakery_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn bakery_ids(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    /// 각 빵집의 `is_wishlisted`를 다시 계산
    pub fn project(&self, bakeries: &mut [Bakery]) {
        for bakery in bakeries.iter_mut() {
            bakery.is_wishlisted = self.contains(&bakery.id);
        }
    }
}

/// 위시리스트 추가/삭제 토글
///
/// 서버 응답이 성공한 경우에만 `set`과 `bakeries`를 바꾼다.
/// 실패하면 로컬 상태는 그대로 두고 에러를 돌려준다.
///
/// # Returns
/// 토글 후 멤버십 (`true`면 추가됨)
pub async fn toggle<A: BakeryApi + ?Sized>(
    api: &A,
    set: &mut WishlistSet,
    bakeries: &mut [Bakery],
    bakery_id: &str,
) -> Result<bool> {
    let now_wishlisted = match set.item_id(bakery_id).map(str::to_string) {
        Some(item_id) => {
            api.remove_wishlist(&item_id).await?;
            set.remove(bakery_id);
            tracing::debug!(bakery_id, item_id = %item_id, "removed from wishlist");
            false
        }
        None => {
            let item = api.add_wishlist(bakery_id).await?;
            set.insert(bakery_id, item.id.clone());
            tracing::debug!(bakery_id, item_id = %item.id, "added to wishlist");
            true
        }
    };

    set.project(bakeries);
    Ok(now_wishlisted)
}
