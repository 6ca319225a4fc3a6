//! 내 프로필 (`me`)

use crate::error::{BakeryMapError, Result};
use bakery_map_common::{BakeryApi, UserProfile};

/// `2024-01-15T00:00:00Z` → `2024년 01월 15일 가입`
pub fn join_date(created_at: &str) -> Option<String> {
    chrono::DateTime::parse_from_rfc3339(created_at)
        .map(|t| t.format("%Y년 %m월 %d일 가입").to_string())
        .ok()
}

pub fn display_name(user: &UserProfile) -> &str {
    user.name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or("사용자")
}

pub async fn show<A: BakeryApi + ?Sized>(api: &A) -> Result<()> {
    let user = api.current_user().await?.ok_or(BakeryMapError::NotSignedIn)?;
    tracing::debug!(user_id = %user.id, "profile loaded");

    println!("👤 {}", display_name(&user));
    if let Some(email) = user.email.as_deref() {
        println!("  {}", email);
    }
    if let Some(joined) = join_date(&user.created_at) {
        println!("  {}", joined);
    }
    println!("  방문 기록 {}건", user.visit_records_count);
    println!("  위시리스트 {}곳", user.wishlist_count);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_date() {
        assert_eq!(join_date("2024-01-15T09:30:00Z").as_deref(), Some("2024년 01월 15일 가입"));
        assert_eq!(join_date(""), None);
    }

    #[test]
    fn test_display_name_fallback() {
        let mut user = UserProfile::default();
        assert_eq!(display_name(&user), "사용자");
        user.name = Some("김빵".into());
        assert_eq!(display_name(&user), "김빵");
    }
}
