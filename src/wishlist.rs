//! 위시리스트 명령

use crate::error::{BakeryMapError, Result};
use bakery_map_common::wishlist::toggle;
use bakery_map_common::{load_all, Bakery, BakeryApi, BakeryFilter, BakeryQuery, WishlistSet, WishlistUpdate};
use dialoguer::MultiSelect;

pub(crate) async fn require_session<A: BakeryApi + ?Sized>(api: &A) -> Result<()> {
    match api.current_user().await? {
        Some(user) => {
            tracing::debug!(user_id = %user.id, "session found");
            Ok(())
        }
        None => Err(BakeryMapError::NotSignedIn),
    }
}

pub async fn list<A: BakeryApi + ?Sized>(api: &A) -> Result<()> {
    require_session(api).await?;
    let items = api.wishlist().await?;

    if items.is_empty() {
        println!("위시리스트가 비어 있습니다");
        return Ok(());
    }

    println!("💛 위시리스트 {}곳\n", items.len());
    for item in &items {
        let visited = if item.visited { "✔ 방문" } else { "  미방문" };
        println!("  [{}] {} ({}) {}", visited, item.bakery_name, item.bakery_address, added_on(&item.created_at));
        if !item.bread_types.is_empty() {
            println!("        {}", item.bread_types.join(", "));
        }
        if let Some(note) = item.note.as_deref().filter(|n| !n.is_empty()) {
            println!("        메모: {}", note);
        }
    }
    Ok(())
}

/// `2024-11-15T09:00:00Z` → `2024-11-15 추가`
fn added_on(created_at: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(created_at)
        .map(|t| format!("{} 추가", t.format("%Y-%m-%d")))
        .unwrap_or_default()
}

async fn current_set<A: BakeryApi + ?Sized>(api: &A) -> Result<WishlistSet> {
    require_session(api).await?;
    Ok(WishlistSet::from_items(&api.wishlist().await?))
}

/// `want`과 현재 멤버십이 다를 때만 토글한다
pub async fn set_membership<A: BakeryApi + ?Sized>(api: &A, bakery_id: &str, want: bool) -> Result<bool> {
    let mut set = current_set(api).await?;
    if set.contains(bakery_id) == want {
        return Ok(false);
    }

    let record = api.bakery(bakery_id).await.map_err(|e| match e {
        bakery_map_common::Error::Api { status: 404, .. } => BakeryMapError::BakeryNotFound(bakery_id.to_string()),
        other => other.into(),
    })?;
    let mut bakeries = vec![Bakery::from_record(record, !want)];
    toggle(api, &mut set, &mut bakeries, bakery_id).await?;
    Ok(true)
}

pub async fn mark_visit<A: BakeryApi + ?Sized>(
    api: &A,
    bakery_id: &str,
    note: Option<String>,
    visited: bool,
) -> Result<()> {
    let set = current_set(api).await?;
    let item_id = set
        .item_id(bakery_id)
        .ok_or_else(|| BakeryMapError::BakeryNotFound(format!("위시리스트에 없음: {}", bakery_id)))?;

    let update = WishlistUpdate { note, visited: Some(visited) };
    let item = api.update_wishlist(item_id, &update).await?;
    println!(
        "✔ {} → {}",
        item.bakery_name,
        if item.visited { "방문함" } else { "미방문" }
    );
    Ok(())
}

/// 선택 결과와 현재 멤버십이 다른 빵집 id
pub fn plan_changes(bakeries: &[Bakery], chosen: &[usize]) -> Vec<String> {
    bakeries
        .iter()
        .enumerate()
        .filter(|(i, b)| chosen.contains(i) != b.is_wishlisted)
        .map(|(_, b)| b.id.clone())
        .collect()
}

/// 목록에서 체크박스로 골라 한 번에 반영
pub async fn edit<A: BakeryApi + ?Sized>(api: &A, query: &str) -> Result<()> {
    let data = load_all(api, &BakeryQuery::default()).await?;
    if !data.signed_in {
        return Err(BakeryMapError::NotSignedIn);
    }

    let mut bakeries = BakeryFilter::new(query, None).apply(&data.bakeries);
    if bakeries.is_empty() {
        println!("조건에 맞는 빵집이 없습니다");
        return Ok(());
    }

    let labels: Vec<String> = bakeries
        .iter()
        .map(|b| format!("{} ({}) ★{:.1}", b.name, b.district, b.rating))
        .collect();
    let defaults: Vec<bool> = bakeries.iter().map(|b| b.is_wishlisted).collect();

    let chosen = MultiSelect::new()
        .with_prompt("위시리스트에 담을 빵집 (스페이스로 선택, 엔터로 확정)")
        .items(&labels)
        .defaults(&defaults)
        .interact()?;

    let changes = plan_changes(&bakeries, &chosen);
    if changes.is_empty() {
        println!("변경 사항이 없습니다");
        return Ok(());
    }

    let mut set = data.wishlist;
    let mut failed = 0;
    for id in &changes {
        // 하나가 실패해도 나머지는 계속한다
        match toggle(api, &mut set, &mut bakeries, id).await {
            Ok(true) => println!("  + {}", id),
            Ok(false) => println!("  - {}", id),
            Err(e) => {
                failed += 1;
                println!("  ⚠ {}: {}", id, e);
            }
        }
    }

    println!("\n✔ {}건 반영, {}건 실패 (현재 {}곳)", changes.len() - failed, failed, set.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bakery(id: &str, wishlisted: bool) -> Bakery {
        Bakery { id: id.into(), is_wishlisted: wishlisted, ..Default::default() }
    }

    #[test]
    fn test_plan_changes() {
        let list = vec![bakery("1", true), bakery("2", false), bakery("3", true), bakery("4", false)];
        // 1 유지, 2 추가, 3 삭제, 4 그대로
        let changes = plan_changes(&list, &[0, 1]);
        assert_eq!(changes, vec!["2".to_string(), "3".to_string()]);
    }

    #[test]
    fn test_added_on() {
        assert_eq!(added_on("2024-11-15T09:00:00Z"), "2024-11-15 추가");
        assert_eq!(added_on(""), "");
    }

    #[test]
    fn test_plan_changes_no_diff() {
        let list = vec![bakery("1", true), bakery("2", false)];
        assert!(plan_changes(&list, &[0]).is_empty());
    }
}
