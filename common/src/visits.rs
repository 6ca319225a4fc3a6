//! 방문 기록
//!
//! 입력 검증은 요청 전에 한다. 검증에 실패하면 API를 호출하지 않는다.

use crate::api::{BakeryApi, NewVisitRecord, VisitRecordUpdate};
use crate::error::{Error, Result};
use crate::types::VisitRecord;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

pub fn validate_rating(rating: u8) -> Result<()> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(Error::Invalid(format!("평점은 {MIN_RATING}~{MAX_RATING} 사이여야 합니다: {rating}")))
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

pub fn validate_new(record: &NewVisitRecord) -> Result<()> {
    if is_blank(record.bakery_id.as_deref()) && is_blank(record.bakery_name.as_deref()) {
        return Err(Error::Invalid("빵집 ID 또는 이름이 필요합니다".into()));
    }
    if record.visit_date.trim().is_empty() {
        return Err(Error::Invalid("방문 날짜가 필요합니다".into()));
    }
    validate_rating(record.rating)
}

pub fn validate_update(update: &VisitRecordUpdate) -> Result<()> {
    if update.is_empty() {
        return Err(Error::Invalid("변경할 항목이 없습니다".into()));
    }
    if let Some(rating) = update.rating {
        validate_rating(rating)?;
    }
    Ok(())
}

pub async fn record_visit<A: BakeryApi + ?Sized>(api: &A, record: &NewVisitRecord) -> Result<VisitRecord> {
    validate_new(record)?;
    let created = api.add_visit_record(record).await?;
    tracing::debug!(record_id = %created.id, bakery = %created.bakery_name, "visit recorded");
    Ok(created)
}

pub async fn edit_visit<A: BakeryApi + ?Sized>(
    api: &A,
    record_id: &str,
    update: &VisitRecordUpdate,
) -> Result<VisitRecord> {
    validate_update(update)?;
    let updated = api.update_visit_record(record_id, update).await?;
    tracing::debug!(record_id, "visit updated");
    Ok(updated)
}

/// 최근 방문 순. 같은 날짜는 나중에 작성한 기록이 앞
pub fn sort_recent(records: &mut [VisitRecord]) {
    records.sort_by(|a, b| {
        b.visit_date
            .cmp(&a.visit_date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

pub fn average_rating(records: &[VisitRecord]) -> Option<f32> {
    if records.is_empty() {
        return None;
    }
    let total: u32 = records.iter().map(|r| u32::from(r.rating)).sum();
    Some(total as f32 / records.len() as f32)
}
