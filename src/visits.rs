//! 방문 기록 명령

use crate::error::{BakeryMapError, Result};
use crate::wishlist::require_session;
use bakery_map_common::visits::{average_rating, edit_visit, record_visit, sort_recent};
use bakery_map_common::{BakeryApi, NewVisitRecord, VisitRecord, VisitRecordUpdate};
use chrono::NaiveDate;

/// 날짜 인자를 `YYYY-MM-DD`로 정규화한다. 없으면 `today`
pub fn parse_visit_date(input: Option<&str>, today: NaiveDate) -> Result<String> {
    let date = match input.map(str::trim).filter(|s| !s.is_empty()) {
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map_err(|_| BakeryMapError::InvalidInput(format!("날짜 형식은 YYYY-MM-DD 입니다: {}", text)))?,
        None => today,
    };
    Ok(date.format("%Y-%m-%d").to_string())
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

fn print_record(record: &VisitRecord) {
    println!("  {} {} {} [{}]", record.visit_date, stars(record.rating), record.bakery_name, record.id);
    if !record.bakery_address.is_empty() {
        println!("        {}", record.bakery_address);
    }
    let items = record.purchased_items();
    if !items.is_empty() {
        println!("        구매: {}", items.join(", "));
    }
    if let Some(review) = record.review.as_deref().filter(|r| !r.is_empty()) {
        println!("        후기: {}", review);
    }
}

pub async fn list<A: BakeryApi + ?Sized>(api: &A) -> Result<()> {
    require_session(api).await?;
    let mut records = api.visit_records().await?;

    if records.is_empty() {
        println!("아직 방문 기록이 없습니다");
        return Ok(());
    }

    sort_recent(&mut records);
    match average_rating(&records) {
        Some(avg) => println!("📒 방문 기록 {}건 (평균 ★{:.1})\n", records.len(), avg),
        None => println!("📒 방문 기록 {}건\n", records.len()),
    }
    for record in &records {
        print_record(record);
    }
    Ok(())
}

pub struct NewVisitArgs {
    pub bakery: Option<String>,
    pub name: Option<String>,
    pub date: Option<String>,
    pub rating: u8,
    pub bread: Option<String>,
    pub review: Option<String>,
}

pub fn build_new(args: NewVisitArgs, today: NaiveDate) -> Result<NewVisitRecord> {
    Ok(NewVisitRecord {
        bakery_id: args.bakery,
        bakery_name: args.name,
        visit_date: parse_visit_date(args.date.as_deref(), today)?,
        rating: args.rating,
        bread_purchased: args.bread,
        review: args.review,
    })
}

pub async fn add<A: BakeryApi + ?Sized>(api: &A, args: NewVisitArgs) -> Result<()> {
    let record = build_new(args, today())?;
    require_session(api).await?;
    let created = record_visit(api, &record).await?;
    println!("✔ 방문 기록을 저장했습니다");
    print_record(&created);
    Ok(())
}

pub async fn edit<A: BakeryApi + ?Sized>(
    api: &A,
    record_id: &str,
    date: Option<String>,
    update: VisitRecordUpdate,
) -> Result<()> {
    let visit_date = match date {
        Some(text) => Some(parse_visit_date(Some(&text), today())?),
        None => None,
    };
    let update = VisitRecordUpdate { visit_date, ..update };
    require_session(api).await?;
    let updated = edit_visit(api, record_id, &update).await.map_err(not_found(record_id))?;
    println!("✔ 방문 기록을 수정했습니다");
    print_record(&updated);
    Ok(())
}

pub async fn remove<A: BakeryApi + ?Sized>(api: &A, record_id: &str) -> Result<()> {
    require_session(api).await?;
    api.remove_visit_record(record_id).await.map_err(not_found(record_id))?;
    println!("✔ 방문 기록을 삭제했습니다: {}", record_id);
    Ok(())
}

fn not_found(record_id: &str) -> impl FnOnce(bakery_map_common::Error) -> BakeryMapError + '_ {
    move |e| match e {
        bakery_map_common::Error::Api { status: 404, .. } => {
            BakeryMapError::InvalidInput(format!("방문 기록을 찾을 수 없습니다: {}", record_id))
        }
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 11, 25).expect("날짜")
    }

    #[test]
    fn test_parse_visit_date() {
        assert_eq!(parse_visit_date(None, day()).expect("기본값"), "2024-11-25");
        assert_eq!(parse_visit_date(Some("  "), day()).expect("공백"), "2024-11-25");
        assert_eq!(parse_visit_date(Some("2024-1-5"), day()).expect("한 자리"), "2024-01-05");
        assert!(matches!(
            parse_visit_date(Some("2024/11/25"), day()),
            Err(BakeryMapError::InvalidInput(_))
        ));
        assert!(parse_visit_date(Some("2024-02-30"), day()).is_err());
    }

    #[test]
    fn test_stars() {
        assert_eq!(stars(3), "★★★☆☆");
        assert_eq!(stars(0), "☆☆☆☆☆");
        assert_eq!(stars(9), "★★★★★");
    }

    #[test]
    fn test_build_new_defaults_to_today() {
        let args = NewVisitArgs {
            bakery: None,
            name: Some("빵굽는날".into()),
            date: None,
            rating: 4,
            bread: Some("소금빵".into()),
            review: None,
        };
        let record = build_new(args, day()).expect("생성 실패");
        assert_eq!(record.visit_date, "2024-11-25");
        assert_eq!(record.bakery_name.as_deref(), Some("빵굽는날"));
        assert!(record.bakery_id.is_none());
    }

    #[test]
    fn test_not_found_maps_404() {
        let err = not_found("v9")(bakery_map_common::Error::Api { status: 404, detail: "Visit record not found".into() });
        assert!(matches!(err, BakeryMapError::InvalidInput(msg) if msg.contains("v9")));

        let err = not_found("v9")(bakery_map_common::Error::Api { status: 500, detail: "boom".into() });
        assert!(matches!(err, BakeryMapError::Api { status: 500, .. }));
    }
}
