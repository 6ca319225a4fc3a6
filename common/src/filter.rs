//! 검색어/태그 필터
//!
//! 부수 효과 없는 순수 함수만 둔다. 마커 재생성은 호출 측 책임.

use crate::types::{Bakery, BreadTag};

/// 검색어 + 선택 태그
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BakeryFilter {
    pub query: String,
    pub tag: Option<String>,
}

impl BakeryFilter {
    pub fn new(query: impl Into<String>, tag: Option<String>) -> Self {
        Self { query: query.into(), tag }
    }

    /// 이름 또는 요약에 검색어 포함 AND 태그 포함
    pub fn matches(&self, bakery: &Bakery) -> bool {
        let query = self.query.trim().to_lowercase();
        let matches_query = query.is_empty()
            || bakery.name.to_lowercase().contains(&query)
            || bakery.summary.to_lowercase().contains(&query);

        let matches_tag = match self.tag.as_deref().map(str::trim) {
            Some(tag) if !tag.is_empty() => bakery.has_tag(tag),
            _ => true,
        };

        matches_query && matches_tag
    }

    /// 조건에 맞는 빵집만 원래 순서대로 반환
    pub fn apply(&self, bakeries: &[Bakery]) -> Vec<Bakery> {
        bakeries.iter().filter(|b| self.matches(b)).cloned().collect()
    }
}

/// 태그별 빵집 수 (태그 버튼 배지용)
pub fn tag_counts(bakeries: &[Bakery], tags: &[BreadTag]) -> Vec<(String, usize)> {
    tags.iter()
        .map(|tag| {
            let count = bakeries.iter().filter(|b| b.has_tag(&tag.name)).count();
            (tag.name.clone(), count)
        })
        .collect()
}

pub fn find_by_id<'a>(bakeries: &'a [Bakery], id: &str) -> Option<&'a Bakery> {
    bakeries.iter().find(|b| b.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bakery(id: &str, name: &str, summary: &str, tags: &[&str]) -> Bakery {
        Bakery {
            id: id.into(),
            name: name.into(),
            summary: summary.into(),
            bread_tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    fn sample() -> Vec<Bakery> {
        vec![
            bakery("1", "르뱅드마리", "크루아상, 바게트", &["크루아상", "바게트", "데니쉬"]),
            bakery("2", "빵굽는날", "단팥빵, 크림빵", &["단팥빵", "크림빵", "식빵"]),
            bakery("3", "Bread Lab", "Sourdough", &["Baguette"]),
        ]
    }

    #[test]
    fn test_query_matches_summary() {
        let result = BakeryFilter::new("크루아상", None).apply(&sample());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "1");
    }

    #[test]
    fn test_query_case_insensitive_name() {
        let result = BakeryFilter::new("bread", None).apply(&sample());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "3");
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let all = sample();
        assert_eq!(BakeryFilter::default().apply(&all), all);
        assert_eq!(BakeryFilter::new("  ", Some(String::new())).apply(&all), all);
    }

    #[test]
    fn test_tag_filter_case_insensitive() {
        let result = BakeryFilter::new("", Some("baguette".into())).apply(&sample());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "3");
    }

    #[test]
    fn test_query_and_tag_combined() {
        let filter = BakeryFilter::new("빵", Some("식빵".into()));
        let result = filter.apply(&sample());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "2");
    }

    #[test]
    fn test_filter_is_subset_and_idempotent() {
        let all = sample();
        let filters = [
            BakeryFilter::new("", None),
            BakeryFilter::new("크림", None),
            BakeryFilter::new("", Some("크루아상".into())),
            BakeryFilter::new("없는빵집", None),
            BakeryFilter::new("r", Some("baguette".into())),
        ];

        for filter in filters {
            let once = filter.apply(&all);
            assert!(once.iter().all(|b| all.contains(b)));
            assert_eq!(filter.apply(&once), once);
        }
    }

    #[test]
    fn test_tag_counts() {
        let tags = vec![
            BreadTag { id: "t1".into(), name: "크루아상".into() },
            BreadTag { id: "t2".into(), name: "식빵".into() },
            BreadTag { id: "t3".into(), name: "카눌레".into() },
        ];
        let counts = tag_counts(&sample(), &tags);
        assert_eq!(counts, vec![
            ("크루아상".to_string(), 1),
            ("식빵".to_string(), 1),
            ("카눌레".to_string(), 0),
        ]);
    }

    #[test]
    fn test_find_by_id() {
        let all = sample();
        assert_eq!(find_by_id(&all, "2").map(|b| b.name.as_str()), Some("빵굽는날"));
        assert!(find_by_id(&all, "99").is_none());
    }
}
