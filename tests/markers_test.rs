//! 메모리 내 지도 마커 빌드 테스트
//!
//! CLI `markers` 명령이 쓰는 실행 경로를 API 없이 검증

use bakery_map::markers::{run, MarkerRun};
use bakery_map_common::map::headless::ImmediateScheduler;
use bakery_map_common::{Bakery, BuildOutcome, MapConfig};
use futures::executor::block_on;
use std::cell::RefCell;

fn bakery(id: &str, name: &str, lat: f64, lng: f64) -> Bakery {
    Bakery {
        id: id.into(),
        name: name.into(),
        lat,
        lng,
        ..Default::default()
    }
}

/// 좌표 있는 2곳, 없는 1곳
fn three_bakeries() -> Vec<Bakery> {
    vec![
        bakery("1", "르뱅드마리", 37.2826, 127.0146),
        bakery("2", "빵굽는날", 0.0, 0.0),
        bakery("3", "베이커리카페 밀", 37.2975, 127.0456),
    ]
}

fn many(n: usize) -> Vec<Bakery> {
    (0..n)
        .map(|i| bakery(&i.to_string(), &format!("빵집{}", i), 37.2 + i as f64 * 0.0001, 127.0))
        .collect()
}

#[test]
fn test_three_bakeries_two_markers() {
    let run_opts = MarkerRun { config: MapConfig::default(), clustering: true, click: None };
    let report = block_on(run(run_opts, &three_bakeries(), ImmediateScheduler, |_, _| {})).expect("빌드 실패");

    assert_eq!(report.outcome, BuildOutcome::Completed { markers: 2 });
    assert_eq!(report.live, 2);
    assert_eq!(report.skipped(), 1);
    assert!(report.clustered);
}

#[test]
fn test_progress_reports_each_batch() {
    let progress = RefCell::new(Vec::new());
    let run_opts = MarkerRun {
        config: MapConfig { batch_size: 100, ..MapConfig::default() },
        clustering: false,
        click: None,
    };

    let report = block_on(run(run_opts, &many(250), ImmediateScheduler, |done, total| {
        progress.borrow_mut().push((done, total));
    }))
    .expect("빌드 실패");

    assert_eq!(report.live, 250);
    assert!(!report.clustered);
    assert_eq!(progress.into_inner(), vec![(100, 250), (200, 250), (250, 250)]);
}

#[test]
fn test_click_selects_marker() {
    let run_opts = MarkerRun { config: MapConfig::default(), clustering: true, click: Some("3") };
    let report = block_on(run(run_opts, &three_bakeries(), ImmediateScheduler, |_, _| {})).expect("빌드 실패");

    assert_eq!(report.clicked.map(|b| b.name), Some("베이커리카페 밀".to_string()));
    assert_eq!(report.selected_markers, vec!["3".to_string()]);
}

#[test]
fn test_click_on_unmapped_bakery() {
    let run_opts = MarkerRun { config: MapConfig::default(), clustering: true, click: Some("2") };
    let report = block_on(run(run_opts, &three_bakeries(), ImmediateScheduler, |_, _| {})).expect("빌드 실패");

    assert!(report.clicked.is_none());
    assert!(report.selected_markers.is_empty());
}

#[test]
fn test_empty_list() {
    let run_opts = MarkerRun { config: MapConfig::default(), clustering: true, click: None };
    let report = block_on(run(run_opts, &[], ImmediateScheduler, |_, _| {})).expect("빌드 실패");

    assert_eq!(report.outcome, BuildOutcome::Completed { markers: 0 });
    assert_eq!(report.live, 0);
    assert!(!report.clustered);
}
