//! 메모리 내 지도에서 마커 빌드 실행
//!
//! 브라우저와 같은 컨트롤러를 `HeadlessMap` 위에서 돌려 배치/클러스터/선택 동작을 확인한다.

use crate::error::Result;
use bakery_map_common::map::headless::HeadlessMap;
use bakery_map_common::{Bakery, BuildOutcome, MapConfig, MapController, Scheduler};

/// 마커 빌드 결과 요약
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerReport {
    /// 필터 후 목록 크기
    pub listed: usize,
    pub outcome: BuildOutcome,
    /// 지도에 살아 있는 마커 수
    pub live: usize,
    pub clustered: bool,
    pub clicked: Option<Bakery>,
    /// 선택 변형으로 표시된 마커
    pub selected_markers: Vec<String>,
}

impl MarkerReport {
    /// 좌표가 없어 건너뛴 빵집 수
    pub fn skipped(&self) -> usize {
        self.listed.saturating_sub(self.live)
    }
}

pub struct MarkerRun<'a> {
    pub config: MapConfig,
    pub clustering: bool,
    pub click: Option<&'a str>,
}

/// 지도를 띄우고 마커를 만든 뒤 (요청 시) 마커 하나를 클릭한다
pub async fn run(
    run: MarkerRun<'_>,
    bakeries: &[Bakery],
    scheduler: impl Scheduler + 'static,
    on_batch: impl Fn(usize, usize),
) -> Result<MarkerReport> {
    let map = HeadlessMap::new();
    map.set_clustering_available(run.clustering);

    let (controller, mut events) = MapController::new(map.clone(), scheduler, run.config);
    controller.bootstrap().await?;

    let outcome = controller.build_markers_with_progress(bakeries, on_batch).await;

    let mut clicked = None;
    if let Some(id) = run.click {
        if map.click(id) {
            if let Ok(event) = events.try_recv() {
                clicked = controller.handle_event(event, bakeries);
            }
        } else {
            tracing::warn!(bakery_id = id, "no live marker to click");
        }
    }

    let live = map.live_markers();
    Ok(MarkerReport {
        listed: bakeries.len(),
        outcome,
        live: live.len(),
        clustered: live.iter().any(|m| m.clustered),
        clicked,
        selected_markers: map.selected_markers(),
    })
}
