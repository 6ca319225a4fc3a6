//! 선택 동기화
//!
//! 선택된 빵집이 있으면 그 마커 하나만 "선택" 변형으로 보이고, 없으면 모두 기본 변형이다.

use super::style::{DEFAULT_Z_INDEX, SELECTED_Z_INDEX};
use super::{MapController, MapRuntime, SelectionEvent};
use crate::filter::find_by_id;
use crate::types::{Bakery, LatLng};

#[derive(Debug, Default)]
pub(super) struct SelectionState {
    pub selected: Option<Bakery>,
    /// 현재 선택 변형으로 표시 중인 마커
    pub highlighted: Option<String>,
}

pub const LOCATION_UNAVAILABLE: &str = "현재 위치를 가져올 수 없습니다.";

impl<R: MapRuntime> MapController<R> {
    /// 선택 변경. 이전 강조를 되돌리고 새 마커를 강조한 뒤 지도를 옮긴다
    ///
    /// 마커가 있으면 마커 위치로, 없으면 빵집 좌표로 옮긴다.
    pub fn select(&self, bakery: Option<&Bakery>) {
        self.selection.borrow_mut().selected = bakery.cloned();
        let marker_position = self.sync_highlight();

        if let Some(position) = marker_position.or_else(|| bakery.and_then(Bakery::position)) {
            if let Some(map) = self.map() {
                self.runtime.pan_to(&map, position);
            }
        }
    }

    /// 재빌드 직후 선택 상태를 새 마커에 다시 적용한다 (지도 이동 없음)
    pub(super) fn reapply_selection(&self) {
        self.sync_highlight();
    }

    /// 강조한 마커의 위치를 돌려준다
    fn sync_highlight(&self) -> Option<LatLng> {
        let markers = self.markers.borrow();
        let mut selection = self.selection.borrow_mut();

        if let Some(previous) = selection.highlighted.take() {
            if let Some(handle) = markers.find(&previous) {
                self.runtime.set_content(&handle.overlay, &handle.variants.default);
                self.runtime.set_z_index(&handle.overlay, DEFAULT_Z_INDEX);
            }
        }

        let target = selection.selected.as_ref().map(|b| b.id.clone());
        if let Some(id) = target {
            if let Some(handle) = markers.find(&id) {
                self.runtime.set_content(&handle.overlay, &handle.variants.selected);
                self.runtime.set_z_index(&handle.overlay, SELECTED_Z_INDEX);
                selection.highlighted = Some(id);
                return Some(handle.position);
            }
        }
        None
    }

    pub fn selected_bakery(&self) -> Option<Bakery> {
        self.selection.borrow().selected.clone()
    }

    /// 선택 변형으로 표시 중인 마커 id
    pub fn highlighted_marker(&self) -> Option<String> {
        self.selection.borrow().highlighted.clone()
    }

    /// 마커 클릭 이벤트 처리. 현재 보이는 목록에서 찾아 선택한다
    pub fn handle_event(&self, event: SelectionEvent, visible: &[Bakery]) -> Option<Bakery> {
        match event {
            SelectionEvent::MarkerClicked { bakery_id } => {
                let Some(bakery) = find_by_id(visible, &bakery_id) else {
                    tracing::debug!(%bakery_id, "clicked marker not in visible list");
                    return None;
                };
                self.select(Some(bakery));
                Some(bakery.clone())
            }
        }
    }

    /// 현재 위치로 지도를 옮긴다. 실패하면 지도는 그대로 두고 안내 문구를 돌려준다
    pub fn recenter_on_user(&self, position: Result<LatLng, String>) -> Result<(), String> {
        let position = match position {
            Ok(p) if p.is_valid() => p,
            Ok(p) => {
                tracing::warn!(lat = p.lat, lng = p.lng, "invalid geolocation result");
                return Err(LOCATION_UNAVAILABLE.to_string());
            }
            Err(e) => {
                tracing::warn!(error = %e, "geolocation failed");
                return Err(LOCATION_UNAVAILABLE.to_string());
            }
        };

        if let Some(map) = self.map() {
            self.runtime.pan_to(&map, position);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapConfig;
    use crate::map::BuildOutcome;
    use crate::map::headless::{HeadlessMap, ImmediateScheduler, YieldScheduler};
    use futures::executor::block_on;
    use futures::StreamExt;

    fn bakery(id: &str, lat: f64, lng: f64) -> Bakery {
        Bakery {
            id: id.into(),
            name: format!("빵집{}", id),
            lat,
            lng,
            ..Default::default()
        }
    }

    fn sample() -> Vec<Bakery> {
        vec![bakery("a", 37.28, 127.01), bakery("b", 37.30, 127.05), bakery("c", 37.26, 127.00)]
    }

    fn built(map: &HeadlessMap, list: &[Bakery]) -> (MapController<HeadlessMap>, futures::channel::mpsc::UnboundedReceiver<SelectionEvent>) {
        let (controller, events) = MapController::new(map.clone(), ImmediateScheduler, MapConfig::default());
        block_on(controller.bootstrap()).expect("초기화 실패");
        block_on(controller.build_markers(list));
        (controller, events)
    }

    #[test]
    fn test_select_sequence_keeps_single_highlight() {
        let map = HeadlessMap::new();
        let list = sample();
        let (controller, _events) = built(&map, &list);

        controller.select(Some(&list[0]));
        assert_eq!(map.selected_markers(), vec!["a".to_string()]);
        assert_eq!(map.center(), list[0].position());

        controller.select(Some(&list[1]));
        assert_eq!(map.selected_markers(), vec!["b".to_string()]);
        assert_eq!(map.center(), list[1].position());

        controller.select(None);
        assert!(map.selected_markers().is_empty());
        assert!(controller.highlighted_marker().is_none());
    }

    #[test]
    fn test_selected_marker_raised() {
        let map = HeadlessMap::new();
        let list = sample();
        let (controller, _events) = built(&map, &list);

        controller.select(Some(&list[2]));
        for marker in map.live_markers() {
            let expected = if marker.bakery_id == "c" { SELECTED_Z_INDEX } else { DEFAULT_Z_INDEX };
            assert_eq!(marker.z_index, expected);
        }
    }

    #[test]
    fn test_selection_survives_rebuild() {
        let map = HeadlessMap::new();
        let list = sample();
        let (controller, _events) = built(&map, &list);

        controller.select(Some(&list[1]));
        block_on(controller.build_markers(&list[1..]));

        assert_eq!(map.selected_markers(), vec!["b".to_string()]);
        assert_eq!(controller.highlighted_marker().as_deref(), Some("b"));
    }

    #[test]
    fn test_selection_without_marker() {
        let map = HeadlessMap::new();
        let list = sample();
        let (controller, _events) = built(&map, &list[..1]);
        let before = map.center();

        // 좌표 없는 빵집 선택: 강조도 이동도 없다
        let unmapped = bakery("z", 0.0, 0.0);
        controller.select(Some(&unmapped));

        assert!(map.selected_markers().is_empty());
        assert_eq!(map.center(), before);
        assert_eq!(controller.selected_bakery().map(|b| b.id), Some("z".to_string()));
    }

    #[test]
    fn test_select_pans_to_marker_position() {
        let map = HeadlessMap::new();
        let list = sample();
        let (controller, _events) = built(&map, &list);

        // 좌표가 빠진 사본으로 선택해도 마커 위치로 이동한다
        let stale = Bakery { lat: 0.0, lng: 0.0, ..list[1].clone() };
        controller.select(Some(&stale));

        assert_eq!(map.selected_markers(), vec!["b".to_string()]);
        assert_eq!(map.center(), list[1].position());
    }

    #[test]
    fn test_select_before_marker_batch_exists() {
        let map = HeadlessMap::new();
        let (controller, _events) =
            MapController::new(map.clone(), YieldScheduler, MapConfig { batch_size: 2, ..MapConfig::default() });
        block_on(controller.bootstrap()).expect("초기화 실패");
        let list: Vec<Bakery> = (0..6).map(|i| bakery(&i.to_string(), 37.2 + i as f64 * 0.01, 127.0)).collect();

        block_on(async {
            let mut build = Box::pin(controller.build_markers(&list));
            // 첫 배치만 만들고 멈춘다
            assert!(futures::poll!(build.as_mut()).is_pending());

            controller.select(Some(&list[5]));
            assert!(controller.highlighted_marker().is_none());
            assert!(map.selected_markers().is_empty());

            assert_eq!(build.await, BuildOutcome::Completed { markers: 6 });
        });

        assert_eq!(map.selected_markers(), vec!["5".to_string()]);
        assert_eq!(controller.highlighted_marker().as_deref(), Some("5"));
    }

    #[test]
    fn test_marker_click_flows_through_channel() {
        let map = HeadlessMap::new();
        let list = sample();
        let (controller, mut events) = built(&map, &list);

        map.click("b");
        let event = block_on(events.next()).expect("이벤트 없음");
        assert_eq!(event, SelectionEvent::MarkerClicked { bakery_id: "b".into() });

        let selected = controller.handle_event(event, &list);
        assert_eq!(selected.map(|b| b.id), Some("b".to_string()));
        assert_eq!(map.selected_markers(), vec!["b".to_string()]);
    }

    #[test]
    fn test_click_on_filtered_out_bakery_ignored() {
        let map = HeadlessMap::new();
        let list = sample();
        let (controller, _events) = built(&map, &list);

        let event = SelectionEvent::MarkerClicked { bakery_id: "a".into() };
        assert!(controller.handle_event(event, &list[1..]).is_none());
        assert!(map.selected_markers().is_empty());
    }

    #[test]
    fn test_recenter_on_user() {
        let map = HeadlessMap::new();
        let (controller, _events) = built(&map, &[]);
        let start = map.center();

        let err = controller.recenter_on_user(Err("permission denied".into())).unwrap_err();
        assert_eq!(err, LOCATION_UNAVAILABLE);
        assert_eq!(map.center(), start);

        let here = LatLng::new(37.5665, 126.9780);
        controller.recenter_on_user(Ok(here)).expect("이동 실패");
        assert_eq!(map.center(), Some(here));
    }
}
