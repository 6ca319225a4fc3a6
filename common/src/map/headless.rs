//! 메모리 내 지도 런타임
//!
//! 브라우저 없이 컨트롤러를 돌리기 위한 구현. CLI의 `markers` 명령과 테스트에서 쓴다.
//! 오버레이 상태(붙었는지, 클러스터에 들어갔는지, 현재 HTML)를 그대로 들여다볼 수 있다.

use super::runtime::{ClickSink, MapOptions, MapRuntime, OverlaySpec};
use super::style::is_selected_content;
use super::Scheduler;
use crate::types::LatLng;
use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;
use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

/// 살아 있는 마커 스냅샷
#[derive(Debug, Clone, PartialEq)]
pub struct LiveMarker {
    pub bakery_id: String,
    pub position: LatLng,
    pub content: String,
    pub z_index: i32,
    pub clustered: bool,
}

struct OverlayState {
    bakery_id: String,
    position: LatLng,
    content: String,
    z_index: i32,
    attached: bool,
    cluster: Option<usize>,
    sink: ClickSink,
}

struct HeadlessState {
    loaded: bool,
    script_loads: u32,
    fail_next_script: bool,
    script_delay: u32,
    runtime_after_script: bool,
    container: bool,
    mount_countdown: u32,
    container_checks: u32,
    clustering: bool,
    maps_created: u32,
    center: Option<LatLng>,
    overlays: Vec<OverlayState>,
    clusterers: usize,
}

/// 메모리 내 지도. 복제본은 같은 상태를 공유한다
#[derive(Clone)]
pub struct HeadlessMap {
    state: Rc<RefCell<HeadlessState>>,
}

/// 오버레이 번호
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayId(usize);

/// 클러스터러 번호
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClustererId(usize);

impl Default for HeadlessMap {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessMap {
    /// SDK 로드됨, 컨테이너 마운트됨, 클러스터러 사용 가능
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(HeadlessState {
                loaded: true,
                script_loads: 0,
                fail_next_script: false,
                script_delay: 0,
                runtime_after_script: true,
                container: true,
                mount_countdown: 0,
                container_checks: 0,
                clustering: true,
                maps_created: 0,
                center: None,
                overlays: Vec::new(),
                clusterers: 0,
            })),
        }
    }

    /// SDK 스크립트가 아직 주입되지 않은 상태
    pub fn unloaded() -> Self {
        let map = Self::new();
        map.state.borrow_mut().loaded = false;
        map
    }

    pub fn fail_next_script_load(&self) {
        self.state.borrow_mut().fail_next_script = true;
    }

    /// 스크립트 로드가 `yields`번 양보한 뒤에 끝난다
    pub fn delay_script_load(&self, yields: u32) {
        self.state.borrow_mut().script_delay = yields;
    }

    /// 스크립트는 로드되지만 `kakao.maps`가 생기지 않는 경우
    pub fn script_loads_without_runtime(&self) {
        self.state.borrow_mut().runtime_after_script = false;
    }

    pub fn set_container(&self, mounted: bool) {
        let mut state = self.state.borrow_mut();
        state.container = mounted;
        state.mount_countdown = 0;
    }

    /// `checks`번 확인한 뒤에 컨테이너가 나타난다
    pub fn mount_after(&self, checks: u32) {
        let mut state = self.state.borrow_mut();
        state.container = false;
        state.mount_countdown = checks;
    }

    pub fn set_clustering_available(&self, available: bool) {
        self.state.borrow_mut().clustering = available;
    }

    pub fn script_loads(&self) -> u32 {
        self.state.borrow().script_loads
    }

    pub fn container_checks(&self) -> u32 {
        self.state.borrow().container_checks
    }

    pub fn maps_created(&self) -> u32 {
        self.state.borrow().maps_created
    }

    pub fn overlays_created(&self) -> usize {
        self.state.borrow().overlays.len()
    }

    pub fn clusterers_created(&self) -> usize {
        self.state.borrow().clusterers
    }

    pub fn center(&self) -> Option<LatLng> {
        self.state.borrow().center
    }

    /// 지도에 붙어 있거나 클러스터에 들어 있는 마커
    pub fn live_markers(&self) -> Vec<LiveMarker> {
        self.state
            .borrow()
            .overlays
            .iter()
            .filter(|o| o.attached || o.cluster.is_some())
            .map(|o| LiveMarker {
                bakery_id: o.bakery_id.clone(),
                position: o.position,
                content: o.content.clone(),
                z_index: o.z_index,
                clustered: o.cluster.is_some(),
            })
            .collect()
    }

    /// 선택 변형으로 표시 중인 마커 id
    pub fn selected_markers(&self) -> Vec<String> {
        self.live_markers()
            .into_iter()
            .filter(|m| is_selected_content(&m.content))
            .map(|m| m.bakery_id)
            .collect()
    }

    /// 살아 있는 마커를 클릭한다. 해당 마커가 없으면 false
    pub fn click(&self, bakery_id: &str) -> bool {
        let sink = self
            .state
            .borrow()
            .overlays
            .iter()
            .find(|o| o.bakery_id == bakery_id && (o.attached || o.cluster.is_some()))
            .map(|o| o.sink.clone());

        match sink {
            Some(sink) => {
                sink.click();
                true
            }
            None => false,
        }
    }
}

impl MapRuntime for HeadlessMap {
    type Map = HeadlessMap;
    type Overlay = OverlayId;
    type Clusterer = ClustererId;

    fn is_loaded(&self) -> bool {
        self.state.borrow().loaded
    }

    fn load_script(&self) -> LocalBoxFuture<'static, Result<(), String>> {
        let delay = {
            let mut state = self.state.borrow_mut();
            state.script_loads += 1;
            state.script_delay
        };
        let state = self.state.clone();
        async move {
            for _ in 0..delay {
                YieldOnce { yielded: false }.await;
            }
            let mut state = state.borrow_mut();
            if state.fail_next_script {
                state.fail_next_script = false;
                Err("script error".to_string())
            } else {
                state.loaded = state.runtime_after_script;
                Ok(())
            }
        }
        .boxed_local()
    }

    fn container_mounted(&self) -> bool {
        let mut state = self.state.borrow_mut();
        state.container_checks += 1;
        if !state.container && state.mount_countdown > 0 {
            state.mount_countdown -= 1;
            if state.mount_countdown == 0 {
                state.container = true;
                // 이번 확인에서는 아직 없다
                return false;
            }
        }
        state.container
    }

    fn create_map(&self, options: &MapOptions) -> Result<Self::Map, String> {
        let mut state = self.state.borrow_mut();
        state.maps_created += 1;
        state.center = Some(options.center);
        Ok(self.clone())
    }

    fn create_overlay(&self, spec: &OverlaySpec<'_>, on_click: ClickSink) -> Result<Self::Overlay, String> {
        let mut state = self.state.borrow_mut();
        state.overlays.push(OverlayState {
            bakery_id: spec.bakery_id.to_string(),
            position: spec.position,
            content: spec.content.to_string(),
            z_index: super::style::DEFAULT_Z_INDEX,
            attached: false,
            cluster: None,
            sink: on_click,
        });
        Ok(OverlayId(state.overlays.len() - 1))
    }

    fn set_content(&self, overlay: &Self::Overlay, content: &str) {
        if let Some(o) = self.state.borrow_mut().overlays.get_mut(overlay.0) {
            o.content = content.to_string();
        }
    }

    fn set_z_index(&self, overlay: &Self::Overlay, z_index: i32) {
        if let Some(o) = self.state.borrow_mut().overlays.get_mut(overlay.0) {
            o.z_index = z_index;
        }
    }

    fn attach(&self, _map: &Self::Map, overlay: &Self::Overlay) {
        if let Some(o) = self.state.borrow_mut().overlays.get_mut(overlay.0) {
            o.attached = true;
        }
    }

    fn detach(&self, overlay: &Self::Overlay) {
        if let Some(o) = self.state.borrow_mut().overlays.get_mut(overlay.0) {
            o.attached = false;
            o.cluster = None;
        }
    }

    fn pan_to(&self, _map: &Self::Map, position: LatLng) {
        self.state.borrow_mut().center = Some(position);
    }

    fn create_clusterer(&self, _map: &Self::Map, _min_level: u8) -> Option<Self::Clusterer> {
        let mut state = self.state.borrow_mut();
        if !state.clustering {
            return None;
        }
        state.clusterers += 1;
        Some(ClustererId(state.clusterers))
    }

    fn cluster_add(&self, clusterer: &Self::Clusterer, overlays: &[&Self::Overlay]) {
        let mut state = self.state.borrow_mut();
        for overlay in overlays {
            if let Some(o) = state.overlays.get_mut(overlay.0) {
                o.cluster = Some(clusterer.0);
            }
        }
    }

    fn cluster_clear(&self, clusterer: &Self::Clusterer) {
        for o in self.state.borrow_mut().overlays.iter_mut() {
            if o.cluster == Some(clusterer.0) {
                o.cluster = None;
            }
        }
    }
}

/// 기다리지 않는 스케줄러
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateScheduler;

impl Scheduler for ImmediateScheduler {
    fn sleep(&self, _ms: u32) -> LocalBoxFuture<'static, ()> {
        future::ready(()).boxed_local()
    }
}

/// 한 번 양보한 뒤 깨어나는 스케줄러
///
/// 실행기에 제어를 돌려주므로 배치 사이에 다른 작업이 끼어들 수 있다.
#[derive(Debug, Clone, Copy, Default)]
pub struct YieldScheduler;

impl Scheduler for YieldScheduler {
    fn sleep(&self, _ms: u32) -> LocalBoxFuture<'static, ()> {
        YieldOnce { yielded: false }.boxed_local()
    }
}

struct YieldOnce {
    yielded: bool,
}

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            Poll::Ready(())
        } else {
            self.yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_after_counts_checks() {
        let map = HeadlessMap::new();
        map.mount_after(2);
        assert!(!map.container_mounted());
        assert!(!map.container_mounted());
        assert!(map.container_mounted());
        assert_eq!(map.container_checks(), 3);
    }

    #[test]
    fn test_click_on_detached_marker_is_ignored() {
        let map = HeadlessMap::new();
        let (sender, mut receiver) = futures::channel::mpsc::unbounded();
        let spec = OverlaySpec { bakery_id: "1", position: LatLng::new(37.2, 127.0), content: "<div></div>" };
        let overlay = map.create_overlay(&spec, ClickSink::new("1", sender)).expect("생성 실패");

        assert!(!map.click("1"));
        map.attach(&map.clone(), &overlay);
        assert!(map.click("1"));
        assert!(receiver.try_recv().is_ok());
    }
}
