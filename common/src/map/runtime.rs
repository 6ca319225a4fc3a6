//! 지도 위젯 런타임 경계
//!
//! 컨트롤러가 실제로 쓰는 연산만 담은 좁은 인터페이스.
//! 브라우저에서는 Kakao Maps SDK, CLI/테스트에서는 `HeadlessMap`이 구현한다.

use super::SelectionEvent;
use crate::types::LatLng;
use futures::channel::mpsc::UnboundedSender;
use futures::future::LocalBoxFuture;

/// 지도 생성 옵션
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapOptions {
    pub center: LatLng,
    pub level: u8,
}

/// 오버레이 생성 정보
#[derive(Debug, Clone, Copy)]
pub struct OverlaySpec<'a> {
    pub bakery_id: &'a str,
    pub position: LatLng,
    /// 생성 시점의 HTML (기본 변형)
    pub content: &'a str,
}

/// 마커 클릭을 선택 이벤트로 바꿔 보내는 핸들
///
/// 런타임은 클릭 리스너에서 `click()`만 호출한다. 선택 상태는 직접 건드리지 않는다.
#[derive(Debug, Clone)]
pub struct ClickSink {
    bakery_id: String,
    sender: UnboundedSender<SelectionEvent>,
}

impl ClickSink {
    pub(crate) fn new(bakery_id: &str, sender: UnboundedSender<SelectionEvent>) -> Self {
        Self { bakery_id: bakery_id.to_string(), sender }
    }

    pub fn bakery_id(&self) -> &str {
        &self.bakery_id
    }

    pub fn click(&self) {
        let event = SelectionEvent::MarkerClicked { bakery_id: self.bakery_id.clone() };
        if self.sender.unbounded_send(event).is_err() {
            tracing::debug!(bakery_id = %self.bakery_id, "selection receiver dropped, click ignored");
        }
    }
}

/// 지도 위젯 런타임
pub trait MapRuntime {
    type Map: Clone;
    type Overlay;
    type Clusterer;

    /// SDK가 이미 로드되어 있는지
    fn is_loaded(&self) -> bool;

    /// SDK 스크립트를 주입하고 로드 완료까지 기다린다
    fn load_script(&self) -> LocalBoxFuture<'static, Result<(), String>>;

    /// 지도 컨테이너 노드가 마운트되었는지
    fn container_mounted(&self) -> bool;

    fn create_map(&self, options: &MapOptions) -> Result<Self::Map, String>;

    /// 오버레이 생성. 지도에는 아직 붙이지 않는다
    fn create_overlay(&self, spec: &OverlaySpec<'_>, on_click: ClickSink) -> Result<Self::Overlay, String>;

    fn set_content(&self, overlay: &Self::Overlay, content: &str);

    fn set_z_index(&self, overlay: &Self::Overlay, z_index: i32);

    fn attach(&self, map: &Self::Map, overlay: &Self::Overlay);

    fn detach(&self, overlay: &Self::Overlay);

    fn pan_to(&self, map: &Self::Map, position: LatLng);

    /// 클러스터러 애드온이 없으면 `None`
    fn create_clusterer(&self, map: &Self::Map, min_level: u8) -> Option<Self::Clusterer>;

    fn cluster_add(&self, clusterer: &Self::Clusterer, overlays: &[&Self::Overlay]);

    /// 클러스터러에 들어간 오버레이를 모두 지도에서 뗀다
    fn cluster_clear(&self, clusterer: &Self::Clusterer);
}
