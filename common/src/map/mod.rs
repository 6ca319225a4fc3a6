//! 지도 & 마커 컨트롤러
//!
//! 지도 핸들, 마커 핸들 목록, 클러스터러, 선택 상태를 하나의 객체가 소유한다.
//! - bootstrap: SDK 로드와 지도 생성 (컨테이너 대기 재시도)
//! - markers: 배치 단위 마커 생성/해제 (세대 토큰으로 오래된 배치 무효화)
//! - selection: 선택된 빵집과 "선택" 변형 마커의 1:1 대응 유지
//!
//! 모든 변경은 UI 스레드 하나에서 일어나므로 `Cell`/`RefCell`로 충분하다.
//! 마커 생성/삭제는 markers, 표시 변형 변경은 selection에서만 한다.

mod bootstrap;
mod markers;
mod selection;
mod runtime;
pub mod style;
pub mod headless;

pub use bootstrap::BootstrapError;
pub use markers::BuildOutcome;
pub use selection::LOCATION_UNAVAILABLE;
pub use runtime::{ClickSink, MapOptions, MapRuntime, OverlaySpec};
pub use style::MarkerVariants;

use crate::config::MapConfig;
use bootstrap::ScriptState;
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::future::LocalBoxFuture;
use markers::MarkerSet;
use selection::SelectionState;
use std::cell::{Cell, RefCell};

/// 타이머 추상화 (브라우저: gloo 타이머, CLI: tokio)
pub trait Scheduler {
    fn sleep(&self, ms: u32) -> LocalBoxFuture<'static, ()>;
}

/// 마커 클릭 등에서 발생하는 선택 이벤트
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    MarkerClicked { bakery_id: String },
}

/// 지도 & 마커 컨트롤러
pub struct MapController<R: MapRuntime> {
    runtime: R,
    scheduler: Box<dyn Scheduler>,
    config: MapConfig,
    map: RefCell<Option<R::Map>>,
    script: RefCell<ScriptState>,
    markers: RefCell<MarkerSet<R>>,
    generation: Cell<u64>,
    selection: RefCell<SelectionState>,
    events: UnboundedSender<SelectionEvent>,
}

impl<R: MapRuntime> MapController<R> {
    /// 컨트롤러와 선택 이벤트 수신 채널을 만든다
    pub fn new(
        runtime: R,
        scheduler: impl Scheduler + 'static,
        config: MapConfig,
    ) -> (Self, UnboundedReceiver<SelectionEvent>) {
        let (events, receiver) = mpsc::unbounded();
        let controller = Self {
            runtime,
            scheduler: Box::new(scheduler),
            config,
            map: RefCell::new(None),
            script: RefCell::new(ScriptState::Idle),
            markers: RefCell::new(MarkerSet::default()),
            generation: Cell::new(0),
            selection: RefCell::new(SelectionState::default()),
            events,
        };
        (controller, receiver)
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// 지도가 생성되었는지
    pub fn is_ready(&self) -> bool {
        self.map.borrow().is_some()
    }

    pub fn map(&self) -> Option<R::Map> {
        self.map.borrow().clone()
    }
}
