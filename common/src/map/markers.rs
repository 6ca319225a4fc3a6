//! 마커 생성/해제
//!
//! 큰 목록은 `batch_size`개씩 나눠 만들고 배치 사이에 UI 스레드를 양보한다.
//! 빌드마다 세대 번호를 올리고, 양보 후 세대가 바뀌었으면 그 빌드는 조용히 중단한다.

use super::runtime::{ClickSink, OverlaySpec};
use super::style::MarkerVariants;
use super::{MapController, MapRuntime};
use crate::types::{Bakery, LatLng};

pub(super) struct MarkerHandle<O> {
    pub bakery_id: String,
    pub position: LatLng,
    pub overlay: O,
    pub variants: MarkerVariants,
}

pub(super) struct MarkerSet<R: MapRuntime> {
    pub handles: Vec<MarkerHandle<R::Overlay>>,
    pub clusterer: Option<R::Clusterer>,
}

impl<R: MapRuntime> Default for MarkerSet<R> {
    fn default() -> Self {
        Self { handles: Vec::new(), clusterer: None }
    }
}

impl<R: MapRuntime> MarkerSet<R> {
    pub fn find(&self, bakery_id: &str) -> Option<&MarkerHandle<R::Overlay>> {
        self.handles.iter().find(|h| h.bakery_id == bakery_id)
    }
}

/// 마커 빌드 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    /// 모든 배치를 마치고 지도에 올렸다
    Completed { markers: usize },
    /// 더 새로운 빌드가 시작되어 중단했다
    Superseded,
    /// 지도가 아직 없다
    MapNotReady,
}

impl<R: MapRuntime> MapController<R> {
    /// 현재 목록으로 마커를 다시 만든다
    pub async fn build_markers(&self, bakeries: &[Bakery]) -> BuildOutcome {
        self.build_markers_with_progress(bakeries, |_, _| {}).await
    }

    /// `on_batch(완료 수, 전체 수)`는 배치 하나를 만들 때마다 호출된다
    pub async fn build_markers_with_progress(
        &self,
        bakeries: &[Bakery],
        on_batch: impl Fn(usize, usize),
    ) -> BuildOutcome {
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);

        let Some(map) = self.map() else {
            tracing::debug!("marker build skipped, map not ready");
            return BuildOutcome::MapNotReady;
        };

        self.release_markers();

        // 번호는 필터된 목록에서의 순번 (좌표 없는 빵집도 번호를 차지한다)
        let mappable: Vec<(usize, &Bakery, LatLng)> = bakeries
            .iter()
            .enumerate()
            .filter_map(|(index, bakery)| bakery.position().map(|pos| (index + 1, bakery, pos)))
            .collect();
        let total = mappable.len();
        let batch_size = self.config.batch_size.max(1);

        tracing::debug!(generation, total, skipped = bakeries.len() - total, "building markers");

        let mut done = 0;
        for (batch_index, batch) in mappable.chunks(batch_size).enumerate() {
            if batch_index > 0 {
                self.scheduler.sleep(self.config.batch_delay_ms).await;
                if self.generation.get() != generation {
                    tracing::debug!(generation, done, "marker build superseded");
                    return BuildOutcome::Superseded;
                }
            }

            {
                let mut markers = self.markers.borrow_mut();
                for (number, bakery, position) in batch {
                    let variants = MarkerVariants::new(*number, &bakery.name);
                    let spec = OverlaySpec {
                        bakery_id: &bakery.id,
                        position: *position,
                        content: &variants.default,
                    };
                    let overlay = match self
                        .runtime
                        .create_overlay(&spec, ClickSink::new(&bakery.id, self.events.clone()))
                    {
                        Ok(overlay) => overlay,
                        Err(e) => {
                            tracing::warn!(bakery_id = %bakery.id, error = %e, "overlay creation failed");
                            continue;
                        }
                    };
                    markers.handles.push(MarkerHandle {
                        bakery_id: bakery.id.clone(),
                        position: *position,
                        overlay,
                        variants,
                    });
                }
            }

            done += batch.len();
            on_batch(done, total);
        }

        self.place_markers(&map);
        self.reapply_selection();

        let built = self.marker_count();
        tracing::info!(generation, markers = built, "markers built");
        BuildOutcome::Completed { markers: built }
    }

    /// 클러스터러가 있으면 한 번에 넣고, 없으면 하나씩 붙인다
    fn place_markers(&self, map: &R::Map) {
        let mut markers = self.markers.borrow_mut();
        let clusterer = if markers.handles.is_empty() {
            None
        } else {
            self.runtime.create_clusterer(map, self.config.cluster_min_level)
        };

        match clusterer {
            Some(clusterer) => {
                let overlays: Vec<&R::Overlay> = markers.handles.iter().map(|h| &h.overlay).collect();
                self.runtime.cluster_add(&clusterer, &overlays);
                markers.clusterer = Some(clusterer);
            }
            None => {
                for handle in &markers.handles {
                    self.runtime.attach(map, &handle.overlay);
                }
            }
        }
    }

    /// 진행 중인 빌드를 무효화하고 모든 마커를 지도에서 뗀다
    pub fn clear_markers(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
        self.release_markers();
    }

    fn release_markers(&self) {
        let mut markers = self.markers.borrow_mut();
        if let Some(clusterer) = markers.clusterer.take() {
            self.runtime.cluster_clear(&clusterer);
        }
        let released = markers.handles.len();
        for handle in markers.handles.drain(..) {
            self.runtime.detach(&handle.overlay);
        }
        drop(markers);

        self.selection.borrow_mut().highlighted = None;
        if released > 0 {
            tracing::debug!(released, "markers released");
        }
    }

    /// 살아 있는 마커 수
    pub fn marker_count(&self) -> usize {
        self.markers.borrow().handles.len()
    }

    pub fn marker_ids(&self) -> Vec<String> {
        self.markers.borrow().handles.iter().map(|h| h.bakery_id.clone()).collect()
    }

    pub fn generation(&self) -> u64 {
        self.generation.get()
    }
}
