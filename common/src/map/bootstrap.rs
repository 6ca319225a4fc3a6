//! 지도 초기화
//!
//! SDK 스크립트는 페이지당 한 번만 주입한다 (로드 실패 후 재시도만 예외).
//! 컨테이너가 아직 없으면 고정 간격으로 재시도하고, 한도를 넘으면 원인을 담은 에러를 돌려준다.

use super::{MapController, MapOptions, MapRuntime};
use futures::future::{LocalBoxFuture, Shared};
use futures::FutureExt;
use thiserror::Error;

/// 지도 초기화 실패 원인
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BootstrapError {
    #[error("지도 SDK 스크립트를 불러오지 못했습니다: {0}")]
    ScriptLoad(String),

    #[error("지도 SDK(kakao.maps)가 로드되지 않았습니다")]
    RuntimeMissing,

    #[error("지도 컨테이너를 찾을 수 없습니다 ({attempts}회 시도)")]
    ContainerMissing { attempts: u32 },

    #[error("지도 생성 실패: {0}")]
    MapConstruction(String),
}

type PendingScript = Shared<LocalBoxFuture<'static, Result<(), String>>>;

/// 스크립트 주입 상태. 로드 중에는 모든 호출자가 같은 Future를 기다린다
pub(super) enum ScriptState {
    Idle,
    Loading(PendingScript),
    Loaded,
    Failed,
}

impl<R: MapRuntime> MapController<R> {
    /// SDK 로드 → 컨테이너 대기 → 지도 생성
    ///
    /// 이미 지도가 있으면 아무것도 하지 않는다. 실패 후 다시 호출해도 되며,
    /// SDK가 이미 로드되어 있으면 스크립트를 다시 주입하지 않는다.
    pub async fn bootstrap(&self) -> Result<(), BootstrapError> {
        if self.is_ready() {
            return Ok(());
        }

        self.ensure_runtime().await?;

        let max_attempts = self.config.max_init_attempts.max(1);
        for attempt in 1..=max_attempts {
            // 대기 중에 다른 호출이 지도를 만들었을 수 있다
            if self.is_ready() {
                return Ok(());
            }

            if self.runtime.container_mounted() {
                let options = MapOptions {
                    center: self.config.default_center,
                    level: self.config.default_level,
                };
                let map = self
                    .runtime
                    .create_map(&options)
                    .map_err(BootstrapError::MapConstruction)?;
                *self.map.borrow_mut() = Some(map);
                tracing::info!(attempt, "map initialised");
                return Ok(());
            }

            if attempt < max_attempts {
                tracing::debug!(attempt, max_attempts, "map container not mounted yet, retrying");
                self.scheduler.sleep(self.config.retry_delay_ms).await;
            }
        }

        tracing::warn!(max_attempts, "map container never mounted");
        Err(BootstrapError::ContainerMissing { attempts: max_attempts })
    }

    async fn ensure_runtime(&self) -> Result<(), BootstrapError> {
        if self.runtime.is_loaded() {
            *self.script.borrow_mut() = ScriptState::Loaded;
            return Ok(());
        }

        let pending = {
            let mut script = self.script.borrow_mut();
            match &*script {
                ScriptState::Loaded => None,
                ScriptState::Loading(load) => Some(load.clone()),
                ScriptState::Idle | ScriptState::Failed => {
                    tracing::debug!("injecting map SDK script");
                    let load = self.runtime.load_script().shared();
                    *script = ScriptState::Loading(load.clone());
                    Some(load)
                }
            }
        };

        if let Some(load) = pending {
            let result = load.clone().await;
            {
                // 더 새로운 주입이 시작됐다면 그 상태를 덮어쓰지 않는다
                let mut script = self.script.borrow_mut();
                if matches!(&*script, ScriptState::Loading(current) if current.ptr_eq(&load)) {
                    *script = if result.is_ok() { ScriptState::Loaded } else { ScriptState::Failed };
                }
            }
            if let Err(e) = result {
                tracing::warn!(error = %e, "map SDK script failed to load");
                return Err(BootstrapError::ScriptLoad(e));
            }
        }

        if self.runtime.is_loaded() {
            Ok(())
        } else {
            Err(BootstrapError::RuntimeMissing)
        }
    }

    /// SDK 스크립트 주입을 요청한 적이 있는지
    pub fn script_requested(&self) -> bool {
        !matches!(*self.script.borrow(), ScriptState::Idle)
    }
}
