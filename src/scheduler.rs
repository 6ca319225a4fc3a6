use bakery_map_common::Scheduler;
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use std::time::Duration;

/// tokio 타이머 기반 스케줄러
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn sleep(&self, ms: u32) -> LocalBoxFuture<'static, ()> {
        tokio::time::sleep(Duration::from_millis(u64::from(ms))).boxed_local()
    }
}
