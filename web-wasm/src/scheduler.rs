use bakery_map_common::Scheduler;
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use gloo::timers::future::TimeoutFuture;

/// 브라우저 타이머 스케줄러 (`setTimeout`)
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooScheduler;

impl Scheduler for GlooScheduler {
    fn sleep(&self, ms: u32) -> LocalBoxFuture<'static, ()> {
        TimeoutFuture::new(ms).boxed_local()
    }
}
