//! 지도 컨트롤러 설정

use crate::types::LatLng;
use serde::{Deserialize, Serialize};

/// 지도/마커 관련 설정값
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// 배치당 마커 수
    pub batch_size: usize,
    /// 배치 사이 양보 시간(ms)
    pub batch_delay_ms: u32,
    /// 컨테이너 대기 재시도 간격(ms)
    pub retry_delay_ms: u32,
    /// 지도 초기화 최대 시도 횟수
    pub max_init_attempts: u32,
    /// 클러스터링을 시작하는 지도 레벨 (클수록 축소)
    pub cluster_min_level: u8,
    pub default_center: LatLng,
    pub default_level: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            batch_size: 100,
            batch_delay_ms: 20,
            retry_delay_ms: 200,
            max_init_attempts: 10,
            cluster_min_level: 6,
            // 수원 화성행궁 근처
            default_center: LatLng::new(37.2858, 127.0168),
            default_level: 5,
        }
    }
}
