//! 빌드 시점 설정
//!
//! `BAKERY_API_BASE`, `KAKAO_MAP_APP_KEY` 환경 변수를 컴파일 때 읽는다.

use bakery_map_common::api::DEFAULT_API_BASE;
use bakery_map_common::MapConfig;

pub fn api_base() -> &'static str {
    option_env!("BAKERY_API_BASE").unwrap_or(DEFAULT_API_BASE)
}

pub fn kakao_app_key() -> &'static str {
    option_env!("KAKAO_MAP_APP_KEY").unwrap_or("")
}

pub fn map_config() -> MapConfig {
    MapConfig::default()
}
