use crate::error::{BakeryMapError, Result};
use bakery_map_common::api::DEFAULT_API_BASE;
use bakery_map_common::MapConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI 설정. Kakao 앱 키는 웹 빌드 시점(`KAKAO_MAP_APP_KEY`)에만 쓰므로 여기에 없다
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 예: `https://bakery.example.com/api/v1`
    pub api_base: String,
    /// `Cookie` 헤더에 그대로 실리는 세션 쿠키 (`name=value`)
    pub session_cookie: Option<String>,
    pub timeout_seconds: u64,
    pub map: MapConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: format!("http://localhost:8000{}", DEFAULT_API_BASE),
            session_cookie: None,
            timeout_seconds: 30,
            map: MapConfig::default(),
        }
    }
}

impl Config {
    /// 설정 파일을 읽고 환경 변수를 덮어쓴다
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env();
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| BakeryMapError::Config("홈 디렉터리를 찾을 수 없습니다".into()))?;
        Ok(home.join(".config").join("bakery-map").join("config.json"))
    }

    fn apply_env(&mut self) {
        if let Ok(base) = std::env::var("BAKERY_API_BASE") {
            self.api_base = base;
        }
        if let Ok(session) = std::env::var("BAKERY_SESSION") {
            self.session_cookie = Some(session);
        }
    }

    /// 끝의 `/`를 뗀 API 기본 주소
    pub fn api_base(&self) -> Result<&str> {
        let base = self.api_base.trim().trim_end_matches('/');
        if base.starts_with("http://") || base.starts_with("https://") {
            Ok(base)
        } else {
            Err(BakeryMapError::Config(format!(
                "API 주소는 http(s)로 시작해야 합니다: {}",
                self.api_base
            )))
        }
    }
}
