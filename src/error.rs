use thiserror::Error;

#[derive(Error, Debug)]
pub enum BakeryMapError {
    #[error("설정 오류: {0}")]
    Config(String),

    #[error("로그인이 필요합니다. `bakery-map config --set-session <쿠키>`로 세션을 설정하세요")]
    NotSignedIn,

    #[error("빵집을 찾을 수 없습니다: {0}")]
    BakeryNotFound(String),

    #[error("입력 오류: {0}")]
    InvalidInput(String),

    #[error("API 오류 ({status}): {detail}")]
    Api { status: u16, detail: String },

    #[error("네트워크 오류: {0}")]
    Network(String),

    #[error("HTTP 오류: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON 파싱 오류: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO 오류: {0}")]
    Io(#[from] std::io::Error),

    #[error("지도 초기화 실패: {0}")]
    Bootstrap(#[from] bakery_map_common::BootstrapError),

    #[error("입력 중단: {0}")]
    Prompt(String),
}

impl From<bakery_map_common::Error> for BakeryMapError {
    fn from(err: bakery_map_common::Error) -> Self {
        use bakery_map_common::Error as CommonError;
        match err {
            CommonError::Api { status: 401, .. } => BakeryMapError::NotSignedIn,
            CommonError::Api { status, detail } => BakeryMapError::Api { status, detail },
            CommonError::Network(msg) => BakeryMapError::Network(msg),
            CommonError::Json(e) => BakeryMapError::JsonParse(e),
            CommonError::Config(msg) => BakeryMapError::Config(msg),
            CommonError::Invalid(msg) => BakeryMapError::InvalidInput(msg),
        }
    }
}

impl From<dialoguer::Error> for BakeryMapError {
    fn from(err: dialoguer::Error) -> Self {
        BakeryMapError::Prompt(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BakeryMapError>;
