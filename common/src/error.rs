//! 에러 타입 정의

use thiserror::Error;

/// 공통 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    /// 2xx 이외의 응답. `detail`은 응답 본문의 `detail` 필드 또는 상태 텍스트
    #[error("API error ({status}): {detail}")]
    Api { status: u16, detail: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    /// 요청 전에 걸러진 입력
    #[error("Invalid input: {0}")]
    Invalid(String),
}

impl Error {
    /// 로그인 세션이 없을 때의 응답인지
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Api { status: 401, .. })
    }
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_api() {
        let error = Error::Api { status: 404, detail: "Bakery not found".to_string() };
        assert_eq!(format!("{}", error), "API error (404): Bakery not found");
    }

    #[test]
    fn test_error_display_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error = Error::Json(json_error);
        assert!(format!("{}", error).contains("JSON error"));
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }

    #[test]
    fn test_error_display_config() {
        let error = Error::Config("설정 파일을 찾을 수 없습니다".to_string());
        assert_eq!(format!("{}", error), "Config error: 설정 파일을 찾을 수 없습니다");
    }

    #[test]
    fn test_is_unauthorized() {
        assert!(Error::Api { status: 401, detail: "Not authenticated".into() }.is_unauthorized());
        assert!(!Error::Api { status: 500, detail: "boom".into() }.is_unauthorized());
        assert!(!Error::Network("offline".into()).is_unauthorized());
    }
}
