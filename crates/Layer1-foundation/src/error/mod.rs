//! Error types for typed-events
//!
//! 리스너 실패(ListenerInvocationError)와 설정/IO 에러를 중앙에서 관리

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// typed-events 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // 설정 관련
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // 디스패치 관련
    // ========================================================================
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    // ========================================================================
    // 외부 에러 변환
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// 설정 에러 생성 헬퍼
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }
}

// ============================================================================
// ListenerInvocationError
// ============================================================================

/// 리스너 실패 원인
#[derive(Debug, Clone)]
pub enum ListenerFailure {
    /// 리스너가 `Err`를 반환함
    Error(Arc<anyhow::Error>),
    /// 리스너가 panic 발생
    Panic(String),
}

impl fmt::Display for ListenerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error(err) => write!(f, "{err:#}"),
            Self::Panic(message) => write!(f, "panicked: {message}"),
        }
    }
}

/// 디스패치 중 리스너 코드에서 발생한 에러
///
/// 이 컴포넌트의 유일한 도메인 에러 종류입니다.
#[derive(Error, Debug, Clone)]
#[error("listener for '{event_type}' failed: {failure}")]
pub struct ListenerInvocationError {
    /// 디스패치 중이던 이벤트 이름
    pub event_type: String,
    /// 실패 원인
    pub failure: ListenerFailure,
}

impl ListenerInvocationError {
    /// 리스너가 반환한 에러로부터 생성
    pub fn from_error(event_type: impl Into<String>, error: anyhow::Error) -> Self {
        Self {
            event_type: event_type.into(),
            failure: ListenerFailure::Error(Arc::new(error)),
        }
    }

    /// `catch_unwind` payload로부터 생성
    pub fn from_panic(event_type: impl Into<String>, payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };

        Self {
            event_type: event_type.into(),
            failure: ListenerFailure::Panic(message),
        }
    }

    /// panic으로 인한 실패인지 확인
    pub fn is_panic(&self) -> bool {
        matches!(self.failure, ListenerFailure::Panic(_))
    }

    /// 실패 메시지 (이벤트 이름 제외)
    pub fn message(&self) -> String {
        self.failure.to_string()
    }
}

// ============================================================================
// DispatchError
// ============================================================================

/// 한 번의 디스패치에서 발생한 모든 리스너 실패
///
/// 리스너 하나가 실패해도 나머지 리스너는 계속 호출되며,
/// 모든 호출이 끝난 뒤 실패 목록이 한꺼번에 반환됩니다.
#[derive(Error, Debug, Clone)]
#[error("{} listener(s) failed while dispatching '{event_type}'", .failures.len())]
pub struct DispatchError {
    /// 이벤트 이름
    pub event_type: String,
    /// 실패한 리스너들 (호출 순서대로)
    pub failures: Vec<ListenerInvocationError>,
    /// 디스패치 중 이벤트가 취소되었는지 여부
    pub default_prevented: bool,
}

impl DispatchError {
    /// 첫 번째 실패
    pub fn first(&self) -> Option<&ListenerInvocationError> {
        self.failures.first()
    }

    /// 실패 목록 소비
    pub fn into_failures(self) -> Vec<ListenerInvocationError> {
        self.failures
    }
}
