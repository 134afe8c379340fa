//! Reporters - ErrorReporter 구현체들

use super::ErrorReporter;
use crate::error::ListenerInvocationError;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::error;

/// 기본 broadcast 채널 용량
const DEFAULT_CAPACITY: usize = 256;

// ============================================================================
// ErrorReport
// ============================================================================

/// 직렬화 가능한 에러 보고서
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    /// 이벤트 이름
    pub event_type: String,
    /// 실패 메시지
    pub message: String,
    /// panic 여부
    pub panic: bool,
    /// 보고 시각
    pub reported_at: DateTime<Utc>,
}

impl From<&ListenerInvocationError> for ErrorReport {
    fn from(error: &ListenerInvocationError) -> Self {
        Self {
            event_type: error.event_type.clone(),
            message: error.message(),
            panic: error.is_panic(),
            reported_at: Utc::now(),
        }
    }
}

// ============================================================================
// TracingReporter
// ============================================================================

/// `tracing::error!`로 기록하는 리포터
#[derive(Debug, Default)]
pub struct TracingReporter;

impl TracingReporter {
    pub fn new() -> Self {
        Self
    }
}

impl ErrorReporter for TracingReporter {
    fn name(&self) -> &str {
        "tracing"
    }

    fn report(&self, err: &ListenerInvocationError) {
        error!(
            event_type = %err.event_type,
            panic = err.is_panic(),
            error = %err.failure,
            "Unhandled error in event listener"
        );
    }
}

// ============================================================================
// MemoryReporter
// ============================================================================

/// 보고된 에러를 메모리에 보관하는 리포터 (테스트/진단용)
#[derive(Debug, Default)]
pub struct MemoryReporter {
    errors: Mutex<Vec<ListenerInvocationError>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 보고된 에러 목록 (보고 순서)
    pub fn errors(&self) -> Vec<ListenerInvocationError> {
        self.errors.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.errors.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.lock().is_empty()
    }

    pub fn clear(&self) {
        self.errors.lock().clear();
    }
}

impl ErrorReporter for MemoryReporter {
    fn name(&self) -> &str {
        "memory"
    }

    fn report(&self, error: &ListenerInvocationError) {
        self.errors.lock().push(error.clone());
    }
}

// ============================================================================
// BroadcastReporter
// ============================================================================

/// broadcast 채널로 보고서를 내보내는 리포터
///
/// 수신자가 없으면 보고서는 버려집니다.
#[derive(Debug)]
pub struct BroadcastReporter {
    sender: broadcast::Sender<ErrorReport>,
}

impl BroadcastReporter {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ErrorReport> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorReporter for BroadcastReporter {
    fn name(&self) -> &str {
        "broadcast"
    }

    fn report(&self, error: &ListenerInvocationError) {
        let _ = self.sender.send(ErrorReport::from(error));
    }
}
