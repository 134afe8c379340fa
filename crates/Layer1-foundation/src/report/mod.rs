//! Report - 처리되지 않은 리스너 에러 보고 채널
//!
//! `safe_dispatch_event`가 잡은 리스너 에러는 호출자에게 전파되지 않고
//! `ErrorReporter`로 전달됩니다 (단방향, fire-and-forget).
//!
//! ## 사용법
//!
//! ```ignore
//! use typed_events_foundation::report::{init_global_reporter, BroadcastReporter};
//!
//! let reporter = Arc::new(BroadcastReporter::new());
//! let mut rx = reporter.subscribe();
//! init_global_reporter(reporter);
//!
//! // ... 디스패치 ...
//! let report = rx.recv().await?;
//! ```

mod reporters;

pub use reporters::{BroadcastReporter, ErrorReport, MemoryReporter, TracingReporter};

use crate::error::ListenerInvocationError;
use std::sync::{Arc, OnceLock};

/// 에러 보고 sink
pub trait ErrorReporter: Send + Sync {
    /// 리포터 이름 (디버깅용)
    fn name(&self) -> &str;

    /// 리스너 에러 보고
    fn report(&self, error: &ListenerInvocationError);
}

// ============================================================================
// 전역 Reporter
// ============================================================================

static GLOBAL_REPORTER: OnceLock<Arc<dyn ErrorReporter>> = OnceLock::new();

/// 전역 리포터 초기화
///
/// 이미 초기화되었다면 기존 리포터를 반환합니다.
pub fn init_global_reporter(reporter: Arc<dyn ErrorReporter>) -> Arc<dyn ErrorReporter> {
    GLOBAL_REPORTER.get_or_init(|| reporter).clone()
}

/// 전역 리포터 가져오기 (기본값: TracingReporter)
pub fn global_reporter() -> Arc<dyn ErrorReporter> {
    GLOBAL_REPORTER
        .get_or_init(|| Arc::new(TracingReporter::new()) as Arc<dyn ErrorReporter>)
        .clone()
}
