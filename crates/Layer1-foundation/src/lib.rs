//! # typed-events-foundation
//!
//! Foundation layer for typed-events:
//! - Target: 네이티브 EventTarget capability (등록, 해제, 동기 디스패치)
//! - Event: 이벤트 객체와 타입 지정 뷰 (Event, CustomEvent)
//! - Abort: `signal` 옵션용 AbortController / AbortSignal
//! - Report: 처리되지 않은 리스너 에러 보고 채널
//! - Config: EmitterConfig
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  TypedEventEmitter (Layer2)                              │
//! │  ├── 타입 있는 add / remove / safe_dispatch              │
//! │  └── ListenerRegistry (리스너 수 조회용 그림자 상태)       │
//! │                     │                                   │
//! │                     ▼                                   │
//! │          EventTargetLike (이 레이어)                     │
//! │          ┌─────────┴─────────┐                         │
//! │          ▼                   ▼                         │
//! │    EventTarget          ErrorReporter                  │
//! │    (동기 디스패치)       (tracing, broadcast)            │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod abort;
pub mod config;
pub mod error;
pub mod event;
pub mod report;
pub mod target;

// ============================================================================
// Error
// ============================================================================
pub use error::{DispatchError, Error, ListenerFailure, ListenerInvocationError, Result};

// ============================================================================
// Config
// ============================================================================
pub use config::{EmitterConfig, DEFAULT_MAX_LISTENERS, EMITTER_CONFIG_FILE};

// ============================================================================
// Event
// ============================================================================
pub use event::{CustomEvent, Detail, Event, EventInit};

// ============================================================================
// Target
// ============================================================================
pub use abort::{AbortController, AbortRegistration, AbortSignal};
pub use target::{
    CallbackId, EventCallback, EventTarget, EventTargetLike, ListenerOptions, ListenerResult,
};

// ============================================================================
// Report
// ============================================================================
pub use report::{
    global_reporter, init_global_reporter, BroadcastReporter, ErrorReport, ErrorReporter,
    MemoryReporter, TracingReporter,
};
