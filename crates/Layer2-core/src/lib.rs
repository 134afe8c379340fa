//! typed-events: 타입 있는 이벤트 이미터
//!
//! Layer2 - 네이티브 EventTarget 위의 타입 지정 데코레이터
//!
//! # 주요 모듈
//!
//! - `map`: 이벤트 이름 → detail 타입 매핑 (`event_map!`)
//! - `listener`: 타입 있는 리스너 핸들
//! - `emitter`: TypedEventEmitter (리스너 수 조회, safe dispatch)
//!
//! # 사용 예시
//!
//! ```ignore
//! use typed_events::{event_map, EventInit, ListenerOptions, TypedEventEmitter};
//!
//! event_map! {
//!     pub struct AppEvents {
//!         Test("test") => String,
//!     }
//! }
//!
//! let emitter = TypedEventEmitter::<AppEvents>::new();
//! emitter.once(Test, |evt| {
//!     assert_eq!(evt.detail().map(String::as_str), Some("hello"));
//!     Ok(())
//! });
//!
//! emitter.safe_dispatch_event(Test, EventInit::detail("hello".to_string()));
//! assert_eq!(emitter.listener_count("test"), 0);
//! ```

pub mod emitter;
pub mod listener;
pub mod map;
mod registry;

// Re-exports: Emitter
pub use emitter::TypedEventEmitter;
pub use listener::Listener;
pub use map::{EventMap, EventType};

// Re-exports: Foundation
pub use typed_events_foundation::{
    AbortController, AbortRegistration, AbortSignal, BroadcastReporter, CustomEvent,
    DispatchError, EmitterConfig, ErrorReport, ErrorReporter, Event, EventCallback, EventInit,
    EventTarget, EventTargetLike, ListenerFailure, ListenerInvocationError, ListenerOptions,
    ListenerResult, MemoryReporter, TracingReporter,
};
