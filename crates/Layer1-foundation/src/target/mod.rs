//! Target - 네이티브 이벤트 타겟 capability
//!
//! ## 아키텍처
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  EventTargetLike (trait)                     │
//! │  ├── add_event_listener(type, cb, options)   │
//! │  ├── remove_event_listener(type, cb, opts)   │
//! │  └── dispatch_event(event) -> bool           │
//! │              │                               │
//! │              ▼                               │
//! │  EventTarget (네이티브 구현)                  │
//! │  └── TypedEventEmitter 등 데코레이터가 위임    │
//! └──────────────────────────────────────────────┘
//! ```

mod callback;
mod native;
mod options;

pub use callback::{CallbackId, EventCallback, ListenerResult};
pub use native::EventTarget;
pub use options::ListenerOptions;

use crate::error::DispatchError;
use crate::event::Event;

/// 이벤트 타겟 capability
///
/// 네이티브 `EventTarget`을 받는 곳이라면 이 trait을 구현한
/// 어떤 타입이든 넘길 수 있습니다.
pub trait EventTargetLike {
    /// 리스너 등록
    fn add_event_listener(&self, event_type: &str, callback: &EventCallback, options: ListenerOptions);

    /// 리스너 해제 (options 중 capture만 사용)
    fn remove_event_listener(
        &self,
        event_type: &str,
        callback: &EventCallback,
        options: ListenerOptions,
    );

    /// 동기 디스패치
    ///
    /// 취소 가능한 이벤트가 취소되었으면 `Ok(false)`, 아니면 `Ok(true)`.
    /// 리스너가 실패하면 `Err(DispatchError)`.
    fn dispatch_event(&self, event: &Event) -> Result<bool, DispatchError>;
}
