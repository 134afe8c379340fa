//! Event - 디스패치되는 이벤트 객체
//!
//! ## 사용법
//!
//! ```ignore
//! use typed_events_foundation::event::{CustomEvent, Event, EventInit};
//!
//! let event = Event::custom("peer:connect", EventInit::detail("peer-1".to_string()));
//! let view = CustomEvent::<String>::new(&event);
//! assert_eq!(view.detail().map(String::as_str), Some("peer-1"));
//! ```

pub mod custom;
pub mod types;

pub use custom::CustomEvent;
pub use types::{Detail, Event, EventInit};
