//! Config - 설정 관리
//!
//! - `emitter.rs` - EmitterConfig (리스너 임계값, 디버그 모드)

mod emitter;

pub use emitter::{EmitterConfig, DEFAULT_MAX_LISTENERS, EMITTER_CONFIG_FILE};
