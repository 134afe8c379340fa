//! ListenerOptions - `{ once, capture, passive, signal }`

use crate::abort::AbortSignal;

/// 리스너 등록 옵션
///
/// 잘못된 조합에 대한 검증은 하지 않습니다.
#[derive(Debug, Clone, Default)]
pub struct ListenerOptions {
    /// 첫 호출 후 자동 해제
    pub once: bool,
    /// capture 단계 리스너 (식별 키의 일부)
    pub capture: bool,
    /// `prevent_default` 무시
    pub passive: bool,
    /// 취소 시 리스너 해제
    pub signal: Option<AbortSignal>,
}

impl ListenerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// `once: true` 옵션
    pub fn once() -> Self {
        Self::new().with_once(true)
    }

    /// `capture: true` 옵션
    pub fn capture() -> Self {
        Self::new().with_capture(true)
    }

    pub fn with_once(mut self, once: bool) -> Self {
        self.once = once;
        self
    }

    pub fn with_capture(mut self, capture: bool) -> Self {
        self.capture = capture;
        self
    }

    pub fn with_passive(mut self, passive: bool) -> Self {
        self.passive = passive;
        self
    }

    pub fn with_signal(mut self, signal: AbortSignal) -> Self {
        self.signal = Some(signal);
        self
    }

    /// 이미 취소된 신호를 가지고 있는지 확인
    pub fn is_aborted(&self) -> bool {
        self.signal.as_ref().is_some_and(AbortSignal::aborted)
    }
}

/// `bool`은 capture 플래그로 해석 (`addEventListener(type, cb, true)`)
impl From<bool> for ListenerOptions {
    fn from(capture: bool) -> Self {
        Self::new().with_capture(capture)
    }
}

impl From<()> for ListenerOptions {
    fn from(_: ()) -> Self {
        Self::default()
    }
}
