//! Registry Entry - 리스너 레코드 정의

use typed_events_foundation::{AbortRegistration, CallbackId, EventCallback};

/// 등록 단위 식별자
///
/// 같은 (name, callback, capture) 조합이 해제 후 다시 등록되어도
/// 새 레코드는 다른 `RecordId`를 가집니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct RecordId(u64);

impl RecordId {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "record-{}", self.0)
    }
}

/// 하나의 이벤트 이름에 등록된 하나의 리스너
#[derive(Debug)]
pub(crate) struct ListenerRecord {
    pub(crate) id: RecordId,
    pub(crate) event_name: String,
    /// 호출자가 넘긴 콜백의 식별자
    pub(crate) callback: CallbackId,
    pub(crate) once: bool,
    pub(crate) capture: bool,
    /// 네이티브 타겟에 실제로 등록된 콜백
    pub(crate) native: EventCallback,
    /// 네이티브 타겟에서는 이미 해제되고 호출이 끝나기를 기다리는 once 레코드
    pub(crate) retiring: bool,
    /// signal 옵션으로 등록한 abort 콜백
    pub(crate) abort: Option<AbortRegistration>,
}

impl ListenerRecord {
    /// (callback, capture) 식별 키 비교
    pub(crate) fn matches(&self, callback: CallbackId, capture: bool) -> bool {
        self.callback == callback && self.capture == capture
    }

    /// abort 콜백을 신호에서 떼어냄
    pub(crate) fn detach_abort(&mut self) {
        if let Some(hook) = self.abort.take() {
            hook.detach();
        }
    }
}
