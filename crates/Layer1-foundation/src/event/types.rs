//! Event Types - 디스패치되는 이벤트 객체
//!
//! `Event`는 이름(type)과 선택적 detail payload를 가진 네이티브 이벤트입니다.
//! detail은 타입이 지워진 상태(`dyn Any`)로 저장되며, 리스너 쪽에서
//! `CustomEvent<D>` 뷰를 통해 타입을 복원합니다.

use chrono::{DateTime, Utc};
use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 타입이 지워진 detail payload
pub type Detail = Arc<dyn Any + Send + Sync>;

// ============================================================================
// EventInit
// ============================================================================

/// 이벤트 초기화 옵션 (`{ detail, bubbles, cancelable }`)
#[derive(Debug, Clone)]
pub struct EventInit<D> {
    /// 이벤트 payload
    pub detail: Option<D>,
    /// 버블링 여부 (단일 타겟에서는 정보용)
    pub bubbles: bool,
    /// `prevent_default`로 취소 가능한지 여부
    pub cancelable: bool,
}

impl<D> Default for EventInit<D> {
    fn default() -> Self {
        Self {
            detail: None,
            bubbles: false,
            cancelable: false,
        }
    }
}

impl<D> EventInit<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// detail만 지정
    pub fn detail(detail: D) -> Self {
        Self {
            detail: Some(detail),
            ..Self::default()
        }
    }

    pub fn with_detail(mut self, detail: D) -> Self {
        self.detail = Some(detail);
        self
    }

    pub fn with_bubbles(mut self, bubbles: bool) -> Self {
        self.bubbles = bubbles;
        self
    }

    pub fn with_cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = cancelable;
        self
    }
}

// ============================================================================
// Event
// ============================================================================

/// 네이티브 이벤트 객체
///
/// 디스패치 중 상태(취소, 전파 중단)는 리스너가 `&Event`로 접근하므로
/// atomic 플래그로 관리합니다.
#[derive(Debug)]
pub struct Event {
    event_type: String,
    detail: Option<Detail>,
    bubbles: bool,
    cancelable: bool,
    time_stamp: DateTime<Utc>,
    canceled: AtomicBool,
    in_passive_listener: AtomicBool,
    stop_immediate: AtomicBool,
    dispatching: AtomicBool,
}

impl Event {
    /// detail 없는 이벤트 생성
    pub fn new(event_type: impl Into<String>) -> Self {
        Self::build(event_type.into(), None, false, false)
    }

    /// detail을 가진 커스텀 이벤트 생성
    pub fn custom<D: Send + Sync + 'static>(
        event_type: impl Into<String>,
        init: EventInit<D>,
    ) -> Self {
        let detail = init.detail.map(|d| Arc::new(d) as Detail);
        Self::build(event_type.into(), detail, init.bubbles, init.cancelable)
    }

    fn build(event_type: String, detail: Option<Detail>, bubbles: bool, cancelable: bool) -> Self {
        Self {
            event_type,
            detail,
            bubbles,
            cancelable,
            time_stamp: Utc::now(),
            canceled: AtomicBool::new(false),
            in_passive_listener: AtomicBool::new(false),
            stop_immediate: AtomicBool::new(false),
            dispatching: AtomicBool::new(false),
        }
    }

    /// 이벤트 이름
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// 타입이 일치하면 detail 반환
    pub fn detail<D: Any>(&self) -> Option<&D> {
        self.detail.as_deref()?.downcast_ref::<D>()
    }

    pub fn has_detail(&self) -> bool {
        self.detail.is_some()
    }

    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    pub fn cancelable(&self) -> bool {
        self.cancelable
    }

    /// 생성 시각
    pub fn time_stamp(&self) -> DateTime<Utc> {
        self.time_stamp
    }

    /// 이벤트 취소
    ///
    /// cancelable이 아니거나 passive 리스너 안에서 호출되면 무시됩니다.
    pub fn prevent_default(&self) {
        if self.cancelable && !self.in_passive_listener.load(Ordering::SeqCst) {
            self.canceled.store(true, Ordering::SeqCst);
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.canceled.load(Ordering::SeqCst)
    }

    /// 디스패치 진행 중인지 여부
    pub fn is_dispatching(&self) -> bool {
        self.dispatching.load(Ordering::SeqCst)
    }

    /// 남은 리스너 호출 중단
    pub fn stop_immediate_propagation(&self) {
        self.stop_immediate.store(true, Ordering::SeqCst);
    }

    pub(crate) fn set_in_passive_listener(&self, passive: bool) {
        self.in_passive_listener.store(passive, Ordering::SeqCst);
    }

    pub(crate) fn immediate_propagation_stopped(&self) -> bool {
        self.stop_immediate.load(Ordering::SeqCst)
    }

    /// 디스패치 시작 표시 (이미 디스패치 중이면 `false`)
    pub(crate) fn begin_dispatch(&self) -> bool {
        self.dispatching
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// 디스패치 종료 시 전파 플래그 초기화 (취소 상태는 유지)
    pub(crate) fn finish_dispatch(&self) {
        self.in_passive_listener.store(false, Ordering::SeqCst);
        self.stop_immediate.store(false, Ordering::SeqCst);
        self.dispatching.store(false, Ordering::SeqCst);
    }
}
