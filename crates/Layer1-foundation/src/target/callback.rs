//! EventCallback - 네이티브 타겟에 등록되는 타입 없는 콜백

use crate::event::Event;
use std::fmt;
use std::sync::Arc;

/// 리스너 반환 타입
///
/// `Err`는 리스너 실패(ListenerInvocationError)로 취급됩니다.
pub type ListenerResult = anyhow::Result<()>;

type CallbackFn = dyn Fn(&Event) -> ListenerResult + Send + Sync;

/// 콜백 식별자
///
/// 공유 콜백의 포인터 주소입니다. 콜백이 살아있는 동안만 유일합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(usize);

impl CallbackId {
    /// `Arc`의 포인터 주소로 식별자 생성
    pub fn of<T: ?Sized>(callback: &Arc<T>) -> Self {
        Self(Arc::as_ptr(callback) as *const () as usize)
    }
}

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "callback-{:#x}", self.0)
    }
}

/// 네이티브 이벤트 콜백
///
/// 복제본은 같은 콜백을 가리키며 같은 `CallbackId`를 가집니다.
#[derive(Clone)]
pub struct EventCallback(Arc<CallbackFn>);

impl EventCallback {
    pub fn new(callback: impl Fn(&Event) -> ListenerResult + Send + Sync + 'static) -> Self {
        Self(Arc::new(callback))
    }

    pub fn id(&self) -> CallbackId {
        CallbackId::of(&self.0)
    }

    pub fn call(&self, event: &Event) -> ListenerResult {
        (self.0)(event)
    }
}

impl fmt::Debug for EventCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EventCallback").field(&self.id()).finish()
    }
}
