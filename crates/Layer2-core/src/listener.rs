//! Listener - 타입 있는 리스너 핸들

use std::fmt;
use std::sync::Arc;
use typed_events_foundation::{CallbackId, CustomEvent, Event, ListenerResult};

type TypedFn<D> = dyn Fn(&CustomEvent<'_, D>) -> ListenerResult + Send + Sync;

/// detail 타입 `D`를 받는 리스너
///
/// 해제 시에는 등록할 때 쓴 핸들(또는 그 복제본)을 넘겨야 합니다.
/// 식별은 내부 콜백의 포인터로 합니다.
pub struct Listener<D> {
    callback: Arc<TypedFn<D>>,
}

impl<D: Send + Sync + 'static> Listener<D> {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&CustomEvent<'_, D>) -> ListenerResult + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
        }
    }

    pub fn id(&self) -> CallbackId {
        CallbackId::of(&self.callback)
    }

    /// 네이티브 이벤트를 타입 뷰로 감싸 호출
    pub fn call(&self, event: &Event) -> ListenerResult {
        (self.callback)(&CustomEvent::new(event))
    }
}

impl<D> Clone for Listener<D> {
    fn clone(&self) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<D> fmt::Debug for Listener<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("id", &CallbackId::of(&self.callback))
            .field("detail", &std::any::type_name::<D>())
            .finish()
    }
}
