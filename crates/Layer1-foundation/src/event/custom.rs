//! CustomEvent - 타입이 지정된 이벤트 뷰

use super::types::Event;
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;

/// `Event`에 대한 타입 지정 뷰
///
/// 타입 있는 리스너는 이 뷰를 받습니다. detail이 없거나 타입이 다르면
/// (예: 타입 없는 경로로 디스패치된 경우) `detail()`은 `None`입니다.
pub struct CustomEvent<'a, D> {
    event: &'a Event,
    _detail: PhantomData<fn() -> D>,
}

impl<'a, D: Any> CustomEvent<'a, D> {
    pub fn new(event: &'a Event) -> Self {
        Self {
            event,
            _detail: PhantomData,
        }
    }

    pub fn detail(&self) -> Option<&'a D> {
        self.event.detail::<D>()
    }

    /// 원본 네이티브 이벤트
    pub fn event(&self) -> &'a Event {
        self.event
    }
}

impl<D> Clone for CustomEvent<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for CustomEvent<'_, D> {}

impl<D> Deref for CustomEvent<'_, D> {
    type Target = Event;

    fn deref(&self) -> &Event {
        self.event
    }
}

impl<D> fmt::Debug for CustomEvent<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomEvent")
            .field("type", &self.event.event_type())
            .field("detail_type", &std::any::type_name::<D>())
            .finish()
    }
}
