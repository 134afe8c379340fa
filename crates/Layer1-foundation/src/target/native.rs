//! Native EventTarget - 동기 이벤트 디스패치
//!
//! 리스너 조회 API는 제공하지 않습니다. 등록 상태를 알아야 하는 쪽은
//! 자체 레지스트리를 유지해야 합니다.

use super::{EventCallback, EventTargetLike, ListenerOptions};
use crate::abort::AbortRegistration;
use crate::error::{DispatchError, ListenerInvocationError};
use crate::event::Event;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tracing::trace;

/// 등록된 리스너
struct Registration {
    callback: EventCallback,
    capture: bool,
    once: bool,
    passive: bool,
    /// 디스패치 스냅샷에서 해제된 리스너를 건너뛰기 위한 플래그
    removed: AtomicBool,
    /// signal 옵션으로 등록한 abort 콜백
    abort: Mutex<Option<AbortRegistration>>,
}

impl Registration {
    fn matches(&self, callback: &EventCallback, capture: bool) -> bool {
        self.capture == capture && self.callback.id() == callback.id()
    }
}

#[derive(Default)]
struct TargetState {
    listeners: HashMap<String, Vec<Arc<Registration>>>,
}

impl TargetState {
    fn remove_where(&mut self, event_type: &str, pred: impl Fn(&Arc<Registration>) -> bool) -> bool {
        let Some(list) = self.listeners.get_mut(event_type) else {
            return false;
        };

        let Some(pos) = list.iter().position(pred) else {
            return false;
        };

        let registration = list.remove(pos);
        registration.removed.store(true, Ordering::SeqCst);
        if let Some(hook) = registration.abort.lock().take() {
            hook.detach();
        }

        if list.is_empty() {
            self.listeners.remove(event_type);
        }
        true
    }
}

/// 네이티브 이벤트 타겟
///
/// - (type, callback, capture) 조합이 유일 키이며 중복 등록은 무시됩니다.
/// - 디스패치는 리스너 목록의 스냅샷을 순서대로 호출합니다.
///   capture 리스너가 먼저, 같은 단계 안에서는 등록 순서입니다.
/// - 리스너 실패(Err 또는 panic)는 다른 리스너 호출을 막지 않으며,
///   모든 호출이 끝난 뒤 `DispatchError`로 반환됩니다.
/// - 콜백 실행 중에는 잠금을 잡지 않으므로 재진입 디스패치가 가능합니다.
///
/// 복제본은 같은 타겟을 가리킵니다.
#[derive(Clone, Default)]
pub struct EventTarget {
    state: Arc<Mutex<TargetState>>,
}

impl EventTarget {
    pub fn new() -> Self {
        Self::default()
    }

    fn remove_registration(state: &Mutex<TargetState>, event_type: &str, target: &Arc<Registration>) {
        state
            .lock()
            .remove_where(event_type, |registration| Arc::ptr_eq(registration, target));
    }

    fn snapshot(&self, event_type: &str) -> Vec<Arc<Registration>> {
        let state = self.state.lock();
        let Some(list) = state.listeners.get(event_type) else {
            return Vec::new();
        };

        list.iter()
            .filter(|registration| registration.capture)
            .chain(list.iter().filter(|registration| !registration.capture))
            .cloned()
            .collect()
    }
}

impl EventTargetLike for EventTarget {
    fn add_event_listener(
        &self,
        event_type: &str,
        callback: &EventCallback,
        options: ListenerOptions,
    ) {
        if options.is_aborted() {
            trace!(event_type, "Ignoring listener with aborted signal");
            return;
        }

        let mut state = self.state.lock();
        if state.listeners.get(event_type).is_some_and(|list| {
            list.iter()
                .any(|existing| existing.matches(callback, options.capture))
        }) {
            trace!(event_type, callback = %callback.id(), "Duplicate listener ignored");
            return;
        }

        let registration = Arc::new(Registration {
            callback: callback.clone(),
            capture: options.capture,
            once: options.once,
            passive: options.passive,
            removed: AtomicBool::new(false),
            abort: Mutex::new(None),
        });

        if let Some(signal) = &options.signal {
            let weak_state: Weak<Mutex<TargetState>> = Arc::downgrade(&self.state);
            let weak_registration = Arc::downgrade(&registration);
            let name = event_type.to_string();

            let hook = signal.on_abort(move || {
                if let (Some(state), Some(registration)) =
                    (weak_state.upgrade(), weak_registration.upgrade())
                {
                    Self::remove_registration(&state, &name, &registration);
                }
            });

            // 확인과 등록 사이에 취소됨
            let Some(hook) = hook else {
                trace!(event_type, "Signal aborted before registration");
                return;
            };
            *registration.abort.lock() = Some(hook);
        }

        state
            .listeners
            .entry(event_type.to_string())
            .or_default()
            .push(registration);
    }

    fn remove_event_listener(
        &self,
        event_type: &str,
        callback: &EventCallback,
        options: ListenerOptions,
    ) {
        self.state
            .lock()
            .remove_where(event_type, |registration| {
                registration.matches(callback, options.capture)
            });
    }

    fn dispatch_event(&self, event: &Event) -> Result<bool, DispatchError> {
        let event_type = event.event_type();

        // 디스패치 중인 이벤트는 다시 디스패치하지 않음
        if !event.begin_dispatch() {
            trace!(event_type, "Event is already being dispatched");
            return Ok(!event.default_prevented());
        }

        let snapshot = self.snapshot(event_type);

        trace!(event_type, listeners = snapshot.len(), "Dispatching event");

        let mut failures = Vec::new();

        for registration in snapshot {
            if registration.removed.load(Ordering::SeqCst) {
                continue;
            }

            // once 리스너는 호출 전에 해제
            if registration.once {
                Self::remove_registration(&self.state, event_type, &registration);
            }

            event.set_in_passive_listener(registration.passive);
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| registration.callback.call(event)));
            event.set_in_passive_listener(false);

            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(err)) => failures.push(ListenerInvocationError::from_error(event_type, err)),
                Err(payload) => {
                    failures.push(ListenerInvocationError::from_panic(event_type, payload))
                }
            }

            if event.immediate_propagation_stopped() {
                break;
            }
        }

        let default_prevented = event.default_prevented();
        event.finish_dispatch();

        if failures.is_empty() {
            Ok(!default_prevented)
        } else {
            Err(DispatchError {
                event_type: event_type.to_string(),
                failures,
                default_prevented,
            })
        }
    }
}

impl fmt::Debug for EventTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventTarget").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abort::AbortController;
    use crate::event::EventInit;
    use std::sync::atomic::AtomicUsize;

    fn counter() -> (Arc<AtomicUsize>, EventCallback) {
        let hits = Arc::new(AtomicUsize::new(0));
        let inner = hits.clone();
        let callback = EventCallback::new(move |_| {
            inner.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        (hits, callback)
    }

    fn recorder(log: &Arc<Mutex<Vec<&'static str>>>, label: &'static str) -> EventCallback {
        let log = log.clone();
        EventCallback::new(move |_| {
            log.lock().push(label);
            Ok(())
        })
    }

    #[test]
    fn test_dispatch_without_listeners() {
        let target = EventTarget::new();
        assert!(target.dispatch_event(&Event::new("test")).unwrap());
    }

    #[test]
    fn test_duplicate_registration_ignored() {
        let target = EventTarget::new();
        let (hits, callback) = counter();

        target.add_event_listener("test", &callback, ListenerOptions::new());
        target.add_event_listener("test", &callback, ListenerOptions::new());
        target.dispatch_event(&Event::new("test")).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        // capture가 다르면 별도 리스너
        target.add_event_listener("test", &callback, ListenerOptions::capture());
        target.dispatch_event(&Event::new("test")).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_remove_requires_matching_capture() {
        let target = EventTarget::new();
        let (hits, callback) = counter();

        target.add_event_listener("test", &callback, ListenerOptions::capture());
        target.remove_event_listener("test", &callback, ListenerOptions::new());
        target.dispatch_event(&Event::new("test")).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        target.remove_event_listener("test", &callback, true.into());
        target.dispatch_event(&Event::new("test")).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_once_listener_fires_once() {
        let target = EventTarget::new();
        let (hits, callback) = counter();

        target.add_event_listener("test", &callback, ListenerOptions::once());
        for _ in 0..3 {
            target.dispatch_event(&Event::new("test")).unwrap();
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_capture_listeners_run_first() {
        let target = EventTarget::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        target.add_event_listener("test", &recorder(&log, "bubble-1"), ListenerOptions::new());
        target.add_event_listener("test", &recorder(&log, "capture"), ListenerOptions::capture());
        target.add_event_listener("test", &recorder(&log, "bubble-2"), ListenerOptions::new());
        target.dispatch_event(&Event::new("test")).unwrap();

        assert_eq!(*log.lock(), vec!["capture", "bubble-1", "bubble-2"]);
    }

    #[test]
    fn test_cancel_and_passive() {
        let target = EventTarget::new();
        let cancel = EventCallback::new(|event| {
            event.prevent_default();
            Ok(())
        });

        target.add_event_listener("test", &cancel, ListenerOptions::new().with_passive(true));
        let event = Event::custom("test", EventInit::<()>::new().with_cancelable(true));
        assert!(target.dispatch_event(&event).unwrap());

        target.remove_event_listener("test", &cancel, ListenerOptions::new());
        target.add_event_listener("test", &cancel, ListenerOptions::new());
        let event = Event::custom("test", EventInit::<()>::new().with_cancelable(true));
        assert!(!target.dispatch_event(&event).unwrap());
    }

    #[test]
    fn test_failures_do_not_stop_dispatch() {
        let target = EventTarget::new();
        let (hits, callback) = counter();
        let failing = EventCallback::new(|_| Err(anyhow::anyhow!("boom")));
        let panicking = EventCallback::new(|_| panic!("kaboom"));

        target.add_event_listener("test", &failing, ListenerOptions::new());
        target.add_event_listener("test", &panicking, ListenerOptions::new());
        target.add_event_listener("test", &callback, ListenerOptions::new());

        let err = target.dispatch_event(&Event::new("test")).unwrap_err();
        assert_eq!(err.failures.len(), 2);
        assert!(!err.failures[0].is_panic());
        assert!(err.failures[1].is_panic());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_stop_immediate_propagation() {
        let target = EventTarget::new();
        let (hits, callback) = counter();
        let stopper = EventCallback::new(|event| {
            event.stop_immediate_propagation();
            Ok(())
        });

        target.add_event_listener("test", &stopper, ListenerOptions::new());
        target.add_event_listener("test", &callback, ListenerOptions::new());
        target.dispatch_event(&Event::new("test")).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_removal_during_dispatch_skips_listener() {
        let target = EventTarget::new();
        let (hits, victim) = counter();

        let handle = target.clone();
        let victim_ref = victim.clone();
        let remover = EventCallback::new(move |_| {
            handle.remove_event_listener("test", &victim_ref, ListenerOptions::new());
            Ok(())
        });

        target.add_event_listener("test", &remover, ListenerOptions::new());
        target.add_event_listener("test", &victim, ListenerOptions::new());
        target.dispatch_event(&Event::new("test")).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_reentrant_dispatch() {
        let target = EventTarget::new();
        let (hits, callback) = counter();

        let handle = target.clone();
        let forwarder = EventCallback::new(move |_| {
            handle.dispatch_event(&Event::new("inner")).map(|_| ())?;
            Ok(())
        });

        target.add_event_listener("outer", &forwarder, ListenerOptions::new());
        target.add_event_listener("inner", &callback, ListenerOptions::new());
        target.dispatch_event(&Event::new("outer")).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_abort_signal_removes_listener() {
        let target = EventTarget::new();
        let (hits, callback) = counter();
        let controller = AbortController::new();

        target.add_event_listener(
            "test",
            &callback,
            ListenerOptions::new().with_signal(controller.signal()),
        );
        target.dispatch_event(&Event::new("test")).unwrap();
        controller.abort();
        target.dispatch_event(&Event::new("test")).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        // 이미 취소된 신호는 등록 자체를 무시
        target.add_event_listener(
            "test",
            &callback,
            ListenerOptions::new().with_signal(controller.signal()),
        );
        target.dispatch_event(&Event::new("test")).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_removal_detaches_abort_callback() {
        let target = EventTarget::new();
        let (hits, callback) = counter();
        let controller = AbortController::new();
        let signal = controller.signal();

        for _ in 0..100 {
            target.add_event_listener(
                "test",
                &callback,
                ListenerOptions::new().with_signal(signal.clone()),
            );
            target.remove_event_listener("test", &callback, ListenerOptions::new());
        }
        assert_eq!(signal.pending_callbacks(), 0);

        // once 해제도 콜백을 떼어냄
        target.add_event_listener(
            "test",
            &callback,
            ListenerOptions::once().with_signal(signal.clone()),
        );
        assert_eq!(signal.pending_callbacks(), 1);
        target.dispatch_event(&Event::new("test")).unwrap();
        assert_eq!(signal.pending_callbacks(), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_redispatch_of_inflight_event_is_ignored() {
        let target = EventTarget::new();
        let (hits, callback) = counter();

        let handle = target.clone();
        let redispatch = EventCallback::new(move |event| {
            assert!(event.is_dispatching());
            assert!(handle.dispatch_event(event)?);
            event.prevent_default();
            Ok(())
        });

        target.add_event_listener(
            "test",
            &redispatch,
            ListenerOptions::once().with_passive(true),
        );
        target.add_event_listener("test", &callback, ListenerOptions::new());

        let event = Event::custom("test", EventInit::<()>::new().with_cancelable(true));
        assert!(target.dispatch_event(&event).unwrap());
        assert!(!event.default_prevented());
        assert!(!event.is_dispatching());
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        // 디스패치가 끝난 이벤트는 다시 디스패치 가능
        assert!(target.dispatch_event(&event).unwrap());
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_once_listener_can_rearm_itself() {
        let target = EventTarget::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let slot: Arc<Mutex<Option<EventCallback>>> = Arc::new(Mutex::new(None));

        let handle = target.clone();
        let counter = hits.clone();
        let own = slot.clone();
        let rearm = EventCallback::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            let me = own.lock().clone();
            if let Some(me) = me {
                handle.add_event_listener("test", &me, ListenerOptions::once());
            }
            Ok(())
        });
        *slot.lock() = Some(rearm.clone());

        target.add_event_listener("test", &rearm, ListenerOptions::once());
        target.dispatch_event(&Event::new("test")).unwrap();
        target.dispatch_event(&Event::new("test")).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_dispatch_error_converts_with_question_mark() {
        fn fire(target: &EventTarget) -> crate::Result<bool> {
            Ok(target.dispatch_event(&Event::new("test"))?)
        }

        let target = EventTarget::new();
        let failing = EventCallback::new(|_| Err(anyhow::anyhow!("boom")));
        target.add_event_listener("test", &failing, ListenerOptions::new());

        match fire(&target) {
            Err(crate::Error::Dispatch(err)) => {
                assert_eq!(err.event_type, "test");
                let failures = err.into_failures();
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].message(), "boom");
            }
            other => panic!("expected dispatch error, got {other:?}"),
        }
    }
}
