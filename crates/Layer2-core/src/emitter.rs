//! TypedEventEmitter - 네이티브 EventTarget 위의 타입 있는 데코레이터
//!
//! 등록은 네이티브 타겟과 그림자 레지스트리 양쪽에 반영되고,
//! `listener_count`는 레지스트리에서 읽습니다.

use crate::listener::Listener;
use crate::map::{EventMap, EventType};
use crate::registry::{ListenerRecord, ListenerRegistry, RecordId};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, Weak};
use tracing::{debug, trace, warn};
use typed_events_foundation::{
    global_reporter, CallbackId, CustomEvent, DispatchError, EmitterConfig, ErrorReporter, Event,
    EventCallback, EventInit, EventTarget, EventTargetLike, ListenerOptions, ListenerResult,
};

type SharedRegistry = Arc<Mutex<ListenerRegistry>>;

/// once 리스너 호출 동안의 레코드 상태
///
/// 호출 시작 시 레코드를 retiring으로 표시하고(네이티브 타겟은 이미 해제함),
/// 리스너가 반환(또는 panic)한 직후 레코드를 제거합니다.
struct OnceGuard<'a> {
    registry: &'a Weak<Mutex<ListenerRegistry>>,
    name: &'a str,
    id: RecordId,
}

impl<'a> OnceGuard<'a> {
    fn arm(registry: &'a Weak<Mutex<ListenerRegistry>>, name: &'a str, id: RecordId) -> Self {
        if let Some(shared) = registry.upgrade() {
            shared.lock().retire(name, id);
        }
        Self { registry, name, id }
    }
}

impl Drop for OnceGuard<'_> {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            if registry.lock().remove_by_id(self.name, self.id).is_some() {
                trace!(event_type = self.name, record = %self.id, "Once listener retired");
            }
        }
    }
}

/// 타입 있는 이벤트 이미터
///
/// `M`은 `event_map!`으로 선언한 이벤트 매핑입니다. 타입 있는 메서드는
/// `M`에 선언된 키만 받으며, `EventTargetLike` 구현을 통해서는 임의의
/// 이름으로도 사용할 수 있습니다.
///
/// ## 사용법
///
/// ```ignore
/// let emitter = TypedEventEmitter::<PeerEvents>::new();
///
/// let listener = Listener::new(|evt: &CustomEvent<'_, String>| {
///     println!("peer: {:?}", evt.detail());
///     Ok(())
/// });
/// emitter.add_event_listener(PeerConnect, &listener, ListenerOptions::once());
/// assert_eq!(emitter.listener_count("peer:connect"), 1);
///
/// emitter.safe_dispatch_event(PeerConnect, EventInit::detail("peer-1".to_string()));
/// assert_eq!(emitter.listener_count("peer:connect"), 0);
/// ```
pub struct TypedEventEmitter<M: EventMap> {
    /// 네이티브 타겟 (외부로 노출하지 않음)
    target: EventTarget,

    /// 그림자 레지스트리
    registry: SharedRegistry,

    /// safe_dispatch_event 에러 보고 채널
    reporter: Arc<dyn ErrorReporter>,

    /// 설정
    config: EmitterConfig,

    /// max_listeners 경고를 이미 낸 이벤트 이름
    warned: Mutex<HashSet<String>>,

    _map: PhantomData<fn() -> M>,
}

impl<M: EventMap> TypedEventEmitter<M> {
    /// 기본 설정, 전역 리포터로 생성
    pub fn new() -> Self {
        Self::with_config(EmitterConfig::default())
    }

    /// 커스텀 설정으로 생성
    pub fn with_config(config: EmitterConfig) -> Self {
        Self {
            target: EventTarget::new(),
            registry: Arc::new(Mutex::new(ListenerRegistry::new())),
            reporter: global_reporter(),
            config,
            warned: Mutex::new(HashSet::new()),
            _map: PhantomData,
        }
    }

    /// 에러 리포터 교체
    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    // ========================================================================
    // Typed API
    // ========================================================================

    /// 리스너 등록
    ///
    /// 같은 (이름, 리스너, capture) 조합이 이미 등록되어 있으면 아무 일도 없습니다.
    pub fn add_event_listener<K: EventType<M>>(
        &self,
        _key: K,
        listener: &Listener<K::Detail>,
        options: impl Into<ListenerOptions>,
    ) {
        let handle = listener.clone();
        self.register(
            K::NAME,
            listener.id(),
            move |event| handle.call(event),
            options.into(),
        );
    }

    /// 리스너 해제 (options 중 capture만 사용, 없으면 no-op)
    pub fn remove_event_listener<K: EventType<M>>(
        &self,
        _key: K,
        listener: &Listener<K::Detail>,
        options: impl Into<ListenerOptions>,
    ) {
        self.unregister(K::NAME, listener.id(), options.into());
    }

    /// 클로저로 리스너를 만들어 등록하고, 해제용 핸들을 반환
    pub fn on<K, F>(&self, key: K, callback: F) -> Listener<K::Detail>
    where
        K: EventType<M>,
        F: Fn(&CustomEvent<'_, K::Detail>) -> ListenerResult + Send + Sync + 'static,
    {
        let listener = Listener::new(callback);
        self.add_event_listener(key, &listener, ListenerOptions::new());
        listener
    }

    /// `on`과 같지만 첫 호출 후 자동 해제
    pub fn once<K, F>(&self, key: K, callback: F) -> Listener<K::Detail>
    where
        K: EventType<M>,
        F: Fn(&CustomEvent<'_, K::Detail>) -> ListenerResult + Send + Sync + 'static,
    {
        let listener = Listener::new(callback);
        self.add_event_listener(key, &listener, ListenerOptions::once());
        listener
    }

    /// 미리 만든 이벤트 디스패치
    ///
    /// 리스너 실패는 `Err(DispatchError)`로 그대로 전파됩니다.
    /// 취소 가능한 이벤트가 취소되면 `Ok(false)`.
    pub fn dispatch_event(&self, event: &Event) -> Result<bool, DispatchError> {
        self.dispatch(event)
    }

    /// 실패하지 않는 디스패치
    ///
    /// 이벤트를 만들어 디스패치하고, 리스너 실패는 호출자 대신
    /// 리포터로 보냅니다. 취소 여부는 확인할 수 없습니다.
    pub fn safe_dispatch_event<K: EventType<M>>(&self, _key: K, init: EventInit<K::Detail>) {
        let event = Event::custom(K::NAME, init);

        if let Err(err) = self.dispatch(&event) {
            debug!(
                event_type = K::NAME,
                failures = err.failures.len(),
                reporter = self.reporter.name(),
                "Reporting listener failures from safe dispatch"
            );
            for failure in &err.failures {
                self.reporter.report(failure);
            }
        }
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// 이름별 리스너 수 (등록된 적 없으면 0)
    pub fn listener_count(&self, name: &str) -> usize {
        self.registry.lock().count(name)
    }

    /// 리스너가 하나 이상 있는 이벤트 이름들
    pub fn event_names(&self) -> Vec<String> {
        self.registry.lock().names()
    }

    /// 전체 리스너 수
    pub fn total_listener_count(&self) -> usize {
        self.registry.lock().total()
    }

    // ========================================================================
    // Internal
    // ========================================================================

    fn register(
        &self,
        name: &str,
        callback: CallbackId,
        invoke: impl Fn(&Event) -> ListenerResult + Send + Sync + 'static,
        options: ListenerOptions,
    ) {
        // 네이티브 타겟도 등록하지 않음
        if options.is_aborted() {
            trace!(event_type = name, "Ignoring listener with aborted signal");
            return;
        }

        let (id, native, count) = {
            let mut registry = self.registry.lock();
            if registry.contains(name, callback, options.capture) {
                trace!(event_type = name, callback = %callback, "Duplicate listener ignored");
                return;
            }

            let id = registry.next_id();
            let native = if options.once {
                let weak = Arc::downgrade(&self.registry);
                let owned_name = name.to_string();
                EventCallback::new(move |event| {
                    let _guard = OnceGuard::arm(&weak, &owned_name, id);
                    invoke(event)
                })
            } else {
                EventCallback::new(invoke)
            };

            let abort = match &options.signal {
                Some(signal) => {
                    let weak = Arc::downgrade(&self.registry);
                    let owned_name = name.to_string();
                    let hook = signal.on_abort(move || {
                        if let Some(registry) = weak.upgrade() {
                            registry.lock().remove_by_id(&owned_name, id);
                        }
                    });

                    // 확인과 등록 사이에 취소됨
                    if hook.is_none() {
                        trace!(event_type = name, "Signal aborted before registration");
                        return;
                    }
                    hook
                }
                None => None,
            };

            registry.insert(ListenerRecord {
                id,
                event_name: name.to_string(),
                callback,
                once: options.once,
                capture: options.capture,
                native: native.clone(),
                retiring: false,
                abort,
            });
            (id, native, registry.count(name))
        };

        debug!(
            event_type = name,
            callback = %callback,
            record = %id,
            once = options.once,
            capture = options.capture,
            "Registering event listener"
        );

        self.target.add_event_listener(name, &native, options);

        self.warn_if_exceeded(name, count);
    }

    fn unregister(&self, name: &str, callback: CallbackId, options: ListenerOptions) {
        let record = self.registry.lock().remove(name, callback, options.capture);

        if let Some(record) = record {
            self.target
                .remove_event_listener(name, &record.native, options);
            debug!(
                event_type = name,
                callback = %callback,
                record = %record.id,
                once = record.once,
                "Unregistered event listener"
            );
        }
    }

    fn dispatch(&self, event: &Event) -> Result<bool, DispatchError> {
        if self.config.debug_mode {
            trace!(
                event_type = event.event_type(),
                listeners = self.listener_count(event.event_type()),
                cancelable = event.cancelable(),
                "Dispatching event"
            );
        }

        self.target.dispatch_event(event)
    }

    fn warn_if_exceeded(&self, name: &str, count: usize) {
        if !self.config.exceeds_max_listeners(count) {
            return;
        }

        if self.warned.lock().insert(name.to_string()) {
            warn!(
                event_type = name,
                count,
                max_listeners = self.config.max_listeners,
                "Possible listener leak: listener count exceeds max_listeners"
            );
        }
    }
}

impl<M: EventMap> Default for TypedEventEmitter<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// 타입 없는 네이티브 capability (임의의 이벤트 이름 허용)
///
/// 이 경로로 등록한 리스너도 레지스트리에 반영됩니다.
impl<M: EventMap> EventTargetLike for TypedEventEmitter<M> {
    fn add_event_listener(&self, event_type: &str, callback: &EventCallback, options: ListenerOptions) {
        let handle = callback.clone();
        self.register(event_type, callback.id(), move |event| handle.call(event), options);
    }

    fn remove_event_listener(
        &self,
        event_type: &str,
        callback: &EventCallback,
        options: ListenerOptions,
    ) {
        self.unregister(event_type, callback.id(), options);
    }

    fn dispatch_event(&self, event: &Event) -> Result<bool, DispatchError> {
        self.dispatch(event)
    }
}

impl<M: EventMap> fmt::Debug for TypedEventEmitter<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedEventEmitter")
            .field("map", &std::any::type_name::<M>())
            .field("listeners", &self.total_listener_count())
            .field("reporter", &self.reporter.name())
            .field("config", &self.config)
            .finish()
    }
}
