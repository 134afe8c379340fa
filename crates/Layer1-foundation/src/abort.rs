//! Abort - `signal` 옵션으로 리스너를 일괄 해제하기 위한 신호

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

type AbortCallback = Box<dyn FnOnce() + Send>;

#[derive(Default)]
struct SignalState {
    aborted: bool,
    next_key: u64,
    callbacks: Vec<(u64, AbortCallback)>,
}

/// `on_abort`로 등록한 콜백 핸들
///
/// 리스너가 먼저 해제되면 `detach`로 콜백을 신호에서 떼어냅니다.
#[must_use = "dropping the handle keeps the callback attached to the signal"]
pub struct AbortRegistration {
    signal: AbortSignal,
    key: u64,
}

impl AbortRegistration {
    /// 콜백 제거 (이미 실행되었거나 제거되었으면 `false`)
    pub fn detach(self) -> bool {
        let mut state = self.signal.state.lock();
        let before = state.callbacks.len();
        state.callbacks.retain(|(key, _)| *key != self.key);
        state.callbacks.len() != before
    }
}

impl fmt::Debug for AbortRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbortRegistration")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// 취소 신호
///
/// 여러 리스너 등록이 같은 신호를 공유할 수 있으며,
/// `AbortController::abort()` 호출 시 함께 해제됩니다.
#[derive(Clone, Default)]
pub struct AbortSignal {
    state: Arc<Mutex<SignalState>>,
}

impl AbortSignal {
    /// 이미 취소된 신호 생성
    pub fn aborted_signal() -> Self {
        let signal = Self::default();
        signal.state.lock().aborted = true;
        signal
    }

    pub fn aborted(&self) -> bool {
        self.state.lock().aborted
    }

    /// 취소 시 실행할 콜백 등록
    ///
    /// 이미 취소된 신호라면 등록하지 않고 `None`을 반환합니다.
    pub fn on_abort(
        &self,
        callback: impl FnOnce() + Send + 'static,
    ) -> Option<AbortRegistration> {
        let mut state = self.state.lock();
        if state.aborted {
            return None;
        }

        state.next_key += 1;
        let key = state.next_key;
        state.callbacks.push((key, Box::new(callback)));

        Some(AbortRegistration {
            signal: self.clone(),
            key,
        })
    }

    /// 아직 실행되지 않은 콜백 수
    pub fn pending_callbacks(&self) -> usize {
        self.state.lock().callbacks.len()
    }

    fn abort(&self) {
        let callbacks = {
            let mut state = self.state.lock();
            if state.aborted {
                return;
            }
            state.aborted = true;
            std::mem::take(&mut state.callbacks)
        };

        debug!(callbacks = callbacks.len(), "Abort signal fired");

        for (_, callback) in callbacks {
            callback();
        }
    }
}

impl fmt::Debug for AbortSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("AbortSignal")
            .field("aborted", &state.aborted)
            .field("callbacks", &state.callbacks.len())
            .finish()
    }
}

/// 취소 신호 소유자
#[derive(Debug, Clone, Default)]
pub struct AbortController {
    signal: AbortSignal,
}

impl AbortController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signal(&self) -> AbortSignal {
        self.signal.clone()
    }

    /// 신호 취소 (두 번째 호출부터는 무시)
    pub fn abort(&self) {
        self.signal.abort();
    }
}
