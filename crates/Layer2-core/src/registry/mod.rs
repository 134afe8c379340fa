//! # Listener Registry
//!
//! 네이티브 타겟은 등록된 리스너를 조회하는 API가 없으므로,
//! 이미터가 등록 상태를 그대로 따라가는 그림자 레지스트리를 유지합니다.
//!
//! - add는 add를, remove는 remove를 따라갑니다.
//! - once 리스너는 호출이 시작되면 retiring으로 표시되어 중복 검사에서
//!   빠지고, 호출이 끝난 직후 제거됩니다.
//! - abort signal로 해제되면 함께 제거됩니다.
//!
//! 이미터 인스턴스 하나가 독점 소유하며 외부로 참조가 노출되지 않습니다.

mod entry;

pub(crate) use entry::{ListenerRecord, RecordId};

use std::collections::HashMap;
use typed_events_foundation::CallbackId;

/// 이벤트 이름 → 리스너 레코드
#[derive(Debug, Default)]
pub(crate) struct ListenerRegistry {
    records: HashMap<String, Vec<ListenerRecord>>,
    next_id: u64,
}

impl ListenerRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// 새 레코드 ID 발급
    pub(crate) fn next_id(&mut self) -> RecordId {
        self.next_id += 1;
        RecordId::new(self.next_id)
    }

    /// 네이티브 타겟에 살아 있는 (name, callback, capture) 레코드가 있는지
    pub(crate) fn contains(&self, name: &str, callback: CallbackId, capture: bool) -> bool {
        self.records.get(name).is_some_and(|list| {
            list.iter()
                .any(|r| !r.retiring && r.matches(callback, capture))
        })
    }

    /// 레코드 추가
    ///
    /// 같은 (name, callback, capture) 레코드가 이미 있으면 추가하지 않고 `false`.
    pub(crate) fn insert(&mut self, record: ListenerRecord) -> bool {
        if self.contains(&record.event_name, record.callback, record.capture) {
            return false;
        }

        self.records
            .entry(record.event_name.clone())
            .or_default()
            .push(record);
        true
    }

    /// once 레코드를 retiring으로 표시 (네이티브 해제 시점)
    pub(crate) fn retire(&mut self, name: &str, id: RecordId) -> bool {
        let Some(record) = self
            .records
            .get_mut(name)
            .and_then(|list| list.iter_mut().find(|r| r.id == id))
        else {
            return false;
        };

        record.retiring = true;
        record.detach_abort();
        true
    }

    /// 식별 키로 레코드 제거
    ///
    /// 살아 있는 레코드를 retiring 레코드보다 먼저 제거합니다.
    pub(crate) fn remove(
        &mut self,
        name: &str,
        callback: CallbackId,
        capture: bool,
    ) -> Option<ListenerRecord> {
        self.remove_where(name, |r| !r.retiring && r.matches(callback, capture))
            .or_else(|| self.remove_where(name, |r| r.matches(callback, capture)))
    }

    /// 레코드 ID로 제거 (once 자동 해제, abort 해제용)
    pub(crate) fn remove_by_id(&mut self, name: &str, id: RecordId) -> Option<ListenerRecord> {
        self.remove_where(name, |r| r.id == id)
    }

    fn remove_where(
        &mut self,
        name: &str,
        pred: impl Fn(&ListenerRecord) -> bool,
    ) -> Option<ListenerRecord> {
        let list = self.records.get_mut(name)?;
        let pos = list.iter().position(pred)?;
        let mut record = list.remove(pos);
        record.detach_abort();

        if list.is_empty() {
            self.records.remove(name);
        }
        Some(record)
    }

    /// 이름별 리스너 수
    pub(crate) fn count(&self, name: &str) -> usize {
        self.records.get(name).map_or(0, Vec::len)
    }

    /// 리스너가 하나 이상 있는 이벤트 이름들 (정렬됨)
    pub(crate) fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.records.keys().cloned().collect();
        names.sort();
        names
    }

    /// 전체 리스너 수
    pub(crate) fn total(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typed_events_foundation::{AbortController, EventCallback};

    fn record(registry: &mut ListenerRegistry, name: &str, callback: &EventCallback, capture: bool) -> ListenerRecord {
        ListenerRecord {
            id: registry.next_id(),
            event_name: name.to_string(),
            callback: callback.id(),
            once: false,
            capture,
            native: callback.clone(),
            retiring: false,
            abort: None,
        }
    }

    #[test]
    fn test_empty_registry() {
        let registry = ListenerRegistry::new();
        assert_eq!(registry.count("test"), 0);
        assert_eq!(registry.total(), 0);
        assert!(registry.names().is_empty());
    }

    #[test]
    fn test_insert_dedupes_identity() {
        let mut registry = ListenerRegistry::new();
        let callback = EventCallback::new(|_| Ok(()));

        let first = record(&mut registry, "test", &callback, false);
        let duplicate = record(&mut registry, "test", &callback, false);
        let captured = record(&mut registry, "test", &callback, true);

        assert!(registry.insert(first));
        assert!(!registry.insert(duplicate));
        assert!(registry.insert(captured));
        assert_eq!(registry.count("test"), 2);
    }

    #[test]
    fn test_remove_by_identity_and_id() {
        let mut registry = ListenerRegistry::new();
        let a = EventCallback::new(|_| Ok(()));
        let b = EventCallback::new(|_| Ok(()));

        let rec_a = record(&mut registry, "test", &a, false);
        let rec_b = record(&mut registry, "other", &b, false);
        let id_b = rec_b.id;
        registry.insert(rec_a);
        registry.insert(rec_b);
        assert_eq!(registry.names(), vec!["other".to_string(), "test".to_string()]);

        assert!(registry.remove("test", a.id(), true).is_none());
        assert!(registry.remove("test", a.id(), false).is_some());
        assert!(registry.remove("test", a.id(), false).is_none());

        assert!(registry.remove_by_id("other", id_b).is_some());
        assert_eq!(registry.total(), 0);
        assert!(registry.names().is_empty());
    }

    #[test]
    fn test_retiring_record_skips_dedupe_but_counts() {
        let mut registry = ListenerRegistry::new();
        let callback = EventCallback::new(|_| Ok(()));

        let old = record(&mut registry, "test", &callback, false);
        let old_id = old.id;
        registry.insert(old);
        assert!(registry.retire("test", old_id));
        assert!(!registry.contains("test", callback.id(), false));
        assert_eq!(registry.count("test"), 1);

        // 같은 키로 다시 등록 가능
        let rearmed = record(&mut registry, "test", &callback, false);
        let rearmed_id = rearmed.id;
        assert!(registry.insert(rearmed));
        assert_eq!(registry.count("test"), 2);

        // 식별 키 제거는 살아 있는 레코드부터
        let removed = registry.remove("test", callback.id(), false).unwrap();
        assert_eq!(removed.id, rearmed_id);
        assert!(registry.remove_by_id("test", old_id).is_some());
        assert_eq!(registry.total(), 0);
    }

    #[test]
    fn test_removal_detaches_abort_hook() {
        let mut registry = ListenerRegistry::new();
        let callback = EventCallback::new(|_| Ok(()));
        let signal = AbortController::new().signal();

        let mut rec = record(&mut registry, "test", &callback, false);
        rec.abort = signal.on_abort(|| {});
        registry.insert(rec);
        assert_eq!(signal.pending_callbacks(), 1);

        registry.remove("test", callback.id(), false);
        assert_eq!(signal.pending_callbacks(), 0);
    }
}
