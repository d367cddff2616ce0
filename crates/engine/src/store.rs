//! Seams towards the external record store.
//!
//! The settlement engine is pull-based: callers fetch a fresh snapshot from an
//! [`ExpenseSource`] and recompute whenever a [`ChangeFeed`] reports a change.
//! [`MemoryStore`] implements both for tests and local runs.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex, PoisonError, RwLock},
};

use uuid::Uuid;

use crate::{EngineError, ExpenseRecord, MoneyCents, ParticipantId, ResultEngine};

/// Read access to an event's expenses.
pub trait ExpenseSource {
    fn expenses(&self, event_id: Uuid) -> ResultEngine<Vec<ExpenseRecord>>;
}

/// Change notification emitted by a store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Change {
    ExpenseAdded { event_id: Uuid, expense_id: Uuid },
    ExpenseDeleted { event_id: Uuid, expense_id: Uuid },
}

impl Change {
    pub fn event_id(&self) -> Uuid {
        match self {
            Change::ExpenseAdded { event_id, .. } | Change::ExpenseDeleted { event_id, .. } => {
                *event_id
            }
        }
    }
}

pub type Callback = Box<dyn Fn(&Change) + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Observer registration with an explicit subscribe/unsubscribe lifecycle.
pub trait ChangeFeed {
    /// Registers `callback` for changes to `event_id`.
    fn subscribe(&self, event_id: Uuid, callback: Callback) -> SubscriptionId;

    /// Removes a subscription. Returns `false` if it was already gone.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

#[derive(Clone, Debug)]
struct StoredExpense {
    id: Uuid,
    event_id: Uuid,
    note: Option<String>,
    record: ExpenseRecord,
}

struct Subscriber {
    id: SubscriptionId,
    event_id: Uuid,
    callback: Arc<dyn Fn(&Change) + Send + Sync>,
}

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    entries: Vec<Subscriber>,
}

/// In-memory expense store with change notifications.
#[derive(Default)]
pub struct MemoryStore {
    expenses: RwLock<Vec<StoredExpense>>,
    subscribers: Mutex<Subscribers>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an expense and notifies the event's subscribers.
    pub fn add_expense(
        &self,
        event_id: Uuid,
        payer: &str,
        amount: MoneyCents,
        note: Option<&str>,
    ) -> ResultEngine<Uuid> {
        let record = ExpenseRecord::validated(payer, amount)?;
        let id = Uuid::new_v4();
        self.expenses
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(StoredExpense {
                id,
                event_id,
                note: note.map(str::trim).filter(|n| !n.is_empty()).map(String::from),
                record,
            });
        tracing::debug!(%event_id, expense_id = %id, "expense added");
        self.notify(&Change::ExpenseAdded {
            event_id,
            expense_id: id,
        });
        Ok(id)
    }

    pub fn delete_expense(&self, expense_id: Uuid) -> ResultEngine<()> {
        let removed = {
            let mut expenses = self
                .expenses
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let pos = expenses
                .iter()
                .position(|e| e.id == expense_id)
                .ok_or_else(|| EngineError::KeyNotFound(expense_id.to_string()))?;
            expenses.remove(pos)
        };
        tracing::debug!(event_id = %removed.event_id, %expense_id, "expense deleted");
        self.notify(&Change::ExpenseDeleted {
            event_id: removed.event_id,
            expense_id,
        });
        Ok(())
    }

    /// Note attached to a stored expense, if any.
    pub fn note(&self, expense_id: Uuid) -> ResultEngine<Option<String>> {
        self.expenses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|e| e.id == expense_id)
            .map(|e| e.note.clone())
            .ok_or_else(|| EngineError::KeyNotFound(expense_id.to_string()))
    }

    /// Distinct payers of an event, in first-seen order.
    pub fn payers(&self, event_id: Uuid) -> Vec<ParticipantId> {
        let expenses = self.expenses.read().unwrap_or_else(PoisonError::into_inner);
        let mut seen: HashSet<&ParticipantId> = HashSet::new();
        expenses
            .iter()
            .filter(|e| e.event_id == event_id)
            .filter(|&e| seen.insert(&e.record.payer))
            .map(|e| e.record.payer.clone())
            .collect()
    }

    // Callbacks run outside both locks so they can read the store back.
    fn notify(&self, change: &Change) {
        let callbacks: Vec<Arc<dyn Fn(&Change) + Send + Sync>> = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .iter()
            .filter(|s| s.event_id == change.event_id())
            .map(|s| Arc::clone(&s.callback))
            .collect();
        for callback in callbacks {
            callback(change);
        }
    }
}

impl ExpenseSource for MemoryStore {
    fn expenses(&self, event_id: Uuid) -> ResultEngine<Vec<ExpenseRecord>> {
        Ok(self
            .expenses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| e.event_id == event_id)
            .map(|e| e.record.clone())
            .collect())
    }
}

impl ChangeFeed for MemoryStore {
    fn subscribe(&self, event_id: Uuid, callback: Callback) -> SubscriptionId {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.next_id += 1;
        let id = SubscriptionId(subscribers.next_id);
        subscribers.entries.push(Subscriber {
            id,
            event_id,
            callback: Arc::from(callback),
        });
        tracing::debug!(%event_id, subscription = id.0, "subscribed");
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let before = subscribers.entries.len();
        subscribers.entries.retain(|s| s.id != id);
        before != subscribers.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::compute_balances;

    #[test]
    fn snapshots_are_filtered_by_event() {
        let store = MemoryStore::new();
        let party = Uuid::new_v4();
        let other = Uuid::new_v4();
        store.add_expense(party, "a", MoneyCents::new(1000), Some("Carbón")).unwrap();
        store.add_expense(other, "b", MoneyCents::new(500), None).unwrap();
        store.add_expense(party, "c", MoneyCents::new(200), None).unwrap();

        let expenses = store.expenses(party).unwrap();
        assert_eq!(expenses.len(), 2);
        assert_eq!(store.payers(party), vec!["a".into(), "c".into()]);
    }

    #[test]
    fn rejects_negative_amounts_and_unknown_ids() {
        let store = MemoryStore::new();
        let party = Uuid::new_v4();
        assert!(matches!(
            store.add_expense(party, "a", MoneyCents::new(-1), None),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(matches!(
            store.delete_expense(Uuid::new_v4()),
            Err(EngineError::KeyNotFound(_))
        ));
    }

    #[test]
    fn subscribers_recompute_from_fresh_snapshot() {
        let store = Arc::new(MemoryStore::new());
        let party = Uuid::new_v4();
        let calls = Arc::new(AtomicUsize::new(0));
        let last_participants = Arc::new(AtomicUsize::new(0));

        let id = {
            let store_ref = Arc::clone(&store);
            let calls = Arc::clone(&calls);
            let last = Arc::clone(&last_participants);
            store.subscribe(
                party,
                Box::new(move |change: &Change| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    let snapshot = store_ref.expenses(change.event_id()).unwrap();
                    last.store(compute_balances(&snapshot).len(), Ordering::SeqCst);
                }),
            )
        };

        let first = store.add_expense(party, "a", MoneyCents::new(100), None).unwrap();
        store.add_expense(party, "b", MoneyCents::new(100), None).unwrap();
        store.add_expense(Uuid::new_v4(), "z", MoneyCents::new(100), None).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(last_participants.load(Ordering::SeqCst), 2);

        store.delete_expense(first).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(last_participants.load(Ordering::SeqCst), 1);

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.add_expense(party, "c", MoneyCents::new(100), None).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn keeps_notes() {
        let store = MemoryStore::new();
        let id = store
            .add_expense(Uuid::new_v4(), "a", MoneyCents::new(100), Some("  Hielo "))
            .unwrap();
        assert_eq!(store.note(id).unwrap().as_deref(), Some("Hielo"));
    }
}
