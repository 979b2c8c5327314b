// ============================================================================
// Listener Registry
// Ordered registration table shared by both emitters
// ============================================================================

use super::event::{Event, ListenerId};
use smallvec::SmallVec;
use std::collections::HashMap;
use tokio::sync::oneshot;

/// Deliveries for one dispatch pass; most event types have a handful of listeners.
pub(crate) type Deliveries<C> = SmallVec<[Delivery<C>; 8]>;

enum Registration<C> {
    Persistent { id: ListenerId, callback: C },
    OneShot { id: ListenerId, sender: oneshot::Sender<Event> },
}

impl<C> Registration<C> {
    fn id(&self) -> ListenerId {
        match self {
            Registration::Persistent { id, .. } | Registration::OneShot { id, .. } => *id,
        }
    }

    /// A one-shot whose `EventWaiter` was dropped.
    fn is_abandoned(&self) -> bool {
        matches!(self, Registration::OneShot { sender, .. } if sender.is_closed())
    }
}

/// One unit of work of a dispatch pass, in registration order.
pub(crate) enum Delivery<C> {
    Callback(ListenerId, C),
    Waiter(oneshot::Sender<Event>),
}

/// Event type -> registrations, plus a reverse index for removal.
///
/// Insertion order within a bucket is dispatch order.
pub(crate) struct Registry<C> {
    buckets: HashMap<String, Vec<Registration<C>>>,
    owners: HashMap<ListenerId, String>,
}

impl<C: Clone> Registry<C> {
    pub(crate) fn new() -> Self {
        Self {
            buckets: HashMap::new(),
            owners: HashMap::new(),
        }
    }

    fn insert(&mut self, event_type: &str, registration: Registration<C>) -> ListenerId {
        let id = registration.id();
        self.owners.insert(id, event_type.to_owned());
        self.buckets
            .entry(event_type.to_owned())
            .or_default()
            .push(registration);
        id
    }

    pub(crate) fn add_persistent(&mut self, event_type: &str, callback: C) -> ListenerId {
        self.insert(
            event_type,
            Registration::Persistent {
                id: ListenerId::new(),
                callback,
            },
        )
    }

    pub(crate) fn add_one_shot(&mut self, event_type: &str) -> oneshot::Receiver<Event> {
        self.prune_abandoned(event_type);
        let (sender, receiver) = oneshot::channel();
        self.insert(
            event_type,
            Registration::OneShot {
                id: ListenerId::new(),
                sender,
            },
        );
        receiver
    }

    /// Drop one-shots in `event_type` whose waiter is gone.
    fn prune_abandoned(&mut self, event_type: &str) {
        let Some(bucket) = self.buckets.get_mut(event_type) else {
            return;
        };
        let owners = &mut self.owners;
        bucket.retain(|registration| {
            if registration.is_abandoned() {
                owners.remove(&registration.id());
                false
            } else {
                true
            }
        });
        if bucket.is_empty() {
            self.buckets.remove(event_type);
        }
    }

    /// Remove a registration. Unknown ids are ignored.
    pub(crate) fn remove(&mut self, id: &ListenerId) -> bool {
        let Some(event_type) = self.owners.remove(id) else {
            return false;
        };
        if let Some(bucket) = self.buckets.get_mut(&event_type) {
            bucket.retain(|r| r.id() != *id);
            if bucket.is_empty() {
                self.buckets.remove(&event_type);
            }
        }
        true
    }

    #[inline]
    pub(crate) fn contains(&self, id: &ListenerId) -> bool {
        self.owners.contains_key(id)
    }

    /// Snapshot the bucket for `event_type` for one dispatch pass.
    ///
    /// Persistent callbacks are cloned and stay registered. One-shot waiters
    /// leave the table here, so a waiter can never be handed two events.
    /// Waiters whose receiver is already gone are pruned without delivery.
    pub(crate) fn take_deliveries(&mut self, event_type: &str) -> Deliveries<C> {
        let Some(bucket) = self.buckets.get_mut(event_type) else {
            return SmallVec::new();
        };

        let mut deliveries = SmallVec::with_capacity(bucket.len());
        let mut kept = Vec::with_capacity(bucket.len());
        for registration in bucket.drain(..) {
            match registration {
                Registration::Persistent { id, callback } => {
                    deliveries.push(Delivery::Callback(id, callback.clone()));
                    kept.push(Registration::Persistent { id, callback });
                },
                Registration::OneShot { id, sender } => {
                    self.owners.remove(&id);
                    if !sender.is_closed() {
                        deliveries.push(Delivery::Waiter(sender));
                    }
                },
            }
        }

        if kept.is_empty() {
            self.buckets.remove(event_type);
        } else {
            *bucket = kept;
        }
        deliveries
    }

    /// Live registrations; abandoned waiters are not counted.
    pub(crate) fn listener_count(&self, event_type: &str) -> usize {
        self.buckets.get(event_type).map_or(0, |bucket| {
            bucket.iter().filter(|r| !r.is_abandoned()).count()
        })
    }

    pub(crate) fn event_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self
            .buckets
            .iter()
            .filter(|(_, bucket)| bucket.iter().any(|r| !r.is_abandoned()))
            .map(|(event_type, _)| event_type.clone())
            .collect();
        types.sort();
        types
    }

    /// Drop every registration for `event_type`. Pending waiters resolve to an error.
    pub(crate) fn clear(&mut self, event_type: &str) -> usize {
        let Some(bucket) = self.buckets.remove(event_type) else {
            return 0;
        };
        for registration in &bucket {
            self.owners.remove(&registration.id());
        }
        bucket.len()
    }

    pub(crate) fn clear_all(&mut self) {
        self.buckets.clear();
        self.owners.clear();
    }
}
