//! Type-indexed publish/subscribe event bus.
//!
//! The [`EventBus`] decouples producers (the collision detector, combat,
//! scripting) from the subsystems that react to what they report. Any
//! `'static + Send` type can be an event; handlers are registered per type and
//! only ever see values of that type.
//!
//! # Delivery
//!
//! - [`EventBus::publish`] moves the event into a FIFO queue. Nothing runs
//!   until [`EventBus::dispatch`] is called, usually once per tick by the
//!   [`dispatch_events`](crate::systems::events::dispatch_events) system.
//! - [`EventBus::publish_immediate`] runs every current handler before it
//!   returns. Use it when the caller must observe the effects right away.
//!
//! # Re-entrancy
//!
//! Handlers never run while the internal lock is held. Each delivery copies
//! the handler list first, releases the lock and then calls the handlers, so
//! a handler may freely subscribe, unsubscribe, publish or dispatch. Events
//! published while a [`dispatch`](EventBus::dispatch) is running are delivered
//! by the next call. An unsubscribed handler is never invoked again, even if
//! it was part of a copy taken just before.
//!
//! # Example
//!
//! ```
//! use bevy_ecs::world::World;
//! use gridcollide::events::damage::DamageEvent;
//! use gridcollide::resources::eventbus::EventBus;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU32, Ordering};
//!
//! let mut world = World::new();
//! let target = world.spawn_empty().id();
//! let bus = EventBus::new();
//! let total = Arc::new(AtomicU32::new(0));
//! let seen = total.clone();
//! bus.subscribe(move |e: &DamageEvent| {
//!     seen.fetch_add(e.amount as u32, Ordering::SeqCst);
//! });
//!
//! bus.publish_immediate(DamageEvent::new(target).with_amount(10.0));
//! assert_eq!(total.load(Ordering::SeqCst), 10);
//! ```

use std::any::{Any, TypeId, type_name};
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bevy_ecs::prelude::Resource;
use log::{debug, error};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Identity of a registered handler, returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

type ErasedHandler = Arc<dyn Fn(&dyn Any) + Send + Sync>;

#[derive(Clone)]
struct Listener {
    id: HandlerId,
    active: Arc<AtomicBool>,
    handler: ErasedHandler,
}

impl Listener {
    fn invoke(&self, event: &dyn Any) -> bool {
        if !self.active.load(Ordering::Acquire) {
            return false;
        }
        (self.handler)(event);
        true
    }

    fn deactivate(&self) {
        self.active.store(false, Ordering::Release);
    }
}

struct QueuedEvent {
    type_key: TypeId,
    type_name: &'static str,
    payload: Box<dyn Any + Send>,
}

#[derive(Default)]
struct BusState {
    listeners: FxHashMap<TypeId, Vec<Listener>>,
    queue: VecDeque<QueuedEvent>,
    next_id: u64,
}

/// Shared handle to an event bus.
///
/// Cloning is cheap and every clone talks to the same bus, which is how
/// handlers get hold of it to publish follow-up events.
#[derive(Resource, Clone, Default)]
pub struct EventBus {
    state: Arc<Mutex<BusState>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("EventBus")
            .field("event_types", &state.listeners.len())
            .field("queued", &state.queue.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    // Handlers never run under the lock, so a poisoned lock still holds consistent state.
    fn lock(&self) -> MutexGuard<'_, BusState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn snapshot(&self, type_key: TypeId) -> SmallVec<[Listener; 4]> {
        self.lock()
            .listeners
            .get(&type_key)
            .map(|list| list.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn deliver(listeners: &[Listener], event: &dyn Any) -> usize {
        listeners.iter().filter(|l| l.invoke(event)).count()
    }

    /// Register `handler` for events of type `T`.
    ///
    /// Handlers of the same type run in registration order.
    pub fn subscribe<T, F>(&self, handler: F) -> HandlerId
    where
        T: Send + 'static,
        F: Fn(&T) + Send + Sync + 'static,
    {
        let wrapper: ErasedHandler = Arc::new(move |event: &dyn Any| {
            let Some(event) = event.downcast_ref::<T>() else {
                error!(
                    "Handler for {} invoked with a different event type",
                    type_name::<T>()
                );
                debug_assert!(false, "event type mismatch for {}", type_name::<T>());
                return;
            };
            handler(event);
        });

        let mut state = self.lock();
        let id = HandlerId(state.next_id);
        state.next_id += 1;
        state
            .listeners
            .entry(TypeId::of::<T>())
            .or_default()
            .push(Listener {
                id,
                active: Arc::new(AtomicBool::new(true)),
                handler: wrapper,
            });
        drop(state);

        debug!("Subscribed {:?} to {}", id, type_name::<T>());
        id
    }

    /// Remove the registration `id` for `type_key`.
    ///
    /// Returns `false` if nothing matched.
    pub fn unsubscribe(&self, type_key: TypeId, id: HandlerId) -> bool {
        let removed = {
            let mut state = self.lock();
            let Some(list) = state.listeners.get_mut(&type_key) else {
                return false;
            };
            let Some(index) = list.iter().position(|l| l.id == id) else {
                return false;
            };
            let listener = list.remove(index);
            if list.is_empty() {
                state.listeners.remove(&type_key);
            }
            listener
        };
        removed.deactivate();
        debug!("Unsubscribed {:?}", id);
        // `removed` (and whatever the handler captured) drops here, outside the lock.
        true
    }

    /// Typed form of [`unsubscribe`](Self::unsubscribe).
    pub fn unsubscribe_from<T: 'static>(&self, id: HandlerId) -> bool {
        self.unsubscribe(TypeId::of::<T>(), id)
    }

    /// Queue `event` for the next [`dispatch`](Self::dispatch).
    pub fn publish<T: Send + 'static>(&self, event: T) {
        self.lock().queue.push_back(QueuedEvent {
            type_key: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            payload: Box::new(event),
        });
    }

    /// Deliver `event` to every current handler of `T` before returning.
    ///
    /// Returns how many handlers ran.
    pub fn publish_immediate<T: Send + 'static>(&self, event: T) -> usize {
        let listeners = self.snapshot(TypeId::of::<T>());
        Self::deliver(&listeners, &event)
    }

    /// Deliver every queued event in publish order.
    ///
    /// The queue is swapped out in one step, so events published by handlers
    /// during this call wait for the next one. Each event looks up its
    /// handlers when its turn comes, not when it was queued.
    ///
    /// Returns how many events were processed.
    pub fn dispatch(&self) -> usize {
        let batch = std::mem::take(&mut self.lock().queue);
        let count = batch.len();
        for queued in batch {
            let listeners = self.snapshot(queued.type_key);
            let invoked = Self::deliver(&listeners, queued.payload.as_ref());
            if invoked == 0 {
                debug!("No listeners for queued {}", queued.type_name);
            }
        }
        count
    }

    /// Drop every registration and every queued event.
    pub fn clear(&self) {
        let (listeners, queue) = {
            let mut state = self.lock();
            (
                std::mem::take(&mut state.listeners),
                std::mem::take(&mut state.queue),
            )
        };
        for listener in listeners.values().flatten() {
            listener.deactivate();
        }
        debug!(
            "Cleared event bus: {} event types, {} queued events dropped",
            listeners.len(),
            queue.len()
        );
    }

    /// Events waiting for the next [`dispatch`](Self::dispatch).
    pub fn queued_count(&self) -> usize {
        self.lock().queue.len()
    }

    /// Handlers currently registered for `type_key`.
    pub fn listener_count(&self, type_key: TypeId) -> usize {
        self.lock()
            .listeners
            .get(&type_key)
            .map_or(0, Vec::len)
    }

    pub fn listener_count_of<T: 'static>(&self) -> usize {
        self.listener_count(TypeId::of::<T>())
    }
}
