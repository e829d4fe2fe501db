//! Event bus integration tests: payload delivery, re-entrant handlers and
//! cross-thread publishing.

use std::any::TypeId;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use bevy_ecs::prelude::*;
use glam::Vec2;

use gridcollide::events::damage::DamageEvent;
use gridcollide::events::heal::HealEvent;
use gridcollide::events::movement::MovementEvent;
use gridcollide::events::physics::PhysicsEvent;
use gridcollide::events::surface::{SurfaceBehaviorEvent, SurfaceKind};
use gridcollide::events::teleport::TeleportEvent;
use gridcollide::resources::eventbus::{EventBus, HandlerId};

const EPSILON: f32 = 1e-6;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn entity(world: &mut World) -> Entity {
    world.spawn_empty().id()
}

fn counter() -> Arc<AtomicUsize> {
    Arc::new(AtomicUsize::new(0))
}

#[derive(Debug, Clone)]
struct Tick(u32);

#[test]
fn damage_event_is_handled_immediately() {
    let mut world = World::new();
    let target = entity(&mut world);
    let bus = EventBus::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let id = bus.subscribe(move |e: &DamageEvent| sink.lock().unwrap().push(e.amount));

    bus.publish_immediate(DamageEvent::new(target).with_amount(10.0));

    // delivered before publish_immediate returned
    assert_eq!(*seen.lock().unwrap(), vec![10.0]);
    assert_eq!(bus.listener_count(TypeId::of::<DamageEvent>()), 1);
    assert!(bus.unsubscribe(TypeId::of::<DamageEvent>(), id));
    assert_eq!(bus.listener_count(TypeId::of::<DamageEvent>()), 0);
}

#[test]
fn mixed_events_queue_then_dispatch() {
    let mut world = World::new();
    let hurt = entity(&mut world);
    let mover = entity(&mut world);
    let bus = EventBus::new();

    let damage_calls = counter();
    let teleport_calls = counter();
    {
        let calls = damage_calls.clone();
        bus.subscribe(move |e: &DamageEvent| {
            assert_eq!(e.target, hurt);
            assert!(approx_eq(e.amount, 4.0));
            calls.fetch_add(1, Ordering::SeqCst);
        });
    }
    {
        let calls = teleport_calls.clone();
        bus.subscribe(move |e: &TeleportEvent| {
            assert_eq!(e.entity, mover);
            assert_eq!(e.to, Vec2::new(100.0, 200.0));
            calls.fetch_add(1, Ordering::SeqCst);
        });
    }

    bus.publish(DamageEvent::new(hurt).with_amount(4.0));
    bus.publish(TeleportEvent::new(mover, 100.0, 200.0));
    assert_eq!(bus.queued_count(), 2);
    assert_eq!(damage_calls.load(Ordering::SeqCst), 0);

    assert_eq!(bus.dispatch(), 2);
    assert_eq!(bus.queued_count(), 0);
    assert_eq!(damage_calls.load(Ordering::SeqCst), 1);
    assert_eq!(teleport_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn movement_heal_and_physics_payloads_arrive_intact() {
    let mut world = World::new();
    let e = entity(&mut world);
    let bus = EventBus::new();
    let log = Arc::new(Mutex::new(Vec::<String>::new()));
    {
        let log = log.clone();
        bus.subscribe(move |m: &MovementEvent| {
            assert!(approx_eq(m.speed, 2.5));
            log.lock().unwrap().push("movement".into());
        });
    }
    {
        let log = log.clone();
        bus.subscribe(move |h: &HealEvent| {
            assert!(h.overheal);
            assert_eq!(h.kind, "magic");
            log.lock().unwrap().push("heal".into());
        });
    }
    {
        let log = log.clone();
        bus.subscribe(move |p: &PhysicsEvent| {
            let tag = if p.global { "global" } else { "local" };
            assert!(p.global == p.entity.is_none());
            log.lock().unwrap().push(format!("physics:{}:{}", tag, p.gravity));
        });
    }

    bus.publish(MovementEvent::new(e).with_speed(2.5));
    bus.publish(HealEvent::new(e).with_amount(3.0).with_kind("magic").overheal());
    bus.publish(PhysicsEvent::for_entity(e).with_gravity(-9.5));
    bus.publish(PhysicsEvent::global().with_gravity(6.5));
    bus.dispatch();

    assert_eq!(
        *log.lock().unwrap(),
        vec!["movement", "heal", "physics:local:-9.5", "physics:global:6.5"]
    );
}

#[test]
fn surface_event_carries_custom_velocity() {
    let mut world = World::new();
    let walker = entity(&mut world);
    let ground = entity(&mut world);
    let bus = EventBus::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    {
        let seen = seen.clone();
        bus.subscribe(move |e: &SurfaceBehaviorEvent| seen.lock().unwrap().push(e.clone()));
    }

    bus.publish(SurfaceBehaviorEvent::new(walker, ground, SurfaceKind::Ice));
    bus.publish(
        SurfaceBehaviorEvent::new(walker, ground, SurfaceKind::Custom)
            .with_custom_velocity(Vec2::new(3.0, -1.0)),
    );
    assert_eq!(bus.dispatch(), 2);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].kind, SurfaceKind::Ice);
    assert_eq!(seen[0].custom_velocity, None);
    assert_eq!(seen[1].surface, ground);
    assert_eq!(seen[1].custom_velocity, Some(Vec2::new(3.0, -1.0)));
}

#[test]
fn events_published_during_dispatch_wait_for_next_dispatch() {
    let bus = EventBus::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    {
        let inner = bus.clone();
        let seen = seen.clone();
        bus.subscribe(move |t: &Tick| {
            seen.lock().unwrap().push(t.0);
            if t.0 < 3 {
                inner.publish(Tick(t.0 + 1));
            }
        });
    }

    bus.publish(Tick(0));
    assert_eq!(bus.dispatch(), 1);
    assert_eq!(*seen.lock().unwrap(), vec![0]);
    assert_eq!(bus.queued_count(), 1);

    bus.dispatch();
    bus.dispatch();
    bus.dispatch();
    assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2, 3]);
    assert_eq!(bus.queued_count(), 0);
    bus.clear();
}

#[test]
fn publish_immediate_inside_dispatch_is_delivered_at_once() {
    let mut world = World::new();
    let target = entity(&mut world);
    let bus = EventBus::new();
    let order = Arc::new(Mutex::new(Vec::new()));
    {
        let inner = bus.clone();
        let order = order.clone();
        bus.subscribe(move |_: &Tick| {
            order.lock().unwrap().push("tick start");
            inner.publish_immediate(DamageEvent::new(target).with_amount(1.0));
            order.lock().unwrap().push("tick end");
        });
    }
    {
        let order = order.clone();
        bus.subscribe(move |_: &DamageEvent| order.lock().unwrap().push("damage"));
    }

    bus.publish(Tick(0));
    bus.dispatch();

    assert_eq!(*order.lock().unwrap(), vec!["tick start", "damage", "tick end"]);
    bus.clear();
}

#[test]
fn unsubscribe_by_earlier_handler_stops_delivery_in_same_batch() {
    let bus = EventBus::new();
    let victim_calls = counter();
    let victim_id: Arc<Mutex<Option<HandlerId>>> = Arc::new(Mutex::new(None));

    {
        let inner = bus.clone();
        let victim_id = victim_id.clone();
        bus.subscribe(move |_: &Tick| {
            if let Some(id) = victim_id.lock().unwrap().take() {
                assert!(inner.unsubscribe_from::<Tick>(id));
            }
        });
    }
    {
        let calls = victim_calls.clone();
        let id = bus.subscribe(move |_: &Tick| {
            calls.fetch_add(1, Ordering::SeqCst);
        });
        *victim_id.lock().unwrap() = Some(id);
    }

    bus.publish(Tick(1));
    bus.publish(Tick(2));
    assert_eq!(bus.dispatch(), 2);

    // removed while the first event was being delivered, before its own turn
    assert_eq!(victim_calls.load(Ordering::SeqCst), 0);
    assert_eq!(bus.listener_count_of::<Tick>(), 1);
    bus.clear();
}

#[test]
fn handler_can_unsubscribe_itself() {
    let bus = EventBus::new();
    let calls = counter();
    let own_id: Arc<Mutex<Option<HandlerId>>> = Arc::new(Mutex::new(None));
    {
        let inner = bus.clone();
        let calls = calls.clone();
        let own_id_inner = own_id.clone();
        let id = bus.subscribe(move |_: &Tick| {
            calls.fetch_add(1, Ordering::SeqCst);
            if let Some(id) = *own_id_inner.lock().unwrap() {
                inner.unsubscribe_from::<Tick>(id);
            }
        });
        *own_id.lock().unwrap() = Some(id);
    }

    bus.publish(Tick(1));
    bus.publish(Tick(2));
    bus.dispatch();
    bus.publish_immediate(Tick(3));

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(bus.listener_count_of::<Tick>(), 0);
}

#[test]
fn handler_subscribed_during_dispatch_sees_later_events_in_batch() {
    let bus = EventBus::new();
    let late_calls = counter();
    {
        let inner = bus.clone();
        let late_calls = late_calls.clone();
        let subscribed = Arc::new(AtomicUsize::new(0));
        bus.subscribe(move |_: &Tick| {
            if subscribed.fetch_add(1, Ordering::SeqCst) == 0 {
                let late_calls = late_calls.clone();
                inner.subscribe(move |_: &Tick| {
                    late_calls.fetch_add(1, Ordering::SeqCst);
                });
            }
        });
    }

    bus.publish(Tick(1));
    bus.publish(Tick(2));
    bus.dispatch();

    // each queued event looks up handlers on its own turn
    assert_eq!(late_calls.load(Ordering::SeqCst), 1);
    assert_eq!(bus.listener_count_of::<Tick>(), 2);
    bus.clear();
}

#[test]
fn nested_dispatch_does_not_deadlock() {
    let bus = EventBus::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    {
        let inner = bus.clone();
        let seen = seen.clone();
        bus.subscribe(move |t: &Tick| {
            seen.lock().unwrap().push(t.0);
            if t.0 == 0 {
                inner.publish(Tick(1));
                inner.dispatch();
            }
        });
    }

    bus.publish(Tick(0));
    bus.dispatch();

    assert_eq!(*seen.lock().unwrap(), vec![0, 1]);
    bus.clear();
}

#[test]
fn clear_inside_handler_stops_remaining_handlers() {
    let bus = EventBus::new();
    let after = counter();
    {
        let inner = bus.clone();
        bus.subscribe(move |_: &Tick| inner.clear());
    }
    {
        let after = after.clone();
        bus.subscribe(move |_: &Tick| {
            after.fetch_add(1, Ordering::SeqCst);
        });
    }

    assert_eq!(bus.publish_immediate(Tick(0)), 1);
    assert_eq!(after.load(Ordering::SeqCst), 0);
    assert_eq!(bus.listener_count_of::<Tick>(), 0);
}

#[test]
fn publishing_from_many_threads() {
    let bus = EventBus::new();
    let total = counter();
    {
        let total = total.clone();
        bus.subscribe(move |t: &Tick| {
            total.fetch_add(t.0 as usize, Ordering::SeqCst);
        });
    }

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let bus = bus.clone();
            thread::spawn(move || {
                for _ in 0..250 {
                    bus.publish(Tick(1));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(bus.queued_count(), 1000);
    assert_eq!(bus.dispatch(), 1000);
    assert_eq!(total.load(Ordering::SeqCst), 1000);
}

#[test]
fn bus_works_as_world_resource() {
    let mut world = World::new();
    world.insert_resource(EventBus::new());
    let calls = counter();
    {
        let calls = calls.clone();
        world.resource::<EventBus>().subscribe(move |_: &Tick| {
            calls.fetch_add(1, Ordering::SeqCst);
        });
    }

    fn producer(bus: Res<EventBus>) {
        bus.publish(Tick(7));
    }

    let mut schedule = Schedule::default();
    schedule.add_systems((producer, gridcollide::systems::events::dispatch_events).chain());
    schedule.run(&mut world);

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(world.resource::<EventBus>().queued_count(), 0);
}
