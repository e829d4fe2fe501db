use bevy_ecs::prelude::*;
use log::trace;

use crate::resources::eventbus::EventBus;

/// Deliver everything queued on the [`EventBus`] since the last tick.
pub fn dispatch_events(bus: Res<EventBus>) {
    let delivered = bus.dispatch();
    if delivered > 0 {
        trace!("Dispatched {} queued events", delivered);
    }
}
