use crate::cycle::Cycle;

/// Notifications the dashboard emits toward external UI widgets.
///
/// Fire-and-forget: no payload ever expects a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The selection state changed in an observable way; render subscribers
    /// re-run their pipeline on this.
    SelectionChanged,
    /// A fifth comparison area was rejected; the list is unchanged.
    TooManyComparisons,
    /// Pointer entered a rendered country that is part of the selection.
    MapItemHover { country: String },
    /// Pointer left a rendered country that is part of the selection.
    MapItemUnhover { country: String },
}

impl Notice {
    /// Stable kind string, used as a metrics key.
    pub fn kind(&self) -> &'static str {
        match self {
            Notice::SelectionChanged => "selection_changed",
            Notice::TooManyComparisons => "too_many_comparisons",
            Notice::MapItemHover { .. } => "map_item_hover",
            Notice::MapItemUnhover { .. } => "map_item_unhover",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub cycle_index: u64,
    pub notice: Notice,
}

type Subscriber = Box<dyn FnMut(&Event)>;

/// Records every emitted event and fans it out to registered subscribers.
///
/// Subscribers run synchronously, in registration order, on the emitting
/// thread; there are no concurrent writers anywhere in the dashboard.
#[derive(Default)]
pub struct EventBus {
    events: Vec<Event>,
    subscribers: Vec<Subscriber>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&Event) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn emit(&mut self, cycle: Cycle, notice: Notice) {
        let event = Event {
            cycle_index: cycle.index,
            notice,
        };
        for subscriber in &mut self.subscribers {
            subscriber(&event);
        }
        self.events.push(event);
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("events", &self.events)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
