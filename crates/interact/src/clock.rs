//! Render-clock broadcast injected into pointer managers.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Token returned by [`TickSource::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickSubscription(u64);

/// Once-per-frame signal carrying the frame delta in milliseconds.
pub trait TickSource {
    /// Register `listener`; it fires on every tick until unsubscribed.
    fn subscribe(&self, listener: Box<dyn FnMut(f64)>) -> TickSubscription;

    /// Remove a listener. Returns `false` if it was not registered.
    fn unsubscribe(&self, subscription: TickSubscription) -> bool;
}

type Listener = Rc<RefCell<Box<dyn FnMut(f64)>>>;

#[derive(Default)]
struct ClockInner {
    next_id: u64,
    listeners: Vec<(TickSubscription, Listener)>,
}

/// Shared frame clock. Cloning yields another handle to the same broadcast.
///
/// The host calls [`RenderClock::tick`] once per rendered frame; every
/// subscribed manager receives the delta independently.
#[derive(Clone, Default)]
pub struct RenderClock {
    inner: Rc<RefCell<ClockInner>>,
}

impl RenderClock {
    /// Create a clock with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Broadcast a frame delta to every subscriber registered before the call.
    ///
    /// Listeners may subscribe or unsubscribe from inside their callback.
    pub fn tick(&self, delta_ms: f64) {
        let listeners: Vec<Listener> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in listeners {
            // A listener that re-enters `tick` is skipped rather than re-borrowed.
            if let Ok(mut callback) = listener.try_borrow_mut() {
                callback(delta_ms);
            }
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

impl TickSource for RenderClock {
    fn subscribe(&self, listener: Box<dyn FnMut(f64)>) -> TickSubscription {
        let mut inner = self.inner.borrow_mut();
        let id = TickSubscription(inner.next_id);
        inner.next_id += 1;
        inner.listeners.push((id, Rc::new(RefCell::new(listener))));
        id
    }

    fn unsubscribe(&self, subscription: TickSubscription) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.listeners.len();
        inner.listeners.retain(|(id, _)| *id != subscription);
        inner.listeners.len() != before
    }
}

impl fmt::Debug for RenderClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderClock")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn broadcasts_to_every_subscriber() {
        let clock = RenderClock::new();
        let total = Rc::new(Cell::new(0.0));

        let a = Rc::clone(&total);
        clock.subscribe(Box::new(move |dt| a.set(a.get() + dt)));
        let b = Rc::clone(&total);
        let sub = clock.subscribe(Box::new(move |dt| b.set(b.get() + dt * 10.0)));
        assert_eq!(clock.subscriber_count(), 2);

        clock.tick(1.0);
        assert_eq!(total.get(), 11.0);

        assert!(clock.unsubscribe(sub));
        assert!(!clock.unsubscribe(sub));
        clock.tick(1.0);
        assert_eq!(total.get(), 12.0);
    }

    #[test]
    fn clones_share_subscribers() {
        let clock = RenderClock::new();
        let handle = clock.clone();
        handle.subscribe(Box::new(|_| {}));
        assert_eq!(clock.subscriber_count(), 1);
    }

    #[test]
    fn listener_may_unsubscribe_itself() {
        let clock = RenderClock::new();
        let slot: Rc<Cell<Option<TickSubscription>>> = Rc::new(Cell::new(None));
        let calls = Rc::new(Cell::new(0));

        let handle = clock.clone();
        let own = Rc::clone(&slot);
        let counter = Rc::clone(&calls);
        let sub = clock.subscribe(Box::new(move |_| {
            counter.set(counter.get() + 1);
            if let Some(sub) = own.get() {
                handle.unsubscribe(sub);
            }
        }));
        slot.set(Some(sub));

        clock.tick(16.0);
        clock.tick(16.0);
        assert_eq!(calls.get(), 1);
        assert_eq!(clock.subscriber_count(), 0);
    }
}
