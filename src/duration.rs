//! Duration / event handler (`spec.md` §4.9): a single broadcaster
//! holding a set of listeners. `broadcast` calls each listener's
//! reaction; listeners that ask to deregister during that reaction are
//! batched and removed only once the broadcast finishes, so a listener
//! never observes a shrinking list mid-iteration.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
    sync::atomic::{AtomicUsize, Ordering},
};

use crate::ids::PlayerId;

static NEXT_LISTENER_ID: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerScope {
    Any,
    Controller(PlayerId),
    Specific(PlayerId),
}

#[derive(Debug, Clone, Copy)]
pub struct BoundaryEvent {
    pub phase_start: bool,
    pub epoch_type: &'static str,
    pub scope: PlayerScope,
}

#[derive(Debug, Clone, Copy)]
pub enum Event {
    Boundary(BoundaryEvent),
    /// The distinguished "until end of turn" signal an
    /// [`Match::UntilEndOfTurn`] listener matches, regardless of
    /// boundary shape.
    UntilEndOfTurn,
}

#[derive(Debug, Clone, Copy)]
pub enum Match {
    Boundary {
        /// `None` matches either phase-start value.
        phase_start: Option<bool>,
        epoch_type: &'static str,
        scope: PlayerScope,
    },
    UntilEndOfTurn,
}

impl Match {
    fn matches(&self, event: &Event) -> bool {
        match (self, event) {
            (Match::UntilEndOfTurn, Event::UntilEndOfTurn) => true,
            (
                Match::Boundary {
                    phase_start,
                    epoch_type,
                    scope,
                },
                Event::Boundary(b),
            ) => {
                phase_start.map_or(true, |ps| ps == b.phase_start)
                    && *epoch_type == b.epoch_type
                    && (*scope == PlayerScope::Any || *scope == b.scope)
            }
            _ => false,
        }
    }
}

/// A boundary-event listener. On a matching broadcast it increments a
/// counter; once the counter reaches `threshold`, it marks its
/// reference effect's shared `expired` cell and asks to be deregistered.
pub struct Listener {
    pub id: usize,
    pub match_spec: Match,
    threshold: u32,
    counter: Cell<u32>,
    expired: Rc<Cell<bool>>,
}

impl Listener {
    pub fn new(match_spec: Match, threshold: u32, expired: Rc<Cell<bool>>) -> Rc<Self> {
        Rc::new(Self {
            id: NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed),
            match_spec,
            threshold: threshold.max(1),
            counter: Cell::new(0),
            expired,
        })
    }

    /// Returns `true` if this reaction crossed the threshold and the
    /// listener should be deregistered.
    fn react(&self, event: &Event) -> bool {
        if !self.match_spec.matches(event) {
            return false;
        }
        let count = self.counter.get() + 1;
        self.counter.set(count);
        if count >= self.threshold {
            self.expired.set(true);
            true
        } else {
            false
        }
    }
}

#[derive(Default)]
pub struct DurationHandler {
    listeners: RefCell<Vec<Rc<Listener>>>,
}

impl DurationHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, listener: Rc<Listener>) {
        self.listeners.borrow_mut().push(listener);
    }

    pub fn deregister(&self, id: usize) {
        self.listeners.borrow_mut().retain(|l| l.id != id);
    }

    pub fn broadcast(&self, event: &Event) {
        let mut to_remove = Vec::new();
        for listener in self.listeners.borrow().iter() {
            if listener.react(event) {
                to_remove.push(listener.id);
            }
        }
        if !to_remove.is_empty() {
            self.listeners
                .borrow_mut()
                .retain(|l| !to_remove.contains(&l.id));
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
