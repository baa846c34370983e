use std::{cell::Cell, fmt::Display, rc::Rc, sync::{Arc, RwLock}};

use crate::resolver::prelude::Operator;
use super::src_span::SrcSpan;

/// A decision the parser took about an operation word.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Resolved {
        word: String,
        operator: Operator,
        location: SrcSpan,
    },
    Rejected {
        word: String,
        reason: String,
        location: SrcSpan,
    },
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resolved { word, operator, location } => {
                write!(f, "'{word}' -> '{operator}' at {}", location.start)
            },
            Self::Rejected { word, reason, location } => {
                write!(f, "'{word}' rejected at {}: {reason}", location.start)
            }
        }
    }
}

pub trait EventEmitterIO {
    fn emit_event(&self, event: Event);
}

#[derive(Debug, Clone, Copy)]
pub struct NullEventEmitterIO;

impl EventEmitterIO for NullEventEmitterIO {
    fn emit_event(&self, _event: Event) {}
}

#[derive(Debug, Default, Clone)]
pub struct VectorEventEmitterIO {
    pub events: Arc<RwLock<Vec<Event>>>
}

impl VectorEventEmitterIO {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Event> {
        let mut events = self.write_lock();
        std::mem::take(&mut *events)
    }

    fn write_lock(&self) -> std::sync::RwLockWriteGuard<'_, Vec<Event>> {
        // a poisoned lock still holds a usable list
        self.events.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl EventEmitterIO for VectorEventEmitterIO {
    fn emit_event(&self, event: Event) {
        self.write_lock().push(event);
    }
}

/// Forwards events to an [`EventEmitterIO`] and counts them.
#[derive(Clone)]
pub struct EventEmitter {
    count: Rc<Cell<usize>>,
    emitter: Rc<dyn EventEmitterIO>
}

impl EventEmitter {
    pub fn new(emitter: Rc<dyn EventEmitterIO>) -> Self {
        Self {
            count: Rc::new(Cell::new(0)),
            emitter,
        }
    }

    pub fn null() -> Self {
        Self::new(Rc::new(NullEventEmitterIO))
    }

    pub fn count(&self) -> usize {
        self.count.get()
    }

    pub fn emit(&self, event: Event) {
        self.count.set(self.count.get() + 1);
        self.emitter.emit_event(event);
    }
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("count", &self.count.get())
            .finish()
    }
}
