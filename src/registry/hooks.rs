//! Observer hooks around control operations.
//!
//! Observers are plain callbacks fired before and after each public control
//! operation. They see the control but cannot change what it does.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::control::Control;

/// Control operation being observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Init,
    AddBinding,
    RemoveBinding,
    BindClick,
    UnbindClick,
    HandleClick,
    Update,
    SetStatus,
}

/// Whether the observer runs before or after the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Before,
    After,
}

/// Observer callback.
pub type Observer = Rc<dyn Fn(&Control, Operation, Phase)>;

#[derive(Default)]
pub(crate) struct Observers {
    list: RefCell<Vec<(usize, Observer)>>,
    next_id: Cell<usize>,
}

impl Observers {
    pub(crate) fn add(&self, observer: Observer) -> usize {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.list.borrow_mut().push((id, observer));
        id
    }

    pub(crate) fn remove(&self, id: usize) {
        self.list.borrow_mut().retain(|(i, _)| *i != id);
    }

    pub(crate) fn len(&self) -> usize {
        self.list.borrow().len()
    }

    /// Fire every observer. The list is snapshotted first so observers may
    /// register or remove observers while running.
    pub(crate) fn notify(&self, control: &Control, operation: Operation, phase: Phase) {
        let observers: Vec<Observer> = self
            .list
            .borrow()
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect();
        for observer in observers {
            observer(control, operation, phase);
        }
    }
}
