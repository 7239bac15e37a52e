//! Shared fixtures for control tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::dom::{Document, ElementId};
use crate::engine::{Mixer, MixerRef};
use crate::registry::ControlRegistry;
use crate::types::Command;

thread_local! {
    static SEQUENCE: Cell<usize> = const { Cell::new(0) };
}

pub(crate) fn setup() -> (Rc<ControlRegistry>, Rc<Document>) {
    (ControlRegistry::new(), Rc::new(Document::new()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    MultiMix(Command),
    ToggleOn(String),
    ToggleOff(String),
}

/// Mixer that records what it was asked to do and never completes.
pub(crate) struct RecordingMixer {
    class: String,
    calls: RefCell<Vec<Call>>,
    last_clicked: Cell<Option<ElementId>>,
    sequence: Cell<usize>,
}

impl RecordingMixer {
    pub(crate) fn new(class: &str) -> (Rc<Self>, MixerRef) {
        let mixer = Rc::new(Self {
            class: class.to_string(),
            calls: RefCell::new(Vec::new()),
            last_clicked: Cell::new(None),
            sequence: Cell::new(0),
        });
        let handle: MixerRef = mixer.clone();
        (mixer, handle)
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub(crate) fn last_clicked(&self) -> Option<ElementId> {
        self.last_clicked.get()
    }

    /// Global order of this mixer's most recent call.
    pub(crate) fn sequence(&self) -> usize {
        self.sequence.get()
    }

    fn record(&self, call: Call) {
        let next = SEQUENCE.with(|s| {
            s.set(s.get() + 1);
            s.get()
        });
        self.sequence.set(next);
        self.calls.borrow_mut().push(call);
    }
}

impl Mixer for RecordingMixer {
    fn multi_mix(&self, command: &Command) {
        self.record(Call::MultiMix(command.clone()));
    }

    fn toggle_on(&self, filter: &str) {
        self.record(Call::ToggleOn(filter.to_string()));
    }

    fn toggle_off(&self, filter: &str) {
        self.record(Call::ToggleOff(filter.to_string()));
    }

    fn active_class(&self) -> String {
        self.class.clone()
    }

    fn set_last_clicked(&self, element: ElementId) {
        self.last_clicked.set(Some(element));
    }
}
