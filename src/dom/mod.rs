//! DOM primitives.
//!
//! Controls never touch a concrete document. Everything they need from the
//! page goes through the [`Dom`] trait: attribute reads, class changes,
//! ancestor lookup, the disabled flag and click listeners.
//!
//! [`Document`] is a headless implementation used by tests and demos, and by
//! hosts that keep their own element tree.
//!
//! Elements are indices, not objects, the same way components are indices
//! into parallel arrays elsewhere in the stack. Each index carries a
//! generation so handles to removed elements go stale instead of aliasing.

mod document;
mod selector;

use std::fmt;
use std::rc::Rc;

pub use document::Document;
pub use selector::{Matchable, Selector};

/// Handle to an element in its document.
///
/// An index plus the generation of the slot it was allocated in. Once an
/// element is removed its slot may be reused, but old handles keep the old
/// generation and stop resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId {
    index: usize,
    generation: u32,
}

impl ElementId {
    pub const fn new(index: usize, generation: u32) -> Self {
        Self { index, generation }
    }

    pub const fn index(self) -> usize {
        self.index
    }

    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// A click as seen by a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickEvent {
    /// Element the click originated on.
    pub target: ElementId,
    /// Element the listener is attached to.
    pub current_target: ElementId,
}

/// Click listener.
pub type ClickHandler = Rc<dyn Fn(&ClickEvent)>;

/// Handle returned by [`Dom::on_click`], used to detach the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

impl ListenerId {
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    pub const fn get(self) -> usize {
        self.0
    }
}

/// Page operations a control depends on.
///
/// All methods take `&self`: documents are shared (`Rc<dyn Dom>`) between
/// every control on the page and mutate through interior mutability.
/// Unknown element ids are ignored, never a panic.
pub trait Dom {
    /// Attribute value, `None` when absent.
    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    fn has_class(&self, element: ElementId, class: &str) -> bool;

    fn add_class(&self, element: ElementId, class: &str);

    fn remove_class(&self, element: ElementId, class: &str);

    /// Nearest ancestor-or-self of `element` matching `selector`.
    fn closest(&self, element: ElementId, selector: &str) -> Option<ElementId>;

    /// Descendants of `scope` matching `selector`, in document order.
    fn query_all(&self, scope: ElementId, selector: &str) -> Vec<ElementId>;

    /// Disabled flag, or `None` if the element has no disabled state.
    fn disabled(&self, element: ElementId) -> Option<bool>;

    /// Set the disabled flag. Ignored for elements without one.
    fn set_disabled(&self, element: ElementId, disabled: bool);

    fn on_click(&self, element: ElementId, handler: ClickHandler) -> ListenerId;

    fn off_click(&self, element: ElementId, listener: ListenerId);

    /// True if the element supports a disabled state.
    fn can_disable(&self, element: ElementId) -> bool {
        self.disabled(element).is_some()
    }
}
