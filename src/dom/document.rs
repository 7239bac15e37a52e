//! Document - Headless element tree implementing [`Dom`].
//!
//! Manages the lifecycle of element indices:
//! - Free index pool for O(1) reuse, with a generation per slot so stale
//!   handles never resolve to a newer element
//! - Parent/child links for ancestor lookup and document-order queries
//! - Per-element click listeners with bubbling dispatch
//! - Disabled form controls swallow clicks, as in a browser
//! - A mutation counter over class and disabled writes
//!
//! # Example
//!
//! ```
//! use spark_controls::dom::{Document, Dom};
//!
//! let doc = Document::new();
//! let nav = doc.create_element("nav", None);
//! let button = doc.create_element_with("button", Some(nav), &[("data-filter", ".a")]);
//!
//! assert_eq!(doc.closest(button, "nav"), Some(nav));
//! assert_eq!(doc.attribute(button, "data-filter").as_deref(), Some(".a"));
//! assert_eq!(doc.disabled(button), Some(false));
//! ```

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::{trace, warn};

use super::selector::{Matchable, Selector};
use super::{ClickEvent, ClickHandler, Dom, ElementId, ListenerId};

/// Tags that carry a disabled flag.
const DISABLEABLE_TAGS: &[&str] = &["button", "input", "select", "textarea", "fieldset", "option"];

// =============================================================================
// Node
// =============================================================================

struct Node {
    tag: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    attributes: HashMap<String, String>,
    classes: Vec<String>,
    disabled: Option<bool>,
    listeners: Vec<(ListenerId, ClickHandler)>,
}

impl Node {
    fn new(tag: &str, parent: Option<ElementId>) -> Self {
        let tag = tag.to_ascii_lowercase();
        let disabled = DISABLEABLE_TAGS.contains(&tag.as_str()).then_some(false);
        Self {
            tag,
            parent,
            children: Vec::new(),
            attributes: HashMap::new(),
            classes: Vec::new(),
            disabled,
            listeners: Vec::new(),
        }
    }
}

impl Matchable for Node {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn attribute(&self, name: &str) -> Option<String> {
        if name == "class" {
            if self.classes.is_empty() {
                return None;
            }
            return Some(self.classes.join(" "));
        }
        self.attributes.get(name).cloned()
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

// =============================================================================
// Document State
// =============================================================================

struct Slot {
    generation: u32,
    node: Option<Node>,
}

#[derive(Default)]
struct DocumentState {
    slots: Vec<Slot>,
    free: Vec<usize>,
    next_listener: usize,
    mutations: usize,
}

impl DocumentState {
    fn node(&self, id: ElementId) -> Option<&Node> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_mut())
    }

    fn allocate(&mut self, node: Node) -> ElementId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.node = Some(node);
            ElementId::new(index, slot.generation)
        } else {
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            ElementId::new(self.slots.len() - 1, 0)
        }
    }

    fn release(&mut self, id: ElementId) {
        if let Some(slot) = self
            .slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())
        {
            slot.node = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(id.index());
        }
    }

    /// True if a disabled form control on `path` blocks the click.
    ///
    /// A disabled `fieldset` only blocks clicks aimed at form controls inside
    /// it; other disabled elements block every click on themselves and their
    /// descendants.
    fn click_blocked(&self, path: &[ElementId]) -> bool {
        let Some(&target) = path.first() else {
            return false;
        };
        let target_is_control = self.node(target).is_some_and(|n| n.disabled.is_some());
        path.iter().any(|&id| {
            self.node(id).is_some_and(|n| {
                n.disabled == Some(true) && (n.tag != "fieldset" || target_is_control)
            })
        })
    }

    /// Ids from `element` up to the root, inclusive.
    fn path_to_root(&self, element: ElementId) -> Vec<ElementId> {
        let mut path = Vec::new();
        let mut current = self.node(element).map(|_| element);
        while let Some(id) = current {
            path.push(id);
            current = self.node(id).and_then(|n| n.parent);
        }
        path
    }

    fn collect_descendants(&self, element: ElementId, out: &mut Vec<ElementId>) {
        if let Some(node) = self.node(element) {
            for &child in &node.children {
                out.push(child);
                self.collect_descendants(child, out);
            }
        }
    }
}

fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            warn!(selector, error = %err, "ignoring unusable selector");
            None
        }
    }
}

// =============================================================================
// Document
// =============================================================================

/// In-memory element tree.
#[derive(Default)]
pub struct Document {
    state: RefCell<DocumentState>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an element, appended as the last child of `parent`.
    ///
    /// `button`, `input`, `select`, `textarea`, `fieldset` and `option`
    /// elements get a disabled flag, initially `false`.
    pub fn create_element(&self, tag: &str, parent: Option<ElementId>) -> ElementId {
        let mut state = self.state.borrow_mut();
        let parent = parent.filter(|&p| state.node(p).is_some());
        let id = state.allocate(Node::new(tag, parent));
        if let Some(node) = parent.and_then(|p| state.node_mut(p)) {
            node.children.push(id);
        }
        id
    }

    /// Create an element and set attributes on it. A `class` attribute is
    /// split into the class list.
    pub fn create_element_with(
        &self,
        tag: &str,
        parent: Option<ElementId>,
        attributes: &[(&str, &str)],
    ) -> ElementId {
        let id = self.create_element(tag, parent);
        for (name, value) in attributes {
            self.set_attribute(id, name, value);
        }
        id
    }

    /// Remove an element and all of its descendants. Their listeners are
    /// dropped and their indices returned to the pool; existing handles to
    /// them stop resolving.
    pub fn remove_element(&self, element: ElementId) {
        let mut state = self.state.borrow_mut();
        let Some(parent) = state.node(element).map(|n| n.parent) else {
            return;
        };
        if let Some(node) = parent.and_then(|p| state.node_mut(p)) {
            node.children.retain(|&c| c != element);
        }

        let mut removed = vec![element];
        state.collect_descendants(element, &mut removed);
        for id in removed {
            state.release(id);
        }
    }

    pub fn contains(&self, element: ElementId) -> bool {
        self.state.borrow().node(element).is_some()
    }

    pub fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.state.borrow().node(element).and_then(|n| n.parent)
    }

    pub fn children(&self, element: ElementId) -> Vec<ElementId> {
        self.state
            .borrow()
            .node(element)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    pub fn tag(&self, element: ElementId) -> Option<String> {
        self.state.borrow().node(element).map(|n| n.tag.clone())
    }

    /// Set an attribute. `class` replaces the class list.
    pub fn set_attribute(&self, element: ElementId, name: &str, value: &str) {
        let mut state = self.state.borrow_mut();
        let Some(node) = state.node_mut(element) else {
            return;
        };
        if name == "class" {
            node.classes = value.split_whitespace().map(str::to_string).collect();
        } else {
            node.attributes.insert(name.to_string(), value.to_string());
        }
    }

    pub fn remove_attribute(&self, element: ElementId, name: &str) {
        let mut state = self.state.borrow_mut();
        let Some(node) = state.node_mut(element) else {
            return;
        };
        if name == "class" {
            node.classes.clear();
        } else {
            node.attributes.remove(name);
        }
    }

    pub fn classes(&self, element: ElementId) -> Vec<String> {
        self.state
            .borrow()
            .node(element)
            .map(|n| n.classes.clone())
            .unwrap_or_default()
    }

    /// Number of click listeners attached directly to `element`.
    pub fn listener_count(&self, element: ElementId) -> usize {
        self.state
            .borrow()
            .node(element)
            .map_or(0, |n| n.listeners.len())
    }

    /// Count of class and disabled writes since creation.
    pub fn mutation_count(&self) -> usize {
        self.state.borrow().mutations
    }

    /// Dispatch a click on `target`, bubbling to the root.
    ///
    /// Clicks on a disabled form control (or inside one) are dropped before
    /// any listener runs. Listeners run with no internal borrow held, so they
    /// may freely read and mutate the document. Returns the number of
    /// listeners invoked.
    pub fn click(&self, target: ElementId) -> usize {
        let path = {
            let state = self.state.borrow();
            let path = state.path_to_root(target);
            if state.click_blocked(&path) {
                trace!(%target, "click on disabled element dropped");
                return 0;
            }
            path
        };
        let mut invoked = 0;

        for current_target in path {
            let handlers: Vec<ClickHandler> = self
                .state
                .borrow()
                .node(current_target)
                .map(|n| n.listeners.iter().map(|(_, h)| h.clone()).collect())
                .unwrap_or_default();

            let event = ClickEvent {
                target,
                current_target,
            };
            for handler in handlers {
                handler(&event);
                invoked += 1;
            }
        }

        invoked
    }
}

impl Dom for Document {
    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.state.borrow().node(element)?.attribute(name)
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.state
            .borrow()
            .node(element)
            .is_some_and(|n| n.has_class(class))
    }

    fn add_class(&self, element: ElementId, class: &str) {
        let mut state = self.state.borrow_mut();
        state.mutations += 1;
        if let Some(node) = state.node_mut(element) {
            if !node.has_class(class) {
                node.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&self, element: ElementId, class: &str) {
        let mut state = self.state.borrow_mut();
        state.mutations += 1;
        if let Some(node) = state.node_mut(element) {
            node.classes.retain(|c| c != class);
        }
    }

    fn closest(&self, element: ElementId, selector: &str) -> Option<ElementId> {
        let selector = parse_selector(selector)?;
        let state = self.state.borrow();
        state
            .path_to_root(element)
            .into_iter()
            .find(|&id| state.node(id).is_some_and(|n| selector.matches(n)))
    }

    fn query_all(&self, scope: ElementId, selector: &str) -> Vec<ElementId> {
        let Some(selector) = parse_selector(selector) else {
            return Vec::new();
        };
        let state = self.state.borrow();
        let mut descendants = Vec::new();
        state.collect_descendants(scope, &mut descendants);
        descendants
            .into_iter()
            .filter(|&id| state.node(id).is_some_and(|n| selector.matches(n)))
            .collect()
    }

    fn disabled(&self, element: ElementId) -> Option<bool> {
        self.state.borrow().node(element)?.disabled
    }

    fn set_disabled(&self, element: ElementId, disabled: bool) {
        let mut state = self.state.borrow_mut();
        state.mutations += 1;
        if let Some(flag) = state.node_mut(element).and_then(|n| n.disabled.as_mut()) {
            *flag = disabled;
        }
    }

    fn on_click(&self, element: ElementId, handler: ClickHandler) -> ListenerId {
        let mut state = self.state.borrow_mut();
        let id = ListenerId::new(state.next_listener);
        state.next_listener += 1;
        if let Some(node) = state.node_mut(element) {
            node.listeners.push((id, handler));
        }
        id
    }

    fn off_click(&self, element: ElementId, listener: ListenerId) {
        let mut state = self.state.borrow_mut();
        if let Some(node) = state.node_mut(element) {
            node.listeners.retain(|(id, _)| *id != listener);
        }
    }
}
