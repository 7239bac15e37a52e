//! Control - A UI element driving one or more mixers.
//!
//! A control is either attached to a single element (a filter button, a sort
//! button) or "live": attached to a container and delegating to any
//! descendant matching a selector, so buttons injected later still work.
//!
//! Lifecycle:
//! - [`Control::init`] captures the element's values, attaches the click
//!   handler and registers the control
//! - [`Control::add_binding`] / [`Control::remove_binding`] connect mixers;
//!   removing the last one detaches the handler and unregisters the control
//! - A click fans a command out to every bound mixer ([`click`](Control::handle_click))
//! - Each mixer reports back through [`Control::update`]; once all have, the
//!   control reconciles its status
//!
//! # Example
//!
//! ```ignore
//! use spark_controls::{Control, ControlMethod, ControlRegistry};
//!
//! let registry = ControlRegistry::new();
//! let control = Control::init(&registry, dom, button, ControlMethod::Filter, None);
//! control.add_binding(&mixer);
//! ```

mod click;
mod selection;
mod status;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use spark_signals::{signal, Signal};
use tracing::{debug, trace};

use crate::config::ControlsConfig;
use crate::dom::{ClickEvent, ClickHandler, Dom, ElementId, ListenerId};
use crate::engine::{same_mixer, MixerRef};
use crate::registry::{ControlRegistry, Operation, Phase};
use crate::types::{ControlMethod, ControlStatus};

pub use selection::Selection;

struct ControlState {
    bound: Vec<MixerRef>,
    pending: usize,
    selection: Selection,
    can_disable: bool,
    listener: Option<ListenerId>,
    /// Class added by the last transition to active.
    applied_class: Option<String>,
}

pub struct Control {
    this: Weak<Control>,
    dom: Rc<dyn Dom>,
    registry: Weak<ControlRegistry>,
    config: Rc<ControlsConfig>,
    element: ElementId,
    method: ControlMethod,
    selector: Option<String>,
    status: Signal<ControlStatus>,
    state: RefCell<ControlState>,
}

impl Control {
    /// Create a control for `element`, attach its click handler and register it.
    ///
    /// With a `selector`, the control is live: its status is permanently
    /// [`ControlStatus::Live`] and values are read from the clicked button on
    /// every click. Without one, values are captured from `element` now.
    /// An empty selector counts as none.
    pub fn init(
        registry: &Rc<ControlRegistry>,
        dom: Rc<dyn Dom>,
        element: ElementId,
        method: ControlMethod,
        selector: Option<&str>,
    ) -> Rc<Self> {
        let selector = selector
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let control = Rc::new_cyclic(|this| Self {
            this: this.clone(),
            dom,
            registry: Rc::downgrade(registry),
            config: registry.shared_config(),
            element,
            method,
            selector,
            status: signal(ControlStatus::Inactive),
            state: RefCell::new(ControlState {
                bound: Vec::new(),
                pending: 0,
                selection: Selection::empty(method),
                can_disable: false,
                listener: None,
                applied_class: None,
            }),
        });

        control.notify(Operation::Init, Phase::Before);

        if control.is_live() {
            control.status.set(ControlStatus::Live);
        } else {
            let can_disable = control.dom.can_disable(element);
            let selection = Selection::capture(
                method,
                &*control.dom,
                element,
                &control.config.attributes,
            );
            let mut state = control.state.borrow_mut();
            state.can_disable = can_disable;
            state.selection = selection;
        }

        control.bind_click();
        registry.register(control.clone());

        debug!(
            element = %element,
            method = %method,
            selector = control.selector.as_deref(),
            "control initialized"
        );
        control.notify(Operation::Init, Phase::After);

        control
    }

    // =========================================================================
    // Bindings
    // =========================================================================

    /// Bind a mixer. Binding the same mixer twice has no effect.
    ///
    /// Binding a control that was drained (or torn down) re-attaches its click
    /// handler and registers it again.
    pub fn add_binding(&self, mixer: &MixerRef) {
        self.notify(Operation::AddBinding, Phase::Before);

        let reattach = {
            let mut state = self.state.borrow_mut();
            if state.bound.iter().any(|m| same_mixer(m, mixer)) {
                false
            } else {
                state.bound.push(mixer.clone());
                state.listener.is_none()
            }
        };

        if reattach {
            self.bind_click();
            if let (Some(this), Some(registry)) = (self.this.upgrade(), self.registry.upgrade()) {
                registry.register(this);
            }
        }

        self.notify(Operation::AddBinding, Phase::After);
    }

    /// Unbind a mixer. Unbinding a mixer that is not bound has no effect.
    ///
    /// Removing the last binding detaches the click handler, unregisters the
    /// control and turns an active control inactive.
    pub fn remove_binding(&self, mixer: &MixerRef) {
        self.notify(Operation::RemoveBinding, Phase::Before);

        let drained = {
            let mut state = self.state.borrow_mut();
            match state.bound.iter().position(|m| same_mixer(m, mixer)) {
                Some(index) => {
                    state.bound.remove(index);
                    state.bound.is_empty()
                }
                None => {
                    trace!(element = %self.element, "mixer not bound, nothing to remove");
                    false
                }
            }
        };

        if drained {
            debug!(element = %self.element, "last binding removed");
            self.unbind_click();
            if let Some(registry) = self.registry.upgrade() {
                registry.unregister(self);
            }
            if self.status() == ControlStatus::Active {
                self.set_status(ControlStatus::Inactive);
            }
        }

        self.notify(Operation::RemoveBinding, Phase::After);
    }

    /// True if `mixer` (this allocation) is bound.
    pub fn is_bound(&self, mixer: &MixerRef) -> bool {
        self.state.borrow().bound.iter().any(|m| same_mixer(m, mixer))
    }

    // =========================================================================
    // Click handler
    // =========================================================================

    pub(crate) fn bind_click(&self) {
        self.notify(Operation::BindClick, Phase::Before);

        let this = self.this.clone();
        let handler: ClickHandler = Rc::new(move |event: &ClickEvent| {
            if let Some(control) = this.upgrade() {
                control.handle_click(event);
            }
        });
        let listener = self.dom.on_click(self.element, handler);

        // Never leave two handlers on one element
        let previous = self.state.borrow_mut().listener.replace(listener);
        if let Some(previous) = previous {
            self.dom.off_click(self.element, previous);
        }

        self.notify(Operation::BindClick, Phase::After);
    }

    pub(crate) fn unbind_click(&self) {
        self.notify(Operation::UnbindClick, Phase::Before);

        let listener = self.state.borrow_mut().listener.take();
        if let Some(listener) = listener {
            self.dom.off_click(self.element, listener);
        }

        self.notify(Operation::UnbindClick, Phase::After);
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn method(&self) -> ControlMethod {
        self.method
    }

    pub fn selector(&self) -> Option<&str> {
        self.selector.as_deref()
    }

    pub fn is_live(&self) -> bool {
        self.selector.is_some()
    }

    /// Current status (reactive).
    pub fn status(&self) -> ControlStatus {
        self.status.get()
    }

    /// The status signal, for effects and deriveds that follow this control.
    pub fn status_signal(&self) -> Signal<ControlStatus> {
        self.status.clone()
    }

    /// Bound mixers, in binding order.
    pub fn bound(&self) -> Vec<MixerRef> {
        self.state.borrow().bound.clone()
    }

    pub fn bound_count(&self) -> usize {
        self.state.borrow().bound.len()
    }

    /// Mixers yet to report back on the last dispatched command.
    pub fn pending(&self) -> usize {
        self.state.borrow().pending
    }

    pub fn selection(&self) -> Selection {
        self.state.borrow().selection.clone()
    }

    pub fn filter_value(&self) -> String {
        self.state.borrow().selection.filter_value().to_string()
    }

    pub fn sort_value(&self) -> String {
        self.state.borrow().selection.sort_value().to_string()
    }

    pub fn can_disable(&self) -> bool {
        self.state.borrow().can_disable
    }

    /// True while a click handler is attached.
    pub fn is_listening(&self) -> bool {
        self.state.borrow().listener.is_some()
    }

    fn notify(&self, operation: Operation, phase: Phase) {
        if let Some(registry) = self.registry.upgrade() {
            registry.notify(self, operation, phase);
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support;
