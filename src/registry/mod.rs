//! Control Registry - Every live control on the page.
//!
//! Manages the set of controls that currently listen for clicks:
//! - Controls register on init and on re-binding after being drained
//! - Controls leave when their last mixer binding is removed
//! - `teardown` detaches every click handler at once
//! - Observers registered here see every control's operations
//!
//! The registry is an explicit object, not module state, so independent
//! pages (and tests) each get their own. It owns its controls; controls only
//! hold a weak handle back, so dropping the registry frees both.

mod hooks;

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::config::ControlsConfig;
use crate::control::Control;

pub use hooks::{Observer, Operation, Phase};
use hooks::Observers;

pub struct ControlRegistry {
    config: Rc<ControlsConfig>,
    controls: RefCell<Vec<Rc<Control>>>,
    observers: Rc<Observers>,
}

impl ControlRegistry {
    /// Registry with the default configuration.
    pub fn new() -> Rc<Self> {
        Self::with_config(ControlsConfig::default())
    }

    pub fn with_config(config: ControlsConfig) -> Rc<Self> {
        Rc::new(Self {
            config: Rc::new(config),
            controls: RefCell::new(Vec::new()),
            observers: Rc::new(Observers::default()),
        })
    }

    pub fn config(&self) -> &ControlsConfig {
        &self.config
    }

    pub(crate) fn shared_config(&self) -> Rc<ControlsConfig> {
        self.config.clone()
    }

    pub fn len(&self) -> usize {
        self.controls.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.borrow().is_empty()
    }

    pub fn contains(&self, control: &Control) -> bool {
        self.controls
            .borrow()
            .iter()
            .any(|c| std::ptr::eq(Rc::as_ptr(c), control))
    }

    /// Registered controls, in registration order.
    pub fn controls(&self) -> Vec<Rc<Control>> {
        self.controls.borrow().clone()
    }

    pub(crate) fn register(&self, control: Rc<Control>) {
        if !self.contains(&control) {
            self.controls.borrow_mut().push(control);
        }
    }

    pub(crate) fn unregister(&self, control: &Control) {
        self.controls
            .borrow_mut()
            .retain(|c| !std::ptr::eq(Rc::as_ptr(c), control));
    }

    /// Detach every registered control's click handler and empty the registry.
    ///
    /// Bindings are left in place; binding a new mixer re-registers a control.
    pub fn teardown(&self) {
        let controls = std::mem::take(&mut *self.controls.borrow_mut());
        debug!(controls = controls.len(), "tearing down control registry");
        for control in controls {
            control.unbind_click();
        }
    }

    // =========================================================================
    // Observers
    // =========================================================================

    /// Observe every control operation. Returns cleanup function.
    pub fn observe<F>(&self, observer: F) -> impl FnOnce() + use<F>
    where
        F: Fn(&Control, Operation, Phase) + 'static,
    {
        let id = self.observers.add(Rc::new(observer));
        let observers = self.observers.clone();
        move || observers.remove(id)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub(crate) fn notify(&self, control: &Control, operation: Operation, phase: Phase) {
        self.observers.notify(control, operation, phase);
    }
}
