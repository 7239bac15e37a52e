//! Mixer Engine - The collaborator controls drive.
//!
//! A mixer owns a content collection and knows how to filter, sort and
//! animate it. Controls only see this trait: they issue commands and wait for
//! the mixer to call [`Control::update`](crate::Control::update) once the
//! command has been applied.
//!
//! # Completion contract
//!
//! For every `multi_mix`, `toggle_on` or `toggle_off` call, the mixer calls
//! `update` exactly once on each control bound to it, with the resolved
//! command and its current toggle selectors. The call may happen later (after
//! an animation) or synchronously, before the dispatch returns.

use std::rc::Rc;

use crate::dom::ElementId;
use crate::types::Command;

/// Engine interface consumed by controls.
pub trait Mixer {
    /// Apply a filter and/or sort.
    fn multi_mix(&self, command: &Command);

    /// Add `filter` to the active toggles.
    fn toggle_on(&self, filter: &str);

    /// Remove `filter` from the active toggles.
    fn toggle_off(&self, filter: &str);

    /// Class applied to active controls.
    fn active_class(&self) -> String;

    /// Record which element triggered the most recent command.
    fn set_last_clicked(&self, element: ElementId);
}

/// Shared handle to a mixer. Identity is the allocation, not the value.
pub type MixerRef = Rc<dyn Mixer>;

/// Reference identity for mixer handles.
///
/// Compares data pointers only; vtable pointers for the same type may differ
/// between codegen units.
pub fn same_mixer(a: &MixerRef, b: &MixerRef) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}
