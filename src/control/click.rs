//! Click handling - from a click to a command on every bound mixer.

use tracing::{debug, trace};

use super::{Control, Selection};
use crate::dom::{ClickEvent, ElementId};
use crate::engine::MixerRef;
use crate::registry::{Operation, Phase};
use crate::types::ControlStatus;

impl Control {
    /// Turn a click into a command and send it to every bound mixer, in
    /// binding order.
    ///
    /// Live controls resolve the nearest ancestor-or-self of the click target
    /// matching their selector; a click that matches nothing is ignored.
    /// Values the control captured at init take precedence over the clicked
    /// button's attributes.
    pub fn handle_click(&self, event: &ClickEvent) {
        self.notify(Operation::HandleClick, Phase::Before);

        self.state.borrow_mut().pending = 0;

        match self.resolve_button(event) {
            Some(button) => self.dispatch(button),
            None => trace!(
                element = %self.element,
                target = %event.target,
                "click matched no control button"
            ),
        }

        self.notify(Operation::HandleClick, Phase::After);
    }

    fn resolve_button(&self, event: &ClickEvent) -> Option<ElementId> {
        match self.selector {
            None => Some(self.element),
            Some(ref selector) => self.dom.closest(event.target, selector),
        }
    }

    fn dispatch(&self, button: ElementId) {
        let attributes = &self.config.attributes;

        let (selection, mixers) = {
            let state = self.state.borrow();
            let selection = state
                .selection
                .or_else(|| Selection::capture(self.method, &*self.dom, button, attributes));
            (selection, state.bound.clone())
        };

        let toggle_active =
            matches!(selection, Selection::Toggle(_)) && self.toggle_active(button, &mixers);

        // Set before dispatching: mixers may complete synchronously
        self.state.borrow_mut().pending = mixers.len();

        debug!(
            element = %self.element,
            button = %button,
            method = %self.method,
            mixers = mixers.len(),
            "dispatching control command"
        );

        let command = selection.command();
        for mixer in &mixers {
            mixer.set_last_clicked(button);
            match selection {
                Selection::Toggle(ref filter) if toggle_active => mixer.toggle_off(filter),
                Selection::Toggle(ref filter) => mixer.toggle_on(filter),
                Selection::Filter(_) | Selection::Sort(_) | Selection::MultiMix { .. } => {
                    mixer.multi_mix(&command)
                }
            }
        }
    }

    /// Whether clicking a toggle should switch it off.
    ///
    /// Live controls have no status of their own, so the clicked button's
    /// class is checked instead, using the first bound mixer's active class.
    fn toggle_active(&self, button: ElementId, mixers: &[MixerRef]) -> bool {
        if self.is_live() {
            mixers
                .first()
                .is_some_and(|mixer| self.dom.has_class(button, &mixer.active_class()))
        } else {
            self.status() == ControlStatus::Active
        }
    }
}
