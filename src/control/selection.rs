//! Selection - A control's captured filter/sort values.
//!
//! One variant per [`ControlMethod`], carrying exactly the values that method
//! uses. Command derivation and status matching both go through here, so
//! adding a method means the compiler points at every place that needs it.

use crate::config::DataAttributes;
use crate::dom::{Dom, ElementId};
use crate::types::{Command, CommandFields, ControlMethod};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Filter(String),
    Sort(String),
    Toggle(String),
    MultiMix { filter: String, sort: String },
}

impl Selection {
    /// Selection with every value empty.
    pub fn empty(method: ControlMethod) -> Self {
        Self::from_parts(method, String::new(), String::new())
    }

    fn from_parts(method: ControlMethod, filter: String, sort: String) -> Self {
        match method {
            ControlMethod::Filter => Self::Filter(filter),
            ControlMethod::Sort => Self::Sort(sort),
            ControlMethod::Toggle => Self::Toggle(filter),
            ControlMethod::MultiMix => Self::MultiMix { filter, sort },
        }
    }

    /// Read the values `method` needs from `element`'s data attributes.
    /// Missing attributes read as empty strings.
    pub fn capture(
        method: ControlMethod,
        dom: &dyn Dom,
        element: ElementId,
        attributes: &DataAttributes,
    ) -> Self {
        let fields = method.fields();
        let read = |name: &str| dom.attribute(element, name).unwrap_or_default();

        let filter = if !fields.contains(CommandFields::FILTER) {
            String::new()
        } else if method == ControlMethod::Toggle {
            read(&attributes.toggle)
        } else {
            read(&attributes.filter)
        };
        let sort = if fields.contains(CommandFields::SORT) {
            read(&attributes.sort)
        } else {
            String::new()
        };

        Self::from_parts(method, filter, sort)
    }

    pub fn method(&self) -> ControlMethod {
        match self {
            Self::Filter(_) => ControlMethod::Filter,
            Self::Sort(_) => ControlMethod::Sort,
            Self::Toggle(_) => ControlMethod::Toggle,
            Self::MultiMix { .. } => ControlMethod::MultiMix,
        }
    }

    /// Filter (or toggle) value, empty for sort selections.
    pub fn filter_value(&self) -> &str {
        match self {
            Self::Filter(filter) | Self::Toggle(filter) | Self::MultiMix { filter, .. } => filter,
            Self::Sort(_) => "",
        }
    }

    /// Sort value, empty for filter and toggle selections.
    pub fn sort_value(&self) -> &str {
        match self {
            Self::Sort(sort) | Self::MultiMix { sort, .. } => sort,
            Self::Filter(_) | Self::Toggle(_) => "",
        }
    }

    fn is_complete(&self) -> bool {
        match self {
            Self::Filter(v) | Self::Sort(v) | Self::Toggle(v) => !v.is_empty(),
            Self::MultiMix { filter, sort } => !filter.is_empty() && !sort.is_empty(),
        }
    }

    /// Fill empty values from `fallback`, each value independently.
    /// `fallback` is only evaluated when something is missing.
    pub fn or_else(&self, fallback: impl FnOnce() -> Selection) -> Selection {
        if self.is_complete() {
            return self.clone();
        }
        let fallback = fallback();
        let pick = |own: &str, other: &str| {
            if own.is_empty() {
                other.to_string()
            } else {
                own.to_string()
            }
        };
        Self::from_parts(
            self.method(),
            pick(self.filter_value(), fallback.filter_value()),
            pick(self.sort_value(), fallback.sort_value()),
        )
    }

    /// The command a click on this selection sends.
    pub fn command(&self) -> Command {
        match self {
            Self::Filter(filter) | Self::Toggle(filter) => Command::filter(filter.clone()),
            Self::Sort(sort) => Command::sort(sort.clone()),
            Self::MultiMix { filter, sort } => Command::multi_mix(filter.clone(), sort.clone()),
        }
    }

    /// Whether a completed `command` makes this selection active.
    ///
    /// Toggles additionally need a non-empty `toggle_selectors`: with nothing
    /// toggled on, no toggle is active, whatever the command says.
    pub fn matches(&self, command: &Command, toggle_selectors: &[String]) -> bool {
        match self {
            Self::Filter(filter) => command.filter_is(filter),
            Self::Sort(sort) => command.sort_is(sort),
            Self::MultiMix { filter, sort } => command.sort_is(sort) && command.filter_is(filter),
            Self::Toggle(filter) => {
                !toggle_selectors.is_empty()
                    && (command.filter_is(filter) || toggle_selectors.iter().any(|t| t == filter))
            }
        }
    }
}
