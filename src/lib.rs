//! # spark-controls
//!
//! Filter and sort controls for mixer-driven content.
//!
//! A control is a UI element (usually a button) bound to one or more mixers.
//! Clicking it derives a command from the element's data attributes, sends
//! that command to every bound mixer, waits for all of them to report back,
//! and then reflects the outcome on the element as active, inactive or
//! disabled.
//!
//! ## Architecture
//!
//! ```text
//! click → Control resolves button → Selection → Command
//!       → Mixer::multi_mix / toggle_on / toggle_off  (every bound mixer)
//!       → Control::update × N  → pending hits 0 → set_status
//! ```
//!
//! Elements are indices into a [`Dom`]; mixers are `Rc<dyn Mixer>` compared
//! by identity. Everything is single-threaded and callback-driven.
//!
//! ## Modules
//!
//! - [`types`] - Methods, statuses, commands
//! - [`control`] - The control state machine
//! - [`registry`] - Registry of listening controls and operation observers
//! - [`engine`] - The mixer interface
//! - [`dom`] - DOM primitives and an in-memory document
//! - [`config`] - Active class and data attribute configuration

pub mod config;
pub mod control;
pub mod dom;
pub mod engine;
pub mod error;
pub mod registry;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::{ControlsConfig, DataAttributes, DEFAULT_ACTIVE_CLASS};

pub use control::{Control, Selection};

pub use dom::{ClickEvent, ClickHandler, Document, Dom, ElementId, ListenerId, Selector};

pub use engine::{same_mixer, Mixer, MixerRef};

pub use error::{ConfigError, ParseMethodError, SelectorError};

pub use registry::{ControlRegistry, Observer, Operation, Phase};
