//! CSS property transitions.
//!
//! Animates a styleable property from its previous computed value to a newly
//! cascaded one over a declared duration, delay and timing function, and
//! reports the lifecycle of each transition (`transitionrun`,
//! `transitionstart`, `transitionend`, `transitioncancel`) with elapsed
//! times that depend only on the schedule, not on how often the clock is
//! polled.
//!
//! # Modules
//!
//! - `easing`: timing functions (bezier and stepped curves)
//! - `definition` / `css`: transition definitions and CSS value parsing
//! - `selector`: picks the governing definition for a property
//! - `timer`: per-(node, property) state machine
//! - `registry`: live timers per node
//! - `events`: lifecycle events and listeners
//! - `engine`: the driver tying it together

pub mod clock;
pub mod css;
pub mod definition;
pub mod easing;
pub mod engine;
pub mod events;
pub mod registry;
pub mod selector;
pub mod store;
pub mod time;
pub mod timer;
pub mod value;

pub use clock::{ManualClock, SystemClock, TimeSource};
pub use css::{TransitionParseError, parse_transition};
pub use definition::{DefinitionError, PropertyName, TransitionDefinition};
pub use easing::{EasingFunction, StepPosition};
pub use engine::TransitionEngine;
pub use events::{ListenerId, TransitionEvent, TransitionEventKind, TransitionListener};
pub use registry::{NodeTransitions, TransitionRegistry};
pub use selector::select_definition;
pub use store::{PropertyStore, StyleStore};
pub use time::{TimeSpan, Timestamp};
pub use timer::{TimerId, TimerPhase, TransitionTimer};
pub use value::{EdgeInsets, Interpolate, StyleValue};

pub use rune_config::TransitionSettings;
