//! # Phasecast Core Library
//!
//! This library resolves where an annual awards program currently stands in
//! its calendar. The website and the `phasecast` CLI are thin layers over the
//! same core.
//!
//! ## Architecture
//!
//! - **Event**: the active event's milestone record, leniently deserialized
//! - **Phase**: a pure resolver mapping `(milestones, now)` to a phase,
//!   countdown and default call-to-action
//! - **CTA**: per-display-context overrides of the default call-to-action
//! - **Query**: convenience predicates and a source-backed `EventCalendar`
//! - **Source**: where milestone records come from
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`PhaseResolver`]: Ordered rule table evaluation
//! - [`select_cta`]: Display-context CTA overrides
//! - [`format_countdown`]: Countdown banner formatting
//! - [`EventCalendar`]: Resolver bound to a milestone source and a clock
//! - [`Config`]: Application configuration management

pub mod cta;
pub mod error;
pub mod event;
pub mod phase;
pub mod query;
pub mod source;
pub mod storage;

pub use cta::{select_cta, CtaContext};
pub use error::{ConfigError, CoreError, SourceError};
pub use event::{parse_instant, EventMilestones, Milestone};
pub use phase::{
    format_countdown, resolve, Countdown, CtaButton, CtaLinks, CtaVariant, Phase, PhaseResolver,
    PhaseResult,
};
pub use query::{
    are_nominations_open, is_after_ceremony, is_in_phase, Clock, EventCalendar, FixedClock,
    SystemClock,
};
pub use source::{FileSource, MilestoneSource, StaticSource};
pub use storage::Config;
