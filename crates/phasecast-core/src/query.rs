//! Convenience predicates over the resolved phase.
//!
//! The free functions take the record and `now` explicitly. `EventCalendar`
//! wires a `MilestoneSource`, a `PhaseResolver` and a `Clock` together for
//! callers that just want "what phase is it now".

use chrono::{DateTime, Utc};

use crate::cta::{select_cta, CtaContext};
use crate::error::Result;
use crate::event::EventMilestones;
use crate::phase::{format_countdown, Countdown, CtaButton, Phase, PhaseResolver, PhaseResult};
use crate::source::MilestoneSource;

pub fn is_in_phase(milestones: Option<&EventMilestones>, now: DateTime<Utc>, phase: Phase) -> bool {
    crate::phase::resolve(milestones, now).phase == phase
}

pub fn are_nominations_open(milestones: Option<&EventMilestones>, now: DateTime<Utc>) -> bool {
    is_in_phase(milestones, now, Phase::NominationsOpen)
}

pub fn is_after_ceremony(milestones: Option<&EventMilestones>, now: DateTime<Utc>) -> bool {
    is_in_phase(milestones, now, Phase::PostCeremony)
}

/// Source of "now".
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Phase lookups against a live milestone source.
///
/// Each call fetches a fresh record and reads the clock once; nothing is
/// remembered between calls.
pub struct EventCalendar<S, C = SystemClock> {
    source: S,
    resolver: PhaseResolver,
    clock: C,
}

impl<S: MilestoneSource> EventCalendar<S, SystemClock> {
    pub fn new(source: S, resolver: PhaseResolver) -> Self {
        Self {
            source,
            resolver,
            clock: SystemClock,
        }
    }
}

impl<S: MilestoneSource, C: Clock> EventCalendar<S, C> {
    pub fn with_clock(source: S, resolver: PhaseResolver, clock: C) -> Self {
        Self {
            source,
            resolver,
            clock,
        }
    }

    /// Resolve the current phase.
    pub fn current(&self) -> Result<PhaseResult> {
        let record = self.source.active_event()?;
        Ok(self.resolver.resolve(record.as_ref(), self.clock.now()))
    }

    /// Resolve the current phase, treating a failing source as "no active
    /// event".
    pub fn current_or_fallback(&self) -> PhaseResult {
        let record = match self.source.active_event() {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "milestone source failed, resolving without a record");
                None
            }
        };
        self.resolver.resolve(record.as_ref(), self.clock.now())
    }

    pub fn countdown(&self) -> Result<Option<Countdown>> {
        Ok(format_countdown(&self.current()?))
    }

    pub fn cta(&self, context: CtaContext) -> Result<CtaButton> {
        Ok(select_cta(&self.current()?, context))
    }

    pub fn is_in_phase(&self, phase: Phase) -> Result<bool> {
        Ok(self.current()?.phase == phase)
    }

    pub fn are_nominations_open(&self) -> Result<bool> {
        self.is_in_phase(Phase::NominationsOpen)
    }

    pub fn is_after_ceremony(&self) -> Result<bool> {
        self.is_in_phase(Phase::PostCeremony)
    }
}
