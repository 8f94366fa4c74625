//! Phase resolver.
//!
//! Maps `(milestones, now)` to a `PhaseResult`. Total and pure: every input,
//! including no record at all, yields a result, and nothing is cached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::countdown::{days_until, fine_countdown, in_units, URGENT_WITHIN_DAYS};
use super::rules::{first_match, CountdownUnit, PhaseRule, Urgency};
use super::{CtaButton, Phase, PhaseResult};
use crate::event::EventMilestones;

pub const REGISTER_INTEREST_PATH: &str = "/register-interest/";
pub const DEFAULT_NOMINATION_PORTAL_URL: &str = "/nominations/";
pub const DEFAULT_TICKETS_PORTAL_URL: &str = "/tickets/";

const GENERIC_NEXT_MILESTONE: &str = "Dates to be announced";
const GENERIC_STATUS: &str = "Register your interest to hear when nominations open";

/// Fallback links used when the milestone record carries no portal override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CtaLinks {
    pub nomination_portal: String,
    pub tickets_portal: String,
}

impl Default for CtaLinks {
    fn default() -> Self {
        Self {
            nomination_portal: DEFAULT_NOMINATION_PORTAL_URL.to_string(),
            tickets_portal: DEFAULT_TICKETS_PORTAL_URL.to_string(),
        }
    }
}

/// Resolves the current event phase.
#[derive(Debug, Clone, Default)]
pub struct PhaseResolver {
    links: CtaLinks,
}

impl PhaseResolver {
    pub fn new(links: CtaLinks) -> Self {
        Self { links }
    }

    pub fn links(&self) -> &CtaLinks {
        &self.links
    }

    /// Classify `now` against the milestone record.
    pub fn resolve(&self, milestones: Option<&EventMilestones>, now: DateTime<Utc>) -> PhaseResult {
        let Some(record) = milestones else {
            let result = self.generic(None);
            tracing::debug!(
                rule = "no-record",
                phase = %result.phase,
                "resolved event phase"
            );
            return result;
        };

        match first_match(record, now) {
            Some((index, rule)) => {
                let result = self.apply(rule, record, now);
                tracing::debug!(
                    event = %record.name,
                    rule = index,
                    phase = %result.phase,
                    days = result.days_until_next,
                    urgent = result.is_urgent,
                    "resolved event phase"
                );
                result
            }
            None => {
                let result = self.generic(Some(record));
                tracing::debug!(
                    event = %record.name,
                    rule = "fallback",
                    phase = %result.phase,
                    "resolved event phase"
                );
                result
            }
        }
    }

    fn apply(&self, rule: &PhaseRule, record: &EventMilestones, now: DateTime<Utc>) -> PhaseResult {
        let cta_button = self.default_cta(rule.phase, Some(record));

        let target = rule
            .target()
            .and_then(|milestone| record.get(milestone).map(|at| (milestone, at)));

        let Some((milestone, at)) = target else {
            return self.closing(rule.phase, record, cta_button);
        };

        let label = milestone.label();
        let next_milestone = format!("{label}: {}", display_date(at));

        let (days_until_next, status_message, in_hours) = match rule.unit {
            CountdownUnit::Days => {
                let days = days_until(at, now);
                let when = if days == 0 {
                    "today".to_string()
                } else {
                    in_units(days, "day")
                };
                (days, format!("{label} {when}"), false)
            }
            CountdownUnit::HourSensitive => {
                let c = fine_countdown(at, now);
                (
                    c.days,
                    format!("{label} {}", c.message.to_lowercase()),
                    c.in_hours,
                )
            }
        };

        let is_urgent = match rule.urgency {
            Urgency::WithinWeek => days_until_next <= URGENT_WITHIN_DAYS,
            Urgency::WithinDayOrHours => days_until_next <= 1 || in_hours,
            Urgency::Never => false,
        };

        PhaseResult {
            phase: rule.phase,
            days_until_next,
            next_milestone,
            cta_button,
            status_message,
            is_urgent,
        }
    }

    /// Result for windows with nothing left to count down to.
    fn closing(&self, phase: Phase, record: &EventMilestones, cta_button: CtaButton) -> PhaseResult {
        let next_milestone = match record.ceremony {
            Some(at) => format!("Winners announced: {}", display_date(at)),
            None => "Winners announced".to_string(),
        };
        let status_message = match record.event_year() {
            Some(year) => format!("The {year} winners and finalists have been announced"),
            None => "The winners and finalists have been announced".to_string(),
        };
        PhaseResult {
            phase,
            days_until_next: 0,
            next_milestone,
            cta_button,
            status_message,
            is_urgent: false,
        }
    }

    fn generic(&self, record: Option<&EventMilestones>) -> PhaseResult {
        PhaseResult {
            phase: Phase::PreNominations,
            days_until_next: 0,
            next_milestone: GENERIC_NEXT_MILESTONE.to_string(),
            cta_button: self.default_cta(Phase::PreNominations, record),
            status_message: GENERIC_STATUS.to_string(),
            is_urgent: false,
        }
    }

    /// Default CTA for a phase, before any display-context override.
    pub fn default_cta(&self, phase: Phase, record: Option<&EventMilestones>) -> CtaButton {
        match phase {
            Phase::PreNominations => CtaButton::primary("Register Interest", REGISTER_INTEREST_PATH),
            Phase::NominationsOpen => CtaButton::primary(
                "Nominate Now",
                record
                    .and_then(EventMilestones::nomination_portal)
                    .unwrap_or(&self.links.nomination_portal),
            ),
            Phase::NominationsClosed | Phase::FinalistsAnnounced | Phase::JudgingPeriod => {
                CtaButton::primary(
                    "Secure Tickets",
                    record
                        .and_then(EventMilestones::tickets_portal)
                        .unwrap_or(&self.links.tickets_portal),
                )
            }
            Phase::PostCeremony => CtaButton::primary(
                "View Winners",
                winners_path(record.and_then(EventMilestones::event_year)),
            ),
        }
    }
}

/// Resolve with the built-in fallback links.
pub fn resolve(milestones: Option<&EventMilestones>, now: DateTime<Utc>) -> PhaseResult {
    PhaseResolver::default().resolve(milestones, now)
}

fn winners_path(year: Option<i32>) -> String {
    match year {
        Some(year) => format!("/winners-and-finalists-{year}/"),
        None => "/winners-and-finalists/".to_string(),
    }
}

fn display_date(at: DateTime<Utc>) -> String {
    at.format("%-d %B %Y").to_string()
}
