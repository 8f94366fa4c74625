//! Event phase resolution.
//!
//! ## Phases
//!
//! ```text
//! pre-nominations -> nominations-open -> nominations-closed
//!   -> finalists-announced -> judging-period -> finalists-announced
//!   -> post-ceremony
//! ```
//!
//! `finalists-announced` covers two windows: between the finalist
//! announcement and the start of judging, and between the end of judging and
//! the ceremony. Consumers that need to tell them apart must look at the
//! milestones themselves.
//!
//! There is no stored current phase. Every call re-evaluates the rule table
//! against the milestones and an injected `now`.

pub mod countdown;
pub mod resolver;
pub mod rules;

pub use countdown::{format_countdown, Countdown};
pub use resolver::{resolve, CtaLinks, PhaseResolver};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Mutually exclusive phase of the awards calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    PreNominations,
    NominationsOpen,
    NominationsClosed,
    FinalistsAnnounced,
    JudgingPeriod,
    PostCeremony,
}

impl Phase {
    pub const ALL: [Phase; 6] = [
        Phase::PreNominations,
        Phase::NominationsOpen,
        Phase::NominationsClosed,
        Phase::FinalistsAnnounced,
        Phase::JudgingPeriod,
        Phase::PostCeremony,
    ];

    /// Wire tag, e.g. `"nominations-open"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::PreNominations => "pre-nominations",
            Phase::NominationsOpen => "nominations-open",
            Phase::NominationsClosed => "nominations-closed",
            Phase::FinalistsAnnounced => "finalists-announced",
            Phase::JudgingPeriod => "judging-period",
            Phase::PostCeremony => "post-ceremony",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Phase::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown phase: {s}"))
    }
}

/// Visual weight of a CTA button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CtaVariant {
    Primary,
    Secondary,
    Outline,
}

/// Call-to-action the presentation layer should render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CtaButton {
    pub text: String,
    pub href: String,
    pub variant: CtaVariant,
}

impl CtaButton {
    pub fn primary(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            href: href.into(),
            variant: CtaVariant::Primary,
        }
    }
}

/// Outcome of one phase resolution. Serializes to a flat camelCase object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseResult {
    pub phase: Phase,
    pub days_until_next: u32,
    pub next_milestone: String,
    pub cta_button: CtaButton,
    pub status_message: String,
    pub is_urgent: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_tags_round_trip_through_from_str() {
        for phase in Phase::ALL {
            assert_eq!(phase.as_str().parse::<Phase>().unwrap(), phase);
        }
        assert!("judging".parse::<Phase>().is_err());
    }

    #[test]
    fn result_serializes_flat_camel_case() {
        let result = PhaseResult {
            phase: Phase::NominationsOpen,
            days_until_next: 3,
            next_milestone: "Nominations close: 1 March 2025".into(),
            cta_button: CtaButton::primary("Nominate Now", "/nominations/"),
            status_message: "Nominations close in 3 days".into(),
            is_urgent: true,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["phase"], "nominations-open");
        assert_eq!(json["daysUntilNext"], 3);
        assert_eq!(json["ctaButton"]["variant"], "primary");
        assert_eq!(json["isUrgent"], true);
        assert!(json.get("nextMilestone").is_some());
        assert!(json.get("statusMessage").is_some());
    }
}
