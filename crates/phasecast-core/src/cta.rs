//! Display-context CTA overrides.
//!
//! The resolver produces one default CTA per phase. Some page regions want
//! different wording; those exceptions live in a flat `(context, phase)`
//! table so adding a context never touches the others.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::phase::resolver::REGISTER_INTEREST_PATH;
use crate::phase::{CtaButton, CtaVariant, Phase, PhaseResult};

/// Page region the CTA is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CtaContext {
    Header,
    Hero,
    Footer,
    Travel,
}

impl CtaContext {
    pub const ALL: [CtaContext; 4] = [
        CtaContext::Header,
        CtaContext::Hero,
        CtaContext::Footer,
        CtaContext::Travel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CtaContext::Header => "header",
            CtaContext::Hero => "hero",
            CtaContext::Footer => "footer",
            CtaContext::Travel => "travel",
        }
    }
}

impl fmt::Display for CtaContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CtaContext {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CtaContext::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown CTA context: {s}"))
    }
}

#[derive(Debug, Clone, Copy)]
enum PhaseMatch {
    Is(Phase),
    IsNot(Phase),
}

impl PhaseMatch {
    fn accepts(&self, phase: Phase) -> bool {
        match self {
            PhaseMatch::Is(p) => *p == phase,
            PhaseMatch::IsNot(p) => *p != phase,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Override {
    /// Change the wording, keep link and variant.
    Text(&'static str),
    /// Replace the whole button.
    Button {
        text: &'static str,
        href: &'static str,
        variant: CtaVariant,
    },
}

impl Override {
    fn apply(&self, default: &CtaButton) -> CtaButton {
        match self {
            Override::Text(text) => CtaButton {
                text: (*text).to_string(),
                ..default.clone()
            },
            Override::Button {
                text,
                href,
                variant,
            } => CtaButton {
                text: (*text).to_string(),
                href: (*href).to_string(),
                variant: *variant,
            },
        }
    }
}

// Header has no entries: it always shows the resolver's default.
const OVERRIDES: &[(CtaContext, PhaseMatch, Override)] = &[
    (
        CtaContext::Hero,
        PhaseMatch::Is(Phase::NominationsOpen),
        Override::Text("Submit Your Nomination"),
    ),
    (
        CtaContext::Footer,
        PhaseMatch::Is(Phase::PostCeremony),
        Override::Button {
            text: "Register Interest Now",
            href: REGISTER_INTEREST_PATH,
            variant: CtaVariant::Primary,
        },
    ),
    (
        CtaContext::Travel,
        PhaseMatch::IsNot(Phase::PostCeremony),
        Override::Text("Secure Tickets"),
    ),
];

/// CTA for a display context, falling back to the resolver's default.
pub fn select_cta(result: &PhaseResult, context: CtaContext) -> CtaButton {
    OVERRIDES
        .iter()
        .find(|(ctx, phase, _)| *ctx == context && phase.accepts(result.phase))
        .map(|(_, _, rule)| rule.apply(&result.cta_button))
        .unwrap_or_else(|| result.cta_button.clone())
}
