//! Milestone record for the active awards event.
//!
//! An `EventMilestones` is a read-only snapshot handed to the resolver on
//! every call. Only the six instants and the two portal overrides influence
//! phase logic; name and location are carried for display.

mod instant;

pub use instant::{deserialize_lenient, parse_instant};

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// One of the six calendar instants of an awards event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Milestone {
    NominationsOpen,
    NominationsClose,
    FinalistsAnnounced,
    JudgingStart,
    JudgingEnd,
    Ceremony,
}

impl Milestone {
    /// All milestones in calendar order.
    pub const ALL: [Milestone; 6] = [
        Milestone::NominationsOpen,
        Milestone::NominationsClose,
        Milestone::FinalistsAnnounced,
        Milestone::JudgingStart,
        Milestone::JudgingEnd,
        Milestone::Ceremony,
    ];

    /// Human-readable label used in countdown copy.
    pub fn label(&self) -> &'static str {
        match self {
            Milestone::NominationsOpen => "Nominations open",
            Milestone::NominationsClose => "Nominations close",
            Milestone::FinalistsAnnounced => "Finalists announced",
            Milestone::JudgingStart => "Judging begins",
            Milestone::JudgingEnd => "Judging concludes",
            Milestone::Ceremony => "Awards ceremony",
        }
    }
}

/// Calendar milestones of the currently active event.
///
/// Instants are expected to be non-decreasing in `Milestone::ALL` order, but
/// nothing here enforces it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMilestones {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub location: Option<String>,

    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub nominations_open: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub nominations_close: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub finalists_announced: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub judging_start: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub judging_end: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub ceremony: Option<DateTime<Utc>>,

    #[serde(default)]
    pub nomination_portal_url: Option<String>,
    #[serde(default)]
    pub tickets_portal_url: Option<String>,
}

impl EventMilestones {
    /// Create an empty record with just a name and year.
    pub fn new(name: impl Into<String>, year: i32) -> Self {
        Self {
            name: name.into(),
            year: Some(year),
            ..Default::default()
        }
    }

    /// Builder-style setter for one milestone instant.
    pub fn with(mut self, milestone: Milestone, at: DateTime<Utc>) -> Self {
        *self.slot_mut(milestone) = Some(at);
        self
    }

    /// Look up a milestone instant.
    pub fn get(&self, milestone: Milestone) -> Option<DateTime<Utc>> {
        match milestone {
            Milestone::NominationsOpen => self.nominations_open,
            Milestone::NominationsClose => self.nominations_close,
            Milestone::FinalistsAnnounced => self.finalists_announced,
            Milestone::JudgingStart => self.judging_start,
            Milestone::JudgingEnd => self.judging_end,
            Milestone::Ceremony => self.ceremony,
        }
    }

    fn slot_mut(&mut self, milestone: Milestone) -> &mut Option<DateTime<Utc>> {
        match milestone {
            Milestone::NominationsOpen => &mut self.nominations_open,
            Milestone::NominationsClose => &mut self.nominations_close,
            Milestone::FinalistsAnnounced => &mut self.finalists_announced,
            Milestone::JudgingStart => &mut self.judging_start,
            Milestone::JudgingEnd => &mut self.judging_end,
            Milestone::Ceremony => &mut self.ceremony,
        }
    }

    /// Nomination portal override, ignoring blank values.
    pub fn nomination_portal(&self) -> Option<&str> {
        non_blank(self.nomination_portal_url.as_deref())
    }

    /// Tickets portal override, ignoring blank values.
    pub fn tickets_portal(&self) -> Option<&str> {
        non_blank(self.tickets_portal_url.as_deref())
    }

    /// Year used for the winners page: the record's year, else the
    /// ceremony's calendar year.
    pub fn event_year(&self) -> Option<i32> {
        self.year.or_else(|| self.ceremony.map(|c| c.year()))
    }

    /// Whether any of the six instants is set.
    pub fn has_any_milestone(&self) -> bool {
        Milestone::ALL.iter().any(|m| self.get(*m).is_some())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
