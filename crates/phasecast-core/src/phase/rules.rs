//! Ordered phase rule table.
//!
//! Rules are evaluated top to bottom and the first match wins. A rule only
//! matches when every milestone it references is present, so sparse or
//! out-of-order records fall through to the generic fallback instead of
//! failing.

use chrono::{DateTime, Utc};

use super::Phase;
use crate::event::{EventMilestones, Milestone};

/// One side of a phase window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// No constraint on this side.
    Open,
    /// `now` may equal the milestone.
    Inclusive(Milestone),
    /// `now` must be strictly beyond the milestone.
    Exclusive(Milestone),
}

impl Bound {
    pub fn milestone(&self) -> Option<Milestone> {
        match self {
            Bound::Open => None,
            Bound::Inclusive(m) | Bound::Exclusive(m) => Some(*m),
        }
    }

    /// `None` when the referenced milestone is missing.
    fn admits_after(&self, record: &EventMilestones, now: DateTime<Utc>) -> Option<bool> {
        match self {
            Bound::Open => Some(true),
            Bound::Inclusive(m) => record.get(*m).map(|at| now >= at),
            Bound::Exclusive(m) => record.get(*m).map(|at| now > at),
        }
    }

    fn admits_before(&self, record: &EventMilestones, now: DateTime<Utc>) -> Option<bool> {
        match self {
            Bound::Open => Some(true),
            Bound::Inclusive(m) => record.get(*m).map(|at| now <= at),
            Bound::Exclusive(m) => record.get(*m).map(|at| now < at),
        }
    }
}

/// How the distance to the window's closing milestone is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownUnit {
    /// Whole days from the start of the current UTC day.
    Days,
    /// Full timestamp, with hour granularity inside the final day.
    HourSensitive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    /// Urgent at or below `URGENT_WITHIN_DAYS`.
    WithinWeek,
    /// Urgent at one day or less, or whenever counting in hours.
    WithinDayOrHours,
    Never,
}

/// A phase window with its countdown and urgency behaviour.
///
/// The countdown target is the milestone of the `before` bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseRule {
    pub phase: Phase,
    pub after: Bound,
    pub before: Bound,
    pub unit: CountdownUnit,
    pub urgency: Urgency,
}

impl PhaseRule {
    pub fn matches(&self, record: &EventMilestones, now: DateTime<Utc>) -> bool {
        matches!(self.after.admits_after(record, now), Some(true))
            && matches!(self.before.admits_before(record, now), Some(true))
    }

    /// Milestone this window counts down to, if any.
    pub fn target(&self) -> Option<Milestone> {
        self.before.milestone()
    }
}

use Bound::{Exclusive, Inclusive, Open};
use Milestone::*;

pub const PHASE_RULES: [PhaseRule; 7] = [
    PhaseRule {
        phase: Phase::PreNominations,
        after: Open,
        before: Exclusive(NominationsOpen),
        unit: CountdownUnit::Days,
        urgency: Urgency::WithinWeek,
    },
    PhaseRule {
        phase: Phase::NominationsOpen,
        after: Inclusive(NominationsOpen),
        before: Inclusive(NominationsClose),
        unit: CountdownUnit::Days,
        urgency: Urgency::WithinWeek,
    },
    PhaseRule {
        phase: Phase::NominationsClosed,
        after: Exclusive(NominationsClose),
        before: Exclusive(FinalistsAnnounced),
        unit: CountdownUnit::HourSensitive,
        urgency: Urgency::WithinDayOrHours,
    },
    PhaseRule {
        phase: Phase::FinalistsAnnounced,
        after: Inclusive(FinalistsAnnounced),
        before: Exclusive(JudgingStart),
        unit: CountdownUnit::Days,
        urgency: Urgency::Never,
    },
    PhaseRule {
        phase: Phase::JudgingPeriod,
        after: Inclusive(JudgingStart),
        before: Inclusive(JudgingEnd),
        unit: CountdownUnit::Days,
        urgency: Urgency::Never,
    },
    // Same tag as the pre-judging window; kept as the site has always
    // reported it.
    PhaseRule {
        phase: Phase::FinalistsAnnounced,
        after: Exclusive(JudgingEnd),
        before: Exclusive(Ceremony),
        unit: CountdownUnit::Days,
        urgency: Urgency::WithinWeek,
    },
    PhaseRule {
        phase: Phase::PostCeremony,
        after: Exclusive(Ceremony),
        before: Open,
        unit: CountdownUnit::Days,
        urgency: Urgency::Never,
    },
];

/// First rule matching `now`, with its index in `PHASE_RULES`.
pub fn first_match(
    record: &EventMilestones,
    now: DateTime<Utc>,
) -> Option<(usize, &'static PhaseRule)> {
    PHASE_RULES
        .iter()
        .enumerate()
        .find(|(_, rule)| rule.matches(record, now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn calendar() -> EventMilestones {
        let b = base();
        EventMilestones::new("Awards", 2025)
            .with(NominationsOpen, b)
            .with(NominationsClose, b + Duration::days(30))
            .with(FinalistsAnnounced, b + Duration::days(40))
            .with(JudgingStart, b + Duration::days(50))
            .with(JudgingEnd, b + Duration::days(60))
            .with(Ceremony, b + Duration::days(70))
    }

    fn index_at(record: &EventMilestones, now: DateTime<Utc>) -> Option<usize> {
        first_match(record, now).map(|(i, _)| i)
    }

    #[test]
    fn each_window_maps_to_its_rule() {
        let m = calendar();
        let b = base();
        assert_eq!(index_at(&m, b - Duration::days(1)), Some(0));
        assert_eq!(index_at(&m, b + Duration::days(10)), Some(1));
        assert_eq!(index_at(&m, b + Duration::days(35)), Some(2));
        assert_eq!(index_at(&m, b + Duration::days(45)), Some(3));
        assert_eq!(index_at(&m, b + Duration::days(55)), Some(4));
        assert_eq!(index_at(&m, b + Duration::days(65)), Some(5));
        assert_eq!(index_at(&m, b + Duration::days(75)), Some(6));
    }

    #[test]
    fn boundaries_follow_inclusive_and_exclusive_sides() {
        let m = calendar();
        let b = base();
        // nominationsOpen and nominationsClose both belong to the open window.
        assert_eq!(index_at(&m, b), Some(1));
        assert_eq!(index_at(&m, b + Duration::days(30)), Some(1));
        // finalistsAnnounced starts the finalists window.
        assert_eq!(index_at(&m, b + Duration::days(40)), Some(3));
        // judging window is closed on both ends.
        assert_eq!(index_at(&m, b + Duration::days(50)), Some(4));
        assert_eq!(index_at(&m, b + Duration::days(60)), Some(4));
        // the ceremony instant itself matches nothing.
        assert_eq!(index_at(&m, b + Duration::days(70)), None);
    }

    #[test]
    fn missing_milestones_disable_rules() {
        let b = base();
        let m = EventMilestones::new("Awards", 2025).with(NominationsClose, b);
        // Without nominationsOpen, neither of the first two rules can match.
        assert_eq!(index_at(&m, b - Duration::days(1)), None);
        assert_eq!(index_at(&m, b + Duration::days(1)), None);
    }

    #[test]
    fn empty_record_matches_nothing() {
        assert_eq!(index_at(&EventMilestones::default(), base()), None);
    }

    #[test]
    fn targets_are_upper_bounds() {
        let targets: Vec<_> = PHASE_RULES.iter().map(|r| r.target()).collect();
        assert_eq!(
            targets,
            vec![
                Some(NominationsOpen),
                Some(NominationsClose),
                Some(FinalistsAnnounced),
                Some(JudgingStart),
                Some(JudgingEnd),
                Some(Ceremony),
                None,
            ]
        );
    }

    #[test]
    fn only_the_finalists_announcement_is_hour_sensitive() {
        let hour_rules: Vec<_> = PHASE_RULES
            .iter()
            .filter(|r| r.unit == CountdownUnit::HourSensitive)
            .map(|r| r.phase)
            .collect();
        assert_eq!(hour_rules, vec![Phase::NominationsClosed]);
    }
}
