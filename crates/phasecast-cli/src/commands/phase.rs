use std::path::PathBuf;

use chrono::Utc;
use clap::{Args, Subcommand};
use phasecast_core::{
    parse_instant, Config, CtaContext, EventCalendar, FileSource, FixedClock, MilestoneSource,
    Phase, PhaseResolver, StaticSource,
};

/// Where and when to resolve.
#[derive(Args, Debug, Clone, Default)]
pub struct EventArgs {
    /// Resolve at this instant instead of now (RFC 3339 or YYYY-MM-DD)
    #[arg(long)]
    pub at: Option<String>,
    /// Milestone file (.json or .toml); defaults to source.milestones_path
    #[arg(long)]
    pub milestones: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum PhaseAction {
    /// Print the resolved phase as JSON
    Status {
        #[command(flatten)]
        event: EventArgs,
    },
    /// Print the countdown banner as JSON (null when there is none)
    Countdown {
        #[command(flatten)]
        event: EventArgs,
    },
    /// Print the call-to-action for a page region
    Cta {
        /// header, hero, footer or travel
        #[arg(long, default_value = "header")]
        context: CtaContext,
        #[command(flatten)]
        event: EventArgs,
    },
    /// Check whether the event is in the given phase
    Is {
        /// Phase tag, e.g. nominations-open
        phase: Phase,
        #[command(flatten)]
        event: EventArgs,
    },
    /// Check whether nominations are open
    NominationsOpen {
        #[command(flatten)]
        event: EventArgs,
    },
    /// Check whether the ceremony has taken place
    AfterCeremony {
        #[command(flatten)]
        event: EventArgs,
    },
}

type Calendar = EventCalendar<Box<dyn MilestoneSource>, FixedClock>;

fn calendar(args: &EventArgs, config: &Config) -> Result<Calendar, Box<dyn std::error::Error>> {
    let now = match args.at.as_deref() {
        Some(raw) => parse_instant(raw).ok_or_else(|| format!("cannot parse --at value '{raw}'"))?,
        None => Utc::now(),
    };

    let source: Box<dyn MilestoneSource> =
        match args.milestones.clone().or_else(|| config.milestones_path()) {
            Some(path) => Box::new(FileSource::new(path)?),
            None => {
                tracing::info!("no milestone file configured, resolving without an event");
                Box::new(StaticSource::empty())
            }
        };

    let resolver = PhaseResolver::new(config.cta_links());
    Ok(EventCalendar::with_clock(source, resolver, FixedClock(now)))
}

pub fn run(action: PhaseAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();

    match action {
        PhaseAction::Status { event } => {
            let result = calendar(&event, &config)?.current()?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        PhaseAction::Countdown { event } => {
            let countdown = calendar(&event, &config)?.countdown()?;
            println!("{}", serde_json::to_string_pretty(&countdown)?);
        }
        PhaseAction::Cta { context, event } => {
            let cta = calendar(&event, &config)?.cta(context)?;
            println!("{}", serde_json::to_string_pretty(&cta)?);
        }
        PhaseAction::Is { phase, event } => {
            println!("{}", calendar(&event, &config)?.is_in_phase(phase)?);
        }
        PhaseAction::NominationsOpen { event } => {
            println!("{}", calendar(&event, &config)?.are_nominations_open()?);
        }
        PhaseAction::AfterCeremony { event } => {
            println!("{}", calendar(&event, &config)?.is_after_ceremony()?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use phasecast_core::EventMilestones;

    #[test]
    fn calendar_rejects_bad_at() {
        let args = EventArgs {
            at: Some("next tuesday".into()),
            milestones: None,
        };
        assert!(calendar(&args, &Config::default()).is_err());
    }

    #[test]
    fn calendar_without_file_resolves_generic() {
        let args = EventArgs {
            at: Some("2025-05-01".into()),
            milestones: None,
        };
        let result = calendar(&args, &Config::default()).unwrap().current().unwrap();
        assert_eq!(result.phase, Phase::PreNominations);
        assert_eq!(result.cta_button.href, "/register-interest/");
    }

    #[test]
    fn calendar_reads_milestone_file_and_configured_links() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("milestones.json");
        let record = EventMilestones {
            nominations_open: parse_instant("2025-01-01"),
            nominations_close: parse_instant("2025-03-01"),
            ..EventMilestones::new("CLI Awards", 2025)
        };
        std::fs::write(&path, serde_json::to_string(&record).unwrap()).unwrap();

        let mut config = Config::default();
        config
            .apply("links.nomination_portal", "https://portal.example.com/")
            .unwrap();
        let args = EventArgs {
            at: Some("2025-02-01T12:00:00Z".into()),
            milestones: Some(path),
        };
        let cal = calendar(&args, &config).unwrap();
        assert!(cal.are_nominations_open().unwrap());
        assert_eq!(
            cal.cta(CtaContext::Header).unwrap().href,
            "https://portal.example.com/"
        );
    }
}
