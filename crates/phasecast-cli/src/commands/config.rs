use clap::Subcommand;
use phasecast_core::{Config, FileSource, PhaseResolver};

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "links.tickets_portal")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List stored values and the links and milestone file phase commands will use
    List,
    /// Reset config to defaults
    Reset,
}

/// Stored config plus what the `phase` commands derive from it.
fn listing(config: &Config) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let resolver = PhaseResolver::new(config.cta_links());
    let source = config.milestones_path().map(FileSource::new).transpose()?;
    Ok(serde_json::json!({
        "stored": config,
        "effective": {
            "ctaLinks": resolver.links(),
            "milestonesFile": source.as_ref().map(|s| s.path().display().to_string()),
        },
    }))
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            tracing::info!(%key, %value, "config updated");
            println!("ok");
        }
        ConfigAction::List => {
            let config = Config::load()?;
            println!("{}", serde_json::to_string_pretty(&listing(&config)?)?);
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
