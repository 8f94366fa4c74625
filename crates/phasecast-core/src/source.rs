//! Milestone sources.
//!
//! The resolver never fetches anything itself. A `MilestoneSource` hands it
//! the active event's record, or `None` when no event is active.

use std::path::{Path, PathBuf};

use crate::error::SourceError;
use crate::event::EventMilestones;

/// Supplies the milestone record of the currently active event.
pub trait MilestoneSource: Send + Sync {
    /// Fetch the active record. `Ok(None)` means no event is active.
    fn active_event(&self) -> Result<Option<EventMilestones>, SourceError>;
}

impl<T: MilestoneSource + ?Sized> MilestoneSource for Box<T> {
    fn active_event(&self) -> Result<Option<EventMilestones>, SourceError> {
        (**self).active_event()
    }
}

/// In-memory source, mainly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    record: Option<EventMilestones>,
}

impl StaticSource {
    pub fn new(record: Option<EventMilestones>) -> Self {
        Self { record }
    }

    pub fn empty() -> Self {
        Self { record: None }
    }
}

impl MilestoneSource for StaticSource {
    fn active_event(&self) -> Result<Option<EventMilestones>, SourceError> {
        Ok(self.record.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Json,
    Toml,
}

/// Reads the record from a `.json` or `.toml` file on every fetch.
///
/// A missing file means no active event. An empty file (or a JSON `null`)
/// does too.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    format: FileFormat,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, SourceError> {
        let path = path.into();
        let format = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => FileFormat::Json,
            Some(ext) if ext.eq_ignore_ascii_case("toml") => FileFormat::Toml,
            _ => return Err(SourceError::UnsupportedFormat(path)),
        };
        Ok(Self { path, format })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse(&self, content: &str) -> Result<Option<EventMilestones>, SourceError> {
        if content.trim().is_empty() {
            return Ok(None);
        }
        let parse_failed = |message: String| SourceError::ParseFailed {
            path: self.path.clone(),
            message,
        };
        match self.format {
            FileFormat::Json => serde_json::from_str::<Option<EventMilestones>>(content)
                .map_err(|e| parse_failed(e.to_string())),
            FileFormat::Toml => toml::from_str::<EventMilestones>(content)
                .map(Some)
                .map_err(|e| parse_failed(e.to_string())),
        }
    }
}

impl MilestoneSource for FileSource {
    fn active_event(&self) -> Result<Option<EventMilestones>, SourceError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no milestone file, no active event");
                return Ok(None);
            }
            Err(source) => {
                return Err(SourceError::ReadFailed {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let record = self.parse(&content)?;
        if let Some(ref r) = record {
            tracing::info!(
                path = %self.path.display(),
                event = %r.name,
                "loaded milestone record"
            );
            if !r.has_any_milestone() {
                tracing::warn!(event = %r.name, "milestone record has no usable dates");
            }
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_source_returns_its_record() {
        let source = StaticSource::new(Some(EventMilestones::new("Awards", 2025)));
        let record = source.active_event().unwrap().unwrap();
        assert_eq!(record.name, "Awards");
        assert!(StaticSource::empty().active_event().unwrap().is_none());
    }

    #[test]
    fn file_source_rejects_unknown_extension() {
        let err = FileSource::new("milestones.yaml").unwrap_err();
        assert!(matches!(err, SourceError::UnsupportedFormat(_)));
    }

    #[test]
    fn parse_handles_null_and_blank() {
        let json = FileSource::new("m.json").unwrap();
        assert!(json.parse("null").unwrap().is_none());
        assert!(json.parse("  \n").unwrap().is_none());
        let toml_source = FileSource::new("m.TOML").unwrap();
        assert!(toml_source.parse("").unwrap().is_none());
    }

    #[test]
    fn parse_reports_malformed_content() {
        let json = FileSource::new("m.json").unwrap();
        let err = json.parse("{ not json").unwrap_err();
        assert!(matches!(err, SourceError::ParseFailed { .. }));
    }
}
