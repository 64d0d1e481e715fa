//! Performance entry record and its category tags.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Category tag of a recorded performance entry.
///
/// The known tags are the categories a host records natively. Tags this
/// subsystem does not recognize are preserved as [`EntryType::Other`], so a
/// subscription against them stays representable even though no host source
/// will ever produce matching entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntryType {
    /// A named point in time.
    Mark,
    /// A named interval, usually between two marks.
    Measure,
    /// A resource load timing.
    Resource,
    /// A named numeric sample.
    Metric,
    /// A timing recorded by the host's native bridge.
    BridgeMark,
    /// A tag outside the recognized set.
    Other(String),
}

impl EntryType {
    /// The string tag for this type.
    pub fn as_str(&self) -> &str {
        match self {
            EntryType::Mark => "mark",
            EntryType::Measure => "measure",
            EntryType::Resource => "resource",
            EntryType::Metric => "metric",
            EntryType::BridgeMark => "bridge-mark",
            EntryType::Other(tag) => tag,
        }
    }

    /// Whether any host source actually records entries of this type.
    pub fn is_supported(&self) -> bool {
        !matches!(self, EntryType::Other(_))
    }
}

impl From<&str> for EntryType {
    fn from(tag: &str) -> Self {
        match tag {
            "mark" => EntryType::Mark,
            "measure" => EntryType::Measure,
            "resource" => EntryType::Resource,
            "metric" => EntryType::Metric,
            "bridge-mark" => EntryType::BridgeMark,
            _ => EntryType::Other(tag.to_string()),
        }
    }
}

impl From<String> for EntryType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "mark" => EntryType::Mark,
            "measure" => EntryType::Measure,
            "resource" => EntryType::Resource,
            "metric" => EntryType::Metric,
            "bridge-mark" => EntryType::BridgeMark,
            _ => EntryType::Other(tag),
        }
    }
}

impl From<EntryType> for String {
    fn from(entry_type: EntryType) -> Self {
        match entry_type {
            EntryType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single recorded performance event.
///
/// The observation core only ever looks at `name` and `entry_type`; timing
/// fields and the optional `detail` payload pass through it untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceEntry {
    /// Name of the event.
    pub name: String,
    /// Category tag.
    pub entry_type: EntryType,
    /// Start time in milliseconds on the timeline clock.
    pub start_time: f64,
    /// Duration in milliseconds; zero for instantaneous entries.
    pub duration: f64,
    /// Opaque payload attached by the recorder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

impl PerformanceEntry {
    /// Create an entry with the given timing fields.
    pub fn new(
        name: impl Into<String>,
        entry_type: EntryType,
        start_time: f64,
        duration: f64,
    ) -> Self {
        Self {
            name: name.into(),
            entry_type,
            start_time,
            duration,
            detail: None,
        }
    }

    /// Create a mark: an instantaneous named point in time.
    pub fn mark(name: impl Into<String>, start_time: f64) -> Self {
        Self::new(name, EntryType::Mark, start_time, 0.0)
    }

    /// Create a measure covering an interval.
    pub fn measure(name: impl Into<String>, start_time: f64, duration: f64) -> Self {
        Self::new(name, EntryType::Measure, start_time, duration)
    }

    /// Attach an opaque payload to the entry.
    pub fn with_detail(mut self, detail: impl Into<Value>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// End time of the entry in milliseconds.
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }
}
