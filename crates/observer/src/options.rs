//! The two accepted shapes of an observe() call.

use crate::error::{ObserverError, ObserverResult};
use entries::EntryType;
use serde::Deserialize;

/// Validated criteria for [`observe`](crate::PerformanceObserver::observe).
///
/// The two argument forms are a sum type decided at the call boundary, so a
/// half-filled options object is not representable past that point.
#[derive(Debug, Clone, PartialEq)]
pub enum ObserveOptions {
    /// Watch several entry types at once. This form always starts from an
    /// empty buffer and never replays history.
    EntryTypes(Vec<EntryType>),
    /// Watch a single entry type, optionally replaying entries of that type
    /// recorded before the call.
    SingleType {
        /// The one type to watch.
        entry_type: EntryType,
        /// Whether to seed delivery with already-recorded entries.
        buffered: bool,
    },
}

impl ObserveOptions {
    /// Multi-type criteria.
    pub fn entry_types<I, T>(types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<EntryType>,
    {
        Self::EntryTypes(types.into_iter().map(Into::into).collect())
    }

    /// Single-type criteria without replay.
    pub fn single(entry_type: impl Into<EntryType>) -> Self {
        Self::SingleType {
            entry_type: entry_type.into(),
            buffered: false,
        }
    }

    /// Single-type criteria with buffered replay.
    pub fn buffered(entry_type: impl Into<EntryType>) -> Self {
        Self::SingleType {
            entry_type: entry_type.into(),
            buffered: true,
        }
    }

    /// Parse criteria from a dynamic options value, e.g. one crossing a host
    /// bridge.
    pub fn from_json(value: &serde_json::Value) -> ObserverResult<Self> {
        let raw: RawObserveOptions = serde_json::from_value(value.clone())?;
        raw.try_into()
    }
}

/// Unvalidated observe() options as they arrive from a dynamic caller.
///
/// Keys accept both snake_case and the camelCase spelling used on the host
/// bridge. Validation happens in the [`TryFrom`] conversion to
/// [`ObserveOptions`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawObserveOptions {
    /// Multi-type form.
    #[serde(default, alias = "entryTypes")]
    pub entry_types: Option<Vec<EntryType>>,
    /// Single-type form.
    #[serde(default, rename = "type", alias = "entry_type")]
    pub entry_type: Option<EntryType>,
    /// Replay flag; only meaningful with the single-type form.
    #[serde(default)]
    pub buffered: Option<bool>,
}

impl TryFrom<RawObserveOptions> for ObserveOptions {
    type Error = ObserverError;

    fn try_from(raw: RawObserveOptions) -> ObserverResult<Self> {
        match (raw.entry_types, raw.entry_type) {
            // The multi-type form wins when both keys are present.
            (Some(types), _) => {
                if raw.buffered == Some(true) {
                    tracing::warn!(
                        "the buffered flag is not supported with the entry_types form and was ignored"
                    );
                }
                Ok(Self::EntryTypes(types))
            }
            (None, Some(entry_type)) => Ok(Self::SingleType {
                entry_type,
                buffered: raw.buffered.unwrap_or(false),
            }),
            (None, None) => Err(ObserverError::MissingEntryTypes),
        }
    }
}
