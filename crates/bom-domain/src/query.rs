//! Query batches - the unit recorded in the provenance log

use serde::{Deserialize, Deserializer, Serialize};

/// Prompt identifier recorded when instructions come from the local prompt file
pub const LOCAL_PROMPT_ID: &str = "local";

/// Identifies which prompt produced a batch
///
/// Either a remotely hosted prompt template (`id` + optional `version`) or the
/// local instruction file, recorded as [`LOCAL_PROMPT_ID`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRef {
    /// Prompt identifier
    pub id: String,

    /// Prompt version, when the provider versions its templates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl PromptRef {
    /// Reference to the local instruction file
    pub fn local() -> Self {
        Self {
            id: LOCAL_PROMPT_ID.to_string(),
            version: None,
        }
    }

    /// Reference to a hosted prompt template
    pub fn hosted(id: impl Into<String>, version: Option<String>) -> Self {
        Self {
            id: id.into(),
            version,
        }
    }

    /// Whether this refers to a hosted template rather than the local file
    pub fn is_hosted(&self) -> bool {
        self.id != LOCAL_PROMPT_ID
    }
}

/// One generation call's output, logged as a unit
///
/// Created once by the query generator and never mutated afterwards. The
/// serialized field names are the on-disk record format of the provenance log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryBatch {
    /// UTC timestamp with second precision (`2026-10-16T09:30:00Z`)
    #[serde(rename = "ts")]
    pub timestamp: String,

    /// Model identifier used for generation (empty when never recorded)
    #[serde(default, deserialize_with = "null_as_default")]
    pub model: String,

    /// Prompt identifier (hosted template id or `"local"`)
    #[serde(default = "local_prompt_id")]
    pub prompt_id: String,

    /// Hosted prompt version, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_version: Option<String>,

    /// SHA-256 hex digest of `prompt`
    pub prompt_sha256: String,

    /// Exact input text sent to the provider
    pub prompt: String,

    /// Raw provider output
    pub raw: String,

    /// Ordered, distinct, trimmed queries parsed from `raw`
    #[serde(default, deserialize_with = "null_as_default")]
    pub queries: Vec<String>,

    /// SHA-256 hex digest of `queries` joined with `\n` (absent when empty)
    #[serde(default)]
    pub queries_sha256: Option<String>,
}

fn local_prompt_id() -> String {
    LOCAL_PROMPT_ID.to_string()
}

// Records written before model and prompt tracking carry `null` here
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl QueryBatch {
    /// The prompt reference this batch was generated from
    pub fn prompt_ref(&self) -> PromptRef {
        PromptRef {
            id: self.prompt_id.clone(),
            version: self.prompt_version.clone(),
        }
    }

    /// Number of queries in the batch
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    /// Whether the batch carries no queries
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}
