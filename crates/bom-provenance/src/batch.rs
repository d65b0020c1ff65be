//! Sealing query batches: timestamps and content hashes

use bom_domain::{PromptRef, QueryBatch};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// SHA-256 hex digest of a UTF-8 string
pub fn sha256_hex(text: &str) -> String {
    format!("{:x}", Sha256::digest(text.as_bytes()))
}

/// Content hash of an ordered query list
///
/// Hashes the queries joined with `\n`; `None` for an empty list.
pub fn queries_hash(queries: &[String]) -> Option<String> {
    if queries.is_empty() {
        return None;
    }
    Some(sha256_hex(&queries.join("\n")))
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Build an immutable batch stamped with the current time
pub fn seal_batch(
    model: &str,
    prompt: &PromptRef,
    prompt_text: &str,
    raw: &str,
    queries: Vec<String>,
) -> QueryBatch {
    seal_batch_at(Utc::now(), model, prompt, prompt_text, raw, queries)
}

/// Build an immutable batch stamped with `at`
pub fn seal_batch_at(
    at: DateTime<Utc>,
    model: &str,
    prompt: &PromptRef,
    prompt_text: &str,
    raw: &str,
    queries: Vec<String>,
) -> QueryBatch {
    QueryBatch {
        timestamp: format_timestamp(at),
        model: model.to_string(),
        prompt_id: prompt.id.clone(),
        prompt_version: prompt.version.clone(),
        prompt_sha256: sha256_hex(prompt_text),
        prompt: prompt_text.to_string(),
        raw: raw.to_string(),
        queries_sha256: queries_hash(&queries),
        queries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_sha256_known_value() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_queries_hash_empty_is_none() {
        assert!(queries_hash(&[]).is_none());
    }

    #[test]
    fn test_queries_hash_is_order_sensitive() {
        let ab = queries_hash(&["a".to_string(), "b".to_string()]);
        let ba = queries_hash(&["b".to_string(), "a".to_string()]);
        assert_ne!(ab, ba);
        assert_eq!(ab, Some(sha256_hex("a\nb")));
    }

    #[test]
    fn test_timestamp_second_precision() {
        let at = Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 5).unwrap();
        let batch = seal_batch_at(
            at,
            "m",
            &PromptRef::hosted("pmpt_1", Some("2".to_string())),
            "p",
            "raw",
            vec!["q".to_string()],
        );
        assert_eq!(batch.timestamp, "2026-10-16T09:30:05Z");
        assert_eq!(batch.prompt_id, "pmpt_1");
        assert_eq!(batch.prompt_version.as_deref(), Some("2"));
        assert_eq!(batch.prompt_sha256, sha256_hex("p"));
        assert_eq!(batch.queries_sha256, Some(sha256_hex("q")));
    }

    #[test]
    fn test_seal_batch_stamps_utc_seconds() {
        let ts = seal_batch("m", &PromptRef::local(), "p", "", vec![]).timestamp;
        assert_eq!(ts.len(), 20);
        assert!(ts.ends_with('Z'));
    }
}
