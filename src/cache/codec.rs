//! Entry Codec Module
//!
//! Serializes a structured result and its rendered artifact into the single
//! blob written to the backing store:
//!
//! ```text
//! {"result": <structured result>, "artifact_base64": "<standard base64>"}
//! ```
//!
//! One blob per entry means one atomic SET; a reader sees both halves or neither.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

// == Artifact ==
/// Opaque rendered document (e.g. a PDF report).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Artifact(Vec<u8>);

impl Artifact {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Artifact {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Artifact {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl AsRef<[u8]> for Artifact {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// == Cached Entry ==
/// A structured result paired with its artifact, as served from the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedEntry<R> {
    pub result: R,
    pub artifact: Artifact,
}

impl<R> CachedEntry<R> {
    pub fn new(result: R, artifact: Artifact) -> Self {
        Self { result, artifact }
    }

    pub fn into_parts(self) -> (R, Artifact) {
        (self.result, self.artifact)
    }
}

// == Codec Error ==
#[derive(Error, Debug)]
pub enum CodecError {
    /// Blob is not valid JSON or does not match the expected result schema
    #[error("invalid entry JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// `artifact_base64` is not valid base64
    #[error("invalid artifact encoding: {0}")]
    Base64(#[from] base64::DecodeError),
}

#[derive(Serialize)]
struct BlobOut<'a, R> {
    result: &'a R,
    artifact_base64: String,
}

#[derive(Deserialize)]
struct BlobIn<R> {
    result: R,
    artifact_base64: String,
}

// == Encode ==
/// Encodes a result and artifact into one blob.
pub fn encode<R: Serialize>(result: &R, artifact: &Artifact) -> Result<Vec<u8>, CodecError> {
    let blob = BlobOut {
        result,
        artifact_base64: STANDARD.encode(artifact.as_bytes()),
    };
    Ok(serde_json::to_vec(&blob)?)
}

// == Decode ==
/// Decodes a blob written by [`encode`]. Fails on malformed JSON, schema
/// drift in `result`, or a bad artifact encoding.
pub fn decode<R: DeserializeOwned>(blob: &[u8]) -> Result<CachedEntry<R>, CodecError> {
    let parsed: BlobIn<R> = serde_json::from_slice(blob)?;
    let artifact = STANDARD.decode(parsed.artifact_base64.as_bytes())?;
    Ok(CachedEntry::new(parsed.result, Artifact::from(artifact)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Summary {
        total: u32,
        valid: u32,
    }

    #[test]
    fn test_wire_layout() {
        let blob = encode(&json!({"total": 10}), &Artifact::new(b"PDF".to_vec())).unwrap();
        let value: Value = serde_json::from_slice(&blob).unwrap();

        assert_eq!(value["result"], json!({"total": 10}));
        assert_eq!(value["artifact_base64"], "UERG");
    }

    #[test]
    fn test_nested_result_and_binary_artifact() {
        let result = json!({
            "total": 10,
            "items": [{"text": "crashes on start", "labels": ["bug", "perf"], "score": 0.93}],
            "timing": {"scrape_ms": 1200, "classify_ms": 340},
            "source": null
        });
        let artifact = Artifact::new((0u8..=255).collect::<Vec<_>>());

        let entry: CachedEntry<Value> = decode(&encode(&result, &artifact).unwrap()).unwrap();

        assert_eq!(entry.result, result);
        assert_eq!(entry.artifact, artifact);
    }

    #[test]
    fn test_empty_artifact() {
        let blob = encode(&json!([]), &Artifact::default()).unwrap();
        let entry: CachedEntry<Value> = decode(&blob).unwrap();
        assert!(entry.artifact.is_empty());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let result = decode::<Value>(b"not json at all");
        assert!(matches!(result, Err(CodecError::Json(_))));
    }

    #[test]
    fn test_decode_rejects_missing_field() {
        let result = decode::<Value>(br#"{"result": {"total": 1}}"#);
        assert!(matches!(result, Err(CodecError::Json(_))));
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        let result = decode::<Value>(br#"{"result": 1, "artifact_base64": "***"}"#);
        assert!(matches!(result, Err(CodecError::Base64(_))));
    }

    #[test]
    fn test_decode_detects_schema_drift() {
        let blob = encode(&json!({"total": "ten"}), &Artifact::default()).unwrap();
        assert!(decode::<Summary>(&blob).is_err());
    }

    #[test]
    fn test_typed_result() {
        let summary = Summary { total: 10, valid: 3 };
        let blob = encode(&summary, &Artifact::new(b"PDF...".to_vec())).unwrap();

        let (result, artifact) = decode::<Summary>(&blob).unwrap().into_parts();
        assert_eq!(result, summary);
        assert_eq!(artifact.as_bytes(), b"PDF...");
    }
}
