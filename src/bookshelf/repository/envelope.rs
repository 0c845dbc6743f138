use crate::store::Layout;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const CATALOG_VERSION: &str = "1.0";

/// Catalog-level information stored next to the records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogMetadata {
    pub version: String,
    pub total_records: usize,
    pub last_updated: DateTime<Utc>,
}

impl Default for CatalogMetadata {
    fn default() -> Self {
        Self {
            version: CATALOG_VERSION.to_string(),
            total_records: 0,
            last_updated: Utc::now(),
        }
    }
}

#[derive(Deserialize)]
struct EnvelopeIn<T> {
    #[serde(default)]
    metadata: Option<CatalogMetadata>,
    #[serde(default = "Vec::new")]
    records: Vec<T>,
}

#[derive(Serialize)]
struct EnvelopeOut<'a, T> {
    metadata: &'a CatalogMetadata,
    records: &'a [T],
}

/// File layout `{ "metadata": {...}, "records": [...] }`.
///
/// Decoding restores the metadata (defaults when absent). Encoding recomputes
/// `totalRecords` and stamps `lastUpdated` before writing.
#[derive(Debug, Clone, Default)]
pub struct CatalogEnvelope {
    metadata: CatalogMetadata,
}

impl CatalogEnvelope {
    pub fn metadata(&self) -> &CatalogMetadata {
        &self.metadata
    }
}

impl<T: Serialize + DeserializeOwned> Layout<T> for CatalogEnvelope {
    fn decode(&mut self, raw: &str) -> serde_json::Result<Vec<T>> {
        // Derived structs also accept a sequence, so check the shape first
        let value: Value = serde_json::from_str(raw)?;
        if !value.is_object() {
            return Err(serde::de::Error::custom(
                "catalog file must be a JSON object with `metadata` and `records`",
            ));
        }

        let parsed: EnvelopeIn<T> = serde_json::from_value(value)?;
        self.metadata = parsed.metadata.unwrap_or_default();
        Ok(parsed.records)
    }

    fn reset(&mut self) {
        self.metadata = CatalogMetadata::default();
    }

    fn encode(&mut self, records: &[T]) -> serde_json::Result<String> {
        self.metadata.total_records = records.len();
        self.metadata.last_updated = Utc::now();

        serde_json::to_string_pretty(&EnvelopeOut {
            metadata: &self.metadata,
            records,
        })
    }
}
