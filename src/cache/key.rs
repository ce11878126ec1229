//! Key Derivation Module
//!
//! Maps raw input content and its category to a stable, namespaced cache key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::CacheError;

// == Category ==
/// Kind of input a cached result was produced from. Each category owns a
/// disjoint key namespace in the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// A remote resource fetched by URL (store listing)
    RemoteResource,
    /// An uploaded CSV file processed in bulk
    BulkUpload,
    /// A single submitted comment
    SingleItem,
}

impl Category {
    /// Every category, in namespace order.
    pub const ALL: [Category; 3] = [
        Category::RemoteResource,
        Category::BulkUpload,
        Category::SingleItem,
    ];

    /// Key prefix in the backing store.
    pub fn namespace(self) -> &'static str {
        match self {
            Category::RemoteResource => "playstore",
            Category::BulkUpload => "csv",
            Category::SingleItem => "comment",
        }
    }

    /// Kebab-case category name.
    pub fn name(self) -> &'static str {
        match self {
            Category::RemoteResource => "remote-resource",
            Category::BulkUpload => "bulk-upload",
            Category::SingleItem => "single-item",
        }
    }

    /// Human label for log lines.
    pub fn label(self) -> &'static str {
        match self {
            Category::RemoteResource => "PlayStore URL",
            Category::BulkUpload => "CSV file",
            Category::SingleItem => "single comment",
        }
    }

    /// Scan pattern matching every key in this namespace.
    pub fn pattern(self) -> String {
        format!("{}:*", self.namespace())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.namespace())
    }
}

impl FromStr for Category {
    type Err = CacheError;

    /// Accepts either the namespace (`csv`) or the category name (`bulk-upload`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.namespace() == wanted || c.name() == wanted)
            .ok_or_else(|| CacheError::InvalidRequest(format!("Unknown cache category: {}", s)))
    }
}

// == Key Derivation ==
/// Normalizes content for hashing: lowercase, surrounding whitespace trimmed.
pub fn normalize(content: &str) -> String {
    content.to_lowercase().trim().to_string()
}

/// Derives `"{namespace}:{sha256 hex}"` from the normalized content.
///
/// Total and pure: any input, the empty string included, yields a key.
pub fn derive_key(content: &str, category: Category) -> String {
    let digest = Sha256::digest(normalize(content).as_bytes());
    format!("{}:{}", category.namespace(), hex::encode(digest))
}

/// First 50 characters of `content`, for log lines.
pub(crate) fn preview(content: &str) -> &str {
    match content.char_indices().nth(50) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}
