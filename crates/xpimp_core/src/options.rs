//! Import configuration.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Name of the implicit root every top-level node is parented to.
pub const DEFAULT_ROOT_NAME: &str = "INTER_ROOT";

/// Settings for one import job.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// Name of the collection the imported nodes land in.
    pub collection_name: String,

    /// Sentinel name of the implicit root. Never materialized.
    pub root_name: String,

    /// Prefix for generated empty names.
    pub empty_prefix: String,

    /// Prefix for generated mesh names.
    pub mesh_prefix: String,

    /// Whether the collection is flagged as an exportable root.
    pub exportable: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            collection_name: "unnamed".to_string(),
            root_name: DEFAULT_ROOT_NAME.to_string(),
            empty_prefix: "ImpEmpty".to_string(),
            mesh_prefix: "ImpMesh".to_string(),
            exportable: true,
        }
    }
}

impl ImportOptions {
    pub fn new(collection_name: impl Into<String>) -> Self {
        Self {
            collection_name: collection_name.into(),
            ..Default::default()
        }
    }

    /// Options for importing the file at `path`; the collection is named
    /// after the file stem.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let name = path
            .as_ref()
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unnamed");
        Self::new(name)
    }

    /// Four hex digits derived from the collection name, appended to
    /// generated node names so two imports don't collide.
    pub fn name_tag(&self) -> String {
        let mut hasher = DefaultHasher::new();
        self.collection_name.hash(&mut hasher);
        format!("{:04x}", hasher.finish() & 0xffff)
    }
}
