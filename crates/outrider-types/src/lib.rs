//! Payload types for the Outrider sidecar HTTP API.
//!
//! These mirror the JSON documents served by the sidecar's per-node
//! endpoints. Field names on the wire are camelCase; everything here is a
//! plain serde struct so client and tooling crates share one vocabulary.

use std::collections::HashMap;
use std::fmt;

use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize};

/// Schema for the whole cluster or a single keyspace.
///
/// `keyspace` is absent when the full schema was requested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaResponse {
    #[serde(default)]
    pub keyspace: Option<String>,
    pub schema: String,
}

/// One node's view of the token ring for a keyspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RingEntry {
    pub datacenter: String,
    pub address: String,
    pub port: u16,
    pub rack: String,
    pub status: String,
    pub state: String,
    pub load: String,
    pub owns: String,
    pub token: String,
    pub fqdn: String,
    pub host_id: String,
}

/// Ring topology response: one entry per node.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RingResponse(pub Vec<RingEntry>);

impl RingResponse {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RingEntry> {
        self.0.iter()
    }
}

/// Static settings reported by a node.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSettings {
    pub partitioner: String,
    pub release_version: String,
}

/// Gossip state for one endpoint. The wire format stores every value as a
/// string, including `sstableVersions` which is a comma-separated list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GossipInfo {
    #[serde(default)]
    pub generation: Option<String>,
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub rack: Option<String>,
    #[serde(default)]
    pub heartbeat: Option<String>,
    #[serde(default)]
    pub release_version: Option<String>,
    #[serde(default)]
    sstable_versions: Option<String>,
}

impl GossipInfo {
    /// The sstable versions as individual entries, split from the
    /// comma-separated wire value.
    pub fn sstable_versions(&self) -> Vec<&str> {
        self.sstable_versions
            .as_deref()
            .map(|v| v.split(',').map(str::trim).collect())
            .unwrap_or_default()
    }
}

/// Gossip info keyed by endpoint (e.g. `/127.0.0.1:7000`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GossipInfoResponse(pub HashMap<String, GossipInfo>);

/// Server time used to detect clock skew between client and fleet.
/// The server emits the numeric fields as JSON strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSkewResponse {
    #[serde(deserialize_with = "u64_from_string_or_number")]
    pub current_time: u64,
    #[serde(deserialize_with = "u64_from_string_or_number")]
    pub allowable_skew_in_minutes: u64,
}

/// Metadata for one file inside a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotFileInfo {
    pub size: u64,
    pub host: String,
    pub port: u16,
    pub data_dir_index: u32,
    pub snapshot_name: String,
    pub key_space_name: String,
    pub table_name: String,
    pub file_name: String,
}

/// Listing of files belonging to a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSnapshotFilesResponse {
    pub snapshot_files_info: Vec<SnapshotFileInfo>,
}

/// Outcome of an SSTable import request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SSTableImportResponse {
    pub success: bool,
    pub upload_id: String,
    pub keyspace: String,
    pub table_name: String,
}

/// Options sent with an SSTable import. Defaults match the server side:
/// verify everything, invalidate caches, do not copy data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOptions {
    pub reset_level: bool,
    pub clear_repaired: bool,
    #[serde(rename = "verifySSTables")]
    pub verify_sstables: bool,
    pub verify_tokens: bool,
    pub invalidate_caches: bool,
    pub extended_verify: bool,
    pub copy_data: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            reset_level: true,
            clear_repaired: true,
            verify_sstables: true,
            verify_tokens: true,
            invalidate_caches: true,
            extended_verify: true,
            copy_data: false,
        }
    }
}

/// Accepts either a JSON number or a numeric string.
fn u64_from_string_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    struct U64OrString;

    impl<'de> Visitor<'de> for U64OrString {
        type Value = u64;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("an unsigned integer or a numeric string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u64, E> {
            u64::try_from(v).map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<u64, E> {
            v.parse()
                .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
        }
    }

    deserializer.deserialize_any(U64OrString)
}
