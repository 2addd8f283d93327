//! Constructors for the v1 sidecar API routes.

use std::path::PathBuf;

use outrider_types::ImportOptions;

use super::{HttpMethod, HttpRange, Request, RequestBody};
use crate::error::ClientError;

pub const API_V1: &str = "/api/v1";

/// GET the schema for all keyspaces.
pub fn schema() -> Request {
    Request::new(HttpMethod::Get, format!("{API_V1}/schema/keyspaces"))
}

/// GET the schema for one keyspace.
pub fn keyspace_schema(keyspace: &str) -> Request {
    Request::new(
        HttpMethod::Get,
        format!("{API_V1}/schema/keyspaces/{keyspace}"),
    )
}

/// GET the token ring for a keyspace.
pub fn ring(keyspace: &str) -> Request {
    Request::new(
        HttpMethod::Get,
        format!("{API_V1}/cassandra/ring/keyspaces/{keyspace}"),
    )
}

/// GET the node settings.
pub fn node_settings() -> Request {
    Request::new(HttpMethod::Get, format!("{API_V1}/cassandra/settings"))
}

/// GET the gossip state of the cluster.
pub fn gossip_info() -> Request {
    Request::new(HttpMethod::Get, format!("{API_V1}/cassandra/gossip"))
}

/// GET the server time for clock-skew detection.
pub fn time_skew() -> Request {
    Request::new(HttpMethod::Get, format!("{API_V1}/time-skew"))
}

fn snapshot_route(keyspace: &str, table: &str, snapshot: &str) -> String {
    format!("{API_V1}/keyspaces/{keyspace}/tables/{table}/snapshots/{snapshot}")
}

/// GET the file listing of a snapshot. Secondary index files are only
/// included when asked for, via a query parameter.
pub fn list_snapshot_files(
    keyspace: &str,
    table: &str,
    snapshot: &str,
    include_secondary_index_files: bool,
) -> Request {
    let mut path = snapshot_route(keyspace, table, snapshot);
    if include_secondary_index_files {
        path.push_str("?includeSecondaryIndexFiles=true");
    }
    Request::new(HttpMethod::Get, path)
}

/// PUT to create a snapshot.
pub fn create_snapshot(keyspace: &str, table: &str, snapshot: &str) -> Request {
    Request::new(HttpMethod::Put, snapshot_route(keyspace, table, snapshot))
}

/// DELETE to clear a snapshot.
pub fn clear_snapshot(keyspace: &str, table: &str, snapshot: &str) -> Request {
    Request::new(HttpMethod::Delete, snapshot_route(keyspace, table, snapshot))
}

/// GET one SSTable component out of a snapshot, optionally ranged.
pub fn sstable_component(
    keyspace: &str,
    table: &str,
    snapshot: &str,
    component: &str,
    range: Option<HttpRange>,
) -> Request {
    Request::new(
        HttpMethod::Get,
        format!(
            "{}/components/{component}",
            snapshot_route(keyspace, table, snapshot)
        ),
    )
    .with_range_option(range)
}

/// PUT an SSTable component into an upload session. When a checksum is
/// given it travels in the `Content-MD5` header for server-side verification.
pub fn upload_sstable(
    upload_id: &str,
    keyspace: &str,
    table: &str,
    component: &str,
    checksum: Option<&str>,
    file: PathBuf,
) -> Request {
    let mut request = Request::new(
        HttpMethod::Put,
        format!(
            "{API_V1}/uploads/{upload_id}/keyspaces/{keyspace}/tables/{table}/components/{component}"
        ),
    )
    .with_body(RequestBody::File(file));
    if let Some(checksum) = checksum {
        request = request.with_header("Content-MD5", checksum.to_string());
    }
    request
}

/// PUT to import the SSTables of a completed upload session.
pub fn import_sstable(
    upload_id: &str,
    keyspace: &str,
    table: &str,
    options: &ImportOptions,
) -> Result<Request, ClientError> {
    let body = serde_json::to_value(options)
        .map_err(|e| ClientError::Validation(format!("invalid import options: {e}")))?;
    Ok(Request::new(
        HttpMethod::Put,
        format!("{API_V1}/uploads/{upload_id}/keyspaces/{keyspace}/tables/{table}/import"),
    )
    .with_body(RequestBody::Json(body)))
}

/// DELETE an upload session and its staged files.
pub fn clean_upload_session(upload_id: &str) -> Request {
    Request::new(HttpMethod::Delete, format!("{API_V1}/uploads/{upload_id}"))
}
