//! High-level client over the request execution engine.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use outrider_types::{
    GossipInfoResponse, ImportOptions, ListSnapshotFilesResponse, NodeSettings, RingResponse,
    SSTableImportResponse, SchemaResponse, TimeSkewResponse,
};

use crate::config::SidecarConfig;
use crate::error::ClientError;
use crate::executor::{RequestContext, RequestContextBuilder, RequestExecutor};
use crate::instance::{InstancesProvider, SidecarInstance, SimpleInstancesProvider};
use crate::request::{endpoints, HttpRange};
use crate::retry::{
    DefaultRetryPolicy, IgnoreConflictRetryPolicy, OnStatusRetryPolicy, RetryPolicy,
};
use crate::selection::{InstanceSelectionPolicy, RandomInstanceSelectionPolicy};
use crate::streaming::StreamConsumer;
use crate::transport::{HttpTransport, ReqwestTransport};

/// Consecutive "accepted, still running" responses tolerated while polling a
/// server-side SSTable import before the default policy takes over.
const IMPORT_POLL_CAP: u32 = 10;

/// Entry point for talking to a fleet of sidecar instances.
///
/// Cluster-wide reads go to a random untried instance and fail over on
/// transient errors; operations that act on one node's state are pinned to
/// that instance for every attempt. Lower layers stay public, so callers with
/// unusual needs can build a [`RequestContext`] themselves and hand it to
/// [`SidecarClient::execute`].
pub struct SidecarClient {
    executor: RequestExecutor,
    config: SidecarConfig,
    default_retry: Arc<dyn RetryPolicy>,
    default_selection: Arc<dyn InstanceSelectionPolicy>,
}

impl SidecarClient {
    /// Client over the default `reqwest` transport and a fixed instance pool.
    pub fn new(config: SidecarConfig, instances: Vec<SidecarInstance>) -> Result<Self, ClientError> {
        let transport = Arc::new(ReqwestTransport::new(&config)?);
        let provider = Arc::new(SimpleInstancesProvider::new(instances));
        Ok(Self::with_transport(config, transport, provider))
    }

    /// Client over a caller-supplied transport and instance source.
    pub fn with_transport(
        config: SidecarConfig,
        transport: Arc<dyn HttpTransport>,
        provider: Arc<dyn InstancesProvider>,
    ) -> Self {
        let default_retry: Arc<dyn RetryPolicy> = Arc::new(DefaultRetryPolicy::new(
            config.max_retries,
            config.retry_delay,
            config.max_retry_delay,
        ));
        let default_selection: Arc<dyn InstanceSelectionPolicy> =
            Arc::new(RandomInstanceSelectionPolicy::new(provider));
        Self {
            executor: RequestExecutor::new(transport),
            config,
            default_retry,
            default_selection,
        }
    }

    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    /// Builder pre-wired with the client's default retry and selection
    /// policies. Clone-and-override is the intended use.
    pub fn request_builder(&self) -> RequestContextBuilder {
        RequestContext::builder()
            .retry_policy(Arc::clone(&self.default_retry))
            .selection_policy(Arc::clone(&self.default_selection))
    }

    /// Runs an arbitrary context and returns the raw successful response.
    pub async fn execute(
        &self,
        context: &RequestContext,
    ) -> Result<crate::transport::HttpResponse, ClientError> {
        self.executor.execute(context).await
    }

    /// Schema of every keyspace in the cluster.
    pub async fn full_schema(&self) -> Result<SchemaResponse, ClientError> {
        let context = self.request_builder().request(endpoints::schema()).build()?;
        self.executor.execute_json(&context).await
    }

    /// Schema of one keyspace.
    pub async fn schema(&self, keyspace: &str) -> Result<SchemaResponse, ClientError> {
        let context = self
            .request_builder()
            .request(endpoints::keyspace_schema(keyspace))
            .build()?;
        self.executor.execute_json(&context).await
    }

    /// Token ring for a keyspace.
    pub async fn ring(&self, keyspace: &str) -> Result<RingResponse, ClientError> {
        let context = self
            .request_builder()
            .request(endpoints::ring(keyspace))
            .build()?;
        self.executor.execute_json(&context).await
    }

    /// Settings of whichever node answers first.
    pub async fn node_settings(&self) -> Result<NodeSettings, ClientError> {
        let context = self
            .request_builder()
            .request(endpoints::node_settings())
            .build()?;
        self.executor.execute_json(&context).await
    }

    /// Settings of one specific node.
    pub async fn node_settings_on(
        &self,
        instance: SidecarInstance,
    ) -> Result<NodeSettings, ClientError> {
        let context = self
            .request_builder()
            .request(endpoints::node_settings())
            .single_instance(instance)
            .build()?;
        self.executor.execute_json(&context).await
    }

    /// Gossip state of the cluster.
    pub async fn gossip_info(&self) -> Result<GossipInfoResponse, ClientError> {
        let context = self
            .request_builder()
            .request(endpoints::gossip_info())
            .build()?;
        self.executor.execute_json(&context).await
    }

    /// Server time for clock-skew detection, from any instance.
    pub async fn time_skew(&self) -> Result<TimeSkewResponse, ClientError> {
        let context = self
            .request_builder()
            .request(endpoints::time_skew())
            .build()?;
        self.executor.execute_json(&context).await
    }

    /// Server time from one of the given replicas.
    pub async fn time_skew_of(
        &self,
        replicas: Vec<SidecarInstance>,
    ) -> Result<TimeSkewResponse, ClientError> {
        let provider = Arc::new(SimpleInstancesProvider::new(replicas));
        let context = self
            .request_builder()
            .request(endpoints::time_skew())
            .selection_policy(Arc::new(RandomInstanceSelectionPolicy::new(provider)))
            .build()?;
        self.executor.execute_json(&context).await
    }

    /// Files of a snapshot on one instance.
    pub async fn list_snapshot_files(
        &self,
        instance: SidecarInstance,
        keyspace: &str,
        table: &str,
        snapshot: &str,
        include_secondary_index_files: bool,
    ) -> Result<ListSnapshotFilesResponse, ClientError> {
        let context = self
            .request_builder()
            .request(endpoints::list_snapshot_files(
                keyspace,
                table,
                snapshot,
                include_secondary_index_files,
            ))
            .single_instance(instance)
            .build()?;
        self.executor.execute_json(&context).await
    }

    /// Creates a snapshot on one instance. A conflict that follows an
    /// ambiguous transport failure counts as success, since the first
    /// attempt may have landed.
    pub async fn create_snapshot(
        &self,
        instance: SidecarInstance,
        keyspace: &str,
        table: &str,
        snapshot: &str,
    ) -> Result<(), ClientError> {
        let context = self
            .request_builder()
            .request(endpoints::create_snapshot(keyspace, table, snapshot))
            .retry_policy(Arc::new(IgnoreConflictRetryPolicy::new(
                self.config.max_retries,
                self.config.retry_delay,
                self.config.max_retry_delay,
            )))
            .single_instance(instance)
            .build()?;
        self.executor.execute(&context).await.map(|_| ())
    }

    /// Clears a snapshot on one instance.
    pub async fn clear_snapshot(
        &self,
        instance: SidecarInstance,
        keyspace: &str,
        table: &str,
        snapshot: &str,
    ) -> Result<(), ClientError> {
        let context = self
            .request_builder()
            .request(endpoints::clear_snapshot(keyspace, table, snapshot))
            .single_instance(instance)
            .build()?;
        self.executor.execute(&context).await.map(|_| ())
    }

    /// Streams one SSTable component from a snapshot to `consumer`,
    /// resuming from the last delivered byte on transient failures.
    pub async fn stream_sstable_component(
        &self,
        instance: SidecarInstance,
        keyspace: &str,
        table: &str,
        snapshot: &str,
        component: &str,
        range: Option<HttpRange>,
        consumer: &mut dyn StreamConsumer,
    ) {
        let context = self
            .request_builder()
            .request(endpoints::sstable_component(
                keyspace, table, snapshot, component, range,
            ))
            .single_instance(instance)
            .build();
        match context {
            Ok(context) => self.executor.execute_stream(&context, consumer).await,
            Err(error) => consumer.on_error(error),
        }
    }

    /// Uploads an SSTable component into an upload session on one instance.
    pub async fn upload_sstable(
        &self,
        instance: SidecarInstance,
        upload_id: &str,
        keyspace: &str,
        table: &str,
        component: &str,
        checksum: Option<&str>,
        file: PathBuf,
    ) -> Result<(), ClientError> {
        let context = self
            .request_builder()
            .request(endpoints::upload_sstable(
                upload_id, keyspace, table, component, checksum, file,
            ))
            .single_instance(instance)
            .build()?;
        self.executor.execute(&context).await.map(|_| ())
    }

    /// Imports the SSTables staged in an upload session. The server answers
    /// 202 while the import is still running; the client keeps polling the
    /// same instance for up to [`IMPORT_POLL_CAP`] consecutive such answers.
    pub async fn import_sstable(
        &self,
        instance: SidecarInstance,
        upload_id: &str,
        keyspace: &str,
        table: &str,
        options: &ImportOptions,
    ) -> Result<SSTableImportResponse, ClientError> {
        let poll_delay = self.import_poll_delay();
        let progress_id = upload_id.to_string();
        let context = self
            .request_builder()
            .request(endpoints::import_sstable(upload_id, keyspace, table, options)?)
            .retry_policy(Arc::new(OnStatusRetryPolicy::new(
                Arc::clone(&self.default_retry),
                202,
                IMPORT_POLL_CAP,
                poll_delay,
                move || {
                    tracing::info!(upload_id = %progress_id, "import still running server-side");
                },
            )))
            .single_instance(instance)
            .build()?;
        self.executor.execute_json(&context).await
    }

    /// Deletes an upload session and its staged files.
    pub async fn clean_upload_session(
        &self,
        instance: SidecarInstance,
        upload_id: &str,
    ) -> Result<(), ClientError> {
        let context = self
            .request_builder()
            .request(endpoints::clean_upload_session(upload_id))
            .single_instance(instance)
            .build()?;
        self.executor.execute(&context).await.map(|_| ())
    }

    fn import_poll_delay(&self) -> Duration {
        self.config.retry_delay.max(Duration::from_millis(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedAttempt, ScriptedTransport};

    fn client(transport: Arc<ScriptedTransport>, pool: Vec<SidecarInstance>) -> SidecarClient {
        let config = SidecarConfig {
            retry_delay: Duration::from_millis(1),
            max_retry_delay: Duration::from_millis(10),
            ..SidecarConfig::default()
        };
        SidecarClient::with_transport(
            config,
            transport,
            Arc::new(SimpleInstancesProvider::new(pool)),
        )
    }

    fn pool(n: usize) -> Vec<SidecarInstance> {
        (1..=n)
            .map(|i| SidecarInstance::new(format!("db-{i:02}"), 9043))
            .collect()
    }

    #[tokio::test]
    async fn schema_decodes_and_fails_over() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            ScriptedAttempt::fail_connect(),
            ScriptedAttempt::respond(
                200,
                r#"{"keyspace":"cycling","schema":"CREATE KEYSPACE cycling ..."}"#,
            ),
        ]));
        let client = client(transport.clone(), pool(3));

        let schema = client.schema("cycling").await.unwrap();
        assert_eq!(schema.keyspace.as_deref(), Some("cycling"));
        assert_eq!(transport.attempts(), 2);
        let targets = transport.targets();
        assert_ne!(targets[0], targets[1]);
    }

    #[tokio::test]
    async fn create_snapshot_tolerates_conflict_after_ambiguous_failure() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            ScriptedAttempt::fail_connect(),
            ScriptedAttempt::respond(409, ""),
        ]));
        let client = client(transport.clone(), pool(1));

        client
            .create_snapshot(
                SidecarInstance::new("db-01", 9043),
                "cycling",
                "cyclist_name",
                "2023.04.11",
            )
            .await
            .unwrap();
        assert_eq!(transport.attempts(), 2);
    }

    #[tokio::test]
    async fn import_polls_through_accepted_responses() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            ScriptedAttempt::respond(202, ""),
            ScriptedAttempt::respond(202, ""),
            ScriptedAttempt::respond(202, ""),
            ScriptedAttempt::respond(
                200,
                r#"{"success":true,"uploadId":"0000-0000","keyspace":"cycling","tableName":"cyclist_name"}"#,
            ),
        ]));
        let client = client(transport.clone(), pool(1));

        let instance = SidecarInstance::new("db-01", 9043);
        let response = client
            .import_sstable(
                instance.clone(),
                "0000-0000",
                "cycling",
                "cyclist_name",
                &ImportOptions::default(),
            )
            .await
            .unwrap();
        assert!(response.success);
        assert_eq!(transport.attempts(), 4);
        // Polling sticks to the instance that accepted the import.
        assert!(transport.targets().iter().all(|t| *t == instance));
    }

    #[tokio::test]
    async fn upload_of_missing_file_fails_without_a_request() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let client = client(transport.clone(), pool(1));

        let err = client
            .upload_sstable(
                SidecarInstance::new("db-01", 9043),
                "0000-0000",
                "cycling",
                "cyclist_name",
                "nb-1-big-Data.db",
                None,
                PathBuf::from("/no/such/file"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(transport.attempts(), 0);
    }
}
