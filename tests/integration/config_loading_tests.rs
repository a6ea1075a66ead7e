//! Settings loading and client construction

#[cfg(test)]
mod tests {
    use fanout_http::{BatchClient, BatchSettings, FanoutError, TracingLogger, Validate};
    use std::io::Write;
    use std::sync::Arc;
    use std::time::Duration;

    struct NoTransport;

    #[async_trait::async_trait]
    impl fanout_http::Transport for NoTransport {
        async fn exchange(
            &self,
            _request: &fanout_http::HttpRequest,
        ) -> fanout_http::Result<fanout_http::HttpResponse> {
            Err(FanoutError::transport("offline"))
        }
    }

    #[tokio::test]
    async fn test_yaml_file_builds_client() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
iteration_step: 3
request_attempts: 4
jitter_interval_ms: 50
batch_pause_ms: 20
backoff_intervals_ms:
  3: 100
  2: 200
  1: 400
"#
        )
        .unwrap();

        let settings = BatchSettings::from_file(file.path()).await.unwrap();
        let config = settings.into_config(TracingLogger::shared());

        assert!(config.validate().is_ok());
        assert_eq!(config.backoff_for(1), Duration::from_millis(400));
        assert!(config.missing_backoff_keys().is_empty());

        let client: BatchClient<serde_json::Value> =
            BatchClient::new(config, Arc::new(NoTransport)).unwrap();
        assert_eq!(client.config().iteration_step, 3);
        assert_eq!(client.config().request_attempts, 4);
    }

    #[tokio::test]
    async fn test_invalid_yaml_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "iteration_step: [not, a, number]").unwrap();

        let err = BatchSettings::from_file(file.path()).await.unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_client_rejects_width_one() {
        let settings = BatchSettings {
            iteration_step: 1,
            ..BatchSettings::default()
        };
        assert!(settings.validate().is_err());

        let result: fanout_http::Result<BatchClient<serde_json::Value>> = BatchClient::new(
            settings.into_config(TracingLogger::shared()),
            Arc::new(NoTransport),
        );
        assert!(matches!(result, Err(FanoutError::Config(_))));
    }

    #[tokio::test]
    async fn test_batch_over_offline_transport_is_total_failure() {
        let config = BatchSettings::default()
            .into_config(TracingLogger::shared())
            .with_iteration_step(2)
            .with_batch_pause(Duration::ZERO);
        let client: BatchClient<serde_json::Value> =
            BatchClient::new(config, Arc::new(NoTransport)).unwrap();

        let items = (0..3)
            .map(|i| {
                fanout_http::SyncedRequest::new(
                    fanout_http::HttpRequest::get(&format!("http://offline.local/{}", i)).unwrap(),
                )
            })
            .collect();
        let report = client.dispatch_with_report(items).await;

        assert!(report.is_total_failure());
        assert_eq!(report.failures.len(), 3);
    }
}
