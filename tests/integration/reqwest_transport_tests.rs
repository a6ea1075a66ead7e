//! The reqwest transport against a local HTTP server

#[cfg(test)]
mod tests {
    use fanout_http::{
        BatchClient, BatchClientConfig, FanoutError, HttpRequest, ReqwestTransport, SyncedRequest,
        Transport, TransportConfig,
    };
    use serde::Deserialize;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Label {
        id: u32,
        name: String,
    }

    fn transport() -> Arc<ReqwestTransport> {
        Arc::new(ReqwestTransport::new(&TransportConfig::default()).unwrap())
    }

    fn fast_config() -> BatchClientConfig {
        BatchClientConfig::default()
            .with_iteration_step(2)
            .with_request_attempts(3)
            .with_backoff_intervals(BTreeMap::from([
                (2, Duration::from_millis(5)),
                (1, Duration::from_millis(5)),
            ]))
            .with_jitter_interval(Duration::from_millis(5))
            .with_batch_pause(Duration::from_millis(5))
    }

    #[tokio::test]
    async fn test_exchange_reads_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/labels/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1, "name": "4AD"})))
            .mount(&server)
            .await;

        let request = HttpRequest::get(&format!("{}/labels/1", server.uri())).unwrap();
        let response = transport().exchange(&request).await.unwrap();

        assert_eq!(response.status().as_u16(), 200);
        let body = response.read_body().await.unwrap();
        let label: Label = serde_json::from_slice(&body).unwrap();
        assert_eq!(label.name, "4AD");
    }

    #[tokio::test]
    async fn test_exchange_forwards_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/labels"))
            .and(header("x-api-key", "secret"))
            .and(body_json(json!({"name": "Warp"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 9, "name": "Warp"})))
            .expect(1)
            .mount(&server)
            .await;

        let request = HttpRequest::post_json(
            &format!("{}/labels", server.uri()),
            &json!({"name": "Warp"}),
        )
        .unwrap()
        .with_header("x-api-key", "secret")
        .unwrap();

        let client: BatchClient<Label> = BatchClient::new(fast_config(), transport()).unwrap();
        let label = client.execute_one(&request).await.unwrap();

        assert_eq!(
            label,
            Label {
                id: 9,
                name: "Warp".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_retries_after_rate_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/labels/2"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/labels/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 2, "name": "Sub Pop"})))
            .mount(&server)
            .await;

        let client: BatchClient<Label> = BatchClient::new(fast_config(), transport()).unwrap();
        let request = HttpRequest::get(&format!("{}/labels/2", server.uri())).unwrap();
        let label = client.execute_one(&request).await.unwrap();

        assert_eq!(label.id, 2);
        let received = server.received_requests().await.unwrap();
        assert_eq!(received.len(), 3);
    }

    #[tokio::test]
    async fn test_batch_against_server() {
        let server = MockServer::start().await;
        for id in 0..5u32 {
            Mock::given(method("GET"))
                .and(path(format!("/labels/{}", id)))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(json!({"id": id, "name": format!("label-{}", id)})),
                )
                .mount(&server)
                .await;
        }
        Mock::given(method("GET"))
            .and(path("/labels/404"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let client: BatchClient<Label> = BatchClient::new(fast_config(), transport()).unwrap();
        let mut items: Vec<SyncedRequest> = (0..5u32)
            .map(|id| {
                let request =
                    HttpRequest::get(&format!("{}/labels/{}", server.uri(), id)).unwrap();
                SyncedRequest::with_key(request, id.to_string())
            })
            .collect();
        items.push(SyncedRequest::with_key(
            HttpRequest::get(&format!("{}/labels/404", server.uri())).unwrap(),
            "missing",
        ));

        let report = client.dispatch_with_report(items).await;

        assert_eq!(report.results.len(), 5);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].sync_key.as_deref(), Some("missing"));
        assert!(matches!(report.failures[0].error, FanoutError::Decode(_)));

        // The 404 burns the whole attempt budget.
        let received = server.received_requests().await.unwrap();
        let not_found = received
            .iter()
            .filter(|r| r.url.path() == "/labels/404")
            .count();
        assert_eq!(not_found, 3);
    }
}
