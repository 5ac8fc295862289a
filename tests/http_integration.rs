// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests against a mocked API using wiremock.

use std::sync::Arc;
use std::time::Duration;

use openshock_lib::action::join;
use openshock_lib::protocol::{ApiRequest, RequestHook};
use openshock_lib::{
    ClientConfig, ControlData, ControlType, DeviceHub, Error, OpenShock, ProtocolError, Shocker,
    ValueError,
};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::oneshot;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> OpenShock {
    OpenShock::new(
        ClientConfig::new("test-token")
            .with_api_host(server.uri())
            .with_custom_name("integration"),
    )
    .unwrap()
}

fn own_shockers_body() -> serde_json::Value {
    json!({
        "message": "",
        "data": [{
            "id": "g1",
            "name": "Hub1",
            "createdOn": "2024-01-01T00:00:00Z",
            "shockers": [
                {"id": "s1", "name": "Dev1", "rfId": 123, "model": "X", "isPaused": false}
            ]
        }]
    })
}

fn shocker(id: &str) -> Shocker {
    Shocker::new(id, "Dev", 1, "X", false, Some("g1".to_string()))
}

// ============================================================================
// Topology
// ============================================================================

mod topology {
    use super::*;

    #[tokio::test]
    async fn fetch_all_populates_cache() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/1/shockers/own"))
            .and(header("accept", "application/json"))
            .and(header("OpenShockToken", "test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(own_shockers_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let hubs = client.retrieve_all_shockers().execute().await.unwrap();

        assert_eq!(hubs.len(), 1);
        assert_eq!(hubs[0].shockers().len(), 1);

        let device = client.cached_shocker("s1").unwrap();
        assert_eq!(device.hub_id(), Some("g1"));
        assert_eq!(device.rf_id(), 123);

        let hub = client.hub("g1").unwrap();
        assert_eq!(hub.name(), "Hub1");
        let ids: Vec<_> = hub.shockers().iter().map(Shocker::id).collect();
        assert_eq!(ids, ["s1"]);
    }

    #[tokio::test]
    async fn resync_replaces_hub_in_place() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/1/shockers/own"))
            .respond_with(ResponseTemplate::new(200).set_body_json(own_shockers_body()))
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.retrieve_all_shockers().execute().await.unwrap();
        client.retrieve_all_shockers().execute().await.unwrap();

        assert_eq!(client.hubs().len(), 1);
        assert_eq!(client.cached_shockers().len(), 1);
    }

    #[tokio::test]
    async fn connect_runs_initial_sync() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/1/shockers/own"))
            .respond_with(ResponseTemplate::new(200).set_body_json(own_shockers_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenShock::connect(ClientConfig::new("test-token").with_api_host(server.uri()))
            .await
            .unwrap();
        assert!(client.cached_shocker("s1").is_some());
    }

    #[tokio::test]
    async fn malformed_listing_is_empty_not_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/1/shockers/own"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let hubs = client.retrieve_all_shockers().execute().await.unwrap();
        assert!(hubs.is_empty());
        assert!(client.hubs().is_empty());
    }

    #[tokio::test]
    async fn group_without_name_is_skipped() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/1/shockers/own"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"id": "g1", "shockers": [{"id": "s1", "name": "Dev1", "model": "X"}]},
                    {"id": "g2", "name": "Hub2", "shockers": [{"id": "s2", "name": "Dev2", "model": "X"}]}
                ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.retrieve_all_shockers().execute().await.unwrap();

        assert!(client.hub("g1").is_none());
        assert!(client.cached_shocker("s1").is_none());
        assert!(client.cached_shocker("s2").is_some());
    }

    #[tokio::test]
    async fn unauthorized_listing_is_empty() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/1/shockers/own"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let hubs = client.retrieve_all_shockers().execute().await.unwrap();
        assert!(hubs.is_empty());
        assert!(client.hubs().is_empty());
        assert!(client.cached_shockers().is_empty());
    }

    #[tokio::test]
    async fn connect_survives_unavailable_listing() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/1/shockers/own"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenShock::connect(ClientConfig::new("test-token").with_api_host(server.uri()))
            .await
            .unwrap();
        assert!(client.hubs().is_empty());
    }
}

// ============================================================================
// Single shocker
// ============================================================================

mod single_shocker {
    use super::*;

    #[tokio::test]
    async fn retrieve_registers_into_cached_hub() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/1/shockers/s2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"id": "s2", "name": "Dev2", "rfId": 7, "model": "X", "isPaused": true, "device": "g1"}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.register_hub(DeviceHub::new("g1", "Hub1"), vec![shocker("s1")]);

        let fetched = client.retrieve_shocker("s2").execute().await.unwrap().unwrap();
        assert!(fetched.is_paused());

        let hub = client.hub("g1").unwrap();
        assert_eq!(hub.shockers().len(), 2);
        assert_eq!(client.hub_of(&fetched).unwrap().id(), "g1");
    }

    #[tokio::test]
    async fn retrieve_before_hub_is_known() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/1/shockers/s1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"id": "s1", "name": "Dev1", "model": "X", "device": "g1"}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let fetched = client.retrieve_shocker("s1").execute().await.unwrap().unwrap();

        assert!(client.hub_of(&fetched).is_none());
        assert!(client.cached_shocker("s1").is_some());

        client.register_hub(DeviceHub::new("g1", "Hub1"), Vec::new());
        assert_eq!(client.hub("g1").unwrap().shockers().len(), 1);
    }

    #[tokio::test]
    async fn get_shocker_uses_cache_after_first_fetch() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/1/shockers/s1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"id": "s1", "name": "Dev1", "model": "X", "device": "g1"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let first = client.get_shocker("s1").execute().await.unwrap();
        let second = client.get_shocker("s1").execute().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn missing_data_yields_none() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/1/shockers/s1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "?"})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(client.retrieve_shocker("s1").execute().await.unwrap().is_none());
        assert!(client.cached_shockers().is_empty());
    }

    #[tokio::test]
    async fn not_found_yields_none() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/1/shockers/unknown"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(client.retrieve_shocker("unknown").execute().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn server_error_yields_none_without_retry() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/1/shockers/s1"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(client.retrieve_shocker("s1").execute().await.unwrap().is_none());
        assert!(client.cached_shocker("s1").is_none());
    }
}

// ============================================================================
// Control
// ============================================================================

mod control {
    use super::*;

    #[tokio::test]
    async fn batch_is_sent_as_one_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/2/shockers/control"))
            .and(header("Content-Type", "application/json"))
            .and(header("OpenShockToken", "test-token"))
            .and(body_json(json!({
                "customName": "integration",
                "shocks": [
                    {"id": "s1", "type": "Vibrate", "intensity": 80, "duration": 2000},
                    {"id": "s2", "type": "Shock", "intensity": 50, "duration": 5000}
                ]
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let ok = client
            .control()
            .add(&shocker("s1"), ControlData::new(ControlType::Shock, 10, 1_000))
            .unwrap()
            .add(&shocker("s2"), ControlData::new(ControlType::Shock, 50, 5_000))
            .unwrap()
            .add(&shocker("s1"), ControlData::new(ControlType::Vibrate, 80, 2_000))
            .unwrap()
            .execute()
            .await
            .unwrap();
        assert!(ok);
    }

    #[tokio::test]
    async fn stop_sends_zeroed_command() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/2/shockers/control"))
            .and(body_json(json!({
                "customName": "integration",
                "shocks": [{"id": "s1", "type": "Stop", "intensity": 0, "duration": 0}]
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(client.stop(&shocker("s1")).unwrap().execute().await.unwrap());
    }

    #[tokio::test]
    async fn server_error_is_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/2/shockers/control"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .shock(&shocker("s1"), 50, Duration::from_secs(1))
            .unwrap()
            .execute()
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Status { status: 500, ref body } if body == "internal"));
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn invalid_command_sends_nothing() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .vibrate(&shocker("s1"), 101, Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, Error::Value(ValueError::InvalidIntensity(101))));

        let err = client
            .shock(&shocker("s1"), 10, Duration::from_millis(30_001))
            .unwrap_err();
        assert!(matches!(err, Error::Value(ValueError::InvalidDuration { .. })));
    }

    #[tokio::test]
    async fn queue_then_reports_batch_result() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/2/shockers/control"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let (tx, rx) = oneshot::channel();
        client
            .sound(&shocker("s1"), Duration::from_millis(500))
            .unwrap()
            .queue_then(move |ok| {
                let _ = tx.send(ok);
            })
            .await
            .unwrap();

        assert!(rx.await.unwrap());
    }
}

// ============================================================================
// Transport behavior
// ============================================================================

mod transport {
    use super::*;

    #[tokio::test]
    async fn timeouts_are_retried_then_surface() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/1/shockers/own"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(own_shockers_body())
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = OpenShock::new(
            ClientConfig::new("test-token")
                .with_api_host(server.uri())
                .with_timeout(Duration::from_millis(100)),
        )
        .unwrap();

        let err = client.retrieve_all_shockers().execute().await.unwrap_err();
        assert!(err.is_transport());
        assert!(matches!(
            err,
            Error::Protocol(ProtocolError::RetriesExhausted { attempts: 4, .. })
        ));
        assert_eq!(server.received_requests().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn connection_refused_exhausts_retries() {
        let client = OpenShock::new(
            ClientConfig::new("test-token")
                .with_api_host("http://127.0.0.1:1")
                .with_max_retries(2),
        )
        .unwrap();

        let err = client.retrieve_all_shockers().execute().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Protocol(ProtocolError::RetriesExhausted { attempts: 3, .. })
        ));
    }

    #[tokio::test]
    async fn request_hook_adds_headers() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/1/users/self"))
            .and(header("x-client", "tests"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"name": "me"}})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let hook: RequestHook = Arc::new(|builder| builder.header("x-client", "tests"));
        let name = client
            .action(ApiRequest::get("1/users/self"), |response| {
                let body = response.ensure_ok()?.json().unwrap_or_default();
                Ok(body["data"]["name"].as_str().map(str::to_string))
            })
            .with_request_hook(hook)
            .execute()
            .await
            .unwrap();

        assert_eq!(name.as_deref(), Some("me"));
    }

    #[derive(Debug, Deserialize)]
    struct SelfResponse {
        data: SelfData,
    }

    #[derive(Debug, Deserialize)]
    struct SelfData {
        name: String,
    }

    #[tokio::test]
    async fn custom_decoder_parses_typed_body_on_spawned_task() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/1/users/self"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"name": "me"}})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let handle = client
            .action(ApiRequest::get("/1/users/self"), |response| {
                let parsed: SelfResponse = response.ensure_ok()?.parse()?;
                Ok(parsed.data.name)
            })
            .spawn();

        assert_eq!(join(handle).await.unwrap(), "me");
    }

    #[tokio::test]
    async fn custom_decoder_reports_unparsable_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/1/users/self"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .action(ApiRequest::get("/1/users/self"), |response| {
                let parsed: SelfResponse = response.parse()?;
                Ok(parsed.data.name)
            })
            .execute()
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Parse(_)));
    }

    #[tokio::test]
    async fn queue_returns_before_completion() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/2/shockers/control"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(300)))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let (tx, mut rx) = oneshot::channel();
        let handle = client.stop(&shocker("s1")).unwrap().queue_with(
            move |ok| {
                let _ = tx.send(ok);
            },
            |err| panic!("unexpected failure: {err}"),
        );

        assert!(rx.try_recv().is_err());
        handle.await.unwrap();
        assert!(rx.await.unwrap());
    }

    #[tokio::test]
    async fn queued_failure_reaches_failure_callback() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/2/shockers/control"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let (tx, rx) = oneshot::channel();
        client
            .stop(&shocker("s1"))
            .unwrap()
            .queue_with(
                |_| panic!("success callback must not run"),
                move |err| {
                    let _ = tx.send(err.status());
                },
            )
            .await
            .unwrap();

        assert_eq!(rx.await.unwrap(), Some(403));
    }
}
