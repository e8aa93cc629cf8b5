#![allow(clippy::unwrap_used)]
// Integration tests for `RefreshCoordinator` against a mock room endpoint.

use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use laundryview_api::{RoomClient, TransportConfig};
use laundryview_core::{
    ApplianceKind, CoreError, MalformedRecord, RefreshCoordinator, RoomConfig, UnavailableCause,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn fixture() -> Value {
    serde_json::from_str(include_str!("fixtures/laundry_room.json")).unwrap()
}

fn room() -> RoomConfig {
    RoomConfig::new("1298", "4697601", "1644085830159")
}

async fn setup() -> (MockServer, RefreshCoordinator) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = RoomClient::new(base_url, &TransportConfig::default()).unwrap();
    (server, RefreshCoordinator::new(client, &room()))
}

async fn respond_with(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/api/c_room"))
        .and(query_param("loc", "1298"))
        .and(query_param("room", "4697601"))
        .and(query_param("rdm", "1644085830159"))
        .respond_with(response)
        .mount(server)
        .await;
}

fn record(key: &str, channel: &str, kind: &str) -> Value {
    json!({
        "appliance_desc_key": key,
        "lrm_channel": channel,
        "appliance_type": kind,
        "time_remaining": 0,
        "status_toggle": "available"
    })
}

// ── Happy path ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_refresh_maps_every_record_in_order() {
    let (server, coordinator) = setup().await;
    respond_with(&server, ResponseTemplate::new(200).set_body_json(fixture())).await;

    let snapshot = coordinator.refresh().await.unwrap();

    assert_eq!(snapshot.len(), 11);
    let kinds: Vec<ApplianceKind> = snapshot.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds.iter().filter(|k| **k == ApplianceKind::Washer).count(),
        6
    );
    assert_eq!(
        kinds.iter().filter(|k| **k == ApplianceKind::Dryer).count(),
        5
    );

    // Upstream order is preserved.
    assert_eq!(snapshot.get_index(0).unwrap().identity_key, "10000010001");
    assert_eq!(snapshot.get_index(10).unwrap().identity_key, "10000020005");

    let dryer_five = snapshot.get("10000020005").unwrap();
    assert_eq!(dryer_five.kind, ApplianceKind::Dryer);
    assert_eq!(dryer_five.channel, "5");
    assert_eq!(dryer_five.state, "inuse");
    assert_eq!(dryer_five.time_remaining, 25);
}

#[tokio::test]
async fn test_empty_room_is_a_valid_snapshot() {
    let (server, coordinator) = setup().await;
    respond_with(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({ "lRoom": { "app_data": [] } })),
    )
    .await;

    let snapshot = coordinator.refresh().await.unwrap();
    assert!(snapshot.is_empty());
}

// ── Fail-atomic mapping ─────────────────────────────────────────────

#[tokio::test]
async fn test_one_malformed_record_fails_the_whole_refresh() {
    let (server, coordinator) = setup().await;

    let mut broken = record("k3", "3", "W");
    broken
        .as_object_mut()
        .unwrap()
        .remove("appliance_desc_key");
    let body = json!({
        "lRoom": {
            "app_data": [
                record("k1", "1", "W"),
                record("k2", "2", "W"),
                broken,
                record("k4", "1", "D"),
                record("k5", "2", "D"),
            ]
        }
    });
    respond_with(&server, ResponseTemplate::new(200).set_body_json(body)).await;

    let result = coordinator.refresh().await;
    match result {
        Err(CoreError::MalformedRecord { index, source }) => {
            assert_eq!(index, 2);
            assert_eq!(
                source,
                MalformedRecord::MissingField {
                    field: "appliance_desc_key"
                }
            );
        }
        other => panic!("expected MalformedRecord, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_duplicate_identity_is_malformed() {
    let (server, coordinator) = setup().await;
    let body = json!({
        "lRoom": { "app_data": [record("k1", "1", "W"), record("k1", "2", "W")] }
    });
    respond_with(&server, ResponseTemplate::new(200).set_body_json(body)).await;

    let result = coordinator.refresh().await;
    assert!(
        matches!(
            result,
            Err(CoreError::MalformedRecord {
                index: 1,
                source: MalformedRecord::DuplicateIdentity { .. }
            })
        ),
        "expected DuplicateIdentity, got: {result:?}"
    );
}

#[tokio::test]
async fn test_unknown_type_code_is_not_an_error() {
    let (server, coordinator) = setup().await;
    let body = json!({ "lRoom": { "app_data": [record("k1", "1", "X")] } });
    respond_with(&server, ResponseTemplate::new(200).set_body_json(body)).await;

    let snapshot = coordinator.refresh().await.unwrap();
    assert_eq!(snapshot.get("k1").unwrap().kind, ApplianceKind::Unknown);
}

// ── Upstream failures ───────────────────────────────────────────────

#[tokio::test]
async fn test_missing_appliance_list_is_a_shape_error() {
    let (server, coordinator) = setup().await;
    respond_with(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({ "lRoom": {} })),
    )
    .await;

    let result = coordinator.refresh().await;
    match result {
        Err(CoreError::UnexpectedResponseShape { segment, .. }) => {
            assert_eq!(segment, "app_data");
        }
        other => panic!("expected UnexpectedResponseShape, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_is_upstream_unavailable() {
    let (server, coordinator) = setup().await;
    respond_with(&server, ResponseTemplate::new(503)).await;

    let result = coordinator.refresh().await;
    assert!(
        matches!(
            result,
            Err(CoreError::UpstreamUnavailable {
                cause: UnavailableCause::Status(503)
            })
        ),
        "expected Status(503), got: {result:?}"
    );
    assert!(result.unwrap_err().is_refresh_failure());
}

#[tokio::test]
async fn test_invalid_json_is_upstream_unavailable() {
    let (server, coordinator) = setup().await;
    respond_with(
        &server,
        ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"),
    )
    .await;

    let result = coordinator.refresh().await;
    assert!(
        matches!(
            result,
            Err(CoreError::UpstreamUnavailable {
                cause: UnavailableCause::Decode(_)
            })
        ),
        "expected Decode, got: {result:?}"
    );
}
