use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, Device, Envelope, Rule};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

fn device_body(guid: &str, device_type: &str) -> String {
    format!(
        r#"{{"guid":"{guid}","mac":"AA:BB:CC","type":"{device_type}","quantity":1,"name":"{guid}","version":"1.0","minor":"a"}}"#
    )
}

async fn register(app: &Router, guid: &str, device_type: &str) -> axum::response::Response {
    app.clone()
        .oneshot(json_request("POST", "/device", &device_body(guid, device_type)))
        .await
        .unwrap()
}

// --- health ---

#[tokio::test]
async fn health_returns_message_envelope() {
    let resp = app().oneshot(empty_request("GET", "/")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["code"], 200);
    assert_eq!(body["status"], true);
    assert!(body.get("data").is_none());
}

// --- register ---

#[tokio::test]
async fn register_device_returns_201_with_off_status() {
    let app = app();
    let resp = register(&app, "1234567890ABCDEF", "AKTUATOR").await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let envelope: Envelope<Device> = body_json(resp).await;
    let device = envelope.data.unwrap();
    assert_eq!(device.guid, "1234567890ABCDEF");
    assert_eq!(device.status, "0");
    assert_eq!(device.status_device, "OFF");
}

#[tokio::test]
async fn register_duplicate_guid_returns_409() {
    let app = app();
    register(&app, "1234567890ABCDEF", "SENSOR").await;
    let resp = register(&app, "1234567890ABCDEF", "SENSOR").await;

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let envelope: Envelope<Device> = body_json(resp).await;
    assert!(!envelope.status);
    assert_eq!(envelope.message, "Device already registered");
}

#[tokio::test]
async fn register_null_quantity_is_rejected() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/device",
            r#"{"guid":"1234567890ABCDEF","mac":"M","type":"SENSOR","quantity":null,"name":"N","version":"1","minor":"a"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- list ---

#[tokio::test]
async fn list_filters_by_kind_in_insertion_order() {
    let app = app();
    register(&app, "SENSOR-0000000001", "SENSOR_TEMPERATURE").await;
    register(&app, "AKTUATOR-00000001", "AKTUATOR").await;
    register(&app, "SENSOR-0000000002", "SENSOR").await;

    let resp = app
        .clone()
        .oneshot(empty_request("GET", "/devices?type=SENSOR"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let envelope: Envelope<Vec<Device>> = body_json(resp).await;
    let guids: Vec<_> = envelope.data.unwrap().into_iter().map(|d| d.guid).collect();
    assert_eq!(guids, ["SENSOR-0000000001", "SENSOR-0000000002"]);

    let resp = app
        .oneshot(empty_request("GET", "/devices?type=AKTUATOR"))
        .await
        .unwrap();
    let envelope: Envelope<Vec<Device>> = body_json(resp).await;
    assert_eq!(envelope.data.unwrap().len(), 1);
}

// --- get ---

#[tokio::test]
async fn get_unknown_device_returns_404_envelope() {
    let resp = app()
        .oneshot(empty_request("GET", "/device/UNKNOWN"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let envelope: Envelope<Device> = body_json(resp).await;
    assert_eq!(envelope.message, "Device not found");
}

#[tokio::test]
async fn get_decodes_reserved_characters_in_guid() {
    let app = app();
    register(&app, "1234567890ABCDEF?x=1", "SENSOR").await;
    register(&app, "1234567890ABCDEF", "SENSOR").await;

    let resp = app
        .oneshot(empty_request("GET", "/device/1234567890ABCDEF%3Fx%3D1"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let envelope: Envelope<Device> = body_json(resp).await;
    assert_eq!(envelope.data.unwrap().guid, "1234567890ABCDEF?x=1");
}

// --- control ---

#[tokio::test]
async fn control_turns_actuator_on() {
    let app = app();
    register(&app, "AKTUATOR-00000001", "AKTUATOR").await;

    let resp = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/device/control",
            r#"{"type":"AKTUATOR","message":"AKTUATOR-00000001#1"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["message"], "Device turned on");
    assert!(body.get("data").is_none());

    let resp = app
        .oneshot(empty_request("GET", "/device/AKTUATOR-00000001"))
        .await
        .unwrap();
    let envelope: Envelope<Device> = body_json(resp).await;
    let device = envelope.data.unwrap();
    assert_eq!(device.status, "1");
    assert_eq!(device.status_device, "ON");
}

#[tokio::test]
async fn control_rejects_sensors() {
    let app = app();
    register(&app, "SENSOR-0000000001", "SENSOR").await;

    let resp = app
        .oneshot(json_request(
            "PUT",
            "/device/control",
            r#"{"type":"SENSOR","message":"SENSOR-0000000001#1"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn control_rejects_malformed_message() {
    let resp = app()
        .oneshot(json_request(
            "PUT",
            "/device/control",
            r#"{"type":"AKTUATOR","message":"no-separator"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- update ---

#[tokio::test]
async fn update_replaces_fields() {
    let app = app();
    register(&app, "AKTUATOR-00000001", "AKTUATOR").await;

    let resp = app
        .oneshot(json_request(
            "PUT",
            "/device",
            r#"{"guid":"AKTUATOR-00000001","mac":"FF","type":"AKTUATOR","quantity":3,"name":"Pump","version":"2.0","minor":"b"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let envelope: Envelope<Device> = body_json(resp).await;
    let device = envelope.data.unwrap();
    assert_eq!(device.name, "Pump");
    assert_eq!(device.quantity, 3);
}

#[tokio::test]
async fn update_unknown_device_returns_404() {
    let resp = app()
        .oneshot(json_request("PUT", "/device", &device_body("UNKNOWN", "SENSOR")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- rules and delete ---

#[tokio::test]
async fn create_rule_joins_outputs() {
    let app = app();
    register(&app, "SENSOR-0000000001", "SENSOR").await;
    register(&app, "AKTUATOR-00000001", "AKTUATOR").await;
    register(&app, "AKTUATOR-00000002", "AKTUATOR").await;

    let resp = app
        .oneshot(json_request(
            "POST",
            "/rule",
            r#"{"input_guid":"SENSOR-0000000001","output_guid":["AKTUATOR-00000001","AKTUATOR-00000002"]}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let envelope: Envelope<Rule> = body_json(resp).await;
    let rule = envelope.data.unwrap();
    assert_eq!(rule.output_guid, "AKTUATOR-00000001,AKTUATOR-00000002");
    assert_eq!(rule.mac_server, mock_server::MAC_SERVER);
}

#[tokio::test]
async fn create_rule_requires_sensor_input() {
    let app = app();
    register(&app, "AKTUATOR-00000001", "AKTUATOR").await;

    let resp = app
        .oneshot(json_request(
            "POST",
            "/rule",
            r#"{"input_guid":"AKTUATOR-00000001","output_guid":["AKTUATOR-00000001"]}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_rule_without_outputs_is_rejected() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/rule",
            r#"{"input_guid":"SENSOR-0000000001","output_guid":[]}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_referenced_device_is_rejected() {
    let app = app();
    register(&app, "SENSOR-0000000001", "SENSOR").await;
    register(&app, "AKTUATOR-00000001", "AKTUATOR").await;
    app.clone()
        .oneshot(json_request(
            "POST",
            "/rule",
            r#"{"input_guid":"SENSOR-0000000001","output_guid":["AKTUATOR-00000001"]}"#,
        ))
        .await
        .unwrap();

    let resp = app
        .clone()
        .oneshot(empty_request("DELETE", "/device/AKTUATOR-00000001"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let envelope: Envelope<Device> = body_json(resp).await;
    assert_eq!(envelope.message, "Device is used by a rule");

    let resp = app
        .oneshot(empty_request("GET", "/device/AKTUATOR-00000001"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn delete_returns_the_removed_device() {
    let app = app();
    register(&app, "SENSOR-0000000001", "SENSOR").await;

    let resp = app
        .clone()
        .oneshot(empty_request("DELETE", "/device/SENSOR-0000000001"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let envelope: Envelope<Device> = body_json(resp).await;
    assert_eq!(envelope.data.unwrap().guid, "SENSOR-0000000001");

    let resp = app
        .oneshot(empty_request("DELETE", "/device/SENSOR-0000000001"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(!body_bytes(resp).await.is_empty());
}
