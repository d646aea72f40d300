#![allow(clippy::unwrap_used)]
// Integration tests for `SmartCastSession` over a wiremock device.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vizlo_api::{SmartCastClient, default_catalog};
use vizlo_core::{
    CoreError, DeviceSession, MutationToken, SettingCategory, SettingKey, SettingValue,
    SmartCastSession,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, SmartCastSession) {
    let server = MockServer::start().await;
    let base_url = reqwest::Url::parse(&server.uri()).unwrap();
    let client = SmartCastClient::with_client(reqwest::Client::new(), base_url);
    (server, SmartCastSession::with_client(client, default_catalog()))
}

fn success(items: serde_json::Value) -> serde_json::Value {
    json!({
        "STATUS": { "RESULT": "SUCCESS", "DETAIL": "Success" },
        "ITEMS": items
    })
}

fn status(result: &str) -> serde_json::Value {
    json!({ "STATUS": { "RESULT": result, "DETAIL": result } })
}

const CURRENT_INPUT: &str = "/menu_native/dynamic/tv_settings/devices/current_input";

async fn mount_current_input(server: &MockServer, input: &str) {
    Mock::given(method("GET"))
        .and(path(CURRENT_INPUT))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!([{
            "CNAME": "current_input",
            "TYPE": "T_STRING_V1",
            "HASHVAL": 3_297_463_891_i64,
            "VALUE": input
        }]))))
        .mount(server)
        .await;
}

async fn mount_current_app(server: &MockServer, app_id: &str, name_space: i64) {
    Mock::given(method("GET"))
        .and(path("/app/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "STATUS": { "RESULT": "SUCCESS" },
            "ITEM": { "VALUE": { "APP_ID": app_id, "NAME_SPACE": name_space, "MESSAGE": null } }
        })))
        .mount(server)
        .await;
}

// ── Current source ──────────────────────────────────────────────────

#[tokio::test]
async fn test_physical_input_is_reported_as_is() {
    let (server, session) = setup().await;
    mount_current_input(&server, "HDMI-1").await;

    let current = session.read_current_source().await.unwrap();

    assert_eq!(current.as_deref(), Some("HDMI-1"));
}

#[tokio::test]
async fn test_cast_surface_maps_to_catalog_app() {
    let (server, session) = setup().await;
    mount_current_input(&server, "CAST").await;
    mount_current_app(&server, "1", 3).await;

    let current = session.read_current_source().await.unwrap();

    assert_eq!(current.as_deref(), Some("Netflix"));
}

#[tokio::test]
async fn test_smartcast_surface_with_unknown_app_keeps_input_name() {
    let (server, session) = setup().await;
    mount_current_input(&server, "SMARTCAST").await;
    mount_current_app(&server, "999", 2).await;

    let current = session.read_current_source().await.unwrap();

    assert_eq!(current.as_deref(), Some("SMARTCAST"));
}

#[tokio::test]
async fn test_empty_current_input_is_none() {
    let (server, session) = setup().await;
    mount_current_input(&server, "").await;

    assert!(session.read_current_source().await.unwrap().is_none());
}

// ── Settings ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_read_setting_returns_value_and_token() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path("/menu_native/dynamic/tv_settings/picture/backlight"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!([{
            "CNAME": "backlight",
            "HASHVAL": 4_011_127_890_i64,
            "VALUE": 60
        }]))))
        .mount(&server)
        .await;

    let reading = session
        .read_setting(&SettingKey::picture("backlight"))
        .await
        .unwrap();

    assert_eq!(reading.value, SettingValue::Number(60));
    assert_eq!(reading.token, MutationToken(4_011_127_890));
}

#[tokio::test]
async fn test_unknown_setting_reports_its_key() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path("/menu_native/dynamic/tv_settings/audio/balance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status("URI_NOT_FOUND")))
        .mount(&server)
        .await;

    let err = session
        .read_setting(&SettingKey::audio("balance"))
        .await
        .unwrap_err();

    match err {
        CoreError::SettingNotFound { key } => assert_eq!(key, "audio/balance"),
        other => panic!("expected SettingNotFound, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_write_to_unknown_setting_reports_its_key() {
    let (server, session) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/menu_native/dynamic/tv_settings/audio/balance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status("URI_NOT_FOUND")))
        .mount(&server)
        .await;

    let err = session
        .write_setting(
            &SettingKey::audio("balance"),
            MutationToken(7),
            &SettingValue::Number(0),
        )
        .await
        .unwrap_err();

    match err {
        CoreError::SettingNotFound { key } => assert_eq!(key, "audio/balance"),
        other => panic!("expected SettingNotFound, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_setting_without_hashval_is_an_api_error() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path("/menu_native/dynamic/tv_settings/audio/volume"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!([{
            "CNAME": "volume",
            "VALUE": 20
        }]))))
        .mount(&server)
        .await;

    let err = session
        .read_setting(&SettingKey::audio("volume"))
        .await
        .unwrap_err();

    match err {
        CoreError::Api { message, code } => {
            assert!(message.contains("HASHVAL"), "message: {message}");
            assert!(code.is_none());
        }
        other => panic!("expected Api, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_read_category_skips_non_scalar_items() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path("/menu_native/dynamic/tv_settings/picture"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!([
            { "CNAME": "picture_mode", "HASHVAL": 11, "VALUE": "Calibrated" },
            { "CNAME": "color_calibration", "TYPE": "T_MENU_V1", "HASHVAL": 12 },
            { "CNAME": "contrast", "HASHVAL": 13, "VALUE": 50 },
            { "CNAME": "picture_size", "HASHVAL": 14, "VALUE": { "NAME": "Wide" } },
            { "CNAME": "sharpness", "VALUE": 2 }
        ]))))
        .mount(&server)
        .await;

    let readings = session.read_category(SettingCategory::Picture).await.unwrap();

    let keys: Vec<String> = readings.iter().map(|(key, _)| key.to_string()).collect();
    assert_eq!(keys, ["picture/picture_mode", "picture/contrast"]);
    assert_eq!(readings[1].1.value, SettingValue::Number(50));
    assert_eq!(readings[1].1.token, MutationToken(13));
}
