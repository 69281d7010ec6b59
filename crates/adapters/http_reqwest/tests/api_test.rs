//! Exercises the HTTP adapter against an in-process axum mock of the remote
//! service bound to an ephemeral local port.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use wattdesk_adapter_http_reqwest::{ApiClient, ApiConfig, ApiError, Resource, RestSource, UserSource};
use wattdesk_app::ports::{Capabilities, DashboardSource, Payload, RecordSource};
use wattdesk_domain::device::{Battery, DeviceKind, GenericDevice, Generator};
use wattdesk_domain::energy::DeviceSummary;
use wattdesk_domain::error::WattdeskError;
use wattdesk_domain::id::RecordId;
use wattdesk_domain::user::{Access, Credentials};

#[derive(Clone, Default)]
struct Recorded {
    bodies: Arc<Mutex<Vec<Value>>>,
}

fn battery_json(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "user": 1,
        "user_username": "alice",
        "name": name,
        "status": "online",
        "device_type": "Battery",
        "capacity_kwh": 13.5,
        "current_charge_kwh": 11.8,
        "charge_percentage": 87.4,
        "max_charge_rate_kw": 5.0,
        "max_discharge_rate_kw": 5.0,
        "created_at": "2024-05-01T10:00:00Z",
        "updated_at": "2024-05-02T10:00:00Z"
    })
}

fn user_json(id: i64, username: &str, is_staff: bool) -> Value {
    json!({
        "id": id,
        "username": username,
        "email": format!("{username}@example.com"),
        "first_name": "",
        "last_name": "",
        "is_active": true,
        "is_staff": is_staff,
        "date_joined": "2024-01-01T00:00:00Z",
        "device_count": 2
    })
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

fn mock(recorded: Recorded) -> Router {
    Router::new()
        .route(
            "/api/batteries/",
            get(|| async { Json(json!([battery_json(1, "Garage"), battery_json(2, "Basement")])) }).post(
                |State(recorded): State<Recorded>, Json(body): Json<Value>| async move {
                    recorded.bodies.lock().unwrap().push(body.clone());
                    let mut created = battery_json(10, body["name"].as_str().unwrap_or_default());
                    created["capacity_kwh"] = body["capacity_kwh"].clone();
                    (StatusCode::CREATED, Json(created))
                },
            ),
        )
        .route(
            "/api/batteries/{id}/",
            delete(|| async { StatusCode::NO_CONTENT }).patch(
                |State(recorded): State<Recorded>, Path(id): Path<i64>, Json(body): Json<Value>| async move {
                    recorded.bodies.lock().unwrap().push(body.clone());
                    let mut updated = battery_json(id, "Garage");
                    if let Some(name) = body.get("name") {
                        updated["name"] = name.clone();
                    }
                    Json(updated)
                },
            ),
        )
        .route(
            "/api/generators/",
            post(|| async { StatusCode::CREATED }).get(|| async {
                Json(json!({
                    "count": 1,
                    "next": null,
                    "previous": null,
                    "results": [{
                        "id": 4,
                        "name": "Backup Diesel",
                        "status": "offline",
                        "rated_output_w": 3500.0
                    }]
                }))
            }),
        )
        .route(
            "/api/devices/",
            get(|| async { Json(json!([battery_json(1, "Garage")])) }),
        )
        .route(
            "/api/heaters/",
            get(|| async {
                (
                    StatusCode::FORBIDDEN,
                    Json(json!({"detail": "You do not have permission to perform this action."})),
                )
            }),
        )
        .route(
            "/api/solar-panels/",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"name": ["This field is required."]})),
                )
            }),
        )
        .route(
            "/api/devices/stats/",
            get(|| async { Json(json!({"total": 5, "online": 3, "offline": 1, "error": 1})) }),
        )
        .route(
            "/api/users/",
            get(|| async { Json(json!([user_json(1, "alice", true), user_json(2, "bob", false)])) }),
        )
        .route(
            "/api/users/me/",
            get(|headers: HeaderMap| async move {
                match bearer(&headers) {
                    Some("bob-token") => (StatusCode::OK, Json(user_json(2, "bob", false))),
                    Some("alice-token") => (StatusCode::OK, Json(user_json(1, "alice", true))),
                    _ => (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({"detail": "Authentication credentials were not provided."})),
                    ),
                }
            }),
        )
        .route(
            "/api/auth/token/",
            post(|Json(body): Json<Value>| async move {
                if body["username"] == "alice" && body["password"] == "pw" {
                    (
                        StatusCode::OK,
                        Json(json!({"access": "alice-token", "refresh": "alice-refresh"})),
                    )
                } else {
                    (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({"detail": "No active account found with the given credentials"})),
                    )
                }
            }),
        )
        .route(
            "/api/auth/token/refresh/",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["refresh"], "alice-refresh");
                Json(json!({"access": "alice-token-2"}))
            }),
        )
        .route(
            "/api/auth/token/verify/",
            post(|Json(body): Json<Value>| async move {
                if body["token"] == "alice-token" {
                    (StatusCode::OK, Json(json!({})))
                } else {
                    (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({"detail": "Token is invalid or expired", "code": "token_not_valid"})),
                    )
                }
            }),
        )
        .route(
            "/graphql/",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert!(body["query"].as_str().unwrap_or_default().contains("energyStats"));
                if bearer(&headers).is_none() {
                    return (
                        StatusCode::OK,
                        Json(json!({"data": null, "errors": [{"message": "Authentication required"}]})),
                    );
                }
                (
                    StatusCode::OK,
                    Json(json!({
                        "data": {
                            "energyStats": {
                                "currentProduction": 4200.0,
                                "currentConsumption": 3100.0,
                                "currentStorage": {
                                    "totalCapacityWh": 73500.0,
                                    "currentLevelWh": 41800.0,
                                    "percentage": 56.9
                                },
                                "currentStorageFlow": 800.0,
                                "netGridFlow": -300.0
                            },
                            "allDevices": [
                                {
                                    "__typename": "GeneratorType",
                                    "id": "4",
                                    "name": "Backup Diesel",
                                    "status": "OFFLINE",
                                    "ratedOutputW": 3500.0
                                }
                            ]
                        }
                    })),
                )
            }),
        )
        .with_state(recorded)
}

/// Serve `router` on an ephemeral port and return its base URL.
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn client() -> (ApiClient, Recorded) {
    let recorded = Recorded::default();
    let base = serve(mock(recorded.clone())).await;
    let client = ApiClient::new(&ApiConfig {
        base_url: format!("{base}/api"),
        graphql_url: format!("{base}/graphql/"),
        timeout_secs: 5,
    })
    .unwrap();
    (client, recorded)
}

fn payload(value: Value) -> Payload {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

#[tokio::test]
async fn should_list_bare_array_responses() {
    let (client, _) = client().await;
    let source = RestSource::<Battery>::new(client, Resource::for_kind(DeviceKind::Battery));

    let batteries = source.list().await.unwrap();
    assert_eq!(batteries.len(), 2);
    assert_eq!(batteries[0].name, "Garage");
    assert_eq!(source.capabilities(), Capabilities::ALL);
}

#[tokio::test]
async fn should_unwrap_paginated_responses() {
    let (client, _) = client().await;
    let source = RestSource::<Generator>::new(client, Resource::Generators);

    let generators = source.list().await.unwrap();
    assert_eq!(generators.len(), 1);
    assert!((generators[0].spec.rated_output_w - 3500.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn should_post_projected_payload_on_create() {
    let (client, recorded) = client().await;
    let source = RestSource::<Battery>::new(client, Resource::Batteries);

    // The echoed record carries `capacity_kwh: null`, which a battery
    // cannot decode; the save still succeeds.
    source
        .create(payload(json!({"name": "Shed", "status": "online", "capacity_kwh": null})))
        .await
        .unwrap();
    let bodies = recorded.bodies.lock().unwrap().clone();
    assert_eq!(bodies, [json!({"name": "Shed", "status": "online", "capacity_kwh": null})]);
}

#[tokio::test]
async fn should_patch_on_update_and_delete_by_id() {
    let (client, recorded) = client().await;
    let source = RestSource::<Battery>::new(client, Resource::Batteries);

    source
        .update(&RecordId::from(3), payload(json!({"name": "Attic"})))
        .await
        .unwrap();
    assert_eq!(*recorded.bodies.lock().unwrap(), [json!({"name": "Attic"})]);

    source.delete(&RecordId::from(3)).await.unwrap();
}

#[tokio::test]
async fn should_accept_empty_created_answer() {
    let (client, _) = client().await;
    let source = RestSource::<Generator>::new(client, Resource::Generators);

    source
        .create(payload(json!({"name": "Backup Diesel", "rated_output_w": 3500})))
        .await
        .unwrap();
}

#[tokio::test]
async fn should_only_delete_from_generic_device_list() {
    let (client, _) = client().await;
    let source = RestSource::<GenericDevice>::new(client, Resource::Devices);

    let caps = source.capabilities();
    assert!(caps.delete);
    assert!(!caps.create);
    assert!(!caps.update);
    let devices = source.list().await.unwrap();
    assert_eq!(devices[0].spec["capacity_kwh"], json!(13.5));
}

#[tokio::test]
async fn should_surface_drf_detail_on_forbidden() {
    let (client, _) = client().await;
    let source = RestSource::<Battery>::new(client, Resource::Heaters);

    let err = source.list().await.unwrap_err();
    assert!(matches!(err, WattdeskError::Http(ref http) if http.status == 403));
    assert_eq!(
        err.user_message(),
        "You do not have permission to perform this action."
    );
}

#[tokio::test]
async fn should_flatten_field_errors_on_bad_request() {
    let (client, _) = client().await;
    let source = RestSource::<Battery>::new(client, Resource::SolarPanels);

    let err = source.create(Payload::new()).await.unwrap_err();
    assert_eq!(err.user_message(), "name: This field is required.");
}

#[tokio::test]
async fn should_report_transport_error_when_server_unreachable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = ApiClient::new(&ApiConfig {
        base_url: format!("http://{addr}/api"),
        graphql_url: format!("http://{addr}/graphql/"),
        timeout_secs: 5,
    })
    .unwrap();

    let err = RestSource::<Battery>::new(client, Resource::Batteries)
        .list()
        .await
        .unwrap_err();
    assert!(matches!(err, WattdeskError::Transport(_)));
    assert!(err.user_message().starts_with("Network error: "));
}

#[tokio::test]
async fn should_login_and_authenticate_following_requests() {
    let (client, _) = client().await;

    let anonymous = client.me().await.unwrap_err();
    assert!(matches!(anonymous, ApiError::Status { status: 401, .. }));

    let tokens = client
        .login(&Credentials {
            username: "alice".to_string(),
            password: "pw".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(tokens.access, "alice-token");

    let client = client.with_token(tokens.access.clone());
    let me = client.me().await.unwrap();
    assert_eq!(me.username, "alice");
    assert!(me.is_staff);

    client.verify_token(&tokens.access).await.unwrap();
    assert_eq!(client.refresh_token(&tokens.refresh).await.unwrap(), "alice-token-2");
}

#[tokio::test]
async fn should_reject_wrong_credentials_with_detail() {
    let (client, _) = client().await;

    let err = client
        .login(&Credentials {
            username: "alice".to_string(),
            password: "nope".to_string(),
        })
        .await
        .unwrap_err();
    match err {
        ApiError::Status { status, detail } => {
            assert_eq!(status, 401);
            assert_eq!(
                detail.as_deref(),
                Some("No active account found with the given credentials")
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(client.verify_token("stale").await.is_err());
}

#[tokio::test]
async fn should_fetch_device_stats() {
    let (client, _) = client().await;
    let stats = client.device_stats().await.unwrap();
    assert_eq!(stats.total, 5);
    assert_eq!(stats.online, 3);
}

#[tokio::test]
async fn should_scope_user_list_to_self_for_regular_users() {
    let (client, _) = client().await;
    let source = UserSource::new(client.with_token("bob-token"), Access::ReadOnly);

    let users = source.list().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].username, "bob");
    assert_eq!(source.capabilities(), Capabilities::READ_ONLY);
}

#[tokio::test]
async fn should_list_every_user_for_staff() {
    let (client, _) = client().await;
    let source = UserSource::new(client.with_token("alice-token"), Access::Staff);

    let users = source.list().await.unwrap();
    assert_eq!(users.len(), 2);
}

#[tokio::test]
async fn should_fetch_dashboard_through_graphql() {
    let (client, _) = client().await;

    let data = client.with_token("alice-token").fetch_dashboard().await.unwrap();
    assert!((data.snapshot.current_production_w - 4200.0).abs() < f64::EPSILON);
    assert!(matches!(data.devices[0], DeviceSummary::Generator(_)));
}

#[tokio::test]
async fn should_surface_first_graphql_error() {
    let (client, _) = client().await;

    let err = client.fetch_dashboard().await.unwrap_err();
    assert!(matches!(err, WattdeskError::GraphQl(_)));
    assert_eq!(err.user_message(), "Authentication required");
}

#[tokio::test]
async fn should_report_graphql_http_failures() {
    let base = serve(Router::new().route(
        "/graphql/",
        post(|| async { StatusCode::BAD_GATEWAY }),
    ))
    .await;
    let client = ApiClient::new(&ApiConfig {
        base_url: format!("{base}/api"),
        graphql_url: format!("{base}/graphql/"),
        timeout_secs: 5,
    })
    .unwrap();

    let err = client.fetch_dashboard().await.unwrap_err();
    assert_eq!(err.user_message(), "GraphQL request failed (502)");
}
