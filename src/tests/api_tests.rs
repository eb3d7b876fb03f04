use crate::api::handlers::app;
use crate::config::Config;
use crate::tests::{TEST_SECRET, create_demo_service, create_test_service};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "JWT_SECRET" => Some(TEST_SECRET.to_string()),
        _ => None,
    })
    .unwrap()
}

fn test_app() -> Router {
    app(Arc::new(create_test_service()), &test_config())
}

async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn register_and_login(app: &Router, body: Value) -> String {
    let email = body["email"].as_str().unwrap().to_string();
    let password = body["password"].as_str().unwrap().to_string();
    let (status, _) = send(app, Method::POST, "/api/auth/register", None, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, login) = send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": email, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    login["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_register_login_me_scenario() {
    let app = test_app();
    let registration = json!({"name": "A", "email": "a@x.com", "password": "secret1", "role": "patient"});

    let (status, body) = send(&app, Method::POST, "/api/auth/register", None, Some(registration.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["user"]["email"], "a@x.com");
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body.get("token").is_none());

    let (status, body) = send(&app, Method::POST, "/api/auth/register", None, Some(registration)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"message": "Email already exists"}));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": "a@x.com", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"message": "Invalid credentials"}));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": "a@x.com", "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();
    assert_eq!(body["user"]["role"], "patient");

    let (status, body) = send(&app, Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "a@x.com");
    assert_eq!(body["user"]["role"], "patient");
}

#[tokio::test]
async fn test_missing_or_garbled_token_is_unauthorized() {
    let app = test_app();
    let protected = [
        (Method::GET, "/api/auth/me"),
        (Method::GET, "/api/patients/profile"),
        (Method::PUT, "/api/patients/profile"),
        (Method::GET, "/api/patients/access-logs"),
        (Method::GET, "/api/doctors/dashboard"),
        (Method::POST, "/api/doctors/patients/1/records"),
    ];

    for (method, uri) in protected {
        let (status, body) = send(&app, method.clone(), uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(body["message"], "No token, authorization denied");

        let (status, body) = send(&app, method.clone(), uri, Some("garbage.token.value"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(body["message"], "Token is not valid");
    }
}

#[tokio::test]
async fn test_roles_are_enforced() {
    let app = test_app();
    let patient_token = register_and_login(
        &app,
        json!({"name": "Pat", "email": "p@x.com", "password": "secret1", "role": "patient"}),
    )
    .await;
    let doctor_token = register_and_login(
        &app,
        json!({
            "name": "Doc", "email": "d@x.com", "password": "secret1", "role": "doctor",
            "specialty": "Cardiology", "licenseNumber": "LIC-1"
        }),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/api/doctors/profile", Some(&patient_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied: Insufficient permissions");

    let (status, _) = send(&app, Method::GET, "/api/patients/profile", Some(&doctor_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, Method::GET, "/api/doctors/profile", Some(&doctor_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["doctor"]["licenseNumber"], "LIC-1");
    assert_eq!(body["doctor"]["specialty"], "Cardiology");

    let (status, _) = send(&app, Method::GET, "/api/auth/me", Some(&doctor_token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_profile_update_over_http() {
    let app = test_app();
    let token = register_and_login(
        &app,
        json!({"name": "Pat", "email": "p@x.com", "password": "secret1", "role": "patient"}),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/patients/profile",
        Some(&token),
        Some(json!({"phone": "555-0100", "bloodGroup": "O-", "allergies": ["Latex"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Profile updated successfully");
    let updated = body["patient"].clone();
    assert_eq!(updated["bloodGroup"], "O-");

    let (status, body) = send(&app, Method::PUT, "/api/patients/profile", Some(&token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["patient"], updated);

    let (status, body) = send(&app, Method::GET, "/api/patients/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["patient"], updated);
    assert!(body.get("bloodGroup").is_none());

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/patients/profile",
        Some(&token),
        Some(json!({"gender": "unknown"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().starts_with("Invalid request body"));
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = test_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_demo_data_over_http() {
    let app = app(Arc::new(create_demo_service().await), &test_config());

    let (status, body) = send(&app, Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "dataSource": "mock"}));

    let (_, login) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": "doctor@example.com", "password": "password123"})),
    )
    .await;
    let token = login["token"].as_str().unwrap().to_string();

    let (status, body) = send(&app, Method::GET, "/api/doctors/patients", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["patient"]["medipassId"], "MP12345");
    assert_eq!(body[0]["user"]["email"], "patient@example.com");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/doctors/patients/1/records",
        Some(&token),
        Some(json!({"type": "doctorNote", "title": "Follow-up", "date": "2023-06-01"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["doctorName"], "Dr. Jane Smith");
    assert_eq!(body["hospitalName"], "General Hospital");

    let (status, body) = send(&app, Method::GET, "/api/doctors/appointments/999", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Appointment not found");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/api-docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"].get("/api/patients/appointments/{id}").is_some());
    assert!(body["components"]["securitySchemes"].get("Bearer").is_some());
}
