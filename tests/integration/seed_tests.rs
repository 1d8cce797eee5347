//! Demo data seen through the HTTP API

use axum::http::{header, HeaderValue, StatusCode};
use chrono_tz::Tz;
use serde_json::{json, Value};

use campus_portal::database::seed::{seed_demo_data, DEMO_PASSWORD};

use crate::common::{utc, TestCampus};

async fn login(server: &axum_test::TestServer, email: &str) -> HeaderValue {
    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": email, "password": DEMO_PASSWORD }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK, "login failed for {email}");
    let body: Value = response.json();
    let token = body["data"]["token"].as_str().unwrap();
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

#[tokio::test]
async fn test_seeded_accounts_reach_their_dashboards() {
    let campus = TestCampus::new(utc(2025, 3, 12, 10, 0)).await;
    assert!(seed_demo_data(&campus.db, campus.clock.as_ref(), Tz::UTC).await.unwrap());
    let server = campus.server();

    let professor = login(&server, "prof1@upf.ma").await;
    let response = server
        .get("/api/professor/dashboard")
        .add_header(header::AUTHORIZATION, professor.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["data"]["stats"]["coursesAssigned"], 2);
    assert_eq!(body["data"]["stats"]["totalStudents"], 2);

    let courses = server
        .get("/api/professor/courses")
        .add_header(header::AUTHORIZATION, professor)
        .await;
    let body: Value = courses.json();
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0]["departmentName"], "Computer Science");

    let president = login(&server, "president@upf.ma").await;
    let response = server
        .get("/api/club/dashboard")
        .add_header(header::AUTHORIZATION, president)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["message"], "Welcome to the club president dashboard");
    assert_eq!(body["data"]["club"]["name"], "Robotics Club");

    let admin = login(&server, "admin@upf.ma").await;
    let response = server
        .get("/api/admin/dashboard")
        .add_header(header::AUTHORIZATION, admin)
        .await;
    let body: Value = response.json();
    assert_eq!(body["data"]["user"]["role"], "admin");
}
