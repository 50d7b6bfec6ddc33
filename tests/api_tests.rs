use axum::http::{header::AUTHORIZATION, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use hotel_booking_api::{
    api::{create_router, AppState},
    config::Config,
    recommender::{Catalog, CatalogItem, RecommenderHandle},
    services::auth,
    store::Store,
};

const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "admin-password";

fn sample_catalog() -> Catalog {
    Catalog::from_items(vec![
        CatalogItem::new(0, "Alpha Inn", "beach resort pool"),
        CatalogItem::new(0, "Beta Lodge", "beach resort spa"),
        CatalogItem::new(0, "Gamma Suites", "mountain cabin fireplace"),
    ])
}

async fn create_test_server_with(config: Config) -> TestServer {
    let store = Store::in_memory();
    auth::seed_admin(&store, ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .unwrap();
    let recommender = RecommenderHandle::build(sample_catalog()).unwrap();
    let state = AppState::new(store, recommender, config);
    TestServer::new(create_router(state)).unwrap()
}

async fn create_test_server() -> TestServer {
    create_test_server_with(Config::default()).await
}

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

async fn login(server: &TestServer, email: &str, password: &str) -> String {
    let response = server
        .post("/api/v1/login")
        .json(&json!({ "email": email, "password": password }))
        .await;
    response.assert_status_ok();
    let session: Value = response.json();
    session["token"].as_str().unwrap().to_string()
}

async fn signup_and_login(server: &TestServer, email: &str) -> String {
    server
        .post("/api/v1/signup")
        .json(&json!({
            "first_name": "Sara",
            "last_name": "Amrani",
            "email": email,
            "password": "correct-horse"
        }))
        .await
        .assert_status(StatusCode::CREATED);
    login(server, email, "correct-horse").await
}

async fn create_hotel(server: &TestServer, admin_token: &str, rooms: u32) -> Value {
    let response = server
        .post("/api/v1/admin/hotels")
        .add_header(AUTHORIZATION, bearer(admin_token))
        .json(&json!({
            "name": "Riad Atlas",
            "country": "Morocco",
            "city": "Marrakech",
            "rating": "FourStar",
            "rooms": rooms,
            "price_per_night": 80.0,
            "status": "active"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server().await;
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["catalog_size"], 3);
    assert_eq!(body["generation"], 1);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server().await;
    let response = server
        .get("/health")
        .add_header(
            axum::http::HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("req-42"),
        )
        .await;
    assert_eq!(response.header("x-request-id"), "req-42");
}

#[tokio::test]
async fn test_recommendations() {
    let server = create_test_server().await;
    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("name", "Alpha Inn")
        .add_query_param("count", 2)
        .await;
    response.assert_status_ok();

    let results: Vec<Value> = response.json();
    let names: Vec<&str> = results.iter().map(|r| r["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Beta Lodge", "Gamma Suites"]);
    assert!(results[0].get("address").is_some());
}

#[tokio::test]
async fn test_recommendations_lookup_ignores_case_and_padding() {
    let server = create_test_server().await;
    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("name", "  aLpHa iNn ")
        .add_query_param("count", 1)
        .await;
    response.assert_status_ok();

    let results: Vec<Value> = response.json();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["name"], "Beta Lodge");
}

#[tokio::test]
async fn test_recommendations_default_count_is_capped_by_catalog() {
    let config = Config {
        default_recommendations: 2,
        ..Config::default()
    };
    let server = create_test_server_with(config).await;
    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("name", "Gamma Suites")
        .await;
    response.assert_status_ok();

    let results: Vec<Value> = response.json();
    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn test_recommendations_unknown_hotel() {
    let server = create_test_server().await;
    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("name", "Omega")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("Omega"));
}

#[tokio::test]
async fn test_recommendations_invalid_count() {
    let server = create_test_server().await;

    for count in [0, 3, 10] {
        let response = server
            .get("/api/v1/recommendations")
            .add_query_param("name", "Alpha Inn")
            .add_query_param("count", count)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

fn assert_json_error(response: &axum_test::TestResponse, status: StatusCode) -> String {
    response.assert_status(status);
    let body: Value = response.json();
    body["error"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_malformed_recommendation_query_returns_json_error() {
    let server = create_test_server().await;

    for count in ["-1", "two"] {
        let response = server
            .get("/api/v1/recommendations")
            .add_query_param("name", "Alpha Inn")
            .add_query_param("count", count)
            .await;
        let error = assert_json_error(&response, StatusCode::BAD_REQUEST);
        assert!(error.starts_with("Invalid input"), "{}", error);
    }

    let response = server.get("/api/v1/recommendations").await;
    let error = assert_json_error(&response, StatusCode::BAD_REQUEST);
    assert!(error.contains("name"), "{}", error);
}

#[tokio::test]
async fn test_malformed_body_and_path_return_json_error() {
    let server = create_test_server().await;

    let response = server
        .post("/api/v1/signup")
        .json(&json!({ "email": 42 }))
        .await;
    assert_json_error(&response, StatusCode::BAD_REQUEST);

    let response = server
        .post("/api/v1/login")
        .text("not json")
        .await;
    assert_json_error(&response, StatusCode::BAD_REQUEST);

    let response = server.get("/api/v1/hotels/not-a-uuid").await;
    assert_json_error(&response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reload_requires_admin() {
    let server = create_test_server().await;

    server
        .post("/api/v1/admin/recommendations/reload")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let token = signup_and_login(&server, "guest@example.com").await;
    server
        .post("/api/v1/admin/recommendations/reload")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_reload_swaps_catalog() {
    let path = std::env::temp_dir().join(format!("catalog-{}.json", uuid::Uuid::new_v4()));
    std::fs::write(
        &path,
        r#"[
            {"HotelName": "Kasbah Dream", "combined": "desert kasbah pool"},
            {"HotelName": "Dune Camp", "combined": "desert camp camel"}
        ]"#,
    )
    .unwrap();

    let config = Config {
        catalog_path: path.to_string_lossy().into_owned(),
        ..Config::default()
    };
    let server = create_test_server_with(config).await;
    let token = login(&server, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let response = server
        .post("/api/v1/admin/recommendations/reload")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status_ok();
    let summary: Value = response.json();
    assert_eq!(summary["generation"], 2);
    assert_eq!(summary["catalog_size"], 2);

    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("name", "kasbah dream")
        .add_query_param("count", 1)
        .await;
    response.assert_status_ok();
    let results: Vec<Value> = response.json();
    assert_eq!(results[0]["name"], "Dune Camp");

    std::fs::remove_file(&path).unwrap();
}

#[tokio::test]
async fn test_failed_reload_keeps_current_catalog() {
    let config = Config {
        catalog_path: "does/not/exist.json".to_string(),
        ..Config::default()
    };
    let server = create_test_server_with(config).await;
    let token = login(&server, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    server
        .post("/api/v1/admin/recommendations/reload")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let health: Value = server.get("/health").await.json();
    assert_eq!(health["catalog_size"], 3);
    assert_eq!(health["generation"], 1);
}

#[tokio::test]
async fn test_signup_login_and_me() {
    let server = create_test_server().await;
    let token = signup_and_login(&server, "sara@example.com").await;

    let response = server
        .get("/api/v1/me")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status_ok();
    let me: Value = response.json();
    assert_eq!(me["email"], "sara@example.com");
    assert_eq!(me["role"], "user");
    assert!(me.get("password_hash").is_none());

    server
        .post("/api/v1/logout")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .get("/api/v1/me")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signup_rejects_duplicate_email() {
    let server = create_test_server().await;
    signup_and_login(&server, "sara@example.com").await;

    server
        .post("/api/v1/signup")
        .json(&json!({
            "first_name": "Other",
            "last_name": "Person",
            "email": "Sara@Example.com",
            "password": "another-password"
        }))
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_signup_validation() {
    let server = create_test_server().await;
    server
        .post("/api/v1/signup")
        .json(&json!({
            "first_name": "Sara",
            "last_name": "Amrani",
            "email": "not-an-email",
            "password": "short"
        }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let server = create_test_server().await;
    server
        .post("/api/v1/login")
        .json(&json!({ "email": ADMIN_EMAIL, "password": "wrong-password" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_hotel_crud() {
    let server = create_test_server().await;
    let token = login(&server, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let hotel = create_hotel(&server, &token, 10).await;
    let id = hotel["id"].as_str().unwrap().to_string();
    assert_eq!(hotel["name"], "Riad Atlas");

    let response = server
        .get("/api/v1/hotels")
        .add_query_param("city", "Marrakech")
        .await;
    response.assert_status_ok();
    let page: Value = response.json();
    assert_eq!(page["total"], 1);

    let response = server
        .put(&format!("/api/v1/admin/hotels/{}", id))
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({
            "name": "Riad Atlas Deluxe",
            "country": "Morocco",
            "city": "Marrakech",
            "rooms": 12,
            "price_per_night": 95.0,
            "status": "active"
        }))
        .await;
    response.assert_status_ok();
    let updated: Value = response.json();
    assert_eq!(updated["name"], "Riad Atlas Deluxe");

    server
        .delete(&format!("/api/v1/admin/hotels/{}", id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .get(&format!("/api/v1/hotels/{}", id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_routes_reject_regular_users() {
    let server = create_test_server().await;
    let token = signup_and_login(&server, "guest@example.com").await;

    for path in ["/api/v1/admin/users", "/api/v1/admin/dashboard/stats"] {
        server
            .get(path)
            .add_header(AUTHORIZATION, bearer(&token))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }
}

#[tokio::test]
async fn test_reservation_and_payment_flow() {
    let server = create_test_server().await;
    let admin_token = login(&server, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let hotel = create_hotel(&server, &admin_token, 1).await;
    let hotel_id = hotel["id"].as_str().unwrap().to_string();

    let user_token = signup_and_login(&server, "sara@example.com").await;

    let response = server
        .post("/api/v1/reservations/check-availability")
        .json(&json!({
            "hotel_id": hotel_id,
            "check_in": "2026-07-01",
            "check_out": "2026-07-04"
        }))
        .await;
    response.assert_status_ok();
    let availability: Value = response.json();
    assert_eq!(availability["available"], true);

    let response = server
        .post("/api/v1/reservations")
        .add_header(AUTHORIZATION, bearer(&user_token))
        .json(&json!({
            "hotel_id": hotel_id,
            "check_in": "2026-07-01",
            "check_out": "2026-07-04",
            "guests": 2
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let reservation: Value = response.json();
    assert_eq!(reservation["total_price"], 240.0);
    let reservation_id = reservation["id"].as_str().unwrap().to_string();

    // The only room is now held for an overlapping stay
    server
        .post("/api/v1/reservations")
        .add_header(AUTHORIZATION, bearer(&user_token))
        .json(&json!({
            "hotel_id": hotel_id,
            "check_in": "2026-07-03",
            "check_out": "2026-07-05",
            "guests": 1
        }))
        .await
        .assert_status(StatusCode::CONFLICT);

    let mine: Value = server
        .get("/api/v1/reservations")
        .add_header(AUTHORIZATION, bearer(&user_token))
        .await
        .json();
    assert_eq!(mine["total"], 1);

    let response = server
        .post("/api/v1/payments")
        .add_header(AUTHORIZATION, bearer(&user_token))
        .json(&json!({ "reservation_id": reservation_id, "method": "card" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let payment: Value = response.json();
    assert_eq!(payment["status"], "completed");
    let payment_id = payment["id"].as_str().unwrap().to_string();

    let stats: Value = server
        .get("/api/v1/admin/dashboard/stats")
        .add_header(AUTHORIZATION, bearer(&admin_token))
        .await
        .json();
    assert_eq!(stats["total_revenue"], 240.0);
    assert_eq!(stats["reservations_count"], 1);

    let response = server
        .post(&format!("/api/v1/admin/payments/{}/refund", payment_id))
        .add_header(AUTHORIZATION, bearer(&admin_token))
        .await;
    response.assert_status_ok();
    let refunded: Value = response.json();
    assert_eq!(refunded["status"], "refunded");

    let reservation: Value = server
        .get(&format!("/api/v1/admin/reservations/{}", reservation_id))
        .add_header(AUTHORIZATION, bearer(&admin_token))
        .await
        .json();
    assert_eq!(reservation["status"], "cancelled");
    assert_eq!(reservation["payment_status"], "refunded");
}
