//! HTTP API for the rideshare marketplace.
//!
//! Exposes an axum [`Router`] under `/api/v1` backed by any
//! [`RideshareStore`]. Each endpoint authenticates the bearer token, asks the
//! [`AuthorizationGuard`] about its operation, validates the candidate
//! against related records and only then writes.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod respond;

pub use error::ApiError;

use std::{collections::BTreeMap, path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use chrono::TimeDelta;
use rideshare_core::{
  claims::{ClaimDecoder, DEFAULT_TTL_HOURS},
  guard::AuthorizationGuard,
  role::PermissionHierarchy,
  store::RideshareStore,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use handlers::{
  car_categories, car_makes, car_models, cars, feedback, passengers, rides, users,
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `RIDESHARE_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:            String,
  pub port:            u16,
  pub store_path:      PathBuf,
  /// HMAC key for bearer tokens.
  pub auth_secret:     String,
  #[serde(default = "default_issuer")]
  pub token_issuer:    String,
  #[serde(default = "default_ttl_hours")]
  pub token_ttl_hours: i64,
  /// Role name to rank; lower is more privileged.
  #[serde(default = "default_roles")]
  pub roles:           BTreeMap<String, u32>,
}

fn default_issuer() -> String { "rideshare".to_owned() }

fn default_ttl_hours() -> i64 { DEFAULT_TTL_HOURS }

fn default_roles() -> BTreeMap<String, u32> {
  BTreeMap::from([("admin".to_owned(), 0), ("user".to_owned(), 1)])
}

impl ServerConfig {
  pub fn decoder(&self) -> ClaimDecoder {
    ClaimDecoder::new(self.auth_secret.as_bytes())
      .with_issuer(self.token_issuer.clone())
      .with_ttl(TimeDelta::hours(self.token_ttl_hours))
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers. Everything but the
/// store is read-only after startup.
#[derive(Clone)]
pub struct AppState<S: RideshareStore> {
  pub store:   Arc<S>,
  pub decoder: Arc<ClaimDecoder>,
  pub guard:   Arc<AuthorizationGuard>,
}

impl<S: RideshareStore> AppState<S> {
  /// Build the state, validating the configured role ranks.
  pub fn new(store: S, config: &ServerConfig) -> rideshare_core::Result<Self> {
    let hierarchy = PermissionHierarchy::from_names(&config.roles)?;
    Ok(Self {
      store:   Arc::new(store),
      decoder: Arc::new(config.decoder()),
      guard:   Arc::new(AuthorizationGuard::new(hierarchy)),
    })
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router, nested under `/api/v1`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: RideshareStore + Clone + 'static,
{
  let api = Router::new()
    // Rides
    .route("/rides", get(rides::list::<S>))
    .route("/ride", post(rides::create::<S>))
    .route(
      "/ride/{ride_id}",
      get(rides::get_one::<S>)
        .put(rides::update::<S>)
        .delete(rides::delete::<S>),
    )
    .route("/user/{user_id}/rides", get(rides::list_by_owner::<S>))
    // Users
    .route("/users", get(users::list::<S>))
    .route("/user", post(users::create::<S>))
    .route(
      "/user/{user_id}",
      get(users::get_one::<S>)
        .put(users::update::<S>)
        .delete(users::delete::<S>),
    )
    // Cars
    .route("/cars", get(cars::list::<S>))
    .route("/car", post(cars::create::<S>))
    .route(
      "/car/{car_id}",
      get(cars::get_one::<S>)
        .put(cars::update::<S>)
        .delete(cars::delete::<S>),
    )
    .route("/user/{user_id}/cars", get(cars::list_by_owner::<S>))
    // Reference data
    .route("/car_models", get(car_models::list::<S>))
    .route("/car_model", post(car_models::create::<S>))
    .route(
      "/car_model/{id}",
      get(car_models::get_one::<S>)
        .put(car_models::update::<S>)
        .delete(car_models::delete::<S>),
    )
    .route("/car_makes", get(car_makes::list::<S>))
    .route("/car_make", post(car_makes::create::<S>))
    .route(
      "/car_make/{id}",
      get(car_makes::get_one::<S>)
        .put(car_makes::update::<S>)
        .delete(car_makes::delete::<S>),
    )
    .route("/car_categories", get(car_categories::list::<S>))
    .route("/car_category", post(car_categories::create::<S>))
    .route(
      "/car_category/{id}",
      get(car_categories::get_one::<S>)
        .put(car_categories::update::<S>)
        .delete(car_categories::delete::<S>),
    )
    // Passengers
    .route("/ride/{ride_id}/passengers", get(passengers::list::<S>))
    .route(
      "/ride/{ride_id}/passenger/{user_id}",
      post(passengers::join::<S>).delete(passengers::leave::<S>),
    )
    // Feedback
    .route("/feedback", get(feedback::list::<S>).post(feedback::create::<S>))
    .route(
      "/feedback/{feedback_id}",
      get(feedback::get_one::<S>)
        .put(feedback::update::<S>)
        .delete(feedback::delete::<S>),
    )
    .route("/ride/{ride_id}/feedback", get(feedback::list_by_ride::<S>))
    .route("/user/{user_id}/feedback", get(feedback::list_by_author::<S>))
    .route(
      "/user/{user_id}/ride/{ride_id}/feedback",
      get(feedback::list_by_author_and_ride::<S>),
    )
    .with_state(state);

  Router::new()
    .nest("/api/v1", api)
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use chrono::Utc;
  use rideshare_core::{
    model::{Car, CarCategory, CarMake, CarModel, Id, Passenger, Ride, User},
    role::Role,
  };
  use rideshare_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  const SECRET: &str = "integration-secret";

  fn config() -> ServerConfig {
    ServerConfig {
      host:            "127.0.0.1".to_string(),
      port:            8080,
      store_path:      PathBuf::from(":memory:"),
      auth_secret:     SECRET.to_string(),
      token_issuer:    default_issuer(),
      token_ttl_hours: default_ttl_hours(),
      roles:           default_roles(),
    }
  }

  async fn make_state() -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    AppState::new(store, &config()).unwrap()
  }

  fn token(state: &AppState<SqliteStore>, subject: Id, role: Role) -> String {
    state.decoder.issue(subject, role, Utc::now())
  }

  async fn oneshot_raw(
    state:  AppState<SqliteStore>,
    method: &str,
    uri:    &str,
    bearer: Option<&str>,
    body:   Option<Value>,
  ) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = bearer {
      builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    router(state).oneshot(builder.body(body).unwrap()).await.unwrap()
  }

  async fn json_body(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  /// Seed: an admin (id 1), a driver (id 2) with one car of a
  /// `seats`-seat category, a rider (id 3), and one future ride.
  struct World {
    state:  AppState<SqliteStore>,
    admin:  User,
    driver: User,
    rider:  User,
    car:    Car,
    ride:   Ride,
  }

  async fn world(seats: i64) -> World {
    let state = make_state().await;
    let s = state.store.as_ref();
    let mk = |name: &str, role| User {
      name: name.into(),
      email: format!("{name}@example.com"),
      password: "not-a-real-hash".into(),
      role,
      ..User::default()
    };
    let admin = s.create_user(mk("admin", Role::Admin)).await.unwrap();
    let driver = s.create_user(mk("driver", Role::User)).await.unwrap();
    let rider = s.create_user(mk("rider", Role::User)).await.unwrap();

    let category = s
      .create_car_category(CarCategory {
        id: 0,
        name: "Compact".into(),
        passenger_count: seats,
      })
      .await
      .unwrap();
    let make = s
      .create_car_make(CarMake {
        id: 0,
        name: "Peugeot".into(),
      })
      .await
      .unwrap();
    let model = s
      .create_car_model(CarModel {
        id: 0,
        category_id: category.id,
        make_id: make.id,
        name: "208".into(),
      })
      .await
      .unwrap();
    let car = s
      .create_car(Car {
        id: 0,
        user_id: driver.id,
        license_plate: "AB-123-CD".into(),
        year: 2022,
        model_id: model.id,
      })
      .await
      .unwrap();
    let ride = s
      .create_ride(Ride {
        owner_user_id: driver.id,
        vehicle_id: car.id,
        start_date: "2099-01-01 00:00:00".into(),
        start_city: "Nantes".into(),
        start_address: "Gare Nord".into(),
        end_city: "Rennes".into(),
        end_address: "Place Sainte-Anne".into(),
        ..Ride::default()
      })
      .await
      .unwrap();

    World {
      state,
      admin,
      driver,
      rider,
      car,
      ride,
    }
  }

  impl World {
    fn token(&self, user: &User) -> String { token(&self.state, user.id, user.role) }

    fn ride_body(&self, owner: Id) -> Value {
      json!({
        "owner_user_id": owner,
        "vehicle_id": self.car.id,
        "start_date": "2099-02-01 10:00:00",
        "start_city": "Nantes",
        "start_address": "Gare Sud",
        "end_city": "Angers",
        "end_address": "Gare",
      })
    }
  }

  // ── Public reads ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn rides_are_public() {
    let w = world(4).await;
    let resp = oneshot_raw(w.state.clone(), "GET", "/api/v1/rides", None, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["start_city"], "Nantes");
  }

  #[tokio::test]
  async fn unknown_ride_is_404() {
    let w = world(4).await;
    let resp = oneshot_raw(w.state, "GET", "/api/v1/ride/999", None, None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn non_numeric_path_is_json_400() {
    let w = world(4).await;
    let resp = oneshot_raw(w.state.clone(), "GET", "/api/v1/ride/abc", None, None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["error"].is_string());

    let t = w.token(&w.admin);
    let uri = format!("/api/v1/ride/{}/passenger/someone", w.ride.id);
    let resp = oneshot_raw(w.state, "POST", &uri, Some(&t), None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["error"].is_string());
  }

  #[tokio::test]
  async fn xml_when_asked() {
    let w = world(4).await;
    let req = Request::builder()
      .uri(format!("/api/v1/ride/{}", w.ride.id))
      .header(header::ACCEPT, "application/xml")
      .body(Body::empty())
      .unwrap();
    let resp = router(w.state).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
      resp.headers().get(header::CONTENT_TYPE).unwrap(),
      "application/xml"
    );
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.starts_with("<ride>"), "{text}");
    assert!(text.contains("<start_city>Nantes</start_city>"), "{text}");
  }

  // ── Authentication ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn missing_token_is_401_with_challenge() {
    let w = world(4).await;
    let resp = oneshot_raw(w.state, "GET", "/api/v1/users", None, None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(resp.headers().get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");
  }

  #[tokio::test]
  async fn expired_token_is_401() {
    let w = world(4).await;
    let stale = w
      .state
      .decoder
      .issue(w.admin.id, Role::Admin, Utc::now() - TimeDelta::hours(48));
    let resp = oneshot_raw(w.state, "GET", "/api/v1/users", Some(&stale), None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(resp).await["error"], "token expired");
  }

  #[tokio::test]
  async fn foreign_signature_is_401() {
    let w = world(4).await;
    let forged = ClaimDecoder::new("someone-else").issue(w.admin.id, Role::Admin, Utc::now());
    let resp = oneshot_raw(w.state, "GET", "/api/v1/users", Some(&forged), None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  // ── Authorization ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn only_admin_lists_users() {
    let w = world(4).await;
    let user_token = w.token(&w.rider);
    let resp = oneshot_raw(w.state.clone(), "GET", "/api/v1/users", Some(&user_token), None).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(resp).await["error"], "unauthorized");

    let admin_token = w.token(&w.admin);
    let resp = oneshot_raw(w.state, "GET", "/api/v1/users", Some(&admin_token), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 3);
    assert!(body[0].get("password").is_none());
  }

  #[tokio::test]
  async fn ride_create_for_someone_else_is_forbidden() {
    let w = world(4).await;
    let t = w.token(&w.rider);
    let body = w.ride_body(w.driver.id);
    let resp = oneshot_raw(w.state, "POST", "/api/v1/ride", Some(&t), Some(body)).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  }

  #[tokio::test]
  async fn ride_update_cannot_transfer_ownership() {
    let w = world(4).await;
    let t = w.token(&w.driver);
    let body = w.ride_body(w.rider.id);
    let uri = format!("/api/v1/ride/{}", w.ride.id);
    let resp = oneshot_raw(w.state, "PUT", &uri, Some(&t), Some(body)).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  }

  #[tokio::test]
  async fn role_change_needs_admin() {
    let w = world(4).await;
    let t = w.token(&w.rider);
    let uri = format!("/api/v1/user/{}", w.rider.id);
    let body = json!({
      "name": "rider",
      "email": "rider@example.com",
      "password": "new-password",
      "role": "admin",
    });
    let resp = oneshot_raw(w.state.clone(), "PUT", &uri, Some(&t), Some(body)).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body = json!({
      "name": "Rider Renamed",
      "email": "rider@example.com",
      "password": "new-password",
      "role": "user",
    });
    let resp = oneshot_raw(w.state.clone(), "PUT", &uri, Some(&t), Some(body)).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let stored = w.state.store.get_user(w.rider.id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Rider Renamed");
    assert!(stored.password.starts_with("$argon2"));
  }

  #[tokio::test]
  async fn update_without_role_keeps_stored_role() {
    let w = world(4).await;
    for user in [&w.admin, &w.rider] {
      let t = w.token(user);
      let uri = format!("/api/v1/user/{}", user.id);
      let body = json!({
        "name": format!("{} renamed", user.name),
        "email": user.email,
        "password": "new-password",
      });
      let resp = oneshot_raw(w.state.clone(), "PUT", &uri, Some(&t), Some(body)).await;
      assert_eq!(resp.status(), StatusCode::NO_CONTENT, "{}", user.name);

      let stored = w.state.store.get_user(user.id).await.unwrap().unwrap();
      assert_eq!(stored.role, user.role);
      assert_eq!(stored.name, format!("{} renamed", user.name));
    }
  }

  #[tokio::test]
  async fn reference_data_is_admin_only() {
    let w = world(4).await;
    let body = json!({ "name": "Citroen" });
    let t = w.token(&w.driver);
    let resp =
      oneshot_raw(w.state.clone(), "POST", "/api/v1/car_make", Some(&t), Some(body.clone())).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let t = w.token(&w.admin);
    let resp = oneshot_raw(w.state, "POST", "/api/v1/car_make", Some(&t), Some(body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(json_body(resp).await["name"], "Citroen");
  }

  // ── Validation ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn owner_creates_ride() {
    let w = world(4).await;
    let t = w.token(&w.driver);
    let body = w.ride_body(w.driver.id);
    let resp = oneshot_raw(w.state.clone(), "POST", "/api/v1/ride", Some(&t), Some(body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = json_body(resp).await;
    assert!(created["id"].as_i64().unwrap() > w.ride.id);

    let uri = format!("/api/v1/user/{}/rides", w.driver.id);
    let resp = oneshot_raw(w.state, "GET", &uri, Some(&t), None).await;
    assert_eq!(json_body(resp).await.as_array().unwrap().len(), 2);
  }

  #[tokio::test]
  async fn ride_in_someone_elses_car_is_400() {
    let w = world(4).await;
    let t = w.token(&w.rider);
    let body = w.ride_body(w.rider.id);
    let resp = oneshot_raw(w.state, "POST", "/api/v1/ride", Some(&t), Some(body)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
      json_body(resp).await["error"],
      "vehicle does not belong to owner"
    );
  }

  #[tokio::test]
  async fn duplicate_plate_is_400() {
    let w = world(4).await;
    let t = w.token(&w.driver);
    let body = json!({
      "user_id": w.driver.id,
      "license_plate": "AB-123-CD",
      "year": 2015,
      "model_id": w.car.model_id,
    });
    let resp = oneshot_raw(w.state, "POST", "/api/v1/car", Some(&t), Some(body)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn malformed_body_is_400() {
    let w = world(4).await;
    let t = w.token(&w.driver);
    let req = Request::builder()
      .method("POST")
      .uri("/api/v1/ride")
      .header(header::AUTHORIZATION, format!("Bearer {t}"))
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from("{not json"))
      .unwrap();
    let resp = router(w.state).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  // ── Passengers ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn join_until_full() {
    let w = world(1).await;
    let uri = format!("/api/v1/ride/{}/passenger/{}", w.ride.id, w.rider.id);
    let t = w.token(&w.rider);
    let resp = oneshot_raw(w.state.clone(), "POST", &uri, Some(&t), None).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = oneshot_raw(w.state.clone(), "POST", &uri, Some(&t), None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["error"], "user is already a passenger");

    let uri = format!("/api/v1/ride/{}/passenger/{}", w.ride.id, w.admin.id);
    let t = w.token(&w.admin);
    let resp = oneshot_raw(w.state, "POST", &uri, Some(&t), None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["error"], "ride is full");
  }

  #[tokio::test]
  async fn cannot_enrol_someone_else() {
    let w = world(4).await;
    let uri = format!("/api/v1/ride/{}/passenger/{}", w.ride.id, w.rider.id);
    let t = w.token(&w.driver);
    let resp = oneshot_raw(w.state, "POST", &uri, Some(&t), None).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  }

  #[tokio::test]
  async fn passenger_list_visible_to_members_only() {
    let w = world(4).await;
    w.state
      .store
      .add_passenger(Passenger::new(w.ride.id, w.rider.id), 4)
      .await
      .unwrap();
    let uri = format!("/api/v1/ride/{}/passengers", w.ride.id);

    for (user, expected) in [
      (&w.driver, StatusCode::OK),
      (&w.rider, StatusCode::OK),
      (&w.admin, StatusCode::OK),
    ] {
      let t = w.token(user);
      let resp = oneshot_raw(w.state.clone(), "GET", &uri, Some(&t), None).await;
      assert_eq!(resp.status(), expected, "{}", user.name);
    }

    let outsider = w
      .state
      .store
      .create_user(User {
        name: "outsider".into(),
        email: "outsider@example.com".into(),
        password: "x".into(),
        ..User::default()
      })
      .await
      .unwrap();
    let t = w.token(&outsider);
    let resp = oneshot_raw(w.state, "GET", &uri, Some(&t), None).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  }

  #[tokio::test]
  async fn driver_can_remove_passenger() {
    let w = world(4).await;
    w.state
      .store
      .add_passenger(Passenger::new(w.ride.id, w.rider.id), 4)
      .await
      .unwrap();
    let uri = format!("/api/v1/ride/{}/passenger/{}", w.ride.id, w.rider.id);
    let t = w.token(&w.driver);
    let resp = oneshot_raw(w.state.clone(), "DELETE", &uri, Some(&t), None).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = oneshot_raw(w.state, "DELETE", &uri, Some(&t), None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── Feedback ────────────────────────────────────────────────────────────────

  fn feedback_body(w: &World, author: Id, score: i64) -> Value {
    json!({
      "user_id": author,
      "ride_id": w.ride.id,
      "score": score,
      "message": "friendly driver",
    })
  }

  #[tokio::test]
  async fn passenger_leaves_feedback_and_it_is_public() {
    let w = world(4).await;
    w.state
      .store
      .add_passenger(Passenger::new(w.ride.id, w.rider.id), 4)
      .await
      .unwrap();
    let t = w.token(&w.rider);
    let body = feedback_body(&w, w.rider.id, 5);
    let resp = oneshot_raw(w.state.clone(), "POST", "/api/v1/feedback", Some(&t), Some(body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let uri = format!("/api/v1/ride/{}/feedback", w.ride.id);
    let resp = oneshot_raw(w.state, "GET", &uri, None, None).await;
    let listed = json_body(resp).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["score"], 5);
  }

  #[tokio::test]
  async fn feedback_eligibility() {
    let w = world(4).await;

    // Not a passenger.
    let t = w.token(&w.rider);
    let body = feedback_body(&w, w.rider.id, 4);
    let resp = oneshot_raw(w.state.clone(), "POST", "/api/v1/feedback", Some(&t), Some(body)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // The driver on their own ride.
    let t = w.token(&w.driver);
    let body = feedback_body(&w, w.driver.id, 4);
    let resp = oneshot_raw(w.state.clone(), "POST", "/api/v1/feedback", Some(&t), Some(body)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // An admin may post for a non-passenger.
    let t = w.token(&w.admin);
    let body = feedback_body(&w, w.rider.id, 4);
    let resp = oneshot_raw(w.state, "POST", "/api/v1/feedback", Some(&t), Some(body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
  }

  #[tokio::test]
  async fn feedback_update_pins_author_and_ride() {
    let w = world(4).await;
    w.state
      .store
      .add_passenger(Passenger::new(w.ride.id, w.rider.id), 4)
      .await
      .unwrap();
    let t = w.token(&w.rider);
    let body = feedback_body(&w, w.rider.id, 2);
    let resp = oneshot_raw(w.state.clone(), "POST", "/api/v1/feedback", Some(&t), Some(body)).await;
    let id = json_body(resp).await["id"].as_i64().unwrap();

    let uri = format!("/api/v1/feedback/{id}");
    let body = json!({
      "user_id": w.admin.id,
      "ride_id": 999,
      "score": 3,
      "message": "better on the way back",
    });
    let resp = oneshot_raw(w.state.clone(), "PUT", &uri, Some(&t), Some(body)).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let stored = w.state.store.get_feedback(id).await.unwrap().unwrap();
    assert_eq!(stored.user_id, w.rider.id);
    assert_eq!(stored.ride_id, w.ride.id);
    assert_eq!(stored.score, 3);
  }

  #[tokio::test]
  async fn admin_must_outrank_user_in_config() {
    for (admin, user) in [(1, 1), (2, 1)] {
      let mut cfg = config();
      cfg.roles = BTreeMap::from([("admin".to_owned(), admin), ("user".to_owned(), user)]);
      let store = SqliteStore::open_in_memory().await.unwrap();
      let Err(err) = AppState::new(store, &cfg) else {
        panic!("admin={admin} user={user} accepted");
      };
      assert!(matches!(err, rideshare_core::Error::RankOrder(..)), "{err}");
    }
  }

  #[test]
  fn unknown_role_in_config_is_rejected() {
    let mut cfg = config();
    cfg.roles.insert("superuser".to_owned(), 0);
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = rt.block_on(SqliteStore::open_in_memory()).unwrap();
    assert!(AppState::new(store, &cfg).is_err());
  }
}
