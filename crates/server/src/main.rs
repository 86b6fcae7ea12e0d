// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod session;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State as AxumState,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use fleetrent_api::{
    AddVehicleRequest, AddVehicleResponse, ApiError, CreateLocationRequest,
    CreateLocationResponse, ListLocationsResponse, ListRentalsResponse, ListVehiclesResponse,
    LocationInfo, LoginRequest, LoginResponse, MaintenanceResponse, RegisterRequest,
    RegisterResponse, RelocateVehicleRequest, RelocateVehicleResponse, RentVehicleRequest,
    RentVehicleResponse, ReturnVehicleRequest, ReturnVehicleResponse, VehicleHistoryResponse,
    VehicleInfo, WhoAmIResponse,
};
use fleetrent_audit::Cause;
use fleetrent_persistence::Persistence;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::session::{BearerToken, SessionUser};

/// fleetrent server - HTTP API for the fleetrent vehicle rental backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "FLEETRENT_DATABASE")]
    database: Option<String>,

    /// `MySQL`/`MariaDB` connection URL. Takes precedence over `--database`.
    #[arg(long, env = "DATABASE_URL")]
    mysql_url: Option<String>,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to bind the server to
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Days a login session stays valid
    #[arg(
        long,
        default_value_t = 30,
        value_parser = clap::value_parser!(i64).range(1..=MAX_SESSION_TTL_DAYS),
    )]
    session_ttl_days: i64,
}

/// Longest session lifetime accepted on the command line.
const MAX_SESSION_TTL_DAYS: i64 = 365;

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    persistence: Arc<Mutex<Persistence>>,
    session_ttl: Duration,
}

/// Query parameters for listing a location's vehicles.
#[derive(Debug, Default, Deserialize)]
struct ListVehiclesQuery {
    /// Only list vehicles that can be rented now.
    #[serde(default)]
    available_only: bool,
}

/// Response for endpoints that only acknowledge success.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AckResponse {
    success: bool,
    message: String,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        // 304 responses carry no body.
        if self.status == StatusCode::NOT_MODIFIED {
            return self.status.into_response();
        }
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::InvalidInput { .. } | ApiError::PasswordPolicyViolation { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::NotModified { .. } => StatusCode::NOT_MODIFIED,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: format!("Invalid request body: {}", rejection.body_text()),
        }
    }
}

impl From<PathRejection> for HttpError {
    fn from(rejection: PathRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: format!("Invalid path parameter: {}", rejection.body_text()),
        }
    }
}

impl From<QueryRejection> for HttpError {
    fn from(rejection: QueryRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: format!("Invalid query string: {}", rejection.body_text()),
        }
    }
}

/// Builds the audit cause for an HTTP request.
fn request_cause(description: &str) -> Cause {
    let id: String = format!("http-{}", OffsetDateTime::now_utc().unix_timestamp_nanos());
    Cause::new(id, description.to_string())
}

// ============================================================================
// Users
// ============================================================================

/// Handler for POST `/user/register`.
async fn handle_register(
    AxumState(app_state): AxumState<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<RegisterResponse>, HttpError> {
    let Json(req) = payload?;

    let mut persistence = app_state.persistence.lock().await;
    let response: RegisterResponse = fleetrent_api::register_user(&mut persistence, &req)?;
    drop(persistence);

    info!(user_id = response.user_id, user_type = %response.user_type, "Registered user");
    Ok(Json(response))
}

/// Handler for POST `/user/login`.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, HttpError> {
    let Json(req) = payload?;

    let mut persistence = app_state.persistence.lock().await;
    let response: LoginResponse =
        fleetrent_api::login(&mut persistence, &req, app_state.session_ttl)?;

    Ok(Json(response))
}

/// Handler for POST `/user/logout`.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<AckResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    fleetrent_api::logout(&mut persistence, &token)?;

    Ok(Json(AckResponse {
        success: true,
        message: String::from("Logged out"),
    }))
}

/// Handler for GET `/user/me`.
async fn handle_whoami(SessionUser(actor, _user): SessionUser) -> Json<WhoAmIResponse> {
    Json(fleetrent_api::whoami(&actor))
}

/// Handler for GET `/user/rentals`.
async fn handle_list_my_rentals(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
) -> Result<Json<ListRentalsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(fleetrent_api::list_my_rentals(
        &mut persistence,
        &actor,
    )?))
}

// ============================================================================
// Locations
// ============================================================================

/// Handler for GET `/location`.
async fn handle_list_locations(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(_actor, _user): SessionUser,
) -> Result<Json<ListLocationsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(fleetrent_api::list_locations(&mut persistence)?))
}

/// Handler for POST `/location`.
async fn handle_create_location(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    payload: Result<Json<CreateLocationRequest>, JsonRejection>,
) -> Result<Json<CreateLocationResponse>, HttpError> {
    let Json(req) = payload?;

    let mut persistence = app_state.persistence.lock().await;
    let response: CreateLocationResponse = fleetrent_api::create_location(
        &mut persistence,
        &req,
        &actor,
        request_cause("POST /location"),
    )?;
    drop(persistence);

    info!(location_id = response.location_id, "Created location");
    Ok(Json(response))
}

/// Handler for GET `/location/{id}`.
async fn handle_get_location(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(_actor, _user): SessionUser,
    location_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<LocationInfo>, HttpError> {
    let Path(location_id) = location_id?;

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(fleetrent_api::get_location(
        &mut persistence,
        location_id,
    )?))
}

/// Handler for GET `/location/{id}/vehicles`.
async fn handle_list_location_vehicles(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(_actor, _user): SessionUser,
    location_id: Result<Path<i64>, PathRejection>,
    query: Result<Query<ListVehiclesQuery>, QueryRejection>,
) -> Result<Json<ListVehiclesResponse>, HttpError> {
    let Path(location_id) = location_id?;
    let Query(query) = query?;

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(fleetrent_api::list_location_vehicles(
        &mut persistence,
        location_id,
        query.available_only,
    )?))
}

/// Handler for POST `/location/{id}/vehicles`.
async fn handle_add_vehicle(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    location_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<AddVehicleRequest>, JsonRejection>,
) -> Result<Json<AddVehicleResponse>, HttpError> {
    let Path(location_id) = location_id?;
    let Json(req) = payload?;

    let mut persistence = app_state.persistence.lock().await;
    let response: AddVehicleResponse = fleetrent_api::add_vehicle_to_location(
        &mut persistence,
        location_id,
        &req,
        &actor,
        request_cause("POST /location/{id}/vehicles"),
    )?;
    drop(persistence);

    info!(
        vehicle_id = response.vehicle.vehicle_id,
        location_id, "Added vehicle"
    );
    Ok(Json(response))
}

// ============================================================================
// Vehicles
// ============================================================================

/// Handler for GET `/vehicle/{id}`. Requires no session.
async fn handle_get_vehicle(
    AxumState(app_state): AxumState<AppState>,
    vehicle_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<VehicleInfo>, HttpError> {
    let Path(vehicle_id) = vehicle_id?;

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(fleetrent_api::get_vehicle(&mut persistence, vehicle_id)?))
}

/// Handler for POST `/vehicle/{id}/rent`.
async fn handle_rent_vehicle(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    vehicle_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<RentVehicleRequest>, JsonRejection>,
) -> Result<Json<RentVehicleResponse>, HttpError> {
    let Path(vehicle_id) = vehicle_id?;
    let Json(req) = payload?;

    let mut persistence = app_state.persistence.lock().await;
    let response: RentVehicleResponse = fleetrent_api::rent_vehicle(
        &mut persistence,
        vehicle_id,
        &req,
        &actor,
        request_cause("POST /vehicle/{id}/rent"),
        OffsetDateTime::now_utc(),
    )?;

    Ok(Json(response))
}

/// Handler for POST `/vehicle/{id}/return`.
async fn handle_return_vehicle(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    vehicle_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ReturnVehicleRequest>, JsonRejection>,
) -> Result<Json<ReturnVehicleResponse>, HttpError> {
    let Path(vehicle_id) = vehicle_id?;
    let Json(req) = payload?;

    let mut persistence = app_state.persistence.lock().await;
    let response: ReturnVehicleResponse = fleetrent_api::return_vehicle(
        &mut persistence,
        vehicle_id,
        &req,
        &actor,
        request_cause("POST /vehicle/{id}/return"),
        OffsetDateTime::now_utc(),
    )?;

    Ok(Json(response))
}

/// Handler for POST `/vehicle/{id}/relocate`.
async fn handle_relocate_vehicle(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    vehicle_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<RelocateVehicleRequest>, JsonRejection>,
) -> Result<Json<RelocateVehicleResponse>, HttpError> {
    let Path(vehicle_id) = vehicle_id?;
    let Json(req) = payload?;

    let mut persistence = app_state.persistence.lock().await;
    let response: RelocateVehicleResponse = fleetrent_api::relocate_vehicle(
        &mut persistence,
        vehicle_id,
        &req,
        &actor,
        request_cause("POST /vehicle/{id}/relocate"),
    )?;
    drop(persistence);

    info!(vehicle_id, location_id = response.location_id, "Relocated vehicle");
    Ok(Json(response))
}

/// Handler for POST `/vehicle/{id}/maintenance/start`.
async fn handle_start_maintenance(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    vehicle_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MaintenanceResponse>, HttpError> {
    let Path(vehicle_id) = vehicle_id?;

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(fleetrent_api::start_maintenance(
        &mut persistence,
        vehicle_id,
        &actor,
        request_cause("POST /vehicle/{id}/maintenance/start"),
    )?))
}

/// Handler for POST `/vehicle/{id}/maintenance/finish`.
async fn handle_finish_maintenance(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    vehicle_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MaintenanceResponse>, HttpError> {
    let Path(vehicle_id) = vehicle_id?;

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(fleetrent_api::finish_maintenance(
        &mut persistence,
        vehicle_id,
        &actor,
        request_cause("POST /vehicle/{id}/maintenance/finish"),
    )?))
}

/// Handler for GET `/vehicle/{id}/history`.
async fn handle_vehicle_history(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    vehicle_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<VehicleHistoryResponse>, HttpError> {
    let Path(vehicle_id) = vehicle_id?;

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(fleetrent_api::vehicle_history(
        &mut persistence,
        vehicle_id,
        &actor,
    )?))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    let api: Router<AppState> = Router::new()
        .route("/user/register", post(handle_register))
        .route("/user/login", post(handle_login))
        .route("/user/logout", post(handle_logout))
        .route("/user/me", get(handle_whoami))
        .route("/user/rentals", get(handle_list_my_rentals))
        .route(
            "/location",
            get(handle_list_locations).post(handle_create_location),
        )
        .route("/location/{id}", get(handle_get_location))
        .route(
            "/location/{id}/vehicles",
            get(handle_list_location_vehicles).post(handle_add_vehicle),
        )
        .route("/vehicle/{id}", get(handle_get_vehicle))
        .route("/vehicle/{id}/rent", post(handle_rent_vehicle))
        .route("/vehicle/{id}/return", post(handle_return_vehicle))
        .route("/vehicle/{id}/relocate", post(handle_relocate_vehicle))
        .route(
            "/vehicle/{id}/maintenance/start",
            post(handle_start_maintenance),
        )
        .route(
            "/vehicle/{id}/maintenance/finish",
            post(handle_finish_maintenance),
        )
        .route("/vehicle/{id}/history", get(handle_vehicle_history));

    Router::new().nest("/api/v1", api).with_state(app_state)
}

/// Opens the configured backend.
fn open_persistence(args: &Args) -> Result<Persistence, Box<dyn std::error::Error>> {
    if let Some(url) = &args.mysql_url {
        info!("Using MySQL/MariaDB database");
        return Ok(Persistence::new_with_mysql(url)?);
    }
    if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        return Ok(Persistence::new_with_file(db_path)?);
    }
    info!("Using in-memory database");
    Ok(Persistence::new_in_memory()?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing fleetrent server");

    let mut persistence: Persistence = open_persistence(&args)?;
    let purged: usize = persistence.delete_expired_sessions()?;
    if purged > 0 {
        info!(purged, "Removed expired sessions");
    }

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        session_ttl: Duration::days(args.session_ttl_days),
    };

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests;
