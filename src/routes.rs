// routes.rs - router assembly
//
// /                                      service description
// /health                                database liveness
// /gram-panchayat/send-otp, verify-otp   public login
// /gram-panchayat/user/*                 any logged-in user
// /gram-panchayat/user/admin/*           Admin role only

use axum::{
    http::{HeaderName, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::handlers::{admin, protected, public};
use crate::middleware::{jwt_auth_middleware, require_admin};
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/", get(root))
        .route("/health", get(public::health))
        .nest("/gram-panchayat", gram_panchayat_routes(state.clone()))
        .layer(CatchPanicLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn gram_panchayat_routes(state: AppState) -> Router<AppState> {
    let user = user_routes()
        .nest("/admin", admin_routes())
        .route_layer(from_fn_with_state(state, jwt_auth_middleware));

    Router::new()
        .route("/send-otp", post(public::send_otp))
        .route("/verify-otp", post(public::verify_otp))
        .nest("/user", user)
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/info", get(protected::info))
        .route("/logout", post(protected::logout))
        .route("/death/register", post(protected::register))
        .route("/death/new", get(protected::list_new))
        .route("/death/processing", get(protected::list_processing))
        .route("/death/completed", get(protected::list_completed))
        .route("/task/:id/start-processing", put(protected::start_processing))
        .route("/task/:id/completed", put(protected::complete))
}

fn admin_routes() -> Router<AppState> {
    use admin::{catalogue, dashboard, geo, records};

    Router::new()
        .route("/info", get(catalogue::info))
        // Roles and task types
        .route("/role", get(catalogue::list_roles).post(catalogue::create_role))
        .route("/bulk-role", post(catalogue::create_roles))
        .route("/tasks", get(catalogue::list_task_types).post(catalogue::create_task_type))
        // Geography
        .route(
            "/block",
            get(geo::list_blocks).post(geo::create_block).put(geo::rename_block),
        )
        .route("/block/:id", delete(geo::archive_block))
        .route("/tehsils", get(geo::list_tehsils))
        .route("/all-tehsil", get(geo::list_all_tehsils))
        .route("/tehsil", post(geo::create_tehsil))
        .route("/edit-tehsil", put(geo::rename_tehsil))
        .route("/tehsil/:id", delete(geo::archive_tehsil))
        .route(
            "/gram-panchayat-information",
            get(geo::list_gram_panchayats).post(geo::create_gram_panchayat),
        )
        .route("/edit-gram-panchayat", put(geo::edit_gram_panchayat))
        .route("/gram-panchayat/:id", delete(geo::archive_gram_panchayat))
        .route(
            "/gaon",
            get(geo::list_gaons).post(geo::create_gaon).put(geo::rename_gaon),
        )
        .route("/gaon/:id", delete(geo::archive_gaon))
        // Dashboards
        .route("/total-deaths", get(dashboard::total_deaths))
        .route("/graph", get(dashboard::graph))
        .route("/overview", get(dashboard::overview))
        .route("/district-post", get(dashboard::district_posts))
        // Records and reviews
        .route("/deaths", get(records::list_deaths))
        .route("/deaths/:id", delete(records::archive_death))
        .route(
            "/death-review",
            get(records::list_reviews).put(records::submit_review),
        )
        .route_layer(from_fn(require_admin))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            HeaderName::from_static("token"),
        ]);

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}

async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Gram Panchayat API",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "health": "/health (public)",
                "login": "/gram-panchayat/send-otp, /gram-panchayat/verify-otp (public)",
                "user": "/gram-panchayat/user/* (token required)",
                "admin": "/gram-panchayat/user/admin/* (Admin role)",
            }
        }
    }))
}
