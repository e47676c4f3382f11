use anyhow::Context;
use axum::{Json, Router, routing::get};
use storage::Database;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod collaborators;
mod config;
mod error;
mod features;
mod middleware;
mod state;
mod util;

use config::Config;
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::competitions::handlers::list_competitions,
        features::competitions::handlers::get_competition,
        features::competitions::handlers::get_standings,
        features::competitions::handlers::create_competition,
        features::competitions::handlers::update_competition,
        features::competitions::handlers::delete_competition,
        features::competitions::handlers::join_competition,
        features::competitions::handlers::invite_to_competition,
        features::invitations::handlers::list_invitations,
        features::invitations::handlers::respond_to_invitation,
        features::sync::handlers::sync_metrics,
        features::leave::handlers::leave_competition,
        features::profiles::handlers::get_profile,
        features::profiles::handlers::update_goals,
    ),
    components(
        schemas(
            storage::dto::competition::CreateCompetitionRequest,
            storage::dto::competition::UpdateCompetitionRequest,
            storage::dto::competition::CompetitionResponse,
            storage::dto::invitation::InviteRequest,
            storage::dto::invitation::RespondToInvitationRequest,
            storage::dto::invitation::InvitationResponse,
            storage::dto::leave::LeaveCompetitionRequest,
            storage::dto::leave::LeaveCompetitionResponse,
            storage::dto::profile::UpdateGoalsRequest,
            storage::dto::profile::ProfileResponse,
            storage::dto::standings::StandingsEntry,
            storage::dto::sync::DaySample,
            storage::dto::sync::SyncRequest,
            storage::dto::sync::SyncResponse,
            storage::models::Competition,
            storage::models::CompetitionStatus,
            storage::models::CompetitionType,
            storage::models::ScoringType,
            storage::models::Participant,
            storage::models::LedgerEntry,
            storage::models::Invitation,
            storage::models::InvitationStatus,
            storage::models::Profile,
            storage::models::SubscriptionTier,
        )
    ),
    tags(
        (name = "competitions", description = "Competition lifecycle, membership and leaderboards"),
        (name = "invitations", description = "Competition invitations"),
        (name = "sync", description = "Health-provider metric syncs"),
        (name = "profiles", description = "User profiles and ring goals"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting RingRace API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let state = AppState::new(&config, db);

    let competitions = features::competitions::routes::routes(&state)
        .merge(features::sync::routes::routes(&state))
        .merge(features::leave::routes::routes(&state));

    let app = Router::new()
        .route("/health", get(health))
        .nest("/api/competitions", competitions)
        .nest("/api/invitations", features::invitations::routes::routes(&state))
        .nest("/api/profile", features::profiles::routes::routes(&state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .context("Failed to bind listener")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
