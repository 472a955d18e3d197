mod config;
mod cors;
mod dto;
mod routes;

use btc_staking_store::{StakeQueryService, StakeStore};
use config::StakeApiConfig;
use dto::ErrorResponse;
use rocket::{serde::json::Json, Build, Config, Request, Rocket};
use tracing::info;
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

#[macro_use]
extern crate rocket;

#[get("/")]
async fn health_ping() -> &'static str {
    ""
}

#[catch(404)]
async fn not_found(req: &Request<'_>) -> Json<ErrorResponse> {
    Json(ErrorResponse::new(format!("Couldn't find '{}'", req.uri())))
}

#[catch(500)]
async fn internal_error() -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Whoops! Looks like we messed up."))
}

fn build(config: &StakeApiConfig, query_service: StakeQueryService) -> Rocket<Build> {
    rocket::build()
        .register("/", catchers![internal_error, not_found])
        .manage(query_service)
        .attach(cors::OriginHeader::new(&config.cors_allowed_domains))
        .attach(routes::mount())
        .mount("/", routes![health_ping])
}

#[launch]
async fn rocket() -> _ {
    let config = Config::figment()
        .extract::<StakeApiConfig>()
        .expect("Invalid web api config");
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", &config.rust_log);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                format!("btc_staking_web_api={}", &config.web_api_log)
                    .parse()
                    .expect("Error parsing directive"),
            ),
        )
        .with_span_events(FmtSpan::FULL)
        .init();

    let store = StakeStore::connect(&config.store)
        .await
        .expect("Could not connect to stake database");
    info!("Connected to stake database");

    build(&config, StakeQueryService::new(store))
}
