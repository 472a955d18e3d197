use btc_staking_db_migration::Migrator;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use sea_orm_migration::cli;
use serde::Deserialize;

#[derive(Deserialize)]
struct MigrationConfig {
    database_url: String,
}

#[tokio::main]
async fn main() {
    // DATABASE_URL from the environment wins over App.toml
    if std::env::var("DATABASE_URL").is_err() {
        let config: MigrationConfig = Figment::new()
            .merge(Toml::file("App.toml"))
            .merge(Env::prefixed("STAKING_"))
            .extract()
            .expect("database_url missing from App.toml");
        std::env::set_var("DATABASE_URL", config.database_url);
    }
    cli::run_cli(Migrator).await;
}
