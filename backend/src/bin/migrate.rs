use anyhow::{Context, Result};
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use std::collections::HashSet;
use std::env;
use tracing::info;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let database_url = env::var("DATABASE_URL")
        .context("DATABASE_URL environment variable is required")?;

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    let command = env::args().nth(1).unwrap_or_else(|| "up".to_string());

    match command.as_str() {
        "up" => {
            info!("Running database migrations...");
            MIGRATOR.run(&pool).await.context("Failed to apply migrations")?;
            info!("Database migrations completed successfully");
        }
        "status" => {
            show_migration_status(&pool).await?;
        }
        _ => {
            eprintln!("Usage: migrate [up|status]");
            eprintln!("  up      - Apply all pending migrations (default)");
            eprintln!("  status  - Show applied and pending migrations");
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn show_migration_status(pool: &sqlx::PgPool) -> Result<()> {
    let table_exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM information_schema.tables WHERE table_name = '_sqlx_migrations')",
    )
    .fetch_one(pool)
    .await
    .context("Failed to inspect migration table")?;

    let applied: HashSet<i64> = if table_exists {
        sqlx::query_scalar("SELECT version FROM _sqlx_migrations WHERE success")
            .fetch_all(pool)
            .await
            .context("Failed to read applied migrations")?
            .into_iter()
            .collect()
    } else {
        HashSet::new()
    };

    println!("Migration status:");
    for migration in MIGRATOR.iter() {
        let state = if applied.contains(&migration.version) {
            "applied"
        } else {
            "pending"
        };
        println!("  {:>16}  {:<8} {}", migration.version, state, migration.description);
    }

    Ok(())
}
