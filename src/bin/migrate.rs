use anyhow::{anyhow, Result};
use kst_bot_core::config::Config;
use kst_bot_core::database::connection::DatabaseManager;
use kst_bot_core::utils::logging::{log_database_error, log_system_event};
use std::env;
use std::io;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging for the migration tool
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kst_bot_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("migrate");

    match command {
        "migrate" | "up" => run_migrations().await,
        "check" => check_database().await,
        "seed" => seed_lunch(args.get(2).map(|s| s.as_str())).await,
        "reset" => reset_database().await,
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {command}");
            print_help();
            std::process::exit(1);
        }
    }
}

async fn run_migrations() -> Result<()> {
    println!("🔧 KST Assistant Bot - Database Migration Tool");
    println!("================================================");

    // Load environment configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    println!("📊 Database URL: {}", mask_url(&config.database_url));

    // Ensure data directory exists for SQLite
    ensure_parent_dir(&config.database_url)?;

    println!("🚀 Applying database schema...");

    let db_manager = DatabaseManager::new(&config.database_url)
        .await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))?;

    match db_manager.run_migrations().await {
        Ok(_) => {
            log_system_event("schema applied", None);
            println!("✅ Schema applied successfully!");
        }
        Err(e) => {
            log_database_error("migrate", "all", &e.to_string(), None);
            eprintln!("❌ Migration failed: {e}");
            std::process::exit(1);
        }
    }

    // Startup seeding mirrors what a host process would do
    if let Some(group) = &config.lunch_seed_group {
        if db_manager.seed_demo_lunch(group).await? {
            println!("🍽️  Seeded demo lunch schedule for group {group}");
        }
    }

    println!("\n🎯 Your KST assistant bot database is ready!");

    Ok(())
}

async fn check_database() -> Result<()> {
    println!("🔍 Checking database connection and schema...");

    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    println!("📊 Database URL: {}", mask_url(&config.database_url));

    let db_manager = DatabaseManager::new(&config.database_url)
        .await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))?;

    match check_tables(&db_manager).await {
        Ok(tables) => {
            println!("✅ Database connection successful!");
            println!("📋 Found tables:");
            for table in tables {
                println!("  • {table}");
            }
        }
        Err(e) => {
            println!("⚠️  Database check failed: {e}");
            println!("💡 Try running 'migrate up' to create the schema");
        }
    }

    Ok(())
}

async fn seed_lunch(group_arg: Option<&str>) -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let group = match group_arg {
        Some(g) => g.to_string(),
        None => config
            .lunch_seed_group
            .clone()
            .ok_or_else(|| anyhow!("Pass a group name or set LUNCH_SEED_GROUP"))?,
    };

    ensure_parent_dir(&config.database_url)?;
    let db_manager = DatabaseManager::new(&config.database_url).await?;
    db_manager.run_migrations().await?;

    if db_manager.seed_demo_lunch(&group).await? {
        println!("🍽️  Seeded demo lunch schedule for group {group}");
    } else {
        println!("ℹ️  Lunch schedule is not empty, nothing seeded");
    }

    Ok(())
}

async fn reset_database() -> Result<()> {
    println!("⚠️  WARNING: This will delete ALL data in the database!");
    println!("🤔 Are you sure you want to continue? (yes/no)");

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    if input.trim().to_lowercase() != "yes" {
        println!("❌ Reset cancelled.");
        return Ok(());
    }

    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    // For SQLite, we can just delete the file
    let db_path = config
        .database_url
        .strip_prefix("sqlite:")
        .unwrap_or(&config.database_url);
    if Path::new(db_path).exists() {
        std::fs::remove_file(db_path)?;
        println!("🗑️  Deleted database file: {db_path}");
    }

    // Run migrations to recreate the schema
    println!("🔄 Recreating database schema...");
    run_migrations().await?;

    println!("✅ Database reset completed!");

    Ok(())
}

async fn check_tables(db_manager: &DatabaseManager) -> Result<Vec<String>> {
    let tables = sqlx::query_scalar::<_, String>(
        "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
    )
    .fetch_all(&db_manager.pool)
    .await?;

    Ok(tables)
}

fn ensure_parent_dir(database_url: &str) -> Result<()> {
    let db_path = database_url.strip_prefix("sqlite:").unwrap_or(database_url);
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.exists() {
            println!("📁 Creating directory: {}", parent.display());
            std::fs::create_dir_all(parent)?;
        }
    }

    Ok(())
}

fn mask_url(url: &str) -> String {
    // Simple URL masking for security (don't show full paths in production)
    if url.starts_with("sqlite:") {
        let path = url.strip_prefix("sqlite:").unwrap_or(url);
        if let Some(filename) = Path::new(path).file_name() {
            format!("sqlite:.../{}", filename.to_string_lossy())
        } else {
            url.to_string()
        }
    } else {
        url.to_string()
    }
}

fn print_help() {
    println!("🏫 KST Assistant Bot - Database Migration Tool");
    println!();
    println!("USAGE:");
    println!("    migrate [COMMAND]");
    println!();
    println!("COMMANDS:");
    println!("    migrate, up    Apply the database schema (default)");
    println!("    check          Check database connection and schema");
    println!("    seed [GROUP]   Seed a demo lunch week when the table is empty");
    println!("    reset          Reset database - DESTRUCTIVE!");
    println!("    help           Show this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    DATABASE_URL      Database connection string (default: sqlite:./data/kst_bot.db)");
    println!("    LUNCH_SEED_GROUP  Group to seed a demo lunch week for (optional)");
    println!();
    println!("EXAMPLES:");
    println!("    migrate                    # Apply schema");
    println!("    migrate check              # Check database status");
    println!("    migrate seed СИП-113/25    # Seed a demo lunch week");
    println!("    migrate reset              # Reset database (careful!)");
    println!();
}
