use dotenvy::dotenv;
use pos_staff::{
    config::{self, database},
    core::{
        EmployeeStore,
        report::{format_currency, summarize},
    },
    errors::Result,
    storage::SqliteStorage,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the application configuration
    let app_config = config::load_app_configuration()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    // 4. Connect and make sure the key-value table exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db).await?;

    // 5. Open the store and seed accounts on first run
    let mut store = EmployeeStore::open(SqliteStorage::new(db), app_config.storage).await?;
    store
        .seed_if_empty(&app_config.seed_employees)
        .await
        .inspect_err(|e| error!("Failed to seed employees: {}", e))?;

    // 6. Log where things stand
    let active = store.employees().iter().filter(|e| e.is_active).count();
    info!(
        "{} employees ({} active), {} logged in",
        store.employees().len(),
        active,
        store
            .current_employee()
            .map_or("nobody", |e| e.username.as_str())
    );

    let report = store.performance_report(None, None);
    for row in &report {
        info!(
            "{:<24} {:>4} receipts  {:>12}  avg {:>10}",
            row.employee_name,
            row.receipt_count,
            format_currency(row.total_sales),
            format_currency(row.average_receipt)
        );
    }
    let summary = summarize(&report);
    info!(
        "All staff: {} receipts, {} total",
        summary.receipt_count,
        format_currency(summary.total_sales)
    );

    Ok(())
}
