use std::env;

use chrono::Utc;
use hr_workflow::Engine;
use hr_workflow::api::{AppState, create_router};
use hr_workflow::config::ConfigLoader;
use hr_workflow::models::{ContactInfo, NewEmployee};
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_dir = env::var("HR_CONFIG_DIR").unwrap_or_else(|_| "./config".to_string());
    let config = ConfigLoader::load(&config_dir)?;
    tracing::info!(config_dir = %config_dir, "policy loaded");

    let engine = Engine::in_memory(&config);
    bootstrap_from_env(&engine)?;

    let bind_addr = env::var("HR_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(bind_addr = %bind_addr, "listening");

    axum::serve(listener, create_router(AppState::new(engine))).await?;
    Ok(())
}

/// Creates the first administrator when `HR_ADMIN_USERNAME` and
/// `HR_ADMIN_PASSWORD` are set.
fn bootstrap_from_env(engine: &Engine) -> anyhow::Result<()> {
    let (Ok(username), Ok(password)) = (env::var("HR_ADMIN_USERNAME"), env::var("HR_ADMIN_PASSWORD"))
    else {
        tracing::warn!("HR_ADMIN_USERNAME/HR_ADMIN_PASSWORD not set; no account can log in");
        return Ok(());
    };
    let department = env::var("HR_ADMIN_DEPARTMENT").unwrap_or_else(|_| "Administration".to_string());
    let email = env::var("HR_ADMIN_EMAIL").unwrap_or_else(|_| format!("{}@localhost", username));

    let fields = NewEmployee {
        first_name: "System".to_string(),
        last_name: "Administrator".to_string(),
        contact: ContactInfo {
            email,
            ..ContactInfo::default()
        },
        job_title: "Administrator".to_string(),
        hire_date: Utc::now().date_naive(),
        salary: Decimal::ZERO,
        tax_rate: None,
        annual_leave_balance: None,
        sick_leave_balance: None,
    };
    let created = engine.bootstrap_admin(&department, fields, &username, &password)?;
    tracing::info!(
        account_id = created.account.id,
        employee_id = created.employee.id,
        "administrator account ready"
    );
    Ok(())
}
