pub mod advise;
pub mod config;
pub mod doctor;
pub mod feedback;
pub mod migrate;
pub mod progress;
pub mod stress;
pub mod users;
pub mod womens;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use wellora_core::config::{AppConfig, LoadOptions};
use wellora_core::errors::{ApplicationError, DomainError};
use wellora_core::{AdviceSources, UserAccount};
use wellora_db::{connect_with_settings, migrations, AdviceService, AdviceStores, DbPool};

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data: None,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn success_with_data(
        command: &str,
        message: impl Into<String>,
        data: &impl Serialize,
    ) -> Self {
        let data = match serde_json::to_value(data) {
            Ok(data) => data,
            Err(error) => {
                return Self::failure(command, "serialization", error.to_string(), 1);
            }
        };
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data: Some(data),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn from_application_error(command: &str, error: ApplicationError) -> Self {
        match error {
            ApplicationError::Domain(DomainError::Catalog(error)) => {
                Self::failure(command, "catalog_load", error.to_string(), 6)
            }
            ApplicationError::Domain(error) => {
                Self::failure(command, "invalid_input", error.to_string(), 8)
            }
            ApplicationError::Persistence(message) | ApplicationError::Integration(message) => {
                Self::failure(command, "history_unavailable", message, 7)
            }
            ApplicationError::Configuration(message) => {
                Self::failure(command, "config_validation", message, 2)
            }
        }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

pub(crate) fn load_config(command: &str) -> Result<AppConfig, CommandResult> {
    AppConfig::load(LoadOptions::default()).map_err(|error| {
        CommandResult::failure(command, "config_validation", format!("configuration issue: {error}"), 2)
    })
}

/// A current-thread runtime and a pool with every migration applied.
pub(crate) fn open_migrated_pool(
    command: &str,
    config: &AppConfig,
) -> Result<(tokio::runtime::Runtime, DbPool), CommandResult> {
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().map_err(
        |error| {
            CommandResult::failure(
                command,
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            )
        },
    )?;

    let pool = runtime.block_on(async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| CommandResult::failure(command, "db_connectivity", error.to_string(), 4))?;
        migrations::run_pending(&pool)
            .await
            .map_err(|error| CommandResult::failure(command, "migration", error.to_string(), 5))?;
        Ok::<DbPool, CommandResult>(pool)
    })?;

    Ok((runtime, pool))
}

/// Everything a data command needs: a runtime, a migrated pool and the
/// advice service over the configured sources.
pub struct CommandContext {
    command: &'static str,
    pub runtime: tokio::runtime::Runtime,
    pub pool: DbPool,
    pub service: AdviceService,
}

impl CommandContext {
    pub fn open(command: &'static str) -> Result<Self, CommandResult> {
        let config = load_config(command)?;
        let sources = AdviceSources::load(&config.catalog)
            .map_err(|error| CommandResult::failure(command, "catalog_load", error.to_string(), 6))?;
        let (runtime, pool) = open_migrated_pool(command, &config)?;

        let service = AdviceService::new(Arc::new(sources), AdviceStores::sql(&pool));
        Ok(Self { command, runtime, pool, service })
    }

    /// Opens the context and resolves `handle` as a username or user id.
    /// Unknown and blank handles are invalid input.
    pub fn open_for_user(
        command: &'static str,
        handle: &str,
    ) -> Result<(Self, UserAccount), CommandResult> {
        let context = Self::open(command)?;
        match context.runtime.block_on(context.service.resolve_user(handle)) {
            Ok(account) => Ok((context, account)),
            Err(error) => {
                let result = CommandResult::from_application_error(context.command, error);
                context.close();
                Err(result)
            }
        }
    }

    pub fn close(self) {
        self.runtime.block_on(self.pool.close());
    }
}
