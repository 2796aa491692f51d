pub mod analyze;
pub mod compare;
pub mod config;
pub mod dashboard;
pub mod globe;
pub mod search;
pub mod vendors;

use std::future::Future;

use procura_core::config::{AppConfig, LoadOptions};
use procura_core::errors::ApplicationError;
use procura_feed::service::{GeographyMode, ProcurementService};
use serde::Serialize;

pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_RUNTIME: u8 = 3;
pub const EXIT_FEED: u8 = 4;
pub const EXIT_INPUT: u8 = 5;

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
    hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct CommandData<'a, T: Serialize> {
    command: &'a str,
    status: &'a str,
    data: &'a T,
}

impl CommandResult {
    pub fn success<T: Serialize>(command: &str, data: &T) -> Self {
        let payload = CommandData { command, status: "ok", data };
        match serde_json::to_string(&payload) {
            Ok(output) => Self { exit_code: 0, output },
            Err(error) => Self::failure(
                command,
                "serialization",
                format!("failed to serialize output: {error}"),
                EXIT_RUNTIME,
            ),
        }
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
            hint: None,
            correlation_id: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn from_application_error(command: &str, error: ApplicationError) -> Self {
        let (error_class, exit_code) = match &error {
            ApplicationError::Configuration(_) => ("config_validation", EXIT_CONFIG),
            ApplicationError::Integration(_) => ("runtime_init", EXIT_RUNTIME),
            ApplicationError::Feed(_) | ApplicationError::Domain(_) => ("feed", EXIT_FEED),
            ApplicationError::Compare(_) => ("invalid_input", EXIT_INPUT),
        };
        let message = error.to_string();
        let interface = error.into_interface(format!("{command}-{}", std::process::id()));
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message,
            hint: Some(interface.user_message().to_string()),
            correlation_id: Some(interface.correlation_id().to_string()),
        };
        Self { exit_code, output: serialize_payload(payload) }
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

pub(crate) fn load_config(command: &str, options: &LoadOptions) -> Result<AppConfig, CommandResult> {
    AppConfig::load(options.clone()).map_err(|error| {
        CommandResult::failure(
            command,
            "config_validation",
            format!("configuration issue: {error}"),
            EXIT_CONFIG,
        )
    })
}

/// Loads config, builds the service on a current-thread runtime and serializes
/// whatever `operation` returns.
pub(crate) fn with_service<T, F, Fut>(
    command: &str,
    options: &LoadOptions,
    mode: GeographyMode,
    operation: F,
) -> CommandResult
where
    T: Serialize,
    F: FnOnce(ProcurementService) -> Fut,
    Fut: Future<Output = Result<T, ApplicationError>>,
{
    let config = match load_config(command, options) {
        Ok(config) => config,
        Err(result) => return result,
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                command,
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                EXIT_RUNTIME,
            );
        }
    };

    let result = runtime.block_on(async {
        let service = ProcurementService::from_config(&config, mode).await?;
        operation(service).await
    });

    match result {
        Ok(data) => CommandResult::success(command, &data),
        Err(error) => CommandResult::from_application_error(command, error),
    }
}
