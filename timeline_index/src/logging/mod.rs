//! Global logging module for the timeline index
//!
//! Events carry a stable [`Code`] plus key/value context. When a
//! [`LoggingService`] has been installed with [`init_global_logging`] (or
//! [`init_global_logging_with_service`]) events are routed through it;
//! otherwise they go straight to the `log` facade under the
//! `timeline_index` target, so hosts that already run `env_logger` or a
//! similar backend see them without any extra setup.

pub mod codes;
pub mod events;
pub mod macros;
pub mod service;

use std::sync::{Arc, OnceLock};

// Re-export main types
pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{FacadeLogger, Logger, LoggingService, MemoryLogger, LOG_TARGET};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging from environment preferences
pub fn init_global_logging() -> Result<(), String> {
    let service = Arc::new(LoggingService::with_config());

    GLOBAL_LOGGER
        .set(service.clone())
        .map_err(|_| "Global logger already initialized")?;

    service.log_event(LogEvent::info(
        codes::system::LOGGING_INITIALIZED,
        "Global logging system initialized",
    ));

    Ok(())
}

/// Initialize with custom service (primarily for testing)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())
}

/// Check if global logging is initialized
pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

/// Safe access to global logger
pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

// ============================================================================
// EMISSION
// ============================================================================

/// Check whether an event at `level` would be recorded anywhere
pub fn enabled(level: LogLevel) -> bool {
    match try_get_global_logger() {
        Some(service) => service.should_log(level),
        None => {
            let level: log::Level = level.into();
            log::log_enabled!(target: LOG_TARGET, level)
        }
    }
}

/// Route an event to the global service, or to the `log` facade
pub fn emit(event: LogEvent) {
    match try_get_global_logger() {
        Some(service) => service.log_event(event),
        None => FacadeLogger.log(&event),
    }
}

/// Build and emit an event with display-formatted context values
pub fn emit_with_context(level: LogLevel, code: Code, message: &str, context: Vec<(&str, String)>) {
    let mut event = LogEvent::new(level, code, message);
    for (key, value) in context {
        event = event.with_context(key, &value);
    }
    emit(event);
}

/// Shared in-memory capture for tests that inspect emitted events
///
/// The global service can only be installed once per process, so every
/// test that needs captured events goes through this one logger and
/// filters by context values it alone produces.
#[cfg(test)]
pub(crate) fn test_memory_logger() -> Arc<MemoryLogger> {
    static MEMORY: OnceLock<Arc<MemoryLogger>> = OnceLock::new();

    MEMORY
        .get_or_init(|| {
            let memory = Arc::new(MemoryLogger::new());
            let service = LoggingService::new(memory.clone(), LogLevel::Debug);
            init_global_logging_with_service(Arc::new(service))
                .expect("no other test installs a global logger");
            memory
        })
        .clone()
}
