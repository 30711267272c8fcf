//! Code-tagged logging macros
//!
//! Context values accept any `Display` type. Formatting only happens when
//! the level is enabled, so calls on hot tree paths cost a level check.

/// Log an event at an explicit level
#[macro_export]
macro_rules! log_event {
    ($level:expr, $code:expr, $message:expr) => {
        if $crate::logging::enabled($level) {
            $crate::logging::emit_with_context($level, $code, $message, vec![])
        }
    };

    ($level:expr, $code:expr, $message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        if $crate::logging::enabled($level) {
            let context: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            $crate::logging::emit_with_context($level, $code, $message, context)
        }
    };
}

/// Log error with Code type
#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr $(, $key:expr => $value:expr)*) => {
        $crate::log_event!($crate::logging::LogLevel::Error, $code, $message $(, $key => $value)*)
    };
}

/// Log warning with Code type
#[macro_export]
macro_rules! log_warning {
    ($code:expr, $message:expr $(, $key:expr => $value:expr)*) => {
        $crate::log_event!($crate::logging::LogLevel::Warning, $code, $message $(, $key => $value)*)
    };
}

/// Log informational message with Code type
#[macro_export]
macro_rules! log_info {
    ($code:expr, $message:expr $(, $key:expr => $value:expr)*) => {
        $crate::log_event!($crate::logging::LogLevel::Info, $code, $message $(, $key => $value)*)
    };
}

/// Log debug message with Code type
#[macro_export]
macro_rules! log_debug {
    ($code:expr, $message:expr $(, $key:expr => $value:expr)*) => {
        $crate::log_event!($crate::logging::LogLevel::Debug, $code, $message $(, $key => $value)*)
    };
}
