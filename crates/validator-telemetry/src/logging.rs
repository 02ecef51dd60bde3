//! Logging macros shared by validator components.
//!
//! Every per-domain line carries the same `validator` and `domain` fields so
//! log pipelines can group a domain's history across cycles.

/// Log an event about one domain with the standard fields.
///
/// ```rust,ignore
/// log_domain_event!(warn, "mta-sts", "example.com", "Could not retrieve policy", error = %err);
/// ```
#[macro_export]
macro_rules! log_domain_event {
    ($level:ident, $validator:expr, $domain:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            validator = %$validator,
            domain = %$domain,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a validator-wide event (not tied to a single domain).
#[macro_export]
macro_rules! log_validator_event {
    ($level:ident, $validator:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            validator = %$validator,
            $($($field)*,)?
            $msg
        )
    };
}
