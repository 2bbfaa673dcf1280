//! Human-readable error descriptions and structured JSON error formatting.

use vend_core::error::{BuildError, VendError};

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingSink => {
                "What happened: No command store was provided to the dashboard.\nLikely causes: The outbox could not be opened or the sink was not wired into the builder.\nHow to fix: Check [store] in the config and pass a sink via with_sink(...).".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun. See etc/vend_config.toml for a sample."
            ),
        };
    }

    if let Some(ve) = err.downcast_ref::<VendError>() {
        return match ve {
            VendError::UnknownStrategy(id) => format!(
                "What happened: There is no strategy with id {id}.\nLikely causes: Typo in --id.\nHow to fix: Run `vend catalog` to list ids 1-11 (0 also selects the baseline)."
            ),
            VendError::InvalidInput(msg) => format!(
                "What happened: Invalid input ({msg}).\nLikely causes: Negative, missing or non-numeric reading or parameter.\nHow to fix: Pass finite, non-negative values; medicine weight must be in (0, 10]."
            ),
            VendError::Config(msg) => format!(
                "What happened: Configuration could not be used ({msg}).\nLikely causes: Unreadable file, bad TOML, out-of-range values or a malformed telemetry CSV.\nHow to fix: Edit the config (see etc/vend_config.toml) and make sure replay CSVs have headers 'rpm,vibration'."
            ),
            VendError::Timeout => "What happened: Telemetry read timed out.\nLikely causes: The machine is not publishing or the timeout is too low.\nHow to fix: Check the machine's connection and consider raising telemetry.read_timeout_ms.".to_string(),
            VendError::Telemetry(msg) => format!(
                "What happened: No telemetry available ({msg}).\nLikely causes: Source stopped producing readings.\nHow to fix: Check telemetry.source and the replay CSV, or run `vend self-check`."
            ),
            VendError::Delivery(msg) => format!(
                "What happened: Command could not be delivered ({msg}).\nLikely causes: Store unreachable or outbox not writable.\nHow to fix: Check [store] settings and file permissions."
            ),
        };
    }

    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("open outbox") {
        return format!(
            "What happened: Failed to open the command outbox.\nLikely causes: Missing directory permissions or an invalid path.\nHow to fix: Fix store.outbox in the config. Original: {msg}"
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes; 2 is reserved for usage errors reported by clap.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    match err.downcast_ref::<VendError>() {
        Some(VendError::UnknownStrategy(_)) => 3,
        Some(VendError::InvalidInput(_)) => 4,
        Some(VendError::Config(_)) => 5,
        Some(_) => 1,
        None if matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::InvalidConfig(_))
        ) =>
        {
            5
        }
        None => 1,
    }
}

pub fn reason_name(err: &eyre::Report) -> &'static str {
    if let Some(ve) = err.downcast_ref::<VendError>() {
        return match ve {
            VendError::UnknownStrategy(_) => "UnknownStrategy",
            VendError::InvalidInput(_) => "InvalidInput",
            VendError::Telemetry(_) => "Telemetry",
            VendError::Timeout => "Timeout",
            VendError::Delivery(_) => "Delivery",
            VendError::Config(_) => "Config",
        };
    }
    if err.downcast_ref::<BuildError>().is_some() {
        return "Build";
    }
    "Error"
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({
        "reason": reason_name(err),
        "exit_code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}
