use std::env;
use std::sync::OnceLock;

static BBPE_TRACE_MERGES: OnceLock<bool> = OnceLock::new();

fn parse_bool(value: &str) -> bool {
    let normalized = value.trim().to_ascii_lowercase();
    matches!(normalized.as_str(), "1" | "true" | "yes" | "on")
}

/// Whether every committed merge should also be emitted as a `tracing` event.
pub(crate) fn trace_merges_enabled() -> bool {
    *BBPE_TRACE_MERGES.get_or_init(|| match env::var("BBPE_TRACE_MERGES") {
        Ok(value) if !value.trim().is_empty() => parse_bool(&value),
        _ => false,
    })
}
