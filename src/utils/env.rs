/// Get environment variable with PARAMGUARD_ prefix, falling back to unprefixed version
///
/// Checks `PARAMGUARD_{key}` first, then `{key}`.
///
/// # Examples
///
/// ```rust,ignore
/// // Checks PARAMGUARD_LOG_LEVEL first, then LOG_LEVEL
/// let level = get_env_with_prefix("LOG_LEVEL");
/// ```
pub fn get_env_with_prefix(key: &str) -> Option<String> {
    std::env::var(format!("PARAMGUARD_{}", key))
        .or_else(|_| std::env::var(key))
        .ok()
}

/// Parse a boolean flag the way operators usually write them.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
