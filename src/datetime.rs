//! Date/time utilities for Filebin.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Format a `DateTime<Utc>` in the specified timezone.
///
/// # Arguments
///
/// * `dt` - DateTime in UTC
/// * `timezone` - Timezone name (e.g., "Asia/Baku", "UTC")
/// * `format` - Output format string (e.g., "%d.%m.%Y")
///
/// # Returns
///
/// Formatted datetime string. Unknown timezones fall back to UTC.
pub fn format_utc_datetime(dt: &DateTime<Utc>, timezone: &str, format: &str) -> String {
    let tz: Tz = match timezone.parse() {
        Ok(tz) => tz,
        Err(_) => return dt.format(format).to_string(),
    };
    dt.with_timezone(&tz).format(format).to_string()
}
