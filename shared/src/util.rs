//! Small shared helpers

use chrono::Utc;

/// Current wall-clock time as Unix millis
///
/// All timestamps cross module boundaries as `i64` Unix millis.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
