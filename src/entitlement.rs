//! Premium entitlement derived from the stored plan and expiry.

use time::{
    format_description::well_known::{Iso8601, Rfc3339},
    OffsetDateTime,
};
use tracing::warn;

use crate::auth::repo_types::Plan;

pub fn is_premium_active(plan: Plan, plan_expiry: Option<&str>) -> bool {
    is_premium_active_at(plan, plan_expiry, OffsetDateTime::now_utc())
}

/// `None` expiry on a premium plan means indefinite. An expiry equal to `now`
/// has lapsed. An unparsable expiry denies premium and is logged, never
/// returned as an error.
pub fn is_premium_active_at(plan: Plan, plan_expiry: Option<&str>, now: OffsetDateTime) -> bool {
    if plan != Plan::Premium {
        return false;
    }
    let Some(raw) = plan_expiry else {
        return true;
    };
    match parse_instant(raw) {
        Some(expiry) => expiry > now,
        None => {
            warn!(plan_expiry = %raw, "unparsable plan expiry; treating premium as inactive");
            false
        }
    }
}

/// Accepts RFC 3339 and the general ISO 8601 date-time grammar; both need an offset.
pub(crate) fn parse_instant(raw: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(raw, &Rfc3339)
        .or_else(|_| OffsetDateTime::parse(raw, &Iso8601::DEFAULT))
        .ok()
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;
    use time::macros::datetime;

    /// Collects formatted log output in memory.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    const NOW: OffsetDateTime = datetime!(2025-06-01 12:00:00 UTC);

    #[test]
    fn premium_without_expiry_is_indefinite() {
        assert!(is_premium_active(Plan::Premium, None));
    }

    #[test]
    fn free_plan_is_never_premium() {
        assert!(!is_premium_active(Plan::Free, None));
        assert!(!is_premium_active(Plan::Free, Some("2999-01-01T00:00:00Z")));
    }

    #[test]
    fn past_expiry_is_inactive() {
        assert!(!is_premium_active(Plan::Premium, Some("2000-01-01T00:00:00Z")));
    }

    #[test]
    fn unparsable_expiry_is_inactive() {
        assert!(!is_premium_active(Plan::Premium, Some("not-a-date")));
        assert!(!is_premium_active(Plan::Premium, Some("")));
    }

    #[test]
    fn unparsable_expiry_logs_a_warning() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            assert!(!is_premium_active(Plan::Premium, Some("2999-01-01")));
        });

        let text = logs.text();
        assert!(text.contains("WARN"), "{text}");
        assert!(text.contains("unparsable plan expiry"), "{text}");
        assert!(text.contains("2999-01-01"), "{text}");
    }

    #[test]
    fn well_formed_expiry_logs_nothing() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            assert!(is_premium_active(Plan::Premium, Some("2999-01-01T00:00:00Z")));
        });
        assert!(logs.text().is_empty());
    }

    #[test]
    fn instants_need_time_and_offset() {
        assert!(parse_instant("2999-01-01T00:00:00Z").is_some());
        assert!(parse_instant("2999-01-01T02:00:00+02:00").is_some());
        assert!(parse_instant("2999-01-01").is_none());
        assert!(parse_instant("2999-01-01T00:00:00").is_none());
    }

    #[test]
    fn boundary_is_exclusive() {
        assert!(!is_premium_active_at(Plan::Premium, Some("2025-06-01T12:00:00Z"), NOW));
        assert!(is_premium_active_at(Plan::Premium, Some("2025-06-01T12:00:01Z"), NOW));
        assert!(!is_premium_active_at(Plan::Premium, Some("2025-06-01T11:59:59Z"), NOW));
    }

    #[test]
    fn offsets_and_fractional_seconds_are_honoured() {
        // 14:00+02:00 is exactly NOW
        assert!(!is_premium_active_at(Plan::Premium, Some("2025-06-01T14:00:00+02:00"), NOW));
        assert!(is_premium_active_at(Plan::Premium, Some("2025-06-01T12:00:00.001Z"), NOW));
    }
}
