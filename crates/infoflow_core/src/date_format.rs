use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};

/// Shown in place of a publication date that cannot be parsed.
pub const DATE_UNAVAILABLE: &str = "date unavailable";

const DISPLAY_FORMAT: &str = "%d/%m/%Y, %H:%M";

const NAIVE_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Renders backend timestamps as `dd/mm/yyyy, HH:MM` in a fixed offset.
///
/// Timestamps without an offset are read as UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateFormatter {
    offset: FixedOffset,
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }
}

impl DateFormatter {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// `None` when the offset is out of chrono's range (a day or more).
    pub fn with_offset_minutes(minutes: i32) -> Option<Self> {
        let seconds = minutes.checked_mul(60)?;
        FixedOffset::east_opt(seconds).map(Self::new)
    }

    /// Never fails: unparsable input yields [`DATE_UNAVAILABLE`].
    pub fn format(&self, raw: &str) -> String {
        match self.parse(raw) {
            Some(moment) => moment.format(DISPLAY_FORMAT).to_string(),
            None => DATE_UNAVAILABLE.to_string(),
        }
    }

    pub fn parse(&self, raw: &str) -> Option<DateTime<FixedOffset>> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let parsed = DateTime::parse_from_rfc3339(raw)
            .or_else(|_| DateTime::parse_from_rfc2822(raw))
            .ok()
            .or_else(|| {
                parse_naive(raw).map(|naive| Utc.from_utc_datetime(&naive).fixed_offset())
            })?;
        Some(parsed.with_timezone(&self.offset))
    }
}

fn parse_naive(raw: &str) -> Option<NaiveDateTime> {
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_rfc3339_in_utc_by_default() {
        let formatter = DateFormatter::default();
        assert_eq!(formatter.format("2025-09-01T10:30:00Z"), "01/09/2025, 10:30");
    }

    #[test]
    fn applies_display_offset() {
        let formatter = DateFormatter::with_offset_minutes(-180).unwrap();
        assert_eq!(formatter.format("2025-09-01T10:30:00Z"), "01/09/2025, 07:30");
        assert_eq!(formatter.format("2025-09-01T01:15:00Z"), "31/08/2025, 22:15");
    }

    #[test]
    fn accepts_other_common_shapes() {
        let formatter = DateFormatter::default();
        assert_eq!(formatter.format("2025-08-30T09:15:00.123"), "30/08/2025, 09:15");
        assert_eq!(formatter.format("2025-08-30 09:15:00"), "30/08/2025, 09:15");
        assert_eq!(formatter.format("2025-08-30"), "30/08/2025, 00:00");
        assert_eq!(
            formatter.format("Sat, 30 Aug 2025 09:15:00 +0000"),
            "30/08/2025, 09:15"
        );
        assert_eq!(
            formatter.format("2025-08-30T09:15:00+02:00"),
            "30/08/2025, 07:15"
        );
    }

    #[test]
    fn garbage_yields_fallback() {
        let formatter = DateFormatter::default();
        for raw in [
            "",
            "   ",
            "yesterday",
            "2025-13-45T99:99:99Z",
            "\u{0}\u{ffff}",
            "99999999999999999999",
        ] {
            assert_eq!(formatter.format(raw), DATE_UNAVAILABLE, "input {raw:?}");
        }
    }

    #[test]
    fn out_of_range_offset_is_rejected() {
        assert!(DateFormatter::with_offset_minutes(24 * 60).is_none());
        assert!(DateFormatter::with_offset_minutes(i32::MAX).is_none());
        assert!(DateFormatter::with_offset_minutes(330).is_some());
    }
}
