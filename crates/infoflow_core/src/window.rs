use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Recency filter applied to a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeWindow {
    #[default]
    LastWeek,
    Last4Weeks,
    Last3Months,
    LastYear,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown time window code {0:?}")]
pub struct UnknownTimeWindow(pub String);

impl TimeWindow {
    /// Every window, in the order a picker shows them.
    pub const ALL: [TimeWindow; 4] = [
        TimeWindow::LastWeek,
        TimeWindow::Last4Weeks,
        TimeWindow::Last3Months,
        TimeWindow::LastYear,
    ];

    /// Code sent to the backend as `janela_tempo`.
    pub fn code(self) -> &'static str {
        match self {
            TimeWindow::LastWeek => "dias",
            TimeWindow::Last4Weeks => "semanas",
            TimeWindow::Last3Months => "meses",
            TimeWindow::LastYear => "anos",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeWindow::LastWeek => "Last 7 days",
            TimeWindow::Last4Weeks => "Last 4 weeks",
            TimeWindow::Last3Months => "Last 3 months",
            TimeWindow::LastYear => "Last year",
        }
    }

    /// How far back the backend looks for this window.
    pub fn lookback_days(self) -> u32 {
        match self {
            TimeWindow::LastWeek => 7,
            TimeWindow::Last4Weeks => 28,
            TimeWindow::Last3Months => 90,
            TimeWindow::LastYear => 365,
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|window| window.code().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeWindow {
    type Err = UnknownTimeWindow;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| UnknownTimeWindow(s.to_string()))
    }
}
