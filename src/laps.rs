//! Lap table rows derived from a session's lap history.

/// One displayed lap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LapRow {
    /// 1-based lap number; the first lap of the session is lap 1.
    pub number: usize,
    pub interval_ms: u64,
    pub fastest: bool,
    pub slowest: bool,
}

/// Return the (fastest, slowest) duration among completed laps, if any.
pub fn extremes(completed: &[u64]) -> Option<(u64, u64)> {
    let min = completed.iter().copied().min()?;
    let max = completed.iter().copied().max()?;
    Some((min, max))
}

/// Build table rows, most recent first.
///
/// `laps` is the session's history with the lap in progress at index 0;
/// `running_elapsed` is added to that head so it updates live. Only
/// completed laps are compared for fastest and slowest.
pub fn lap_rows(laps: &[u64], running_elapsed: u64) -> Vec<LapRow> {
    let bounds = laps.get(1..).and_then(extremes);
    let count = laps.len();

    laps.iter()
        .enumerate()
        .map(|(idx, &lap)| {
            if idx == 0 {
                return LapRow {
                    number: count,
                    interval_ms: lap + running_elapsed,
                    fastest: false,
                    slowest: false,
                };
            }
            let (fastest, slowest) = match bounds {
                Some((min, max)) => (lap == min, lap == max),
                None => (false, false),
            };
            LapRow {
                number: count - idx,
                interval_ms: lap,
                fastest,
                slowest,
            }
        })
        .collect()
}
