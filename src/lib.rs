//! Stopwatch core: accumulated elapsed time and lap history.
//!
//! A [`Session`] is driven by five user actions (start, lap, stop, resume,
//! reset) and a periodic tick. It is generic over the tick handle `H` so the
//! browser build can store a `gloo_timers` interval while tests use a plain
//! value. The handle only exists while the session is running; leaving that
//! phase drops it, and dropping it cancels the tick.

use log::debug;
use std::fmt;

pub mod laps;

/// Coarse phase of a session, without the running payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Idle,
    Running,
    Paused,
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseKind::Idle => write!(f, "idle"),
            PhaseKind::Running => write!(f, "running"),
            PhaseKind::Paused => write!(f, "paused"),
        }
    }
}

/// Current phase. `ticker` keeps the periodic refresh alive while running.
#[derive(Debug)]
enum Phase<H> {
    Idle,
    Running {
        start_epoch: u64,
        now_epoch: u64,
        ticker: H,
    },
    Paused,
}

/// User or timer action applied to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    Lap,
    Stop,
    Resume,
    Reset,
    Tick,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Start => "start",
            Action::Lap => "lap",
            Action::Stop => "stop",
            Action::Resume => "resume",
            Action::Reset => "reset",
            Action::Tick => "tick",
        };
        write!(f, "{}", name)
    }
}

/// An action that is not valid in the session's current phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTransition {
    pub action: Action,
    pub phase: PhaseKind,
}

impl fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot {} while {}", self.action, self.phase)
    }
}

impl std::error::Error for InvalidTransition {}

/// One timing session between resets.
///
/// `laps` is most-recent-first: index 0 holds the already-accumulated part
/// of the lap in progress. It is empty exactly when the phase is `Idle`.
#[derive(Debug)]
pub struct Session<H> {
    phase: Phase<H>,
    laps: Vec<u64>,
}

impl<H> Default for Session<H> {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            laps: Vec::new(),
        }
    }
}

impl<H> Session<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(&self) -> PhaseKind {
        match self.phase {
            Phase::Idle => PhaseKind::Idle,
            Phase::Running { .. } => PhaseKind::Running,
            Phase::Paused => PhaseKind::Paused,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running { .. })
    }

    pub fn laps(&self) -> &[u64] {
        &self.laps
    }

    /// Timestamp at which the current running interval began.
    pub fn start_epoch(&self) -> Option<u64> {
        match self.phase {
            Phase::Running { start_epoch, .. } => Some(start_epoch),
            _ => None,
        }
    }

    /// Timestamp of the last tick.
    pub fn now_epoch(&self) -> Option<u64> {
        match self.phase {
            Phase::Running { now_epoch, .. } => Some(now_epoch),
            _ => None,
        }
    }

    /// Time elapsed in the current running interval as of the last tick.
    pub fn running_elapsed(&self) -> u64 {
        match self.phase {
            Phase::Running {
                start_epoch,
                now_epoch,
                ..
            } => now_epoch.saturating_sub(start_epoch),
            _ => 0,
        }
    }

    /// Total elapsed milliseconds to display.
    pub fn total_elapsed(&self) -> u64 {
        self.laps.iter().sum::<u64>() + self.running_elapsed()
    }

    /// Idle -> Running. `make_ticker` is only called when the start is accepted.
    pub fn start<F>(&mut self, now: u64, make_ticker: F) -> Result<(), InvalidTransition>
    where
        F: FnOnce() -> H,
    {
        if !matches!(self.phase, Phase::Idle) {
            return Err(self.reject(Action::Start));
        }
        self.laps = vec![0];
        self.phase = Phase::Running {
            start_epoch: now,
            now_epoch: now,
            ticker: make_ticker(),
        };
        debug!("stopwatch started at {}", now);
        Ok(())
    }

    /// Records a split: the lap in progress is closed and a new one begins at `now`.
    pub fn lap(&mut self, now: u64) -> Result<(), InvalidTransition> {
        let elapsed = self.elapsed_until(now).ok_or_else(|| self.reject(Action::Lap))?;
        self.fold_into_head(elapsed);
        self.laps.insert(0, 0);
        if let Phase::Running {
            start_epoch,
            now_epoch,
            ..
        } = &mut self.phase
        {
            *start_epoch = now;
            *now_epoch = now;
        }
        debug!("lap {} closed after {} ms", self.laps.len() - 1, self.laps[1]);
        Ok(())
    }

    /// Running -> Paused. Drops the ticker.
    pub fn stop(&mut self, now: u64) -> Result<(), InvalidTransition> {
        let elapsed = self.elapsed_until(now).ok_or_else(|| self.reject(Action::Stop))?;
        self.fold_into_head(elapsed);
        self.phase = Phase::Paused;
        debug!("stopwatch stopped at {} ms total", self.total_elapsed());
        Ok(())
    }

    /// Paused -> Running, continuing the lap in progress.
    pub fn resume<F>(&mut self, now: u64, make_ticker: F) -> Result<(), InvalidTransition>
    where
        F: FnOnce() -> H,
    {
        if !matches!(self.phase, Phase::Paused) {
            return Err(self.reject(Action::Resume));
        }
        self.phase = Phase::Running {
            start_epoch: now,
            now_epoch: now,
            ticker: make_ticker(),
        };
        debug!("stopwatch resumed at {}", now);
        Ok(())
    }

    /// Paused -> Idle. A reset while already idle does nothing.
    pub fn reset(&mut self) -> Result<(), InvalidTransition> {
        match self.phase {
            Phase::Idle => Ok(()),
            Phase::Paused => {
                self.laps.clear();
                self.phase = Phase::Idle;
                debug!("stopwatch reset");
                Ok(())
            }
            Phase::Running { .. } => Err(self.reject(Action::Reset)),
        }
    }

    /// Periodic refresh: moves `now_epoch` forward while running.
    pub fn tick(&mut self, now: u64) -> Result<(), InvalidTransition> {
        if let Phase::Running { now_epoch, .. } = &mut self.phase {
            *now_epoch = now;
            return Ok(());
        }
        Err(self.reject(Action::Tick))
    }

    /// Cancels the ticker without losing time already shown.
    ///
    /// A running session is paused at its last tick. Returns whether a ticker
    /// was dropped.
    pub fn teardown(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        let elapsed = self.running_elapsed();
        self.fold_into_head(elapsed);
        self.phase = Phase::Paused;
        debug!("stopwatch torn down");
        true
    }

    /// Elapsed time of the running interval up to `now`, never earlier than the
    /// last tick. `None` when not running.
    fn elapsed_until(&self, now: u64) -> Option<u64> {
        match self.phase {
            Phase::Running {
                start_epoch,
                now_epoch,
                ..
            } => Some(now.max(now_epoch).saturating_sub(start_epoch)),
            _ => None,
        }
    }

    fn fold_into_head(&mut self, elapsed: u64) {
        if let Some(head) = self.laps.first_mut() {
            *head += elapsed;
        }
    }

    fn reject(&self, action: Action) -> InvalidTransition {
        InvalidTransition {
            action,
            phase: self.kind(),
        }
    }
}

/// Current clock reading in milliseconds. Only differences are meaningful.
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> u64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now) as u64
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Formats milliseconds as `MM:SS,HH` (minutes wrap at one hour).
pub fn format_ms_to_minsecs(ms: u64) -> String {
    let minutes = (ms / 60_000) % 60;
    let seconds = (ms / 1_000) % 60;
    let hundredths = (ms % 1_000) / 10;
    format!("{:02}:{:02},{:02}", minutes, seconds, hundredths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Tick handle that counts how many instances are alive.
    struct FakeTicker(Rc<Cell<usize>>);

    impl FakeTicker {
        fn new(live: &Rc<Cell<usize>>) -> Self {
            live.set(live.get() + 1);
            FakeTicker(live.clone())
        }
    }

    impl Drop for FakeTicker {
        fn drop(&mut self) {
            self.0.set(self.0.get() - 1);
        }
    }

    fn session() -> (Session<FakeTicker>, Rc<Cell<usize>>) {
        (Session::new(), Rc::new(Cell::new(0)))
    }

    #[test]
    fn test_new_session_is_idle() {
        let s: Session<()> = Session::new();
        assert_eq!(s.kind(), PhaseKind::Idle);
        assert!(s.laps().is_empty());
        assert_eq!(s.start_epoch(), None);
        assert_eq!(s.now_epoch(), None);
        assert!(!s.is_running());
        assert_eq!(s.total_elapsed(), 0);
    }

    #[test]
    fn test_start_creates_head_lap_and_ticker() {
        let (mut s, live) = session();
        s.start(1_000, || FakeTicker::new(&live)).unwrap();
        assert_eq!(s.kind(), PhaseKind::Running);
        assert_eq!(s.laps(), &[0]);
        assert_eq!(s.start_epoch(), Some(1_000));
        assert_eq!(s.now_epoch(), Some(1_000));
        assert_eq!(live.get(), 1);
    }

    #[test]
    fn test_start_then_stop_without_elapsed_time_is_zero() {
        let (mut s, live) = session();
        s.start(500, || FakeTicker::new(&live)).unwrap();
        s.stop(500).unwrap();
        assert_eq!(s.total_elapsed(), 0);
        assert_eq!(s.kind(), PhaseKind::Paused);
    }

    #[test]
    fn test_tick_lap_stop_scenario() {
        let (mut s, live) = session();
        s.start(0, || FakeTicker::new(&live)).unwrap();
        s.tick(250).unwrap();
        assert_eq!(s.total_elapsed(), 250);
        assert_eq!(format_ms_to_minsecs(s.total_elapsed()), "00:00,25");

        s.lap(250).unwrap();
        assert_eq!(s.laps(), &[0, 250]);
        assert_eq!(s.start_epoch(), Some(250));

        s.stop(250).unwrap();
        assert_eq!(s.laps(), &[0, 250]);
        assert!(!s.is_running());
        assert_eq!(s.start_epoch(), None);
        assert_eq!(s.now_epoch(), None);
    }

    #[test]
    fn test_stop_counts_time_since_last_tick() {
        let (mut s, live) = session();
        s.start(0, || FakeTicker::new(&live)).unwrap();
        s.tick(100).unwrap();
        s.stop(140).unwrap();
        assert_eq!(s.laps(), &[140]);
    }

    #[test]
    fn test_lap_counts_time_since_last_tick() {
        let (mut s, live) = session();
        s.start(0, || FakeTicker::new(&live)).unwrap();
        s.tick(100).unwrap();
        s.lap(170).unwrap();
        assert_eq!(s.laps(), &[0, 170]);
        assert_eq!(s.start_epoch(), Some(170));
        assert_eq!(s.now_epoch(), Some(170));
    }

    #[test]
    fn test_stop_never_loses_displayed_time() {
        let (mut s, live) = session();
        s.start(0, || FakeTicker::new(&live)).unwrap();
        s.tick(300).unwrap();
        // Clock reading earlier than the last tick.
        s.stop(200).unwrap();
        assert_eq!(s.laps(), &[300]);
    }

    #[test]
    fn test_resume_continues_lap_in_progress() {
        let (mut s, live) = session();
        s.start(0, || FakeTicker::new(&live)).unwrap();
        s.stop(400).unwrap();
        s.resume(10_000, || FakeTicker::new(&live)).unwrap();
        assert_eq!(live.get(), 1);
        s.tick(10_100).unwrap();
        assert_eq!(s.total_elapsed(), 500);
        s.lap(10_100).unwrap();
        assert_eq!(s.laps(), &[0, 500]);
    }

    #[test]
    fn test_ticker_dropped_on_stop() {
        let (mut s, live) = session();
        s.start(0, || FakeTicker::new(&live)).unwrap();
        assert_eq!(live.get(), 1);
        s.stop(10).unwrap();
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn test_teardown_pauses_at_last_tick() {
        let (mut s, live) = session();
        s.start(0, || FakeTicker::new(&live)).unwrap();
        s.tick(100).unwrap();
        s.lap(100).unwrap();
        s.tick(180).unwrap();
        assert!(s.teardown());
        assert_eq!(s.kind(), PhaseKind::Paused);
        assert_eq!(s.laps(), &[80, 100]);
        assert_eq!(s.start_epoch(), None);
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn test_teardown_outside_running_changes_nothing() {
        let (mut s, live) = session();
        assert!(!s.teardown());
        assert_eq!(s.kind(), PhaseKind::Idle);
        assert!(s.laps().is_empty());

        s.start(0, || FakeTicker::new(&live)).unwrap();
        s.stop(300).unwrap();
        assert!(!s.teardown());
        assert_eq!(s.kind(), PhaseKind::Paused);
        assert_eq!(s.laps(), &[300]);
    }

    #[test]
    fn test_ticker_dropped_on_teardown_and_drop() {
        let (mut s, live) = session();
        s.start(0, || FakeTicker::new(&live)).unwrap();
        s.tick(120).unwrap();
        assert!(s.teardown());
        assert_eq!(live.get(), 0);
        assert_eq!(s.laps(), &[120]);
        assert!(!s.teardown());

        s.resume(500, || FakeTicker::new(&live)).unwrap();
        assert_eq!(live.get(), 1);
        drop(s);
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn test_rejected_start_does_not_build_ticker() {
        let (mut s, live) = session();
        s.start(0, || FakeTicker::new(&live)).unwrap();
        let err = s.start(50, || FakeTicker::new(&live)).unwrap_err();
        assert_eq!(
            err,
            InvalidTransition {
                action: Action::Start,
                phase: PhaseKind::Running
            }
        );
        assert_eq!(live.get(), 1);
        assert_eq!(s.start_epoch(), Some(0));
    }

    #[test]
    fn test_tick_outside_running_is_rejected() {
        let (mut s, live) = session();
        assert!(s.tick(10).is_err());
        s.start(0, || FakeTicker::new(&live)).unwrap();
        s.stop(80).unwrap();
        assert!(s.tick(5_000).is_err());
        assert_eq!(s.total_elapsed(), 80);
    }

    #[test]
    fn test_invalid_transitions_leave_state_untouched() {
        let (mut s, live) = session();
        assert!(s.lap(10).is_err());
        assert!(s.stop(10).is_err());
        assert!(s.resume(10, || FakeTicker::new(&live)).is_err());
        assert!(s.laps().is_empty());
        assert_eq!(live.get(), 0);

        s.start(0, || FakeTicker::new(&live)).unwrap();
        assert!(s.reset().is_err());
        assert!(s.resume(10, || FakeTicker::new(&live)).is_err());
        assert_eq!(s.kind(), PhaseKind::Running);
        assert_eq!(live.get(), 1);
    }

    #[test]
    fn test_reset_from_idle_is_noop() {
        let (mut s, _live) = session();
        s.reset().unwrap();
        assert_eq!(s.kind(), PhaseKind::Idle);
        assert!(s.laps().is_empty());
    }

    #[test]
    fn test_reset_from_paused_matches_fresh_session() {
        let (mut s, live) = session();
        s.start(0, || FakeTicker::new(&live)).unwrap();
        s.lap(300).unwrap();
        s.stop(700).unwrap();
        s.reset().unwrap();

        let fresh: Session<FakeTicker> = Session::new();
        assert_eq!(s.kind(), fresh.kind());
        assert_eq!(s.laps(), fresh.laps());
        assert_eq!(s.start_epoch(), fresh.start_epoch());
        assert_eq!(s.now_epoch(), fresh.now_epoch());
        assert_eq!(s.is_running(), fresh.is_running());
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn test_format_ms_to_minsecs() {
        assert_eq!(format_ms_to_minsecs(0), "00:00,00");
        assert_eq!(format_ms_to_minsecs(61_250), "01:01,25");
        assert_eq!(format_ms_to_minsecs(9), "00:00,00");
        assert_eq!(format_ms_to_minsecs(59_999), "00:59,99");
        assert_eq!(format_ms_to_minsecs(3_600_000 + 62_340), "01:02,34");
    }

    #[test]
    fn test_invalid_transition_message() {
        let err = InvalidTransition {
            action: Action::Lap,
            phase: PhaseKind::Idle,
        };
        assert_eq!(err.to_string(), "cannot lap while idle");
    }
}
