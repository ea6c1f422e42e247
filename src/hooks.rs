use crate::config::TICK_MS;
use gloo_timers::callback::Interval;
use lap_stopwatch::laps::{lap_rows, LapRow};
use lap_stopwatch::{now_ms, InvalidTransition, PhaseKind, Session};
use log::warn;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use yew::prelude::*;

/// Session whose tick handle is a browser interval.
type SharedSession = Rc<RefCell<Session<Interval>>>;

/// Snapshot of the stopwatch for rendering, plus the actions the view may trigger.
#[derive(Clone)]
pub struct StopwatchHandle {
    pub phase: PhaseKind,
    /// Total elapsed milliseconds as of the last tick.
    pub total_ms: u64,
    /// Lap table rows, most recent first.
    pub rows: Rc<Vec<LapRow>>,
    pub on_start: Callback<()>,
    pub on_lap: Callback<()>,
    pub on_stop: Callback<()>,
    pub on_resume: Callback<()>,
    pub on_reset: Callback<()>,
}

/// Build the periodic refresh for a running session.
///
/// The closure only holds a weak reference, so the interval stored inside the
/// session never keeps the session alive.
fn spawn_ticker(session: Weak<RefCell<Session<Interval>>>, redraw: UseForceUpdateHandle) -> Interval {
    Interval::new(TICK_MS, move || {
        let Some(session) = session.upgrade() else {
            return;
        };
        let ticked = session.borrow_mut().tick(now_ms());
        if ticked.is_ok() {
            redraw.force_update();
        }
    })
}

/// Wrap a session transition into a view callback that redraws on success.
fn action_callback<F>(
    session: &SharedSession,
    redraw: &UseForceUpdateHandle,
    apply: F,
) -> Callback<()>
where
    F: Fn(&SharedSession, &UseForceUpdateHandle, u64) -> Result<(), InvalidTransition> + 'static,
{
    let session = session.clone();
    let redraw = redraw.clone();
    Callback::from(move |_| match apply(&session, &redraw, now_ms()) {
        Ok(()) => redraw.force_update(),
        Err(err) => warn!("Ignoring stopwatch action: {}", err),
    })
}

/// Custom hook owning one stopwatch session for the lifetime of a component.
#[hook]
pub fn use_stopwatch() -> StopwatchHandle {
    let session: SharedSession = use_mut_ref(Session::new);
    let redraw = use_force_update();

    // Pause at the last tick and drop the interval when the component unmounts
    {
        let session = session.clone();
        use_effect_with((), move |_| {
            move || {
                session.borrow_mut().teardown();
            }
        });
    }

    let on_start = action_callback(&session, &redraw, |session, redraw, now| {
        let weak = Rc::downgrade(session);
        let redraw = redraw.clone();
        session
            .borrow_mut()
            .start(now, move || spawn_ticker(weak, redraw))
    });

    let on_lap = action_callback(&session, &redraw, |session, _, now| {
        session.borrow_mut().lap(now)
    });

    let on_stop = action_callback(&session, &redraw, |session, _, now| {
        session.borrow_mut().stop(now)
    });

    let on_resume = action_callback(&session, &redraw, |session, redraw, now| {
        let weak = Rc::downgrade(session);
        let redraw = redraw.clone();
        session
            .borrow_mut()
            .resume(now, move || spawn_ticker(weak, redraw))
    });

    let on_reset = action_callback(&session, &redraw, |session, _, _| {
        session.borrow_mut().reset()
    });

    let (phase, total_ms, rows) = {
        let current = session.borrow();
        (
            current.kind(),
            current.total_elapsed(),
            lap_rows(current.laps(), current.running_elapsed()),
        )
    };

    StopwatchHandle {
        phase,
        total_ms,
        rows: Rc::new(rows),
        on_start,
        on_lap,
        on_stop,
        on_resume,
        on_reset,
    }
}
