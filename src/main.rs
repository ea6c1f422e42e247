//! Main module for the lap stopwatch application using Yew.
//! Wires the stopwatch hook into the view components.

use yew::prelude::*;

mod components;
mod config;
mod hooks;

use components::{Controls, LapsTable, TimerDisplay};
use hooks::use_stopwatch;

// ──────────────────────────────────────────────────────────────────────────────

/// Single-screen stopwatch: total readout, phase buttons, lap table.
#[function_component]
pub fn App() -> Html {
    let stopwatch = use_stopwatch();

    html! {
        <div class="container">
            <TimerDisplay interval_ms={stopwatch.total_ms} class="main-timer" />
            <Controls
                phase={stopwatch.phase}
                on_start={stopwatch.on_start.clone()}
                on_lap={stopwatch.on_lap.clone()}
                on_stop={stopwatch.on_stop.clone()}
                on_resume={stopwatch.on_resume.clone()}
                on_reset={stopwatch.on_reset.clone()}
            />
            <LapsTable rows={stopwatch.rows.clone()} />
        </div>
    }
}

/// Entry point: routes panics to the console and mounts the App component.
fn main() {
    console_error_panic_hook::set_once();
    yew::Renderer::<App>::new().render();
}
