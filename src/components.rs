//! Pure Yew view components for the stopwatch screen.
//!
//! These components only render what they are given; all timing state lives
//! in the `use_stopwatch` hook.

use crate::config::{LABEL_LAP, LABEL_RESET, LABEL_START, LABEL_STOP, LAP_PREFIX};
use lap_stopwatch::format_ms_to_minsecs;
use lap_stopwatch::laps::LapRow;
use lap_stopwatch::PhaseKind;
use std::rc::Rc;
use yew::prelude::*;

/// `MM:SS,HH` readout.
#[derive(Properties, PartialEq)]
pub struct TimerDisplayProps {
    pub interval_ms: u64,
    #[prop_or_default]
    pub class: Classes,
}

#[function_component(TimerDisplay)]
pub fn timer_display(props: &TimerDisplayProps) -> Html {
    html! {
        <span class={classes!("timer", props.class.clone())}>
            { format_ms_to_minsecs(props.interval_ms) }
        </span>
    }
}

/// Colour role of a round button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonRole {
    Start,
    Stop,
    Neutral,
}

impl ButtonRole {
    fn class(self) -> &'static str {
        match self {
            ButtonRole::Start => "role-start",
            ButtonRole::Stop => "role-stop",
            ButtonRole::Neutral => "role-neutral",
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct RoundButtonProps {
    pub title: AttrValue,
    pub role: ButtonRole,
    #[prop_or_default]
    pub disabled: bool,
    #[prop_or_default]
    pub onpress: Callback<()>,
}

/// Circular button; presses are ignored while disabled.
#[function_component(RoundButton)]
pub fn round_button(props: &RoundButtonProps) -> Html {
    let onclick = {
        let disabled = props.disabled;
        let onpress = props.onpress.clone();
        Callback::from(move |_: MouseEvent| {
            if !disabled {
                onpress.emit(());
            }
        })
    };

    html! {
        <button
            class={classes!(
                "round-button",
                props.role.class(),
                props.disabled.then_some("disabled")
            )}
            disabled={props.disabled}
            {onclick}
        >
            <span class="round-button-border">{ props.title.clone() }</span>
        </button>
    }
}

#[derive(Properties, PartialEq)]
pub struct ButtonsRowProps {
    #[prop_or_default]
    pub children: Html,
}

#[function_component(ButtonsRow)]
pub fn buttons_row(props: &ButtonsRowProps) -> Html {
    html! {
        <div class="buttons-row">{ props.children.clone() }</div>
    }
}

/// The pair of buttons offered in each phase.
#[derive(Properties, PartialEq)]
pub struct ControlsProps {
    pub phase: PhaseKind,
    pub on_start: Callback<()>,
    pub on_lap: Callback<()>,
    pub on_stop: Callback<()>,
    pub on_resume: Callback<()>,
    pub on_reset: Callback<()>,
}

#[function_component(Controls)]
pub fn controls(props: &ControlsProps) -> Html {
    match props.phase {
        PhaseKind::Idle => html! {
            <ButtonsRow>
                <RoundButton title={LABEL_LAP} role={ButtonRole::Neutral} disabled=true />
                <RoundButton title={LABEL_START} role={ButtonRole::Start}
                    onpress={props.on_start.clone()} />
            </ButtonsRow>
        },
        PhaseKind::Running => html! {
            <ButtonsRow>
                <RoundButton title={LABEL_LAP} role={ButtonRole::Neutral}
                    onpress={props.on_lap.clone()} />
                <RoundButton title={LABEL_STOP} role={ButtonRole::Stop}
                    onpress={props.on_stop.clone()} />
            </ButtonsRow>
        },
        PhaseKind::Paused => html! {
            <ButtonsRow>
                <RoundButton title={LABEL_RESET} role={ButtonRole::Neutral}
                    onpress={props.on_reset.clone()} />
                <RoundButton title={LABEL_START} role={ButtonRole::Start}
                    onpress={props.on_resume.clone()} />
            </ButtonsRow>
        },
    }
}

#[derive(Properties, PartialEq)]
pub struct LapItemProps {
    pub row: LapRow,
}

#[function_component(LapItem)]
pub fn lap_item(props: &LapItemProps) -> Html {
    let row = props.row;
    let highlight = classes!(
        row.fastest.then_some("fastest"),
        row.slowest.then_some("slowest")
    );

    html! {
        <div class="lap">
            <span class={classes!("lap-text", highlight.clone())}>
                { format!("{} {}", LAP_PREFIX, row.number) }
            </span>
            <TimerDisplay interval_ms={row.interval_ms}
                class={classes!("lap-text", "lap-timer", highlight)} />
        </div>
    }
}

/// Scrollable list of laps, newest at the top.
#[derive(Properties, PartialEq)]
pub struct LapsTableProps {
    pub rows: Rc<Vec<LapRow>>,
}

#[function_component(LapsTable)]
pub fn laps_table(props: &LapsTableProps) -> Html {
    html! {
        <div class="laps-scroll">
            { props.rows.iter().map(|row| html! {
                <LapItem key={row.number.to_string()} row={*row} />
            }).collect::<Html>() }
        </div>
    }
}
