use anyhow::{Context, Result};
use rune_transition::{StyleValue, TimeSpan, parse_transition};

use super::{Scenario, Stage};

/// A button restyled by `:hover` with a different transition list per state.
pub struct HoverScenario;

impl Scenario for HoverScenario {
    fn name(&self) -> &'static str {
        "hover"
    }

    fn run(&mut self, stage: &mut Stage) -> Result<()> {
        let rest = parse_transition("background-color 150ms ease, opacity 0s")
            .context("parsing resting transition list")?;
        let hover = parse_transition("background-color 200ms ease-out, opacity 300ms linear 100ms")
            .context("parsing hover transition list")?;

        let button = "button";
        stage.engine.apply_style(
            button,
            &rest,
            [
                ("background-color", StyleValue::rgba(0.2, 0.2, 0.2, 1.0)),
                ("opacity", StyleValue::number(0.6)),
            ],
        );

        log::info!("pointer enters {button}");
        let started = stage.engine.apply_style(
            button,
            &hover,
            [
                ("background-color", StyleValue::rgba(0.1, 0.4, 0.9, 1.0)),
                ("opacity", StyleValue::number(1.0)),
            ],
        );
        log::info!("{started} transitions started");

        stage.run_for(
            TimeSpan::from_millis(450),
            &[(button, "background-color"), (button, "opacity")],
        );
        anyhow::ensure!(
            stage.engine.transitions(button).is_none(),
            "hover transitions should have finished"
        );
        Ok(())
    }
}
