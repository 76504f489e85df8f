use anyhow::{Context, Result};
use rune_transition::{StyleValue, TimeSpan, TransitionDefinition, parse_transition};

use super::{Scenario, Stage};

/// Hover in, then leave halfway: the return trip starts from wherever the
/// first transition had got to.
pub struct ReversalScenario;

impl Scenario for ReversalScenario {
    fn name(&self) -> &'static str {
        "reversal"
    }

    fn run(&mut self, stage: &mut Stage) -> Result<()> {
        let defs: Vec<TransitionDefinition> =
            parse_transition("width 400ms linear").context("parsing transition list")?;
        let card = "card";

        stage
            .engine
            .apply_style(card, &defs, [("width", StyleValue::number(100.0))]);

        log::info!("pointer enters {card}");
        stage
            .engine
            .apply_style(card, &defs, [("width", StyleValue::number(200.0))]);
        stage.run_for(TimeSpan::from_millis(200), &[(card, "width")]);

        log::info!("pointer leaves {card}");
        stage.wait(TimeSpan::from_millis(8));
        stage
            .engine
            .apply_style(card, &defs, [("width", StyleValue::number(100.0))]);

        match stage.engine.timer(card, "width") {
            Some(timer) => log::info!(
                "return trip starts at {} toward {}",
                timer.start_value(),
                timer.end_value()
            ),
            None => log::info!("transitions disabled, width snapped to {}", stage.describe(card, "width")),
        }

        stage.run_for(TimeSpan::from_millis(400), &[(card, "width")]);
        log::info!("final width {}", stage.describe(card, "width"));
        Ok(())
    }
}
