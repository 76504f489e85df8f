use anyhow::{Context, Result};
use rune_transition::{StyleValue, TimeSpan, TransitionEventKind, parse_transition};

use super::{Scenario, Stage};

/// Forced completion: one node is detached mid-flight by the host, another
/// detaches itself from its own `transitionstart` listener.
pub struct DetachScenario;

impl Scenario for DetachScenario {
    fn name(&self) -> &'static str {
        "detach"
    }

    fn run(&mut self, stage: &mut Stage) -> Result<()> {
        let defs = parse_transition("opacity 500ms ease-in-out, transform-x 500ms ease 100ms")
            .context("parsing transition list")?;

        for node in ["toast", "tooltip"] {
            stage.engine.apply_style(
                node,
                &defs,
                [
                    ("opacity", StyleValue::number(0.0)),
                    ("transform-x", StyleValue::number(-40.0)),
                ],
            );
        }

        stage.engine.add_node_listener("tooltip", |engine, event| {
            if event.kind == TransitionEventKind::Start && event.property.as_str() == "transform-x" {
                log::info!("tooltip removes itself on {event}");
                engine.node_detached(&event.node_id);
            }
            Ok(())
        });

        for node in ["toast", "tooltip"] {
            stage.engine.apply_style(
                node,
                &defs,
                [
                    ("opacity", StyleValue::number(1.0)),
                    ("transform-x", StyleValue::number(0.0)),
                ],
            );
        }

        stage.run_for(
            TimeSpan::from_millis(250),
            &[("toast", "opacity"), ("tooltip", "opacity")],
        );

        log::info!("host detaches toast");
        stage.engine.node_detached("toast");
        for node in ["toast", "tooltip"] {
            log::info!(
                "{node}: opacity={} transform-x={} live={}",
                stage.describe(node, "opacity"),
                stage.describe(node, "transform-x"),
                stage.engine.is_node_live(node)
            );
        }

        anyhow::ensure!(stage.engine.active_count() == 0, "detached nodes keep no timers");
        Ok(())
    }
}
