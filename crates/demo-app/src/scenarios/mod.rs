use anyhow::Result;
use rune_transition::{
    ManualClock, PropertyName, StyleValue, TimeSource, TimeSpan, TransitionEngine,
    TransitionSettings,
};

/// A scripted sequence of style changes and pulses.
pub trait Scenario {
    fn name(&self) -> &'static str;
    fn run(&mut self, stage: &mut Stage) -> Result<()>;
}

/// Engine plus a simulated frame clock.
pub struct Stage {
    pub engine: TransitionEngine,
    pub clock: ManualClock,
    frame: TimeSpan,
}

impl Stage {
    pub fn new(settings: &TransitionSettings, frame_ms: u64) -> Self {
        let clock = ManualClock::new();
        let mut engine = TransitionEngine::new()
            .with_clock(clock.clone())
            .with_settings(settings);
        engine.add_listener(|_, event| {
            log::info!("  event {event}");
            Ok(())
        });
        let frame_ms = i64::try_from(frame_ms.max(1)).unwrap_or(16);
        Self {
            engine,
            clock,
            frame: TimeSpan::from_millis(frame_ms),
        }
    }

    /// Pulse frame by frame for `span`, logging `samples` after each frame.
    pub fn run_for(&mut self, span: TimeSpan, samples: &[(&str, &str)]) {
        let until = self.clock.now() + span;
        while self.clock.now() < until {
            let step = self.frame.min(until - self.clock.now());
            let now = self.clock.advance(step);
            self.engine.pulse_at(now);
            for (node, property) in samples {
                log::info!("{now} {node}.{property} = {}", self.describe(node, property));
            }
        }
    }

    /// Move the clock without pulsing, as if the next style change happened
    /// between frames.
    pub fn wait(&mut self, span: TimeSpan) {
        self.clock.advance(span);
    }

    pub fn describe(&self, node: &str, property: &str) -> String {
        self.engine
            .value(node, PropertyName::new(property))
            .map(StyleValue::to_string)
            .unwrap_or_else(|| "<unset>".to_string())
    }
}

pub mod detach;
pub mod hover;
pub mod reversal;

/// Look up a scenario by name.
pub fn by_name(name: &str) -> Option<Box<dyn Scenario>> {
    match name {
        "hover" => Some(Box::new(hover::HoverScenario)),
        "reversal" => Some(Box::new(reversal::ReversalScenario)),
        "detach" => Some(Box::new(detach::DetachScenario)),
        _ => None,
    }
}

pub fn all() -> Vec<Box<dyn Scenario>> {
    vec![
        Box::new(hover::HoverScenario),
        Box::new(reversal::ReversalScenario),
        Box::new(detach::DetachScenario),
    ]
}
