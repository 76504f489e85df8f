use anyhow::{Result, bail};
use rune_config::RuneConfig;

mod scenarios;
use scenarios::{Scenario, Stage};

fn main() -> Result<()> {
    let config = RuneConfig::load();

    // RUST_LOG wins over the configured filter
    let filter = config.logging.filter.as_deref().unwrap_or("info");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    // Scenario selection: --scenario=<name> overrides DEMO_SCENARIO / rune.toml
    let selected = std::env::args()
        .find_map(|a| a.strip_prefix("--scenario=").map(str::to_string))
        .or_else(|| config.demo.scenario.clone())
        .unwrap_or_else(|| "all".to_string());

    let to_run: Vec<Box<dyn Scenario>> = if selected == "all" {
        scenarios::all()
    } else {
        match scenarios::by_name(&selected) {
            Some(scenario) => vec![scenario],
            None => bail!("unknown scenario `{selected}` (expected hover, reversal, detach or all)"),
        }
    };

    log::info!(
        "transitions enabled={} frame={}ms",
        config.transitions.enabled,
        config.demo.frame_ms
    );

    for mut scenario in to_run {
        log::info!("=== {} ===", scenario.name());
        let mut stage = Stage::new(&config.transitions, config.demo.frame_ms);
        scenario.run(&mut stage)?;
    }

    Ok(())
}
