/// Example program to print the loaded configuration
///
/// Run with: cargo run -p rune-config --example print_config

fn main() {
    let config = rune_config::RuneConfig::load();

    println!("=== Rune Transition Configuration ===\n");

    println!("Transitions:");
    println!("  Enabled: {}", config.transitions.enabled);
    println!("  Log Events: {}", config.transitions.log_events);
    println!();

    println!("Logging:");
    println!("  Filter: {:?}", config.logging.filter);
    println!();

    println!("Demo:");
    println!("  Scenario: {:?}", config.demo.scenario);
    println!("  Frame: {}ms", config.demo.frame_ms);
    println!();

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
