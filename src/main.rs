//! Entry point for the **tagbridge** daemon.
//!
//! Loads the configuration, wires `yashiki subscribe` to the `ranma` bar
//! and streams forever.  Diagnostics go to stderr; set `RUST_LOG` for
//! more detail than the default `warn`.

use tagbridge::config::Config;
use tagbridge::ranma::cli::RanmaCli;
use tagbridge::supervisor::Supervisor;
use tagbridge::yashiki::subscribe::YashikiSubscription;
use log::info;

/// Resolve the config directory (`$XDG_CONFIG_HOME/tagbridge`).
fn config_dir() -> std::path::PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    std::path::PathBuf::from(base).join("tagbridge")
}

/// Try to load the config from `$XDG_CONFIG_HOME/tagbridge/config.json`,
/// falling back to compiled-in defaults.
fn load_config() -> Config {
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no usable config ({}), using defaults", e);
            Config::default()
        }
    }
}

//  Main

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = load_config();
    let source = YashikiSubscription::new(&config.source.program, &config.source.args);
    let target = RanmaCli::new(&config.render.program);
    let backoff = config.source.backoff();

    let mut supervisor = Supervisor::new(source, target, config.layout, config.theme, backoff);
    supervisor.run();
}
