mod commands; // subcommand implementations
mod render; // ASCII rendering of grids and paths

use anyhow::{Context, Result, bail};
use navgrid_navigation::NavigationSettings;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{self, EnvFilter};

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

const USAGE: &str = "\
usage:
  navgrid new <out> <width> <height>
  navgrid resize <grid> <width> <height> <out>
  navgrid set <grid> <x> <y> <value>
  navgrid show <grid>
  navgrid path <grid> <start-x> <start-y> <end-x> <end-y>
  navgrid nearest <grid> <x> <y> [max-distance]
  navgrid ray <grid> <start-x> <start-y> <end-x> <end-y>";

fn load_settings() -> Result<NavigationSettings> {
    let path = std::env::var("NAVGRID_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    if !Path::new(&path).exists() {
        warn!("No settings file at {}, using defaults", path);
        return Ok(NavigationSettings::default());
    }
    NavigationSettings::load(&path).with_context(|| format!("loading settings from {path}"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        bail!("missing command\n{USAGE}");
    };

    let settings = load_settings()?;
    info!(command = %command, "navgrid started");

    match command.as_str() {
        "new" => commands::new(rest),
        "resize" => commands::resize(rest),
        "set" => commands::set(rest),
        "show" => commands::show(rest),
        "path" => commands::path(rest, &settings),
        "nearest" => commands::nearest(rest, &settings),
        "ray" => commands::ray(rest, &settings),
        other => bail!("unknown command `{other}`\n{USAGE}"),
    }
}
