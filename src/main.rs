//! Pipe Draw Replay.
//!
//! Spielt ein aufgezeichnetes Event-Skript (JSON) gegen einen In-Memory-Host ab
//! und gibt die erzeugte Szene als JSON auf stdout aus.

use anyhow::{bail, Context};
use pipe_draw_engine::{load_script, run_script, ToolOptions};
use std::path::PathBuf;

const USAGE: &str =
    "Aufruf: pipe-draw-replay [<skript.json>] [--config <optionen.toml>] [--write-config <ziel.toml>]";

/// Kommandozeilen-Argumente des Replays.
struct ReplayArgs {
    script: Option<PathBuf>,
    config: Option<PathBuf>,
    /// Wirksame Optionen als TOML hierhin schreiben
    write_config: Option<PathBuf>,
}

impl ReplayArgs {
    fn parse(mut args: impl Iterator<Item = String>) -> anyhow::Result<Option<Self>> {
        let mut script = None;
        let mut config = None;
        let mut write_config = None;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Ok(None),
                "--config" => {
                    let path = args.next().context("--config erwartet einen Pfad")?;
                    config = Some(PathBuf::from(path));
                }
                "--write-config" => {
                    let path = args.next().context("--write-config erwartet einen Pfad")?;
                    write_config = Some(PathBuf::from(path));
                }
                _ if script.is_none() => script = Some(PathBuf::from(arg)),
                _ => bail!("Unerwartetes Argument: {arg}\n{USAGE}"),
            }
        }
        if script.is_none() && write_config.is_none() {
            bail!("Kein Skript angegeben\n{USAGE}");
        }
        Ok(Some(Self {
            script,
            config,
            write_config,
        }))
    }
}

fn main() -> anyhow::Result<()> {
    // Logger initialisieren
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let Some(args) = ReplayArgs::parse(std::env::args().skip(1))? else {
        println!("{USAGE}");
        return Ok(());
    };

    log::info!("Pipe Draw Replay v{} startet...", env!("CARGO_PKG_VERSION"));

    let config_path = args.config.unwrap_or_else(ToolOptions::config_path);
    let options = ToolOptions::load_from_file(&config_path);
    if let Some(target) = &args.write_config {
        options
            .save_to_file(target)
            .with_context(|| format!("Optionen nicht schreibbar: {}", target.display()))?;
    }
    let Some(script_path) = &args.script else {
        return Ok(());
    };
    let script = load_script(script_path)?;

    let report = run_script(&script, &options).context("Replay fehlgeschlagen")?;
    let json = serde_json::to_string_pretty(&report).context("Report nicht serialisierbar")?;
    println!("{json}");
    Ok(())
}
