use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tc_app::interrupt::{Interrupt, Interruptible};
use tc_app::{cli, pacer, pipeline};
use tc_core::traits::FrameSource;

/// Code de sortie sur Ctrl-C (128 + SIGINT).
const INTERRUPTED_EXIT_CODE: u8 = 130;

fn main() -> Result<ExitCode> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging (stderr, la sortie standard porte les frames)
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Valider la source
    cli.validate_source()?;

    // 4. Charger la config + overrides CLI
    let config = pipeline::resolve_config(&cli)?;
    log::info!(
        "Capture {}x{} à {} fps, widen {}",
        config.width(),
        config.height,
        config.fps,
        config.widen
    );

    // 5. Ctrl-C : le premier arrête la boucle proprement, le second force la sortie
    let interrupt = Interrupt::new();
    let restore_cursor = pipeline::uses_terminal(&cli);
    let handler = interrupt.clone();
    ctrlc::set_handler(move || {
        if handler.trigger() {
            if restore_cursor {
                let _ = crossterm::execute!(std::io::stdout(), crossterm::cursor::Show);
            }
            std::process::exit(i32::from(INTERRUPTED_EXIT_CODE));
        }
    })
    .context("Installation du handler Ctrl-C")?;

    // 6. Ouvrir source et sortie
    let mut source = Interruptible::new(pipeline::open_source(&cli, &config)?, interrupt.clone());
    let mut sink = pipeline::open_sink(&cli)?;

    // 7. Boucle principale
    let mut pacer = pacer::Pacer::new(config.frame_rate()?, config.widen_factor()?);
    let result = pacer.run(&mut source, &mut sink);

    // 8. Libérer la source (ffmpeg tué et attendu) et restaurer le terminal,
    //    TOUJOURS, même en cas d'erreur ou d'interruption
    source.close();
    drop(sink);

    if interrupt.is_set() {
        log::info!("Interrompu");
        return Ok(ExitCode::from(INTERRUPTED_EXIT_CODE));
    }
    let summary = result?;
    log::info!("{} frames affichées", summary.frames);
    Ok(ExitCode::SUCCESS)
}
