use std::io::{self, IsTerminal};

use anyhow::Context;
use tc_core::config::{CaptureConfig, load_config};
use tc_core::traits::{DisplaySink, FrameSource, TakeFrames};
use tc_render::terminal::{PlainSink, TerminalSink};
use tc_source::ffmpeg::{FfmpegInput, FfmpegSource};

use crate::cli::{Cli, SourceKind};

/// Resolve config: `--config` file (optional), then CLI overrides, then validation.
///
/// A missing file falls back to the defaults; an unreadable or invalid one is an error.
///
/// # Errors
/// Returns an error if the file is invalid or the merged values are out of range.
pub fn resolve_config(cli: &Cli) -> anyhow::Result<CaptureConfig> {
    let mut config = if cli.config.exists() {
        load_config(&cli.config)?
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        CaptureConfig::default()
    };
    apply_overrides(cli, &mut config);
    config.validate().context("Configuration invalide")?;
    Ok(config)
}

/// Les options CLI priment sur le fichier.
pub fn apply_overrides(cli: &Cli, config: &mut CaptureConfig) {
    if let Some(fps) = cli.fps {
        config.fps = fps;
    }
    if let Some(height) = cli.height {
        config.height = height;
    }
    if let Some(widen) = cli.widen {
        config.widen = widen;
    }
    if cli.mirror {
        config.mirror = true;
    }
    if cli.device.is_some() {
        config.device.clone_from(&cli.device);
    }
    if cli.input_format.is_some() {
        config.input_format.clone_from(&cli.input_format);
    }
}

/// Open the visual source selected on the command line.
///
/// Grids are `height × width` with `width = round(height × 4/3)`.
/// `--frames N` caps any source at `N` grids.
///
/// # Errors
/// Returns an error if the source cannot be opened.
pub fn open_source(cli: &Cli, config: &CaptureConfig) -> anyhow::Result<Box<dyn FrameSource>> {
    let rows = config.height as usize;
    let cols = config.width() as usize;
    let rate = config.frame_rate()?;

    let source: Box<dyn FrameSource> = match cli.source_kind()? {
        SourceKind::Camera => {
            let input = FfmpegInput::Camera {
                device: config.device.clone(),
                format: config.input_format.clone(),
            };
            log::info!("Ouverture caméra");
            Box::new(
                FfmpegSource::open(&input, rows, cols, config.mirror, rate)
                    .context("Caméra indisponible (ffmpeg est-il installé ?)")?,
            )
        }
        SourceKind::Video(path) => {
            if !path.exists() {
                anyhow::bail!("Vidéo introuvable : {}", path.display());
            }
            let input = FfmpegInput::File(path);
            Box::new(
                FfmpegSource::open(&input, rows, cols, config.mirror, rate)
                    .context("Impossible de lancer ffmpeg")?,
            )
        }
        SourceKind::Image(path) => open_image(&path, rows, cols, cli.frames)?,
        SourceKind::Procedural(name) => {
            log::info!("Starting procedural source: {name}");
            Box::new(tc_source::procedural::create_procedural_source(&name, rows, cols)?)
        }
    };

    Ok(match cli.frames {
        Some(limit) => Box::new(TakeFrames::new(source, limit)),
        None => source,
    })
}

#[cfg(feature = "image-source")]
fn open_image(
    path: &std::path::Path,
    rows: usize,
    cols: usize,
    frames: Option<u64>,
) -> anyhow::Result<Box<dyn FrameSource>> {
    // Sans --frames, une image s'affiche une seule fois.
    let repeat = Some(frames.map_or(1, |n| usize::try_from(n).unwrap_or(usize::MAX)));
    let source = tc_source::image::ImageSource::new(path, rows, cols, repeat)
        .with_context(|| format!("Image illisible : {}", path.display()))?;
    Ok(Box::new(source))
}

#[cfg(not(feature = "image-source"))]
fn open_image(
    path: &std::path::Path,
    _rows: usize,
    _cols: usize,
    _frames: Option<u64>,
) -> anyhow::Result<Box<dyn FrameSource>> {
    anyhow::bail!(
        "Support image désactivé (feature image-source) : {}",
        path.display()
    )
}

/// `true` when frames go to a terminal with escape sequences: stdout is a
/// TTY and `--plain` is off.
#[must_use]
pub fn uses_terminal(cli: &Cli) -> bool {
    !cli.plain && io::stdout().is_terminal()
}

/// Terminal clear-and-print sink, or plain streaming output when `--plain`
/// is given or stdout is not a terminal.
///
/// # Errors
/// Returns an error if the terminal cannot be prepared.
pub fn open_sink(cli: &Cli) -> anyhow::Result<Box<dyn DisplaySink>> {
    if !uses_terminal(cli) {
        log::debug!("Sortie texte brute");
        return Ok(Box::new(PlainSink::new(io::stdout())));
    }
    let sink = TerminalSink::stdout().context("Initialisation du terminal")?;
    Ok(Box::new(sink))
}
