// Capture via ffmpeg en sous-processus (std::process::Command) : ffmpeg
// décode le format natif de la caméra ou du fichier, convertit en gris 8 bits
// et redimensionne. On lit les frames brutes sur son stdout.
//
// Prérequis runtime : `ffmpeg` accessible dans PATH.

use std::collections::VecDeque;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::process::{Child, ChildStderr, ChildStdout, Command, Stdio};
use std::thread::JoinHandle;

use tc_core::config::FrameRate;
use tc_core::error::SourceError;
use tc_core::frame::GrayscaleGrid;
use tc_core::traits::FrameSource;

use crate::raw::RawGraySource;

/// Ce que ffmpeg doit lire.
///
/// # Example
/// ```
/// use tc_source::ffmpeg::FfmpegInput;
/// let input = FfmpegInput::Camera { device: None, format: None };
/// assert!(input.is_live());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FfmpegInput {
    /// Périphérique caméra. `None` = défaut de la plateforme.
    Camera {
        /// Device name or index (`/dev/video0`, `0`, ...).
        device: Option<String>,
        /// Input format (`v4l2`, `avfoundation`, `vfwcap`, `dshow`).
        format: Option<String>,
    },
    /// Fichier vidéo, lu jusqu'à la fin.
    File(PathBuf),
}

impl FfmpegInput {
    /// `true` for cameras, which never run out of frames.
    #[must_use]
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Camera { .. })
    }
}

/// Format d'entrée et périphérique par défaut de la plateforme.
#[must_use]
pub fn default_camera() -> (&'static str, &'static str) {
    if cfg!(target_os = "macos") {
        ("avfoundation", "0")
    } else if cfg!(target_os = "windows") {
        ("dshow", "video=Integrated Camera")
    } else {
        ("v4l2", "/dev/video0")
    }
}

/// Arguments de la ligne de commande ffmpeg.
///
/// Sortie : `cols × rows` octets par frame (gris 8 bits, row-major, sans padding),
/// cadencée à `rate` (`-r`) pour que le pipe ne prenne pas d'avance sur l'affichage.
/// `mirror` ajoute un `hflip` pour la vue selfie.
///
/// # Example
/// ```
/// use tc_core::config::FrameRate;
/// use tc_source::ffmpeg::{FfmpegInput, ffmpeg_args};
/// let rate = FrameRate::new(30.0).unwrap();
/// let args = ffmpeg_args(&FfmpegInput::File("clip.mp4".into()), 30, 40, false, rate);
/// assert!(args.windows(2).any(|w| w == ["-vf", "scale=40:30:flags=area"]));
/// assert!(args.windows(2).any(|w| w == ["-pix_fmt", "gray"]));
/// assert!(args.windows(2).any(|w| w == ["-r", "30"]));
/// ```
#[must_use]
pub fn ffmpeg_args(
    input: &FfmpegInput,
    rows: usize,
    cols: usize,
    mirror: bool,
    rate: FrameRate,
) -> Vec<String> {
    let mut args: Vec<String> = vec!["-hide_banner".into(), "-loglevel".into(), "error".into()];

    match input {
        FfmpegInput::Camera { device, format } => {
            let (default_format, default_device) = default_camera();
            args.push("-f".into());
            args.push(format.as_deref().unwrap_or(default_format).to_string());
            args.push("-i".into());
            args.push(device.as_deref().unwrap_or(default_device).to_string());
        }
        FfmpegInput::File(path) => {
            args.push("-i".into());
            args.push(path.to_string_lossy().into_owned());
        }
    }

    let mut filter = format!("scale={cols}:{rows}:flags=area");
    if mirror {
        filter.push_str(",hflip");
    }
    args.extend([
        "-vf".into(),
        filter,
        "-pix_fmt".into(),
        "gray".into(),
        "-r".into(),
        rate.fps().to_string(),
        "-f".into(),
        "rawvideo".into(),
        "-an".into(),
        "pipe:1".into(),
    ]);
    args
}

/// Lignes de stderr conservées pour le message d'erreur.
const STDERR_TAIL_LINES: usize = 8;

/// Source de frames lues dans le pipe d'un processus `ffmpeg`.
///
/// Le processus est lancé à l'ouverture et tué à la fermeture (ou au `Drop`).
/// Fin de flux propre (code de sortie 0) = épuisement; code non nul = erreur,
/// accompagnée des dernières lignes de stderr de ffmpeg.
pub struct FfmpegSource {
    child: Option<Child>,
    pipe: Option<RawGraySource<ChildStdout>>,
    stderr: Option<JoinHandle<VecDeque<String>>>,
    program: String,
    rows: usize,
    cols: usize,
    live: bool,
}

impl FfmpegSource {
    /// Lance ffmpeg pour `input`, sortie redimensionnée en `rows × cols` à `rate`.
    ///
    /// # Errors
    /// Returns [`SourceError::Spawn`] if `ffmpeg` cannot be started.
    ///
    /// # Example
    /// ```no_run
    /// use tc_core::config::FrameRate;
    /// use tc_source::ffmpeg::{FfmpegInput, FfmpegSource};
    /// let input = FfmpegInput::Camera { device: None, format: None };
    /// let rate = FrameRate::new(30.0).unwrap();
    /// let source = FfmpegSource::open(&input, 30, 40, true, rate).unwrap();
    /// ```
    pub fn open(
        input: &FfmpegInput,
        rows: usize,
        cols: usize,
        mirror: bool,
        rate: FrameRate,
    ) -> Result<Self, SourceError> {
        let args = ffmpeg_args(input, rows, cols, mirror, rate);
        log::debug!("ffmpeg {}", args.join(" "));

        let mut command = Command::new("ffmpeg");
        command.args(&args);
        let source = Self::spawn(command, rows, cols, input.is_live())?;
        log::info!("ffmpeg lancé : {cols}x{rows} @ {} fps depuis {input:?}", rate.fps());
        Ok(source)
    }

    /// Lance `command` et lit ses frames brutes sur stdout.
    pub(crate) fn spawn(
        mut command: Command,
        rows: usize,
        cols: usize,
        live: bool,
    ) -> Result<Self, SourceError> {
        let program = command.get_program().to_string_lossy().into_owned();
        let mut child = command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| SourceError::Spawn {
                program: program.clone(),
                source,
            })?;

        let Some(stdout) = child.stdout.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(SourceError::Io(std::io::Error::other(format!(
                "stdout {program} indisponible"
            ))));
        };
        let stderr = child
            .stderr
            .take()
            .and_then(|pipe| spawn_stderr_reader(pipe, &program));

        Ok(Self {
            child: Some(child),
            pipe: Some(RawGraySource::new(stdout, rows, cols).live(live)),
            stderr,
            program,
            rows,
            cols,
            live,
        })
    }

    /// Attend la fin du processus et traduit son code de sortie.
    fn finish(&mut self) -> Result<Option<GrayscaleGrid>, SourceError> {
        self.pipe = None;
        let Some(mut child) = self.child.take() else {
            return Ok(None);
        };
        let status = child.wait()?;
        let tail = self
            .stderr
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();
        if status.success() {
            log::info!("{} : fin du flux.", self.program);
            Ok(None)
        } else {
            let mut msg = format!("{} s'est arrêté en erreur ({status})", self.program);
            if !tail.is_empty() {
                msg.push_str(" : ");
                msg.push_str(&Vec::from(tail).join(" | "));
            }
            Err(SourceError::Io(std::io::Error::other(msg)))
        }
    }
}

/// Relaie stderr vers les logs et garde les dernières lignes.
fn spawn_stderr_reader(pipe: ChildStderr, program: &str) -> Option<JoinHandle<VecDeque<String>>> {
    let tag = program.to_string();
    let spawned = std::thread::Builder::new()
        .name("ffmpeg-stderr".into())
        .spawn(move || {
            let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);
            for line in BufReader::new(pipe).lines().map_while(Result::ok) {
                log::debug!("[{tag}] {line}");
                if tail.len() == STDERR_TAIL_LINES {
                    tail.pop_front();
                }
                tail.push_back(line);
            }
            tail
        });
    match spawned {
        Ok(handle) => Some(handle),
        Err(e) => {
            log::warn!("stderr de {program} non capturé : {e}");
            None
        }
    }
}

impl FrameSource for FfmpegSource {
    fn next_grid(&mut self) -> Result<Option<GrayscaleGrid>, SourceError> {
        let Some(pipe) = self.pipe.as_mut() else {
            return Ok(None);
        };
        match pipe.next_grid()? {
            Some(grid) => Ok(Some(grid)),
            None => self.finish(),
        }
    }

    fn grid_size(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    fn is_live(&self) -> bool {
        self.live
    }

    fn close(&mut self) {
        self.pipe = None;
        // le thread stderr se termine seul à la fermeture du pipe
        self.stderr = None;
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
            log::debug!("{} arrêté.", self.program);
        }
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        self.close();
    }
}
