use std::path::PathBuf;

use clap::Parser;

/// termcam — flux caméra rendu en art ASCII dans le terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Source : caméra (défaut si aucune source n'est donnée).
    #[arg(long, default_value_t = false)]
    pub camera: bool,

    /// Source : chemin vers une vidéo (décodée par ffmpeg).
    #[arg(long)]
    pub video: Option<PathBuf>,

    /// Source : chemin vers une image (PNG, JPEG, BMP, GIF).
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Générateur procédural : "sweep", "pulse".
    #[arg(long)]
    pub procedural: Option<String>,

    /// Arrêter après N frames.
    #[arg(long)]
    pub frames: Option<u64>,

    /// FPS cible.
    #[arg(long)]
    pub fps: Option<f64>,

    /// Hauteur de la grille en lignes. Largeur = hauteur × 4/3.
    #[arg(long)]
    pub height: Option<u32>,

    /// Répétition horizontale de chaque glyphe.
    #[arg(long)]
    pub widen: Option<u32>,

    /// Miroir horizontal (vue selfie).
    #[arg(long, default_value_t = false)]
    pub mirror: bool,

    /// Sortie texte brute, sans effacement ni séquences d'échappement.
    #[arg(long, default_value_t = false)]
    pub plain: bool,

    /// Périphérique caméra (ex: /dev/video1, 1).
    #[arg(long)]
    pub device: Option<String>,

    /// Format d'entrée ffmpeg de la caméra (ex: v4l2, avfoundation, dshow).
    #[arg(long)]
    pub input_format: Option<String>,

    /// Fichier de configuration TOML. Défaut : termcam.toml.
    #[arg(short, long, default_value = "termcam.toml")]
    pub config: PathBuf,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// Source visuelle retenue après validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    Camera,
    Video(PathBuf),
    Image(PathBuf),
    Procedural(String),
}

impl Cli {
    /// Validate that at most one visual source is provided.
    ///
    /// # Errors
    /// Returns an error if more than one source is specified.
    pub fn validate_source(&self) -> anyhow::Result<()> {
        let count = usize::from(self.camera)
            + usize::from(self.video.is_some())
            + usize::from(self.image.is_some())
            + usize::from(self.procedural.is_some());

        if count > 1 {
            anyhow::bail!(
                "Une seule source visuelle à la fois. Spécifiez --camera, --video, --image, OU --procedural."
            );
        }
        Ok(())
    }

    /// Source sélectionnée; la caméra quand rien n'est précisé.
    ///
    /// # Errors
    /// Returns an error if more than one source is specified.
    pub fn source_kind(&self) -> anyhow::Result<SourceKind> {
        self.validate_source()?;
        Ok(if let Some(ref path) = self.video {
            SourceKind::Video(path.clone())
        } else if let Some(ref path) = self.image {
            SourceKind::Image(path.clone())
        } else if let Some(ref name) = self.procedural {
            SourceKind::Procedural(name.clone())
        } else {
            SourceKind::Camera
        })
    }
}
