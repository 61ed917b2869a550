use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};
use tc_core::frame::TextFrame;
use tc_core::traits::DisplaySink;

/// Sink terminal : efface l'écran, replace le curseur en haut à gauche, imprime.
///
/// Le curseur est masqué à la création et réaffiché au `Drop`.
///
/// # Example
/// ```
/// use tc_core::frame::TextFrame;
/// use tc_core::traits::DisplaySink;
/// use tc_render::terminal::TerminalSink;
///
/// let mut sink = TerminalSink::new(Vec::new()).unwrap();
/// let mut frame = TextFrame::with_capacity(1, 2);
/// frame.push_line("@@".into());
/// sink.clear_and_print(&frame).unwrap();
/// assert!(sink.get_ref().ends_with(b"@@\n"));
/// ```
pub struct TerminalSink<W: Write> {
    out: W,
}

impl<W: Write> TerminalSink<W> {
    /// Wrap `out` and hide the cursor.
    ///
    /// # Errors
    /// Propagates write errors from `out`.
    pub fn new(mut out: W) -> io::Result<Self> {
        queue!(out, Hide)?;
        out.flush()?;
        Ok(Self { out })
    }

    /// Underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.out
    }
}

impl TerminalSink<io::Stdout> {
    /// Sink sur la sortie standard.
    ///
    /// # Errors
    /// Propagates write errors from stdout.
    pub fn stdout() -> io::Result<Self> {
        Self::new(io::stdout())
    }
}

impl<W: Write> DisplaySink for TerminalSink<W> {
    fn clear_and_print(&mut self, frame: &TextFrame) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        frame.write_to(&mut self.out)?;
        self.out.flush()
    }
}

impl<W: Write> Drop for TerminalSink<W> {
    fn drop(&mut self) {
        if queue!(self.out, Show).and_then(|()| self.out.flush()).is_err() {
            log::warn!("Impossible de réafficher le curseur");
        }
    }
}

/// Sink sans séquence d'échappement : frames imprimées à la suite,
/// séparées par une ligne vide. Pour les sorties redirigées.
///
/// # Example
/// ```
/// use tc_core::frame::TextFrame;
/// use tc_core::traits::DisplaySink;
/// use tc_render::terminal::PlainSink;
///
/// let mut sink = PlainSink::new(Vec::new());
/// let mut frame = TextFrame::with_capacity(1, 1);
/// frame.push_line("@".into());
/// sink.clear_and_print(&frame).unwrap();
/// assert_eq!(sink.into_inner(), b"@\n\n");
/// ```
pub struct PlainSink<W: Write> {
    out: W,
}

impl<W: Write> PlainSink<W> {
    /// Wrap `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DisplaySink for PlainSink<W> {
    fn clear_and_print(&mut self, frame: &TextFrame) -> io::Result<()> {
        frame.write_to(&mut self.out)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(lines: &[&str]) -> TextFrame {
        let width = lines.first().map_or(0, |l| l.len());
        let mut f = TextFrame::with_capacity(lines.len(), width);
        for l in lines {
            f.push_line((*l).to_string());
        }
        f
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn clears_before_printing() {
        let mut sink = TerminalSink::new(Vec::new()).unwrap();
        sink.clear_and_print(&frame(&[" =@", ":*@"])).unwrap();
        let out = sink.get_ref();
        let clear = out
            .windows(4)
            .position(|w| w == b"\x1b[2J")
            .expect("séquence d'effacement");
        let text = out
            .windows(8)
            .position(|w| w == b" =@\n:*@\n")
            .expect("texte de la frame");
        assert!(clear < text);
    }

    #[test]
    fn hides_cursor_then_restores_it() {
        let mut buf = Vec::new();
        {
            let sink = TerminalSink::new(&mut buf).unwrap();
            assert!(contains(sink.get_ref(), b"\x1b[?25l"));
        }
        assert!(contains(&buf, b"\x1b[?25h"));
    }

    #[test]
    fn each_frame_clears_again() {
        let mut sink = TerminalSink::new(Vec::new()).unwrap();
        sink.clear_and_print(&frame(&["@"])).unwrap();
        sink.clear_and_print(&frame(&["."])).unwrap();
        let clears = sink
            .get_ref()
            .windows(4)
            .filter(|w| *w == b"\x1b[2J")
            .count();
        assert_eq!(clears, 2);
    }

    #[test]
    fn plain_empty_frame_is_a_blank_line() {
        let mut sink = PlainSink::new(Vec::new());
        sink.clear_and_print(&TextFrame::default()).unwrap();
        assert_eq!(sink.into_inner(), b"\n");
    }
}
