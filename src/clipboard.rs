//! Clipboard access

use std::any::Any;
use std::io::Write;

use anyhow::{Context, Result, anyhow, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::warn;

pub trait ClipboardAccess {
    fn set_text(&mut self, text: &str) -> Result<()>;

    fn as_any(&self) -> &dyn Any;
}

/// The desktop clipboard
pub struct SystemClipboard;

impl ClipboardAccess for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| anyhow!("Failed to access clipboard: {e}"))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| anyhow!("Failed to copy to clipboard: {e}"))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Terminal clipboard via the OSC 52 escape sequence.
///
/// Works over SSH and in terminals without a desktop clipboard, as long as
/// the terminal honours OSC 52.
pub struct Osc52Clipboard<W: Write> {
    out: W,
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl Osc52Clipboard<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + 'static> ClipboardAccess for Osc52Clipboard<W> {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let payload = STANDARD.encode(text);
        write!(self.out, "\x1b]52;c;{payload}\x07").context("Failed to write OSC 52 sequence")?;
        self.out.flush().context("Failed to flush OSC 52 sequence")
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Tries `primary`, then `fallback` when the first one fails
pub struct FallbackClipboard<P, F> {
    primary: P,
    fallback: F,
}

impl<P: ClipboardAccess, F: ClipboardAccess> FallbackClipboard<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl FallbackClipboard<SystemClipboard, Osc52Clipboard<std::io::Stdout>> {
    /// Desktop clipboard with the terminal escape as a fallback
    pub fn system() -> Self {
        Self::new(SystemClipboard, Osc52Clipboard::stdout())
    }
}

impl<P, F> ClipboardAccess for FallbackClipboard<P, F>
where
    P: ClipboardAccess + 'static,
    F: ClipboardAccess + 'static,
{
    fn set_text(&mut self, text: &str) -> Result<()> {
        match self.primary.set_text(text) {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!("Clipboard unavailable ({e}), falling back to OSC 52");
                self.fallback.set_text(text)
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Keeps copied text in memory
#[derive(Debug, Default)]
pub struct RecordingClipboard {
    pub copied: Vec<String>,
    fail: bool,
}

impl RecordingClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard that refuses every write
    pub fn unavailable() -> Self {
        Self {
            copied: Vec::new(),
            fail: true,
        }
    }
}

impl ClipboardAccess for RecordingClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        if self.fail {
            bail!("clipboard unavailable");
        }
        self.copied.push(text.to_string());
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
