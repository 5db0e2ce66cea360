//! Installation steps with copyable code blocks

use std::time::{Duration, Instant};

use log::error;

use crate::clipboard::ClipboardAccess;
use crate::notification::{NotificationLevel, Notifier};

pub const COPIED_MESSAGE: &str = "Código copiado al portapapeles";
pub const COPY_FAILED_MESSAGE: &str = "Error al copiar el código";

const COPY_FEEDBACK: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snippet {
    pub title: &'static str,
    pub code: &'static str,
}

pub const INSTALLATION_STEPS: [Snippet; 4] = [
    Snippet {
        title: "1. Clona el repositorio",
        code: "git clone https://github.com/inti-cash-bot/inti-bot.git && cd inti-bot",
    },
    Snippet {
        title: "2. Instala las dependencias",
        code: "npm install",
    },
    Snippet {
        title: "3. Configura tus credenciales",
        code: "cp .env.example .env",
    },
    Snippet {
        title: "4. Inicia el bot y escanea el código QR",
        code: "npm start",
    },
];

/// Selection and copy feedback for the installation list
#[derive(Debug)]
pub struct SnippetList {
    snippets: &'static [Snippet],
    selected: usize,
    copied: Option<(usize, Instant)>,
}

impl Default for SnippetList {
    fn default() -> Self {
        Self::new(&INSTALLATION_STEPS)
    }
}

impl SnippetList {
    pub fn new(snippets: &'static [Snippet]) -> Self {
        Self {
            snippets,
            selected: 0,
            copied: None,
        }
    }

    pub fn snippets(&self) -> &'static [Snippet] {
        self.snippets
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.snippets.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Copy the selected snippet, flipping its marker to a check on success
    pub fn copy_selected(
        &mut self,
        clipboard: &mut dyn ClipboardAccess,
        notifier: &mut dyn Notifier,
        now: Instant,
    ) -> bool {
        let Some(snippet) = self.snippets.get(self.selected) else {
            return false;
        };
        match clipboard.set_text(snippet.code) {
            Ok(()) => {
                self.copied = Some((self.selected, now + COPY_FEEDBACK));
                notifier.notify(COPIED_MESSAGE.to_string(), NotificationLevel::Success);
                true
            }
            Err(e) => {
                error!("Failed to copy snippet: {e:#}");
                notifier.notify(COPY_FAILED_MESSAGE.to_string(), NotificationLevel::Error);
                false
            }
        }
    }

    /// True while the copy marker of snippet `index` shows a check
    pub fn is_copied(&self, index: usize, now: Instant) -> bool {
        self.copied
            .is_some_and(|(copied, until)| copied == index && now < until)
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        if self.copied.is_some_and(|(_, until)| now >= until) {
            self.copied = None;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::RecordingClipboard;
    use crate::notification::Notice;

    #[test]
    fn copy_marks_snippet_for_two_seconds() {
        let t0 = Instant::now();
        let mut list = SnippetList::default();
        let mut clipboard = RecordingClipboard::new();
        let mut notices: Vec<Notice> = Vec::new();

        list.select_next();
        assert!(list.copy_selected(&mut clipboard, &mut notices, t0));

        assert_eq!(clipboard.copied, vec!["npm install"]);
        assert_eq!(notices[0].message, COPIED_MESSAGE);
        assert!(list.is_copied(1, t0 + Duration::from_millis(1999)));
        assert!(!list.is_copied(0, t0));

        assert!(list.tick(t0 + COPY_FEEDBACK));
        assert!(!list.is_copied(1, t0 + COPY_FEEDBACK));
    }

    #[test]
    fn copy_failure_toasts_error() {
        let mut list = SnippetList::default();
        let mut clipboard = RecordingClipboard::unavailable();
        let mut notices: Vec<Notice> = Vec::new();

        assert!(!list.copy_selected(&mut clipboard, &mut notices, Instant::now()));
        assert_eq!(notices[0].message, COPY_FAILED_MESSAGE);
        assert_eq!(notices[0].level, NotificationLevel::Error);
    }

    #[test]
    fn selection_is_clamped() {
        let mut list = SnippetList::default();
        list.select_previous();
        assert_eq!(list.selected(), 0);
        for _ in 0..10 {
            list.select_next();
        }
        assert_eq!(list.selected(), INSTALLATION_STEPS.len() - 1);
    }
}
