//! Scripted phone chat mockup
//!
//! Every animation is a deadline checked by `tick(now)`, so the whole mockup
//! can be driven from tests with synthetic instants.

use std::ops::Range;
use std::time::{Duration, Instant};

use chrono::Local;
use log::debug;

pub const BOT_REPLY: &str = "¡Perfecto! He registrado tu mensaje. ¿En qué más puedo ayudarte? 😊";

const INTRO_START: Duration = Duration::from_secs(1);
const INTRO_STEP: Duration = Duration::from_millis(800);
const INTRO_TYPING: Range<Duration> = Duration::from_secs(3)..Duration::from_secs(5);
const REPLY_DELAY: Duration = Duration::from_secs(2);
const RECORDING: Duration = Duration::from_secs(2);
const VOICE_TYPING: Duration = Duration::from_secs(3);
const PLAYBACK: Duration = Duration::from_secs(2);
const BAR_STEP: Duration = Duration::from_millis(100);
const BAR_HIGHLIGHT: Duration = Duration::from_millis(300);

pub const WAVE_BARS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    Bot,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub author: Author,
    pub text: String,
    /// Rendered as a voice note with a waveform
    pub voice: bool,
    /// Clock time shown under the bubble
    pub time: String,
}

impl ChatMessage {
    fn new(author: Author, text: &str, time: String) -> Self {
        Self {
            author,
            text: text.to_string(),
            voice: false,
            time,
        }
    }

    fn scripted(author: Author, text: &str, time: &str) -> Self {
        Self::new(author, text, time.to_string())
    }
}

fn clock_now() -> String {
    Local::now().format("%-I:%M %p").to_string()
}

fn intro_script() -> Vec<ChatMessage> {
    vec![
        ChatMessage::scripted(Author::Bot, "¡Hola! Soy Inti, tu asistente de caja 🤖", "9:15 AM"),
        ChatMessage::scripted(Author::User, "Vendí 3 menús a S/ 15 cada uno", "9:16 AM"),
        ChatMessage::scripted(Author::Bot, "Registrado: venta de S/ 45.00 ✅", "9:16 AM"),
        ChatMessage {
            voice: true,
            ..ChatMessage::scripted(Author::User, "Pagué S/ 20 de gas", "9:18 AM")
        },
        ChatMessage::scripted(
            Author::Bot,
            "Gasto de S/ 20.00 anotado. Saldo del día: S/ 25.00",
            "9:18 AM",
        ),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Idle,
    Recording { since: Instant },
    Typing { until: Instant },
}

#[derive(Debug)]
pub struct ChatMockup {
    started: Instant,
    intro: Vec<ChatMessage>,
    revealed: usize,
    conversation: Vec<ChatMessage>,
    input: String,
    reply_due: Option<Instant>,
    voice: VoiceState,
    playback_started: Option<Instant>,
}

impl ChatMockup {
    pub fn new(now: Instant) -> Self {
        Self {
            started: now,
            intro: intro_script(),
            revealed: 0,
            conversation: Vec::new(),
            input: String::new(),
            reply_due: None,
            voice: VoiceState::Idle,
            playback_started: None,
        }
    }

    /// Advance every timer. Returns true if anything visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;

        let elapsed = now.saturating_duration_since(self.started);
        let revealed = self.revealed_at(elapsed);
        if revealed != self.revealed {
            self.revealed = revealed;
            changed = true;
        }

        if self.reply_due.is_some_and(|due| now >= due) {
            self.reply_due = None;
            self.conversation
                .push(ChatMessage::new(Author::Bot, BOT_REPLY, clock_now()));
            changed = true;
        }

        match self.voice {
            VoiceState::Recording { since } if now >= since + RECORDING => {
                self.voice = VoiceState::Typing {
                    until: since + RECORDING + VOICE_TYPING,
                };
                changed = true;
            }
            VoiceState::Typing { until } if now >= until => {
                self.voice = VoiceState::Idle;
                changed = true;
            }
            _ => {}
        }

        if let Some(started) = self.playback_started {
            if now >= started + PLAYBACK {
                self.playback_started = None;
            }
            changed = true;
        }

        changed
    }

    fn revealed_at(&self, elapsed: Duration) -> usize {
        let Some(since_start) = elapsed.checked_sub(INTRO_START) else {
            return 0;
        };
        let steps = since_start.as_millis() / INTRO_STEP.as_millis();
        (steps as usize).min(self.intro.len())
    }

    /// Intro messages revealed so far followed by the live conversation
    pub fn visible_messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.intro[..self.revealed].iter().chain(self.conversation.iter())
    }

    pub fn is_typing(&self, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.started);
        INTRO_TYPING.contains(&elapsed)
            || self.reply_due.is_some()
            || matches!(self.voice, VoiceState::Typing { .. })
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// Send the typed message; blank input is ignored
    pub fn send(&mut self, now: Instant) -> bool {
        let message = self.input.trim();
        if message.is_empty() {
            return false;
        }
        debug!("Chat mockup: user sent {} chars", message.chars().count());
        self.conversation
            .push(ChatMessage::new(Author::User, message, clock_now()));
        self.input.clear();
        self.reply_due = Some(now + REPLY_DELAY);
        true
    }

    pub fn voice(&self) -> VoiceState {
        self.voice
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.voice, VoiceState::Recording { .. })
    }

    /// Start recording, or cancel a recording in progress
    pub fn toggle_voice(&mut self, now: Instant) {
        self.voice = match self.voice {
            VoiceState::Recording { .. } => VoiceState::Idle,
            _ => VoiceState::Recording { since: now },
        };
    }

    pub fn play(&mut self, now: Instant) {
        self.playback_started = Some(now);
    }

    pub fn is_playing(&self, now: Instant) -> bool {
        self.playback_started
            .is_some_and(|started| now < started + PLAYBACK)
    }

    /// Waveform bars lit at `now`: each lights 100 ms after the previous one
    /// and stays lit for 300 ms
    pub fn highlighted_bars(&self, now: Instant) -> Range<usize> {
        let Some(started) = self.playback_started else {
            return 0..0;
        };
        if !self.is_playing(now) {
            return 0..0;
        }
        let elapsed = now.saturating_duration_since(started).as_millis();
        let step = BAR_STEP.as_millis();
        let hold = BAR_HIGHLIGHT.as_millis();
        let first = if elapsed < hold {
            0
        } else {
            ((elapsed - hold) / step + 1) as usize
        };
        let end = ((elapsed / step + 1) as usize).min(WAVE_BARS);
        if first >= end {
            return 0..0;
        }
        first..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn intro_reveals_one_message_per_step() {
        let t0 = Instant::now();
        let mut chat = ChatMockup::new(t0);

        chat.tick(t0 + ms(999));
        assert_eq!(chat.visible_messages().count(), 0);

        chat.tick(t0 + ms(1800));
        assert_eq!(chat.visible_messages().count(), 1);

        chat.tick(t0 + ms(2600));
        assert_eq!(chat.visible_messages().count(), 2);

        chat.tick(t0 + ms(60_000));
        assert_eq!(chat.visible_messages().count(), 5);
    }

    #[test]
    fn sent_messages_carry_a_clock_time() {
        let t0 = Instant::now();
        let mut chat = ChatMockup::new(t0);
        chat.push_char('a');
        assert!(chat.send(t0));

        let time = &chat.visible_messages().last().unwrap().time;
        assert!(time.ends_with("AM") || time.ends_with("PM"), "{time}");
        assert!(time.contains(':'));
    }

    #[test]
    fn typing_indicator_between_three_and_five_seconds() {
        let t0 = Instant::now();
        let chat = ChatMockup::new(t0);
        assert!(!chat.is_typing(t0 + ms(2999)));
        assert!(chat.is_typing(t0 + ms(3000)));
        assert!(chat.is_typing(t0 + ms(4999)));
        assert!(!chat.is_typing(t0 + ms(5000)));
    }

    #[test]
    fn sending_adds_user_bubble_then_bot_reply() {
        let t0 = Instant::now();
        let mut chat = ChatMockup::new(t0);
        chat.tick(t0 + ms(10_000));
        let intro = chat.visible_messages().count();

        for c in "  hola  ".chars() {
            chat.push_char(c);
        }
        let sent_at = t0 + ms(10_000);
        assert!(chat.send(sent_at));
        assert_eq!(chat.input(), "");
        assert!(chat.is_typing(sent_at));

        let last = chat.visible_messages().last().unwrap();
        assert_eq!(last.author, Author::User);
        assert_eq!(last.text, "hola");

        assert!(!chat.tick(sent_at + ms(1999)));
        assert!(chat.tick(sent_at + ms(2000)));
        assert!(!chat.is_typing(sent_at + ms(2000)));
        assert_eq!(chat.visible_messages().count(), intro + 2);
        assert_eq!(chat.visible_messages().last().unwrap().text, BOT_REPLY);
    }

    #[test]
    fn blank_input_is_ignored() {
        let t0 = Instant::now();
        let mut chat = ChatMockup::new(t0);
        chat.push_char(' ');
        assert!(!chat.send(t0));
        assert!(chat.visible_messages().next().is_none());
    }

    #[test]
    fn voice_records_then_types() {
        let t0 = Instant::now();
        let mut chat = ChatMockup::new(t0);
        let start = t0 + ms(10_000);

        chat.toggle_voice(start);
        assert!(chat.is_recording());
        chat.tick(start + ms(1999));
        assert!(chat.is_recording());

        chat.tick(start + ms(2000));
        assert!(chat.is_typing(start + ms(2000)));

        chat.tick(start + ms(5000));
        assert_eq!(chat.voice(), VoiceState::Idle);
        assert!(!chat.is_typing(start + ms(5000)));
    }

    #[test]
    fn toggling_again_cancels_recording() {
        let t0 = Instant::now();
        let mut chat = ChatMockup::new(t0);
        chat.toggle_voice(t0);
        chat.toggle_voice(t0 + ms(500));
        assert_eq!(chat.voice(), VoiceState::Idle);
    }

    #[test]
    fn playback_sweeps_waveform_and_resets() {
        let t0 = Instant::now();
        let mut chat = ChatMockup::new(t0);
        chat.play(t0);

        assert_eq!(chat.highlighted_bars(t0), 0..1);
        assert_eq!(chat.highlighted_bars(t0 + ms(250)), 0..3);
        assert_eq!(chat.highlighted_bars(t0 + ms(500)), 3..6);
        assert!(chat.is_playing(t0 + ms(1999)));

        chat.tick(t0 + ms(2000));
        assert!(!chat.is_playing(t0 + ms(2000)));
        assert_eq!(chat.highlighted_bars(t0 + ms(2000)), 0..0);
    }
}
