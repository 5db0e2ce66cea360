use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{debug, info, warn};
use ratatui::Terminal;

use crate::chat::ChatMockup;
use crate::clipboard::{ClipboardAccess, FallbackClipboard};
use crate::demo_form::DemoForm;
use crate::event_source::EventSource;
use crate::keymap::{ViewerAction, viewer_action};
use crate::notification::NotificationManager;
use crate::sample_report::{ReportCardPulse, SAMPLES, SampleReport};
use crate::settings;
use crate::snippets::SnippetList;
use crate::system_command::{RealSystemCommandExecutor, SystemCommandExecutor};
use crate::ui;
use crate::viewer::{SourceFile, ViewerService};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Quit,
}

/// Top-level page sections, in navigation bar order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Viewer,
    Chat,
    Demo,
    Reports,
    Install,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Viewer,
        Section::Chat,
        Section::Demo,
        Section::Reports,
        Section::Install,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::Viewer => "Visor PDF",
            Section::Chat => "Chat",
            Section::Demo => "Demo",
            Section::Reports => "Reportes",
            Section::Install => "Instalación",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Sections whose printable keys go into a text field
    fn captures_text(self) -> bool {
        matches!(self, Section::Chat | Section::Demo)
    }
}

/// Actions on the sample report card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportAction {
    Download,
    Share,
    CopyLink,
    Print,
    Preview,
}

impl ReportAction {
    pub const ALL: [ReportAction; 5] = [
        ReportAction::Download,
        ReportAction::Share,
        ReportAction::CopyLink,
        ReportAction::Print,
        ReportAction::Preview,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ReportAction::Download => "Descargar",
            ReportAction::Share => "Compartir",
            ReportAction::CopyLink => "Copiar enlace",
            ReportAction::Print => "Imprimir",
            ReportAction::Preview => "Vista previa",
        }
    }
}

pub struct App {
    pub section: Section,
    viewer: ViewerService,
    /// Path being typed after `o`; `None` when the prompt is closed
    path_prompt: Option<String>,
    pub notifications: NotificationManager,
    chat: ChatMockup,
    demo: DemoForm,
    snippets: SnippetList,
    report: SampleReport,
    report_action: usize,
    sample: usize,
    report_pulse: ReportCardPulse,
    clipboard: Box<dyn ClipboardAccess>,
    pub system_command_executor: Box<dyn SystemCommandExecutor>,
}

impl App {
    /// App wired to the desktop clipboard and system opener
    pub fn new(viewer: ViewerService, report: SampleReport) -> Self {
        Self::new_with_services(
            viewer,
            report,
            Box::new(FallbackClipboard::system()),
            Box::new(RealSystemCommandExecutor),
            Instant::now(),
        )
    }

    #[cfg(any(test, feature = "test-utils"))]
    pub fn new_with_mocks(
        viewer: ViewerService,
        report: SampleReport,
        clipboard: crate::clipboard::RecordingClipboard,
        system_executor: crate::system_command::MockSystemCommandExecutor,
    ) -> Self {
        Self::new_with_services(
            viewer,
            report,
            Box::new(clipboard),
            Box::new(system_executor),
            Instant::now(),
        )
    }

    pub fn new_with_services(
        viewer: ViewerService,
        report: SampleReport,
        clipboard: Box<dyn ClipboardAccess>,
        system_executor: Box<dyn SystemCommandExecutor>,
        now: Instant,
    ) -> Self {
        let notifications = NotificationManager::with_config(
            settings::get_notification_duration(),
            settings::get_max_notifications(),
        );
        Self {
            section: Section::Viewer,
            viewer,
            path_prompt: None,
            notifications,
            chat: ChatMockup::new(now),
            demo: DemoForm::new(),
            snippets: SnippetList::default(),
            report,
            report_action: 0,
            sample: 0,
            report_pulse: ReportCardPulse::default(),
            clipboard,
            system_command_executor: system_executor,
        }
    }

    pub fn viewer(&self) -> &ViewerService {
        &self.viewer
    }

    pub fn chat(&self) -> &ChatMockup {
        &self.chat
    }

    pub fn demo(&self) -> &DemoForm {
        &self.demo
    }

    pub fn snippets(&self) -> &SnippetList {
        &self.snippets
    }

    pub fn report(&self) -> &SampleReport {
        &self.report
    }

    pub fn clipboard(&self) -> &dyn ClipboardAccess {
        self.clipboard.as_ref()
    }

    pub fn path_prompt(&self) -> Option<&str> {
        self.path_prompt.as_deref()
    }

    pub fn selected_report_action(&self) -> ReportAction {
        ReportAction::ALL[self.report_action]
    }

    pub fn selected_sample(&self) -> usize {
        self.sample
    }

    pub fn is_report_pulsing(&self, now: Instant) -> bool {
        self.report_pulse.is_active(now)
    }

    /// Queue a file for the viewer
    pub fn open_file(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        info!("Opening {}", path.display());
        self.section = Section::Viewer;
        self.viewer
            .load(SourceFile::from_path(path), &mut self.notifications);
    }

    /// Wait for the viewer worker to answer everything queued so far
    pub fn settle_viewer(&mut self, timeout: Duration) -> bool {
        self.viewer.settle(&mut self.notifications, timeout)
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<AppAction> {
        self.handle_key_event_at(key, Instant::now())
    }

    pub fn handle_key_event_at(&mut self, key: KeyEvent, now: Instant) -> Option<AppAction> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            return Some(AppAction::Quit);
        }

        if self.path_prompt.is_some() {
            self.handle_prompt_key(key);
            return None;
        }

        match key.code {
            KeyCode::Tab => {
                self.section = self.section.next();
                return None;
            }
            KeyCode::BackTab => {
                self.section = self.section.previous();
                return None;
            }
            KeyCode::Esc => {
                self.notifications.dismiss_current();
                return None;
            }
            _ => {}
        }

        if !self.section.captures_text() {
            match key.code {
                KeyCode::Char('q') => return Some(AppAction::Quit),
                KeyCode::Char('o') => {
                    self.section = Section::Viewer;
                    self.path_prompt = Some(String::new());
                    return None;
                }
                KeyCode::Char('v') => {
                    self.run_report_action(ReportAction::Preview, now);
                    return None;
                }
                _ => {}
            }
        }

        match self.section {
            Section::Viewer => self.handle_viewer_key(&key),
            Section::Chat => self.handle_chat_key(key, now),
            Section::Demo => self.handle_demo_key(key, now),
            Section::Reports => self.handle_reports_key(key, now),
            Section::Install => self.handle_install_key(key, now),
        }
        None
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let Some(input) = self.path_prompt.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.path_prompt = None,
            KeyCode::Enter => {
                let path = input.trim().to_string();
                self.path_prompt = None;
                if !path.is_empty() {
                    self.open_file(path);
                }
            }
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) => input.push(c),
            _ => {}
        }
    }

    fn handle_viewer_key(&mut self, key: &KeyEvent) {
        let Some(action) = viewer_action(key) else {
            return;
        };
        if !self.viewer.snapshot().is_loaded() {
            debug!("Ignoring {action:?}: no document loaded");
            return;
        }
        match action {
            ViewerAction::Page(step) => {
                self.viewer.step_page(step);
            }
            ViewerAction::Zoom(step) => {
                self.viewer.step_zoom(step);
            }
        }
    }

    fn handle_chat_key(&mut self, key: KeyEvent, now: Instant) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('r') if ctrl => self.chat.toggle_voice(now),
            KeyCode::Char('p') if ctrl => self.chat.play(now),
            KeyCode::Char(c) if !ctrl => self.chat.push_char(c),
            KeyCode::Backspace => self.chat.backspace(),
            KeyCode::Enter => {
                self.chat.send(now);
            }
            _ => {}
        }
    }

    fn handle_demo_key(&mut self, key: KeyEvent, now: Instant) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Up => self.demo.focus_previous(),
            KeyCode::Down => self.demo.focus_next(),
            KeyCode::Char(c) if !ctrl => self.demo.push_char(c),
            KeyCode::Backspace => self.demo.backspace(),
            KeyCode::Enter => {
                if let Err(e) = self.demo.submit(now) {
                    self.notifications.warn(e.to_string());
                }
            }
            _ => {}
        }
    }

    fn handle_reports_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.report_action = self.report_action.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.report_action + 1 < ReportAction::ALL.len() {
                    self.report_action += 1;
                }
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.sample = self.sample.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if self.sample + 1 < SAMPLES.len() {
                    self.sample += 1;
                }
            }
            KeyCode::Enter => self.run_report_action(self.selected_report_action(), now),
            _ => {}
        }
    }

    fn handle_install_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.snippets.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.snippets.select_next(),
            KeyCode::Enter | KeyCode::Char('c') => {
                self.snippets.copy_selected(
                    self.clipboard.as_mut(),
                    &mut self.notifications,
                    now,
                );
            }
            _ => {}
        }
    }

    pub fn run_report_action(&mut self, action: ReportAction, now: Instant) {
        debug!("Report action {action:?}");
        match action {
            ReportAction::Download => {
                self.report.download(&mut self.notifications);
            }
            ReportAction::Share => {
                self.report.share(
                    self.system_command_executor.as_ref(),
                    self.clipboard.as_mut(),
                    &mut self.notifications,
                );
            }
            ReportAction::CopyLink => {
                self.report
                    .copy_link(self.clipboard.as_mut(), &mut self.notifications);
            }
            ReportAction::Print => {
                self.report
                    .print(self.system_command_executor.as_ref(), &mut self.notifications);
            }
            ReportAction::Preview => {
                self.section = Section::Reports;
                if let Some(i) = ReportAction::ALL.iter().position(|a| *a == action) {
                    self.report_action = i;
                }
                self.report_pulse.start(now);
            }
        }
    }

    /// Advance timers and pull viewer results. Returns true if a redraw is
    /// needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = self.viewer.poll(&mut self.notifications);
        changed |= self.notifications.update_at(now);
        changed |= self.chat.tick(now);
        changed |= self.demo.tick(now);
        changed |= self.snippets.tick(now);
        changed |= self.report_pulse.tick(now);
        changed |= self.report_pulse.is_active(now);
        changed |= self.viewer.is_busy();
        changed |= self.notifications.has_notifications();
        changed
    }

    pub fn draw(&self, f: &mut ratatui::Frame) {
        ui::draw(f, self, Instant::now());
    }
}

pub fn run_app_with_event_source<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_source: &mut dyn EventSource,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let tick_rate = settings::get_tick_rate();
    let mut last_tick = Instant::now();
    let mut first_render = true;

    loop {
        let mut events_processed = 0;
        let mut should_quit = false;

        while event_source.poll(Duration::from_millis(0))? && events_processed < 50 {
            let event = event_source.read()?;
            events_processed += 1;
            match event {
                Event::Key(key) => {
                    if app.handle_key_event(key) == Some(AppAction::Quit) {
                        should_quit = true;
                        break;
                    }
                }
                Event::Resize(cols, rows) => debug!("Terminal resized to {cols}x{rows}"),
                _ => {}
            }
        }

        let mut needs_redraw = events_processed > 0 || first_render;
        first_render = false;

        if last_tick.elapsed() >= tick_rate {
            needs_redraw |= app.tick(Instant::now());
            last_tick = Instant::now();
        }

        if needs_redraw {
            terminal.draw(|f| app.draw(f))?;
        }

        if should_quit {
            info!("Quit requested");
            return Ok(());
        }

        if events_processed == 0 {
            let timeout = tick_rate
                .checked_sub(last_tick.elapsed())
                .unwrap_or_else(|| Duration::from_secs(0));
            if let Err(e) = event_source.poll(timeout) {
                warn!("Event poll failed: {e}");
            }
        }
    }
}
