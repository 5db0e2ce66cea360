pub mod fake_backend;

pub mod test_helpers {
    use std::path::Path;

    use crate::app::App;
    use crate::clipboard::RecordingClipboard;
    use crate::event_source::{Event, KeyCode, SimulatedEventSource};
    use crate::sample_report::{SAMPLE_ASSET, SampleReport};
    use crate::system_command::MockSystemCommandExecutor;
    use crate::viewer::ViewerService;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::fake_backend::FakeBackend;

    /// Builder for creating test scenarios with simulated user input
    #[derive(Default)]
    pub struct TestScenarioBuilder {
        events: Vec<Event>,
    }

    impl TestScenarioBuilder {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn press_char(mut self, c: char) -> Self {
            self.events.push(SimulatedEventSource::char_key(c));
            self
        }

        pub fn press_ctrl_char(mut self, c: char) -> Self {
            self.events.push(SimulatedEventSource::ctrl_char_key(c));
            self
        }

        pub fn press_key(mut self, code: KeyCode) -> Self {
            self.events.push(SimulatedEventSource::key(code));
            self
        }

        pub fn press_enter(self) -> Self {
            self.press_key(KeyCode::Enter)
        }

        pub fn press_esc(self) -> Self {
            self.press_key(KeyCode::Esc)
        }

        /// Move to the next section
        pub fn press_tab(self) -> Self {
            self.press_key(KeyCode::Tab)
        }

        pub fn type_text(mut self, text: &str) -> Self {
            self.events.extend(SimulatedEventSource::typed(text));
            self
        }

        /// Open the path prompt, type `path` and confirm
        pub fn open_file(self, path: &Path) -> Self {
            self.press_char('o')
                .type_text(&path.to_string_lossy())
                .press_enter()
        }

        pub fn next_page(self) -> Self {
            self.press_key(KeyCode::Right)
        }

        pub fn prev_page(self) -> Self {
            self.press_key(KeyCode::Left)
        }

        pub fn zoom_in(self) -> Self {
            self.press_char('+')
        }

        pub fn zoom_out(self) -> Self {
            self.press_char('-')
        }

        pub fn quit(self) -> Self {
            self.press_ctrl_char('c')
        }

        pub fn events(&self) -> &[Event] {
            &self.events
        }

        pub fn build(self) -> SimulatedEventSource {
            SimulatedEventSource::new(self.events)
        }
    }

    /// App over the fake document backend, with a recording clipboard and
    /// opener. The sample report lives in `dir`.
    pub fn create_test_app(dir: &Path) -> App {
        let report = SampleReport::new(
            dir.join(SAMPLE_ASSET),
            "https://inti.test",
            dir.join("descargas"),
        );
        App::new_with_mocks(
            ViewerService::spawn(FakeBackend::new),
            report,
            RecordingClipboard::new(),
            MockSystemCommandExecutor::new(),
        )
    }

    /// Text copied through the app's clipboard so far
    pub fn copied_text(app: &App) -> Vec<String> {
        app.clipboard()
            .as_any()
            .downcast_ref::<RecordingClipboard>()
            .map(|c| c.copied.clone())
            .unwrap_or_default()
    }

    /// Targets handed to the app's system opener so far
    pub fn opened_targets(app: &App) -> Vec<String> {
        app.system_command_executor
            .as_any()
            .downcast_ref::<MockSystemCommandExecutor>()
            .map(MockSystemCommandExecutor::get_executed_commands)
            .unwrap_or_default()
    }

    pub fn create_test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
        let backend = TestBackend::new(width, height);
        Terminal::new(backend).unwrap()
    }

    /// Capture the current terminal buffer as a string
    pub fn capture_terminal_state(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut lines = Vec::new();

        for y in 0..buffer.area.height {
            let mut line = String::new();
            for x in 0..buffer.area.width {
                line.push_str(buffer[(x, y)].symbol());
            }
            lines.push(line.trim_end().to_string());
        }

        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::test_helpers::*;
    use std::path::Path;

    #[test]
    fn test_scenario_builder() {
        let scenario = TestScenarioBuilder::new()
            .open_file(Path::new("a.pdf"))
            .next_page()
            .zoom_in()
            .quit();

        // o + 5 chars + Enter + Right + '+' + Ctrl+C
        assert_eq!(scenario.events().len(), 10);
    }
}
