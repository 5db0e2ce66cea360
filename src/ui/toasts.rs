//! Toast stack in the top-right corner

use std::time::Instant;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap};

use crate::notification::{Notification, ToastPhase};

const MAX_WIDTH: u16 = 46;

/// Draw toasts oldest on top. Entering and leaving toasts are shifted right
/// by the part of the slide not yet completed.
pub fn render_toasts(buf: &mut Buffer, area: Rect, toasts: &[Notification], now: Instant) {
    let width = MAX_WIDTH.min(area.width.saturating_sub(2));
    if width < 8 {
        return;
    }
    let text_width = usize::from(width - 4);
    let mut y = area.y + 1;

    // newest first in the manager
    for toast in toasts.iter().rev() {
        let phase = toast.phase_at(now);
        if phase == ToastPhase::Gone {
            continue;
        }
        let lines = toast.message.chars().count().div_ceil(text_width).max(1) as u16;
        let height = lines + 2;
        if y + height > area.bottom() {
            break;
        }

        let slide = ((1.0 - phase.visibility()) * f32::from(width + 1)).round() as u16;
        let x = area.right().saturating_sub(width + 1) + slide;
        if x < area.right() {
            let rect = Rect::new(x, y, width.min(area.right() - x), height);
            let (r, g, b) = toast.level.rgb();
            let accent = Color::Rgb(r, g, b);
            Clear.render(rect, buf);
            Paragraph::new(toast.message.as_str())
                .wrap(Wrap { trim: true })
                .style(Style::default().fg(Color::White).bg(accent))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(Style::default().fg(accent).add_modifier(Modifier::BOLD))
                        .style(Style::default().bg(accent))
                        .padding(ratatui::widgets::Padding::horizontal(1)),
                )
                .render(rect, buf);
        }
        y += height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::NotificationLevel;
    use std::time::Duration;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (buf.area.x..buf.area.right())
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn oldest_toast_is_drawn_first() {
        let t0 = Instant::now();
        let older = Notification::new_at("primero", NotificationLevel::Info, Duration::from_secs(3), t0);
        let newer =
            Notification::new_at("segundo", NotificationLevel::Error, Duration::from_secs(3), t0);
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);

        render_toasts(&mut buf, area, &[newer, older], t0 + Duration::from_secs(1));

        assert!(row_text(&buf, 2).contains("primero"));
        assert!(row_text(&buf, 5).contains("segundo"));
        let (r, g, b) = NotificationLevel::Error.rgb();
        let x = area.right() - 2;
        assert_eq!(buf[(x, 5)].bg, Color::Rgb(r, g, b));
    }

    #[test]
    fn entering_toast_is_off_screen() {
        let t0 = Instant::now();
        let toast = Notification::new_at("hola", NotificationLevel::Success, Duration::from_secs(3), t0);
        let area = Rect::new(0, 0, 60, 10);
        let mut buf = Buffer::empty(area);

        render_toasts(&mut buf, area, &[toast], t0);

        assert_eq!(buf, Buffer::empty(area));
    }
}
