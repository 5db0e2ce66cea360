//! Key bindings for the PDF viewer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::viewer::{PageStep, ZoomStep};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerAction {
    Page(PageStep),
    Zoom(ZoomStep),
}

/// Arrow keys turn pages, `+`/`=` and `-` zoom
pub fn viewer_action(key: &KeyEvent) -> Option<ViewerAction> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }
    match key.code {
        KeyCode::Left => Some(ViewerAction::Page(PageStep::Previous)),
        KeyCode::Right => Some(ViewerAction::Page(PageStep::Next)),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(ViewerAction::Zoom(ZoomStep::In)),
        KeyCode::Char('-') => Some(ViewerAction::Zoom(ZoomStep::Out)),
        _ => None,
    }
}
