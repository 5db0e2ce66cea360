//! Drawing of the whole page

mod canvas;
mod toasts;

pub use canvas::{CELL_PX, PageCanvas};
pub use toasts::render_toasts;

use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Tabs, Wrap};

use crate::app::{App, ReportAction, Section};
use crate::chat::{Author, VoiceState, WAVE_BARS};
use crate::demo_form::{Field, SubmitState};
use crate::sample_report::SAMPLES;

const PRIMARY: Color = Color::Rgb(0x63, 0x66, 0xf1);
const SUCCESS: Color = Color::Rgb(0x10, 0xb9, 0x81);
const DANGER: Color = Color::Rgb(0xef, 0x44, 0x44);
const MUTED: Color = Color::Rgb(0x9c, 0xa3, 0xaf);

pub fn draw(f: &mut Frame, app: &App, now: Instant) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_nav(f, chunks[0], app);
    match app.section {
        Section::Viewer => render_viewer(f, chunks[1], app),
        Section::Chat => render_chat(f, chunks[1], app, now),
        Section::Demo => render_demo(f, chunks[1], app),
        Section::Reports => render_reports(f, chunks[1], app, now),
        Section::Install => render_install(f, chunks[1], app, now),
    }
    render_help_bar(f, chunks[2], app);

    render_toasts(f.buffer_mut(), chunks[1], app.notifications.all(), now);
}

fn section_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(PRIMARY))
        .title(Span::styled(
            format!(" {title} "),
            Style::default().add_modifier(Modifier::BOLD),
        ))
}

fn render_nav(f: &mut Frame, area: Rect, app: &App) {
    let titles = Section::ALL.iter().map(|s| s.title());
    let tabs = Tabs::new(titles)
        .select(app.section.index())
        .highlight_style(Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(" Inti Cash Bot "),
        );
    f.render_widget(tabs, area);
}

fn render_help_bar(f: &mut Frame, area: Rect, app: &App) {
    let help = if app.path_prompt().is_some() {
        "Enter: Abrir | Esc: Cancelar"
    } else {
        match app.section {
            Section::Viewer => "o: Abrir PDF | ←/→: Página | +/-: Zoom | Tab: Sección | q: Salir",
            Section::Chat => "Enter: Enviar | Ctrl+R: Grabar voz | Ctrl+P: Reproducir | Tab: Sección",
            Section::Demo => "↑/↓: Campo | Enter: Enviar solicitud | Tab: Sección",
            Section::Reports => "↑/↓: Acción | ←/→: Ejemplo | Enter: Ejecutar | q: Salir",
            Section::Install => "↑/↓: Paso | Enter/c: Copiar | q: Salir",
        }
    };
    f.render_widget(Paragraph::new(help).fg(MUTED), area);
}

fn render_viewer(f: &mut Frame, area: Rect, app: &App) {
    let snapshot = app.viewer().snapshot();
    let title = if app.viewer().is_busy() {
        "Visor PDF · Cargando..."
    } else {
        "Visor PDF"
    };
    let block = section_block(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut constraints = vec![Constraint::Length(1), Constraint::Min(0)];
    if app.path_prompt().is_some() {
        constraints.insert(0, Constraint::Length(3));
    }
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);
    let (status_area, page_area) = if let Some(input) = app.path_prompt() {
        let prompt = Paragraph::new(format!("{input}█")).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Archivo PDF "),
        );
        f.render_widget(prompt, rows[0]);
        (rows[1], rows[2])
    } else {
        (rows[0], rows[1])
    };

    let nav_style = |enabled: bool| {
        if enabled {
            Style::default().fg(PRIMARY)
        } else {
            Style::default().fg(MUTED).add_modifier(Modifier::DIM)
        }
    };

    match (snapshot.page_label(), snapshot.surface.as_ref()) {
        (Some(page_label), Some(surface)) => {
            let status = Line::from(vec![
                Span::styled("◀ ", nav_style(snapshot.can_go_previous())),
                Span::raw(page_label),
                Span::styled(" ▶", nav_style(snapshot.can_go_next())),
                Span::raw("   "),
                Span::styled("− ", nav_style(snapshot.can_zoom_out())),
                Span::styled(snapshot.zoom_label(), Style::default().bold()),
                Span::styled(" +", nav_style(snapshot.can_zoom_in())),
            ]);
            f.render_widget(Paragraph::new(status).alignment(Alignment::Center), status_area);
            f.render_widget(PageCanvas::new(surface), page_area);
        }
        _ => {
            let placeholder = Paragraph::new(vec![
                Line::from(""),
                Line::from("📄 Sube tu reporte PDF para verlo aquí").bold(),
                Line::from("Presiona o para elegir un archivo").fg(MUTED),
            ])
            .alignment(Alignment::Center);
            f.render_widget(placeholder, page_area);
        }
    }
}

fn render_chat(f: &mut Frame, area: Rect, app: &App, now: Instant) {
    let chat = app.chat();
    let block = section_block("Inti Bot · en línea");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(inner);

    let mut lines: Vec<Line> = Vec::new();
    for message in chat.visible_messages() {
        let (alignment, color) = match message.author {
            Author::Bot => (Alignment::Left, Color::Rgb(0xf3, 0xf4, 0xf6)),
            Author::User => (Alignment::Right, Color::Rgb(0xdc, 0xf8, 0xc6)),
        };
        if message.voice {
            let lit = chat.highlighted_bars(now);
            let mut spans = vec![Span::raw(if chat.is_playing(now) { "⏸ " } else { "▶ " })];
            spans.extend((0..WAVE_BARS).map(|i| {
                let bar = ["▂", "▄", "▆", "▃"][i % 4];
                if lit.contains(&i) {
                    Span::styled(bar, Style::default().fg(PRIMARY).bold())
                } else {
                    Span::styled(bar, Style::default().fg(MUTED))
                }
            }));
            lines.push(Line::from(spans).alignment(alignment));
            lines.push(Line::from(message.text.clone()).fg(MUTED).alignment(alignment));
        } else {
            lines.push(
                Line::from(Span::styled(message.text.clone(), Style::default().fg(color)))
                    .alignment(alignment),
            );
        }
        lines.push(Line::from(message.time.clone()).fg(MUTED).alignment(alignment));
    }
    if chat.is_typing(now) {
        lines.push(Line::from("Inti está escribiendo ...").fg(MUTED).italic());
    }
    let overflow = (lines.len() as u16).saturating_sub(rows[0].height);
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((overflow, 0)),
        rows[0],
    );

    let (mic, mic_style) = match chat.voice() {
        VoiceState::Recording { .. } => ("● Grabando", Style::default().fg(DANGER).bold()),
        _ => ("🎤", Style::default().fg(PRIMARY)),
    };
    let input = Paragraph::new(format!("{}█", chat.input())).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(" Escribe un mensaje ")
            .title_bottom(Line::from(Span::styled(mic, mic_style)).right_aligned()),
    );
    f.render_widget(input, rows[1]);
}

fn render_demo(f: &mut Frame, area: Rect, app: &App) {
    let form = app.demo();
    let block = section_block("Solicita tu demo gratuita");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines = Vec::new();
    for field in Field::ALL {
        let focused = form.focus() == field && form.is_editable();
        let marker = if focused { "› " } else { "  " };
        let value = form.request().value(field);
        let cursor = if focused { "█" } else { "" };
        let label_style = if focused {
            Style::default().fg(PRIMARY).bold()
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{:<18}", field.label()), label_style),
            Span::raw(format!("{value}{cursor}")),
        ]));
    }
    lines.push(Line::from(""));
    for error in form.errors() {
        lines.push(Line::from(format!("  ⚠ {error}")).fg(DANGER));
    }

    let button_style = match form.state() {
        SubmitState::Editing => Style::default().fg(Color::White).bg(PRIMARY),
        SubmitState::Sending { .. } => Style::default().fg(Color::White).bg(MUTED),
        SubmitState::Sent { .. } => Style::default().fg(Color::White).bg(SUCCESS),
    };
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("  {}  ", form.button_label()),
        button_style.bold(),
    )));
    if let Some(message) = form.success_message() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            message,
            Style::default().fg(Color::White).bg(SUCCESS),
        )));
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn render_reports(f: &mut Frame, area: Rect, app: &App, now: Instant) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let actions: Vec<Line> = ReportAction::ALL
        .iter()
        .map(|action| {
            if *action == app.selected_report_action() {
                Line::from(format!("› {}", action.label())).fg(PRIMARY).bold()
            } else {
                Line::from(format!("  {}", action.label()))
            }
        })
        .collect();
    let mut link = vec![Line::from(""), Line::from(app.report().url()).fg(MUTED)];
    let mut lines = actions;
    lines.append(&mut link);
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(section_block("Reportes")),
        columns[0],
    );

    let sample = &SAMPLES[app.selected_sample()];
    let mut card = section_block(sample.title);
    if app.is_report_pulsing(now) {
        card = card
            .border_type(BorderType::Thick)
            .border_style(Style::default().fg(SUCCESS).bold());
    }
    let row = |label: &str, value: &str| {
        Line::from(vec![
            Span::styled(format!("{label:<10}"), Style::default().fg(MUTED)),
            Span::raw(value.to_string()),
        ])
    };
    let details = vec![
        Line::from("CIERRE DE CAJA · Inti Cash Bot").bold(),
        Line::from(""),
        row("Fecha", sample.date),
        row("Ventas", sample.sales),
        row("Gastos", sample.expenses),
        Line::from(vec![
            Span::styled(format!("{:<10}", "Saldo"), Style::default().fg(MUTED)),
            Span::styled(sample.balance, Style::default().fg(SUCCESS).bold()),
        ]),
        Line::from(""),
        Line::from(format!("{}/{}", app.selected_sample() + 1, SAMPLES.len())).fg(MUTED),
    ];
    f.render_widget(Paragraph::new(details).block(card), columns[1]);
}

fn render_install(f: &mut Frame, area: Rect, app: &App, now: Instant) {
    let snippets = app.snippets();
    let block = section_block("Instalación");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines = Vec::new();
    for (i, snippet) in snippets.snippets().iter().enumerate() {
        let selected = i == snippets.selected();
        let title = Line::from(snippet.title);
        lines.push(if selected { title.fg(PRIMARY).bold() } else { title });
        let marker = if snippets.is_copied(i, now) {
            Span::styled(" ✓", Style::default().fg(SUCCESS).bold())
        } else {
            Span::styled(" ⧉", Style::default().fg(MUTED))
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("  $ {}", snippet.code),
                Style::default().fg(Color::White).bg(Color::Rgb(0x1f, 0x29, 0x37)),
            ),
            marker,
        ]));
        lines.push(Line::from(""));
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
