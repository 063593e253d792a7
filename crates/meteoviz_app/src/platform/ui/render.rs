use meteoviz_core::{AppViewModel, ImagePanel, ImageStatus, NodeKind, TreeRowView};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::keys::KEY_HINTS;
use super::layout::{self, Sidebar};
use crate::platform::theme::Palette;

pub fn render(frame: &mut Frame, view: &AppViewModel, palette: &Palette) {
    let areas = layout::split(frame.area(), view.sidebar_open, view.fullscreen);
    let base = Style::new().fg(palette.text).bg(palette.background);
    frame.render_widget(Block::new().style(base), frame.area());

    if let Some(sidebar) = areas.sidebar {
        render_sidebar(frame, view, palette, sidebar);
    }
    render_image_panel(frame, view, palette, areas.image);
    render_status(frame, view, palette, areas.status);
}

fn render_sidebar(frame: &mut Frame, view: &AppViewModel, palette: &Palette, sidebar: Sidebar) {
    let border = if view.search_focused {
        Style::new().fg(palette.accent)
    } else {
        Style::new().fg(palette.muted)
    };
    let cursor = if view.search_focused { "_" } else { "" };
    let search = Paragraph::new(format!("{}{cursor}", view.search_term)).block(
        Block::bordered()
            .title(" Search (/) ")
            .border_style(border),
    );
    frame.render_widget(search, sidebar.search);

    let items: Vec<ListItem> = view.rows.iter().map(|row| tree_item(row, palette)).collect();
    let tree = List::new(items)
        .block(Block::bordered().title(" Products "))
        .highlight_style(Style::new().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(view.cursor);
    frame.render_stateful_widget(tree, sidebar.tree, &mut state);

    let filters = &view.filters;
    let lines = vec![
        filter_line("Date ", filters.date.format("%Y-%m-%d").to_string(), palette),
        filter_line("Hour ", format!("+{}h", filters.hour), palette),
        filter_line("Level", filters.level.to_string(), palette),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(Block::bordered().title(" Filters ")),
        sidebar.filters,
    );
}

fn tree_item<'a>(row: &'a TreeRowView, palette: &Palette) -> ListItem<'a> {
    let marker = match (row.expandable, row.expanded) {
        (true, true) => "▾ ",
        (true, false) => "▸ ",
        (false, _) => "  ",
    };
    let mut style = match row.kind {
        NodeKind::Product => Style::new().add_modifier(Modifier::BOLD),
        NodeKind::Category => Style::new(),
        NodeKind::Variable => Style::new().fg(palette.muted),
    };
    if row.selected {
        style = style.fg(palette.selection).add_modifier(Modifier::BOLD);
    }
    ListItem::new(Line::from(vec![
        Span::raw("  ".repeat(row.depth)),
        Span::raw(marker),
        Span::styled(row.name.as_str(), style),
    ]))
}

fn filter_line(label: &'static str, value: String, palette: &Palette) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label}  "), Style::new().fg(palette.muted)),
        Span::styled(value, Style::new().fg(palette.accent)),
    ])
}

fn render_image_panel(frame: &mut Frame, view: &AppViewModel, palette: &Palette, area: Rect) {
    let (title, lines) = match &view.panel {
        ImagePanel::Welcome => (
            " MeteoViz ".to_string(),
            vec![
                Line::styled("Welcome to MeteoViz", Style::new().fg(palette.accent).add_modifier(Modifier::BOLD)),
                Line::default(),
                Line::raw("Select a forecast product from the tree to view its chart."),
                Line::raw("Refine it by date, forecast hour and pressure level."),
            ],
        ),
        ImagePanel::Loading { node_name } => (
            " Loading ".to_string(),
            vec![
                Line::styled(format!("Loading {node_name}..."), Style::new().fg(palette.accent)),
                Line::raw("Fetching forecast data"),
            ],
        ),
        ImagePanel::Ready { image, status } => {
            let title = format!(" {} ", view.caption().unwrap_or_default());
            let mut lines = match status {
                ImageStatus::Pending => vec![Line::raw("Fetching image...")],
                ImageStatus::Displayed(details) => vec![
                    detail_line("Format ", details.format.to_uppercase(), palette),
                    detail_line("Size   ", format!("{} x {} px", details.width, details.height), palette),
                    detail_line("Bytes  ", details.byte_len.to_string(), palette),
                ],
                ImageStatus::Unavailable { reason } => {
                    let mut lines: Vec<Line> =
                        view.placeholder_summary().into_iter().map(Line::raw).collect();
                    lines.push(Line::default());
                    lines.push(Line::styled(
                        format!("Image not available: {reason}"),
                        Style::new().fg(palette.error),
                    ));
                    lines
                }
            };
            lines.push(Line::default());
            lines.push(detail_line("Source ", image.url.clone(), palette));
            lines.push(detail_line("Save as", image.filename.clone(), palette));
            (title, lines)
        }
    };

    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::bordered().title(title));
    frame.render_widget(panel, area);
}

fn detail_line(label: &'static str, value: String, palette: &Palette) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label}  "), Style::new().fg(palette.muted)),
        Span::raw(value),
    ])
}

fn render_status(frame: &mut Frame, view: &AppViewModel, palette: &Palette, area: Rect) {
    let text = view.status.as_deref().unwrap_or(KEY_HINTS);
    let status = Paragraph::new(text).style(Style::new().fg(palette.text).bg(palette.status_bg));
    frame.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::theme::ThemeMode;
    use chrono::NaiveDate;
    use meteoviz_core::{update, AppState, ImageDetails, Msg};
    use ratatui::{backend::TestBackend, Terminal};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 16).unwrap()
    }

    fn draw(view: &AppViewModel) -> String {
        let backend = TestBackend::new(120, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let palette = Palette::for_mode(ThemeMode::Dark);
        terminal.draw(|frame| render(frame, view, &palette)).unwrap();

        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn ready_state(node_id: &str) -> AppState {
        let state = AppState::new(today());
        let (state, _) = update(state, Msg::NodeSelected(node_id.to_string()));
        let token = state.current_token();
        let (state, _) = update(state, Msg::LoadDelayElapsed { token });
        state
    }

    #[test]
    fn welcome_panel_and_tree_on_start() {
        let view = AppState::new(today()).view();
        let screen = draw(&view);
        assert!(screen.contains("Welcome to MeteoViz"));
        assert!(screen.contains(&view.rows[0].name));
        assert!(screen.contains("2025-07-16"));
        assert!(screen.contains("1000hPa"));
    }

    #[test]
    fn loading_panel_names_the_node() {
        let state = AppState::new(today());
        let (state, _) = update(state, Msg::NodeSelected("gfs-wind-speed".to_string()));
        let screen = draw(&state.view());
        assert!(screen.contains("Loading Wind Speed..."));
    }

    #[test]
    fn displayed_image_shows_caption_and_details() {
        let state = ready_state("gfs-wind-speed");
        let token = state.current_token();
        let (state, _) = update(
            state,
            Msg::ImageLoaded {
                token,
                details: ImageDetails {
                    format: "png".to_string(),
                    width: 800,
                    height: 600,
                    byte_len: 2048,
                },
            },
        );
        let screen = draw(&state.view());
        assert!(screen.contains("Wind Speed | Jul 16, 2025 | +0h | 1000hPa"));
        assert!(screen.contains("800 x 600 px"));
        assert!(screen.contains("Wind_Speed_2025-07-16_0h_1000hPa.png"));
    }

    #[test]
    fn failed_image_shows_placeholder_summary() {
        let state = ready_state("gfs-precip-total");
        let token = state.current_token();
        let (state, _) = update(
            state,
            Msg::ImageFailed {
                token,
                reason: "http status 404".to_string(),
            },
        );
        let screen = draw(&state.view());
        assert!(screen.contains("Selected: Total Precipitation"));
        assert!(screen.contains("Hour: +0 hours"));
        assert!(screen.contains("Image not available: http status 404"));
    }

    #[test]
    fn hidden_sidebar_drops_tree() {
        let state = AppState::new(today());
        let (state, _) = update(state, Msg::SidebarToggled);
        let screen = draw(&state.view());
        assert!(!screen.contains("Products"));
        assert!(screen.contains("Welcome to MeteoViz"));
    }
}
