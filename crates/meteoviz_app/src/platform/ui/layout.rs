use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub const SIDEBAR_WIDTH: u16 = 36;
const SEARCH_HEIGHT: u16 = 3;
const FILTERS_HEIGHT: u16 = 5;

/// Screen regions for one frame. Sidebar regions are absent when it is hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Areas {
    pub sidebar: Option<Sidebar>,
    pub image: Rect,
    pub status: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sidebar {
    pub search: Rect,
    pub tree: Rect,
    pub filters: Rect,
}

pub fn split(area: Rect, sidebar_open: bool, fullscreen: bool) -> Areas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let (content, status) = (rows[0], rows[1]);

    if fullscreen || !sidebar_open {
        return Areas {
            sidebar: None,
            image: content,
            status,
        };
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(content);

    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(SEARCH_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(FILTERS_HEIGHT),
        ])
        .split(columns[0]);

    Areas {
        sidebar: Some(Sidebar {
            search: sidebar[0],
            tree: sidebar[1],
            filters: sidebar[2],
        }),
        image: columns[1],
        status,
    }
}
