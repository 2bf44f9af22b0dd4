use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus};
use crate::nav::Section;
use crate::store::PreferenceStore;
use crate::theme::Palette;
use crate::view::{CardView, GridView};

const CARD_HEIGHT: u16 = 7;
const TWO_COLUMN_WIDTH: u16 = 100;
const NAV_MENU_WIDTH: u16 = 18;

#[derive(Clone, Copy)]
struct UiLayout {
    header_area: Rect,
    search_area: Option<Rect>,
    tags_area: Option<Rect>,
    main_area: Rect,
    footer_area: Rect,
}

fn compute_ui_layout(size: Rect, show_filters: bool, tag_rows: u16) -> UiLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(4),
        ])
        .split(size);
    if !show_filters {
        return UiLayout {
            header_area: chunks[0],
            search_area: None,
            tags_area: None,
            main_area: chunks[1],
            footer_area: chunks[2],
        };
    }
    let body = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(tag_rows.max(1) + 2),
            Constraint::Min(1),
        ])
        .split(chunks[1]);
    UiLayout {
        header_area: chunks[0],
        search_area: Some(body[0]),
        tags_area: Some(body[1]),
        main_area: body[2],
        footer_area: chunks[2],
    }
}

pub fn draw<S: PreferenceStore>(frame: &mut Frame, app: &App<S>, year: i32) {
    let palette = app.theme().palette();
    let size = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(palette.background).fg(palette.text)),
        size,
    );

    let show_filters = app.section() == Section::Projects;
    let tag_lines = build_tag_filter_lines(app, size.width.saturating_sub(2) as usize, palette);
    let ui = compute_ui_layout(size, show_filters, tag_lines.len() as u16);

    render_header(frame, ui.header_area, app, palette);
    if let Some(area) = ui.search_area {
        render_search(frame, area, app, palette);
    }
    if let Some(area) = ui.tags_area {
        let focused = app.focus() == Focus::Tags;
        let tags = Paragraph::new(Text::from(tag_lines)).block(panel("Tags", focused, palette));
        frame.render_widget(tags, area);
    }
    match app.section() {
        Section::Projects => render_grid(frame, ui.main_area, app, palette),
        section => render_section(frame, ui.main_area, app, section, palette),
    }
    render_footer(frame, ui.footer_area, app, year, palette);

    if app.nav().is_open() {
        render_nav_menu(frame, ui.header_area, app, palette);
    }
}

fn panel(title: &str, focused: bool, palette: Palette) -> Block<'static> {
    let title = if focused {
        format!("* {}", title)
    } else {
        title.to_string()
    };
    let border = if focused { palette.accent } else { palette.muted };
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(border))
        .border_type(BorderType::Rounded)
}

fn render_header<S: PreferenceStore>(
    frame: &mut Frame,
    area: Rect,
    app: &App<S>,
    palette: Palette,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.muted))
        .border_type(BorderType::Rounded);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let key_style = Style::default().fg(palette.key).add_modifier(Modifier::BOLD);
    let nav_marker = if app.nav().is_open() { "▴" } else { "▾" };
    let controls = Line::from(vec![
        Span::styled(
            format!("☰ Menu {} ", nav_marker),
            Style::default().fg(palette.text),
        ),
        Span::styled(
            format!("[expanded={}]", app.nav().aria_expanded()),
            Style::default().fg(palette.muted),
        ),
        Span::raw("  "),
        Span::styled(app.theme().indicator(), Style::default().fg(palette.text)),
        Span::raw(" "),
        Span::styled("Ctrl+T", key_style),
        Span::raw(" "),
    ]);
    let title = Line::from(vec![
        Span::styled(
            app.site().owner.clone(),
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  / {}", app.section().label()),
            Style::default().fg(palette.muted),
        ),
    ]);
    frame.render_widget(Paragraph::new(title).alignment(Alignment::Left), inner);
    frame.render_widget(Paragraph::new(controls).alignment(Alignment::Right), inner);
}

fn render_search<S: PreferenceStore>(
    frame: &mut Frame,
    area: Rect,
    app: &App<S>,
    palette: Palette,
) {
    let focused = app.focus() == Focus::Search;
    let block = panel("Search", focused, palette);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let input = app.search();
    let search_width = inner.width.saturating_sub(1) as usize;
    let scroll = if search_width > 0 {
        input.visual_scroll(search_width)
    } else {
        0
    };
    let value = if input.value().is_empty() && !focused {
        Span::styled(
            "Search projects...",
            Style::default()
                .fg(palette.muted)
                .add_modifier(Modifier::ITALIC),
        )
    } else {
        Span::styled(input.value().to_string(), Style::default().fg(palette.text))
    };
    let search = Paragraph::new(Line::from(value))
        .scroll((0, scroll as u16))
        .alignment(Alignment::Left);
    frame.render_widget(search, inner);
    if focused && inner.width > 0 && inner.height > 0 {
        let cursor_x = input.visual_cursor().max(scroll).saturating_sub(scroll);
        frame.set_cursor_position((inner.x + cursor_x as u16, inner.y));
    }
}

fn build_tag_filter_lines<S: PreferenceStore>(
    app: &App<S>,
    width: usize,
    palette: Palette,
) -> Vec<Line<'static>> {
    let focused = app.focus() == Focus::Tags;
    let mut segments = Vec::new();
    for (index, control) in app.tag_filters().controls().iter().enumerate() {
        if index > 0 {
            segments.push(TagSegment::new(" ".to_string(), Style::default()));
        }
        let mark = if control.pressed { "x" } else { " " };
        let mut style = Style::default().fg(palette.tag_color(&control.tag));
        if control.pressed {
            style = style.add_modifier(Modifier::BOLD);
        }
        if focused && index == app.tag_filters().cursor() {
            style = style.fg(Color::Black).bg(palette.highlight);
        }
        segments.push(TagSegment::new(format!("[{}] {}", mark, control.tag), style));
    }
    wrap_tag_segments(&segments, width)
}

fn render_grid<S: PreferenceStore>(frame: &mut Frame, area: Rect, app: &App<S>, palette: Palette) {
    let focused = app.focus() == Focus::Grid;
    let title = if app.filter().is_identity() {
        format!("Projects {}", app.catalog_len())
    } else {
        format!("Projects {}/{}", app.grid().card_count(), app.catalog_len())
    };
    let block = panel(&title, focused, palette);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cards = match app.grid() {
        GridView::Empty { message } => {
            let empty = Paragraph::new(Span::styled(
                message.to_string(),
                Style::default().fg(palette.muted),
            ));
            frame.render_widget(empty, inner);
            return;
        }
        GridView::Cards(cards) => cards,
    };

    let columns = columns_for(inner.width);
    let bottom = inner.y + inner.height;
    // Scroll by whole rows; a trailing row that does not fit is drawn clipped.
    let full_rows = (inner.height / CARD_HEIGHT).max(1) as usize;
    let drawn_rows = inner.height.div_ceil(CARD_HEIGHT).max(1) as usize;
    let selected_row = app.selected_card() / columns;
    let first_row = selected_row.saturating_sub(full_rows - 1);

    let column_constraints = vec![Constraint::Ratio(1, columns as u32); columns];
    for (slot, row) in (first_row..first_row + drawn_rows).enumerate() {
        let y = inner.y + slot as u16 * CARD_HEIGHT;
        if y >= bottom {
            break;
        }
        let row_area = Rect::new(inner.x, y, inner.width, CARD_HEIGHT.min(bottom - y));
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(column_constraints.clone())
            .split(row_area);
        for (column, cell) in cells.iter().enumerate() {
            let index = row * columns + column;
            let Some(card) = cards.get(index) else {
                return;
            };
            let selected = focused && index == app.selected_card();
            render_card(frame, *cell, card, selected, palette);
        }
    }
}

fn columns_for(grid_inner_width: u16) -> usize {
    if grid_inner_width >= TWO_COLUMN_WIDTH {
        2
    } else {
        1
    }
}

/// Card columns the grid will use on a terminal `width` cells wide.
pub fn grid_columns(width: u16) -> usize {
    columns_for(width.saturating_sub(2))
}

fn render_card(frame: &mut Frame, area: Rect, card: &CardView, selected: bool, palette: Palette) {
    let border = if selected {
        Style::default().fg(palette.highlight)
    } else {
        Style::default().fg(palette.muted)
    };
    let title = Line::from(vec![
        Span::styled(
            card.title.clone(),
            Style::default().fg(palette.text).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::raw(card.emoji.clone()),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border)
        .border_type(BorderType::Rounded);
    let inner_width = area.width.saturating_sub(2) as usize;

    let mut lines = vec![Line::from(Span::styled(
        card.description.clone(),
        Style::default().fg(palette.text),
    ))];
    let chips: Vec<TagSegment> = card
        .chips
        .iter()
        .enumerate()
        .flat_map(|(index, chip)| {
            let spacer = (index > 0).then(|| TagSegment::new(" ".to_string(), Style::default()));
            let pill = TagSegment::new(
                format!("[{}]", chip),
                Style::default()
                    .fg(palette.tag_color(chip))
                    .add_modifier(Modifier::ITALIC),
            );
            spacer.into_iter().chain(std::iter::once(pill))
        })
        .collect();
    lines.extend(wrap_tag_segments(&chips, inner_width));
    if !card.links.is_empty() {
        let mut spans = Vec::new();
        for link in &card.links {
            if !spans.is_empty() {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(
                format!("{} ↗", link.kind.label()),
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::UNDERLINED),
            ));
        }
        lines.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_section<S: PreferenceStore>(
    frame: &mut Frame,
    area: Rect,
    app: &App<S>,
    section: Section,
    palette: Palette,
) {
    let value = Style::default().fg(palette.text);
    let lines: Vec<Line> = match section {
        Section::About | Section::Projects => app
            .site()
            .about
            .lines()
            .map(|line| Line::from(Span::styled(line.to_string(), value)))
            .collect(),
        Section::Contact if app.site().contact.is_empty() => vec![Line::from(Span::styled(
            "No contact details configured.",
            Style::default().fg(palette.muted),
        ))],
        Section::Contact => app
            .site()
            .contact
            .iter()
            .map(|entry| Line::from(Span::styled(entry.clone(), value)))
            .collect(),
    };
    let paragraph = Paragraph::new(Text::from(lines))
        .block(panel(section.label(), false, palette))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_nav_menu<S: PreferenceStore>(
    frame: &mut Frame,
    header_area: Rect,
    app: &App<S>,
    palette: Palette,
) {
    let links = app.nav().links();
    let width = NAV_MENU_WIDTH.min(header_area.width);
    let height = links.len() as u16 + 2;
    let x = header_area.x + header_area.width.saturating_sub(width);
    let y = header_area.y + header_area.height;
    let frame_area = frame.area();
    if y >= frame_area.y + frame_area.height {
        return;
    }
    let area = Rect::new(x, y, width, height.min(frame_area.height - (y - frame_area.y)));

    let items: Vec<ListItem> = links
        .iter()
        .map(|section| ListItem::new(Line::from(section.label())))
        .collect();
    let list = List::new(items)
        .block(panel("Menu", true, palette))
        .style(Style::default().bg(palette.background).fg(palette.text))
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(palette.highlight)
                .add_modifier(Modifier::BOLD),
        );
    let mut state = ListState::default();
    state.select(Some(app.nav().cursor()));
    frame.render_widget(Clear, area);
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_footer<S: PreferenceStore>(
    frame: &mut Frame,
    area: Rect,
    app: &App<S>,
    year: i32,
    palette: Palette,
) {
    let mut lines = vec![build_help_line(app.focus(), palette)];
    let credit = format!("© {} {}", year, app.site().owner);
    match app.status() {
        Some(status) => lines.push(Line::from(vec![
            Span::styled(credit, Style::default().fg(palette.muted)),
            Span::raw("  "),
            Span::styled(
                status.to_string(),
                Style::default()
                    .fg(palette.highlight)
                    .add_modifier(Modifier::BOLD),
            ),
        ])),
        None => lines.push(Line::from(Span::styled(
            credit,
            Style::default().fg(palette.muted),
        ))),
    }
    let footer = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Keys")
                .border_style(Style::default().fg(palette.muted))
                .border_type(BorderType::Rounded),
        )
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, area);
}

fn build_help_line(focus: Focus, palette: Palette) -> Line<'static> {
    let key_style = Style::default().fg(palette.key).add_modifier(Modifier::BOLD);
    let label_style = Style::default()
        .fg(palette.accent)
        .add_modifier(Modifier::BOLD);
    let regular_style = Style::default().fg(palette.text);
    let mut spans: Vec<Span> = Vec::new();

    let (label, keys): (&str, &[(&str, &str)]) = match focus {
        Focus::Search => ("Search", &[("Tab", "tags"), ("Ctrl+U", "clear")]),
        Focus::Tags => (
            "Tags",
            &[("Left/Right", "move"), ("Space", "toggle"), ("Tab", "grid")],
        ),
        Focus::Grid => (
            "Grid",
            &[("Arrows", "select"), ("Enter", "live"), ("c", "code")],
        ),
        Focus::Nav => ("Menu", &[("Up/Down", "move"), ("Enter", "go"), ("Esc", "close")]),
    };
    spans.push(Span::styled(label, label_style));
    spans.push(Span::styled("  ", regular_style));
    for (key, action) in keys {
        spans.push(Span::styled(*key, key_style));
        spans.push(Span::styled(format!(" {}  ", action), regular_style));
    }
    spans.push(Span::styled("Ctrl+N", key_style));
    spans.push(Span::styled(" menu  ", regular_style));
    spans.push(Span::styled("Esc", key_style));
    spans.push(Span::styled(" quit", regular_style));
    Line::from(spans)
}

#[derive(Clone)]
struct TagSegment {
    text: String,
    style: Style,
    len: usize,
}

impl TagSegment {
    fn new(text: String, style: Style) -> Self {
        let len = text.chars().count();
        Self { text, style, len }
    }
}

fn substring_by_char(value: &str, start: usize, len: usize) -> String {
    value.chars().skip(start).take(len).collect()
}

fn wrap_tag_segments(segments: &[TagSegment], width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return Vec::new();
    }
    let mut lines = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut current_len = 0usize;

    for seg in segments {
        if seg.len == 0 {
            continue;
        }
        let mut offset = 0usize;
        while offset < seg.len {
            if current_len == 0 && seg.text.starts_with(' ') {
                offset = offset.saturating_add(1);
                continue;
            }
            let available = width.saturating_sub(current_len).max(1);
            let remaining = seg.len.saturating_sub(offset);
            // Move a whole pill to the next line rather than splitting it.
            if current_len > 0 && remaining > available && seg.len <= width {
                lines.push(Line::from(std::mem::take(&mut current)));
                current_len = 0;
                continue;
            }
            let take = remaining.min(available);
            let slice = substring_by_char(&seg.text, offset, take);
            current.push(Span::styled(slice, seg.style));
            current_len = current_len.saturating_add(take);
            offset = offset.saturating_add(take);

            if current_len >= width {
                lines.push(Line::from(std::mem::take(&mut current)));
                current_len = 0;
            }
        }
    }

    if !current.is_empty() {
        lines.push(Line::from(current));
    }

    lines
}
