use blockpad_engine::BlockType;
use blockpad_engine::editing::{MenuView, RenderBlock};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::app::App;

const MENU_WIDTH: u16 = 36;

/// Marker drawn before a block's content
pub(crate) fn prefix(block: &RenderBlock) -> String {
    match block.kind {
        BlockType::Paragraph => String::new(),
        BlockType::Heading1 => "# ".to_string(),
        BlockType::Heading2 => "## ".to_string(),
        BlockType::Heading3 => "### ".to_string(),
        BlockType::BulletList => "• ".to_string(),
        BlockType::NumberedList => format!("{}. ", block.ordinal.unwrap_or(1)),
        BlockType::Todo => "[ ] ".to_string(),
        BlockType::Divider => "────────".to_string(),
    }
}

fn block_style(block: &RenderBlock) -> Style {
    let style = match block.kind {
        BlockType::Heading1 | BlockType::Heading2 | BlockType::Heading3 => {
            Style::default().add_modifier(Modifier::BOLD)
        }
        BlockType::Divider => Style::default().fg(Color::DarkGray),
        _ => Style::default(),
    };
    if block.focused {
        style.bg(Color::Rgb(40, 40, 60))
    } else {
        style
    }
}

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
        .split(f.area());

    let title = format!(
        "{}{}",
        app.document_path.display(),
        if app.is_dirty() { " [+]" } else { "" }
    );
    let frame = Block::default().borders(Borders::ALL).title(title);
    app.viewport = frame.inner(chunks[0]);
    f.render_widget(frame, chunks[0]);

    let snapshot = app.editor.snapshot();
    keep_focus_visible(app, &snapshot.blocks);

    let mut lines: Vec<Line> = snapshot
        .blocks
        .iter()
        .skip(app.scroll)
        .map(|block| {
            let indent = " ".repeat(app.indent_columns(block.indent));
            Line::from(vec![
                Span::raw(indent),
                Span::styled(prefix(block), Style::default().fg(Color::Cyan)),
                Span::raw(block.content.clone()),
            ])
            .style(block_style(block))
        })
        .collect();
    lines.push(Line::from(Span::styled(
        "+ Add block",
        Style::default().fg(Color::DarkGray),
    )));
    f.render_widget(Paragraph::new(lines), app.viewport);

    let status = Paragraph::new(Line::from(Span::raw(app.status.clone())))
        .style(Style::default().fg(Color::Black).bg(Color::Gray));
    f.render_widget(status, chunks[1]);

    match snapshot.menu {
        Some(menu) => render_menu(f, app, &menu),
        None => {
            if let Some(rect) = app.caret_geometry().and_then(|geometry| geometry.rect) {
                f.set_cursor_position((rect.left as u16, rect.top as u16));
            }
        }
    }
}

fn keep_focus_visible(app: &mut App, blocks: &[RenderBlock]) {
    let Some(index) = blocks.iter().position(|block| block.focused) else {
        return;
    };
    let height = usize::from(app.viewport.height).max(1);
    if index < app.scroll {
        app.scroll = index;
    } else if index >= app.scroll + height {
        app.scroll = index + 1 - height;
    }
}

fn render_menu(f: &mut Frame, app: &App, menu: &MenuView) {
    let area = f.area();
    let top = (menu.position.top - app.scroll as f64).max(0.0) as u16;
    let left = menu.position.left.max(0.0) as u16;
    let height = (menu.items.len() as u16 + 2).max(3);

    let y = top.min(area.height.saturating_sub(height));
    let x = left.min(area.width.saturating_sub(MENU_WIDTH));
    let popup =
        Rect::new(x, y, MENU_WIDTH.min(area.width), height.min(area.height)).intersection(area);

    let items: Vec<ListItem> = menu
        .items
        .iter()
        .map(|item| {
            ListItem::new(Line::from(vec![
                Span::raw(format!("{:<14}", item.label)),
                Span::styled(item.description, Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let title = if menu.query.is_empty() {
        "Turn into".to_string()
    } else {
        format!("/{}", menu.query)
    };
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    let mut state = ListState::default();
    state.select(
        menu.highlighted
            .and_then(|kind| menu.items.iter().position(|item| item.kind == kind)),
    );

    f.render_widget(Clear, popup);
    f.render_stateful_widget(list, popup, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockpad_engine::BlockId;
    use rstest::rstest;

    fn render_block(kind: BlockType, ordinal: Option<usize>) -> RenderBlock {
        RenderBlock {
            id: BlockId::new(),
            kind,
            content: String::new(),
            indent: 0,
            ordinal,
            focused: false,
        }
    }

    #[rstest]
    #[case(BlockType::Paragraph, None, "")]
    #[case(BlockType::Heading2, None, "## ")]
    #[case(BlockType::BulletList, None, "• ")]
    #[case(BlockType::NumberedList, Some(3), "3. ")]
    #[case(BlockType::Todo, None, "[ ] ")]
    fn test_prefix(
        #[case] kind: BlockType,
        #[case] ordinal: Option<usize>,
        #[case] expected: &str,
    ) {
        assert_eq!(prefix(&render_block(kind, ordinal)), expected);
    }
}
