use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::config::ColorConfig;
use crate::tui::app::{ActivePane, Footer, Screen, TuiApp};

pub fn render(frame: &mut Frame, app: &mut TuiApp, colors: &ColorConfig) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(frame.area());

    match app.screen() {
        Screen::List if app.maximized => render_preview_pane(frame, app, chunks[0], colors),
        Screen::List => {
            let panes = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
                .split(chunks[0]);
            render_article_pane(frame, app, panes[0], colors);
            render_preview_pane(frame, app, panes[1], colors);
        }
        screen => render_full_screen(frame, &screen, chunks[0], colors),
    }

    render_status_bar(frame, app, chunks[1], colors);
}

fn render_full_screen(frame: &mut Frame, screen: &Screen, area: Rect, colors: &ColorConfig) {
    let (lines, style) = match screen {
        Screen::Loading { refreshing: true } => (vec!["Refreshing news...".to_string()], Style::default()),
        Screen::Loading { .. } => (vec!["Loading news...".to_string()], Style::default()),
        Screen::Empty { query } if query.trim().is_empty() => {
            (vec!["No news found".to_string()], Style::default())
        }
        Screen::Empty { query } => (
            vec![format!("No results found for \"{}\"", query)],
            Style::default(),
        ),
        Screen::Failed { message, can_retry } => {
            let mut lines: Vec<String> = message.lines().map(str::to_string).collect();
            lines.push(String::new());
            lines.push(if *can_retry {
                "Press r to retry".to_string()
            } else {
                "Press R to refresh or / to search".to_string()
            });
            (lines, Style::default().fg(colors.error))
        }
        Screen::List => (Vec::new(), Style::default()),
    };

    // Vertically centre the message.
    let top = area
        .height
        .saturating_sub(lines.len() as u16 + 2)
        / 2;
    let mut text: Vec<Line> = (0..top).map(|_| Line::from("")).collect();
    text.extend(lines.into_iter().map(Line::from));

    let paragraph = Paragraph::new(Text::from(text))
        .style(style)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.inactive_border)),
        );
    frame.render_widget(paragraph, area);
}

fn border_style(active: bool, colors: &ColorConfig) -> Style {
    if active {
        Style::default().fg(colors.active_border)
    } else {
        Style::default().fg(colors.inactive_border)
    }
}

fn render_article_pane(frame: &mut Frame, app: &mut TuiApp, area: Rect, colors: &ColorConfig) {
    let is_active = app.active_pane == ActivePane::Articles;

    let mut items: Vec<ListItem> = app
        .articles
        .iter()
        .map(|article| {
            let date = article
                .published_date()
                .map(|d| d.format("%m/%d").to_string())
                .unwrap_or_else(|| "     ".to_string());
            ListItem::new(Line::from(vec![
                Span::styled(date, Style::default().fg(colors.metadata_date)),
                Span::raw(" "),
                Span::styled(
                    article.display_title().to_string(),
                    Style::default().fg(colors.title),
                ),
            ]))
        })
        .collect();

    let footer = match app.footer() {
        Footer::None => None,
        Footer::LoadingMore => Some(("Loading more...".to_string(), colors.footer)),
        Footer::End => Some(("-- end of list --".to_string(), colors.footer)),
        Footer::Error(message) => Some((
            format!("{} (r to retry)", message.replace('\n', " ")),
            colors.error,
        )),
        Footer::MaxResults(message) => Some((message, colors.notice)),
    };
    if let Some((text, color)) = footer {
        items.push(ListItem::new(Span::styled(
            text,
            Style::default().fg(color).add_modifier(Modifier::ITALIC),
        )));
    }

    let heading = if app.search_query.is_empty() {
        "Top headlines".to_string()
    } else {
        format!("Search: {}", app.search_query)
    };
    let title = format!(
        " {} ({}) [{}/{}] ",
        heading,
        app.articles.len(),
        app.selected + 1,
        app.articles.len().max(1)
    );

    let highlight_style = if is_active {
        Style::default()
            .bg(colors.selection_bg)
            .fg(colors.selection_fg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(border_style(is_active, colors)),
        )
        .highlight_style(highlight_style)
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_preview_pane(frame: &mut Frame, app: &TuiApp, area: Rect, colors: &ColorConfig) {
    let is_active = app.active_pane == ActivePane::Preview;

    let (title, content) = match app.selected_article() {
        Some(article) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    article.display_title().to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    format!("Source: {}", article.source),
                    Style::default().fg(colors.metadata_source),
                )),
            ];
            if let Some(date) = article.published_date() {
                lines.push(Line::from(Span::styled(
                    format!("Date: {}", date.format("%Y-%m-%d %H:%M")),
                    Style::default().fg(colors.metadata_date),
                )));
            }
            lines.push(Line::from(Span::styled(
                format!("Link: {}", article.url),
                Style::default().fg(colors.metadata_link),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from("─".repeat(area.width.saturating_sub(2) as usize)));
            lines.push(Line::from(""));
            lines.extend(
                article
                    .display_content()
                    .lines()
                    .map(|line| Line::from(line.to_string())),
            );
            (" Preview ".to_string(), Text::from(lines))
        }
        None => (" Preview ".to_string(), Text::from("No article selected")),
    };

    let paragraph = Paragraph::new(content)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(border_style(is_active, colors)),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.preview_scroll, 0));

    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, app: &TuiApp, area: Rect, colors: &ColorConfig) {
    let status = if let Some(input) = &app.search_input {
        format!("Search: {}_  (Enter: apply, Esc: cancel, empty: top headlines)", input)
    } else if let Some(msg) = &app.status_message {
        msg.clone()
    } else if app.is_refreshing {
        "Refreshing...".to_string()
    } else if app.maximized {
        "j/k:Scroll  m:Exit maximize  q:Quit".to_string()
    } else {
        "j/k:Nav  Tab:Pane  /:Search  o:Open  r:Retry  R:Refresh  m:Max  q:Quit".to_string()
    };

    let paragraph =
        Paragraph::new(status).style(Style::default().fg(colors.status_fg).bg(colors.status_bg));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::UiState;
    use crate::domain::Article;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &mut TuiApp) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        let colors = ColorConfig::default();
        terminal
            .draw(|frame| render(frame, app, &colors))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_renders_no_data_with_query() {
        let mut app = TuiApp::new();
        app.apply(UiState::NoData, Vec::new(), false, false, "zzz".into());
        assert!(draw(&mut app).contains("No results found for \"zzz\""));
    }

    #[test]
    fn test_renders_retry_hint_for_initial_error() {
        let mut app = TuiApp::new();
        app.apply(
            UiState::Error {
                message: "Failed to load news.\noffline".into(),
                is_pagination: false,
                is_max_results_reached: false,
            },
            Vec::new(),
            false,
            false,
            String::new(),
        );
        let screen = draw(&mut app);
        assert!(screen.contains("Failed to load news."));
        assert!(screen.contains("Press r to retry"));
    }

    #[test]
    fn test_renders_list_with_end_marker() {
        let mut article = Article::from_url("https://example.com/a");
        article.title = "Quiet day".into();
        article.source = "Wire".into();
        let articles = vec![article];

        let mut app = TuiApp::new();
        app.apply(
            UiState::Success {
                articles: articles.clone(),
                has_more_to_load: false,
            },
            articles,
            false,
            false,
            String::new(),
        );
        let screen = draw(&mut app);
        assert!(screen.contains("Quiet day"));
        assert!(screen.contains("-- end of list --"));
        assert!(screen.contains("Source: Wire"));
    }
}
