mod app;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame, Terminal,
};

use app::{format_opt, format_price, format_signed, truncate, AppState, ConnectionStatus};
use btc_dashboard::config::API_URL;
use btc_dashboard::store::LatestReport;

const REFRESH_INTERVAL: Duration = Duration::from_secs(2);

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> io::Result<()> {
    let base_url = std::env::var("API_URL").unwrap_or_else(|_| API_URL.to_string());

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .map_err(io::Error::other)?;

    let mut app = AppState::new(base_url);

    // Initial fetch before rendering
    app.refresh(&client).await;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app, &client).await;

    // Restore terminal regardless of result
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    client: &reqwest::Client,
) -> io::Result<()> {
    let mut last_tick = std::time::Instant::now();

    loop {
        terminal.draw(|f| render(f, app))?;

        let timeout = REFRESH_INTERVAL
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                        KeyCode::Char('r') | KeyCode::Char('R') => {
                            app.refresh(client).await;
                            last_tick = std::time::Instant::now();
                        }
                        _ => {}
                    }
                }
            }
        }

        if last_tick.elapsed() >= REFRESH_INTERVAL {
            app.refresh(client).await;
            last_tick = std::time::Instant::now();
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn accent() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

fn bordered<'a>() -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
}

fn panel(title: &str) -> Block<'_> {
    bordered().title(Span::styled(title, accent()))
}

fn field<'a>(label: &str, value: Span<'a>) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{label:<11}"), Style::default().fg(Color::Yellow)),
        value,
    ])
}

fn render(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(0),    // body
            Constraint::Length(1), // footer
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    render_body(f, app, chunks[1]);
    render_footer(f, chunks[2]);
}

fn render_header(f: &mut Frame, app: &AppState, area: Rect) {
    let (status_text, status_color) = match &app.status {
        ConnectionStatus::Connected => ("● connected".to_string(), Color::Green),
        ConnectionStatus::Connecting => ("◌ connecting".to_string(), Color::Yellow),
        ConnectionStatus::Error(e) => (format!("✗ {}", truncate(e, 40)), Color::Red),
    };

    let price = app
        .latest_price()
        .map_or("—".to_string(), format_price);
    let updated = app.updated_at.as_deref().unwrap_or("—");

    let spans = vec![
        Span::styled(" BTC Dashboard  ", accent()),
        Span::styled(status_text, Style::default().fg(status_color)),
        Span::raw("  │  "),
        Span::styled(price, Style::default().fg(Color::White)),
        Span::raw("  │  "),
        Span::styled(format!("updated {updated}"), Style::default().fg(Color::DarkGray)),
    ];

    let paragraph = Paragraph::new(Line::from(spans)).block(bordered());
    f.render_widget(paragraph, area);
}

fn render_body(f: &mut Frame, app: &AppState, area: Rect) {
    // report (40%) | recent prices (60%)
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    render_report(f, app, halves[0]);
    render_prices(f, app, halves[1]);
}

fn render_report(f: &mut Frame, app: &AppState, area: Rect) {
    let lines: Vec<Line> = match &app.report {
        LatestReport::Ok { report: r } => {
            let evo_color = match r.evolution_percent {
                Some(v) if v > 0.0 => Color::Green,
                Some(v) if v < 0.0 => Color::Red,
                _ => Color::White,
            };
            vec![
                Line::from(Span::styled(r.date.to_string(), accent())),
                Line::raw(""),
                field("Open", Span::raw(format_price(r.open))),
                field("Close", Span::raw(format_price(r.close))),
                field(
                    "Change",
                    Span::styled(
                        format!("{}%", format_signed(r.evolution_percent, 2)),
                        Style::default().fg(evo_color),
                    ),
                ),
                Line::raw(""),
                field("Min", Span::raw(format_price(r.min))),
                field("Max", Span::raw(format_price(r.max))),
                field("Mean", Span::raw(format_price(r.mean))),
                field("Volatility", Span::raw(format_opt(Some(r.volatility), 4))),
            ]
        }
        LatestReport::NoData => vec![Line::from(Span::styled(
            "No report available.",
            Style::default().fg(Color::DarkGray),
        ))],
        LatestReport::Error { message } => vec![Line::from(Span::styled(
            format!("Report error: {message}"),
            Style::default().fg(Color::Red),
        ))],
    };

    let paragraph = Paragraph::new(lines).block(panel(" DAILY REPORT "));
    f.render_widget(paragraph, area);
}

fn render_prices(f: &mut Frame, app: &AppState, area: Rect) {
    let block = panel(" RECENT PRICES ");

    if let Some(message) = &app.prices_error {
        let paragraph = Paragraph::new(Span::styled(
            format!("Error: {message}"),
            Style::default().fg(Color::Red),
        ))
        .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let header_cells = ["Time", "Price", "Δ", "Vol %"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)));
    let header = Row::new(header_cells).height(1);

    // newest first, as many as fit
    let visible = area.height.saturating_sub(3) as usize;
    let rows: Vec<Row> = app
        .points
        .iter()
        .rev()
        .take(visible)
        .map(|p| {
            let diff_color = match p.price_diff {
                Some(d) if d > 0.0 => Color::Green,
                Some(d) if d < 0.0 => Color::Red,
                _ => Color::White,
            };
            Row::new(vec![
                Cell::from(p.timestamp.format("%m-%d %H:%M:%S").to_string())
                    .style(Style::default().fg(Color::DarkGray)),
                Cell::from(format!("{:.2}", p.price)),
                Cell::from(format_signed(p.price_diff, 2)).style(Style::default().fg(diff_color)),
                Cell::from(format_opt(p.volatility_pct, 4)).style(Style::default().fg(Color::Magenta)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(15),
            Constraint::Min(10),
            Constraint::Length(10),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(block);

    f.render_widget(table, area);
}

fn render_footer(f: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled(" [q] ", Style::default().fg(Color::Yellow)),
        Span::raw("quit  "),
        Span::styled("[r] ", Style::default().fg(Color::Yellow)),
        Span::raw("refresh  "),
        Span::styled("auto-refresh: 2s", Style::default().fg(Color::DarkGray)),
    ]);
    let paragraph = Paragraph::new(line).style(Style::default().fg(Color::White));
    f.render_widget(paragraph, area);
}
