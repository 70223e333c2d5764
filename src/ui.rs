//! Pure rendering of the view state plus the key-to-action mapping.
//! Nothing here mutates state; the controller is the only writer.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use ethers::types::U256;
use ethers::utils::format_ether;

use crate::app::{Action, FetchStatus, ViewState};

/// Map a key press to an action, depending on whether the address input
/// currently owns the keyboard.
pub fn handle_key(key: KeyEvent, state: &ViewState) -> Option<Action> {
    if state.address_input_active {
        return match key.code {
            KeyCode::Esc => Some(Action::LeaveAddressMode),
            KeyCode::Enter => Some(Action::LookupBalance),
            KeyCode::Backspace => Some(Action::AddressBackspace),
            KeyCode::Char(c) => Some(Action::AddressInput(c)),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('r') => Some(Action::Refresh),
        KeyCode::Char('t') => Some(Action::ToggleTransactions),
        KeyCode::Char('/') => Some(Action::EnterAddressMode),
        // Same effect as Enter inside the input, the "button" entry point
        KeyCode::Char('b') => Some(Action::LookupBalance),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::CursorUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::CursorDown),
        KeyCode::Enter if state.transactions_visible => {
            Some(Action::SelectTransaction(state.cursor))
        }
        _ => None,
    }
}

pub fn render(frame: &mut Frame, state: &ViewState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // header
            Constraint::Length(7),  // block details
            Constraint::Min(5),     // transactions
            Constraint::Length(6),  // receipt
            Constraint::Length(5),  // balance checker
            Constraint::Length(1),  // status line
        ])
        .split(frame.size());

    render_header(frame, chunks[0], state);
    render_block_panel(frame, chunks[1], state);
    render_transactions(frame, chunks[2], state);
    render_receipt(frame, chunks[3], state);
    render_balance(frame, chunks[4], state);
    frame.render_widget(Paragraph::new(status_line(state)), chunks[5]);
}

fn render_header(frame: &mut Frame, area: Rect, state: &ViewState) {
    let tip = match state.latest_block_number {
        Some(n) => n.to_string(),
        None => "-".to_string(),
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled("blockpeek", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("  latest block: {}  ", tip)),
        Span::styled(
            "[r] refresh  [t] transactions  [/] balance  [q] quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn render_block_panel(frame: &mut Frame, area: Rect, state: &ViewState) {
    let lines = match &state.block {
        Some(block) => {
            let when = chrono::DateTime::from_timestamp(block.timestamp as i64, 0)
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                .unwrap_or_else(|| block.timestamp.to_string());
            vec![
                field("Block number", block.number.to_string()),
                field("Parent hash", block.parent_hash.clone()),
                field("Mined", when),
                field("Miner", block.miner.clone()),
                field(
                    "Gas",
                    format!("{} / {}", block.gas_used, block.gas_limit),
                ),
            ]
        }
        None => vec![Line::from(Span::styled(
            placeholder_text(&state.block_status, "no block loaded yet"),
            Style::default().fg(Color::DarkGray),
        ))],
    };

    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Block").borders(Borders::ALL));
    frame.render_widget(panel, area);
}

fn render_transactions(frame: &mut Frame, area: Rect, state: &ViewState) {
    let title = match &state.block {
        Some(b) => format!("Transactions ({})", b.transactions.len()),
        None => "Transactions".to_string(),
    };
    let outer = Block::default().title(title).borders(Borders::ALL);

    if !state.transactions_visible {
        let hint = Paragraph::new(Span::styled(
            "press t to display block transactions",
            Style::default().fg(Color::DarkGray),
        ))
        .block(outer);
        frame.render_widget(hint, area);
        return;
    }

    let hashes: &[String] = state
        .block
        .as_ref()
        .map(|b| b.transactions.as_slice())
        .unwrap_or(&[]);
    let items: Vec<ListItem> = hashes
        .iter()
        .map(|hash| ListItem::new(hash.as_str()))
        .collect();

    let list = List::new(items)
        .block(outer)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    if !hashes.is_empty() {
        list_state.select(Some(state.cursor));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_receipt(frame: &mut Frame, area: Rect, state: &ViewState) {
    let lines = match &state.receipt {
        Some(receipt) => vec![
            field("Transaction hash", receipt.transaction_hash.clone()),
            field("From", receipt.from.clone()),
            field(
                "To",
                receipt.to.clone().unwrap_or_else(|| "(contract creation)".to_string()),
            ),
            field("Confirmations", receipt.confirmations.to_string()),
        ],
        None => vec![Line::from(Span::styled(
            placeholder_text(&state.receipt_status, "select a transaction to see its receipt"),
            Style::default().fg(Color::DarkGray),
        ))],
    };

    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Receipt").borders(Borders::ALL));
    frame.render_widget(panel, area);
}

fn render_balance(frame: &mut Frame, area: Rect, state: &ViewState) {
    // A failed lookup turns the input border into the alert color
    let border_style = if state.address_not_found {
        Style::default().fg(Color::Red)
    } else if state.address_input_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let query = if state.address_query.is_empty() && !state.address_input_active {
        Span::styled(
            "type address or ENS to see balance (press /)",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::raw(state.address_query.clone())
    };

    let balance = if state.balance.is_empty() {
        Line::from(Span::styled(
            placeholder_text(&state.balance_status, "no balance fetched yet"),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let eth = U256::from_dec_str(&state.balance)
            .map(format_ether)
            .unwrap_or_default();
        Line::from(vec![
            Span::raw(format!("{} wei", state.balance)),
            Span::styled(format!("  ({} ETH)", eth), Style::default().fg(Color::DarkGray)),
        ])
    };

    let panel = Paragraph::new(vec![Line::from(query), balance])
        .block(
            Block::default()
                .title("Balance checker")
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(panel, area);
}

/// One line of errors and in-flight markers across all operations
fn status_line(state: &ViewState) -> Line<'static> {
    let named = [
        ("block number", &state.block_number_status),
        ("block", &state.block_status),
        ("receipt", &state.receipt_status),
        ("balance", &state.balance_status),
    ];

    if let Some((name, error)) = named
        .iter()
        .find_map(|(name, status)| status.error().map(|e| (*name, e.clone())))
    {
        return Line::from(Span::styled(
            format!("{} fetch failed: {}", name, error),
            Style::default().fg(Color::Red),
        ));
    }

    let loading: Vec<&str> = named
        .iter()
        .filter(|(_, status)| status.is_in_flight())
        .map(|(name, _)| *name)
        .collect();
    if !loading.is_empty() {
        return Line::from(Span::styled(
            format!("fetching {}...", loading.join(", ")),
            Style::default().fg(Color::Yellow),
        ));
    }

    Line::from(Span::styled("ready", Style::default().fg(Color::DarkGray)))
}

fn field(name: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{}: ", name),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(value),
    ])
}

fn placeholder_text(status: &FetchStatus, empty: &str) -> String {
    if status.is_in_flight() {
        "loading...".to_string()
    } else {
        empty.to_string()
    }
}
