//! Countdown view for the work-session timer.
//!
//! A blocking draw/poll loop over the [`SessionTimer`] state machine. The
//! loop checks for a keypress every 250ms, so stop/reset/quit take effect on
//! the next tick. The timer never touches the data store.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout},
    prelude::CrosstermBackend,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame, Terminal,
};

use crate::timer::{SessionTimer, TimerState};

/// Initialise the terminal and run the countdown until the user quits.
pub fn run_timer_tui(minutes: u64) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, minutes);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop<B: Backend>(terminal: &mut Terminal<B>, minutes: u64) -> io::Result<()> {
    let mut timer = SessionTimer::new(Duration::from_secs(minutes * 60));
    timer.start();

    loop {
        timer.poll();
        terminal.draw(|f| draw(f, &timer))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char('s') => match timer.state() {
                        TimerState::Running => timer.stop(),
                        TimerState::Idle => timer.start(),
                        TimerState::Expired => {}
                    },
                    KeyCode::Char('r') => timer.reset(),
                    _ => {}
                }
            }
        }
    }
}

fn draw(f: &mut Frame, timer: &SessionTimer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(f.area());

    let remaining = timer.remaining();
    let mins = remaining.as_secs() / 60;
    let secs = remaining.as_secs() % 60;
    let (label, color) = match timer.state() {
        TimerState::Running => ("running", Color::Green),
        TimerState::Idle => ("paused", Color::Yellow),
        TimerState::Expired => ("session done - take a break", Color::Red),
    };

    let clock = Paragraph::new(format!("{mins:02}:{secs:02}"))
        .alignment(Alignment::Center)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL).title("Work Timer"));
    f.render_widget(clock, chunks[0]);

    let total = timer.duration().as_secs_f64();
    let elapsed = if total > 0.0 {
        1.0 - remaining.as_secs_f64() / total
    } else {
        1.0
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(label))
        .gauge_style(Style::default().fg(color))
        .ratio(elapsed.clamp(0.0, 1.0));
    f.render_widget(gauge, chunks[1]);

    let help = Paragraph::new("s: start/stop   r: reset   q: quit")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, chunks[2]);
}
