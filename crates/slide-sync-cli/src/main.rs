use anyhow::{Context, Result, anyhow};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use slide_sync_config::Config;
use slide_sync_engine::{DeckId, SlideCoord, SyncSession, io, mapping, preview_url};
use std::{
    collections::HashMap,
    env,
    io::stdout,
    ops::Range,
    path::{Path, PathBuf},
    process,
};

/// One slide of the deck, in presentation order.
struct SlideRow {
    global: SlideCoord,
    path: PathBuf,
    range: Range<usize>,
}

struct App {
    session: SyncSession,
    deck: DeckId,
    preview_base_url: String,
    /// Text of every document, as last read from disk.
    texts: HashMap<PathBuf, String>,
    /// Simulated editor cursors, one per document, moved whenever the viewer changes slide.
    cursors: HashMap<PathBuf, usize>,
    rows: Vec<SlideRow>,
    slide_list_state: ListState,
    status: String,
}

impl App {
    fn new(file: &Path, preview_base_url: String) -> Result<Self> {
        let text = io::read_file(file)?;
        let mut session = SyncSession::new();
        let (deck, shown) = session.open(file, &text, 0)?;

        let mut app = Self {
            session,
            deck,
            preview_base_url,
            texts: HashMap::new(),
            cursors: HashMap::new(),
            rows: Vec::new(),
            slide_list_state: ListState::default(),
            status: String::new(),
        };
        app.texts.insert(file.to_path_buf(), text);
        app.read_siblings();
        // Every document is on screen, so each gets a cursor at its start.
        app.cursors = app.document_paths().into_iter().map(|path| (path, 0)).collect();
        app.rebuild_rows();

        let selected = shown
            .and_then(|slide| app.rows.iter().position(|row| row.global == slide))
            .unwrap_or(0);
        if !app.rows.is_empty() {
            app.slide_list_state.select(Some(selected));
        }
        Ok(app)
    }

    fn document_paths(&self) -> Vec<PathBuf> {
        self.session
            .deck(self.deck)
            .map(|deck| deck.documents().iter().map(|d| d.path().to_path_buf()).collect())
            .unwrap_or_default()
    }

    fn read_siblings(&mut self) {
        for path in self.document_paths() {
            if self.texts.contains_key(&path) {
                continue;
            }
            match io::read_file(&path) {
                Ok(text) => {
                    self.texts.insert(path, text);
                }
                Err(e) => log::warn!("Could not read {}: {e}", path.display()),
            }
        }
    }

    fn rebuild_rows(&mut self) {
        self.rows.clear();
        let Some(deck) = self.session.deck(self.deck) else {
            return;
        };

        let offsets = mapping::cumulative_offsets(deck.documents());
        for (document, offset) in deck.documents().iter().zip(offsets) {
            for slide in document.slides() {
                let global = mapping::local_to_global(slide.coord(), offset);
                match mapping::global_to_local_range(document, global, offset) {
                    Ok(range) => self.rows.push(SlideRow {
                        global,
                        path: document.path().to_path_buf(),
                        range,
                    }),
                    Err(e) => log::error!("No text for slide {global}: {e}"),
                }
            }
        }
    }

    /// Re-read every document from disk and feed the new text to the session.
    fn reload(&mut self) {
        let mut changed = 0;
        for path in self.document_paths() {
            match io::read_file(&path) {
                Ok(text) => {
                    if self.texts.get(&path) != Some(&text) {
                        self.session.text_changed(&path, &text);
                        self.texts.insert(path, text);
                        changed += 1;
                    }
                }
                Err(e) => log::warn!("Could not reload {}: {e}", path.display()),
            }
        }
        self.rebuild_rows();

        let last = self.rows.len().saturating_sub(1);
        if let Some(selected) = self.slide_list_state.selected()
            && selected > last
        {
            self.slide_list_state.select(Some(last));
        }
        self.status = format!("Reloaded, {changed} document(s) changed");
    }

    fn next_slide(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let i = match self.slide_list_state.selected() {
            Some(i) => (i + 1) % self.rows.len(),
            None => 0,
        };
        self.show(i);
    }

    fn previous_slide(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let i = match self.slide_list_state.selected() {
            Some(0) | None => self.rows.len() - 1,
            Some(i) => i - 1,
        };
        self.show(i);
    }

    /// Act as the viewer moving to row `i`.
    fn show(&mut self, i: usize) {
        self.slide_list_state.select(Some(i));
        let global = self.rows[i].global;

        self.status = match self.session.slide_changed(self.deck, global, &self.cursors) {
            Some(focus) => {
                let status = format!(
                    "Editor moved to {} character {}",
                    file_name(&focus.path),
                    focus.range.start
                );
                self.cursors.insert(focus.path, focus.range.start);
                status
            }
            None => format!("Slide {global}"),
        };
    }

    fn selected_row(&self) -> Option<&SlideRow> {
        self.slide_list_state
            .selected()
            .and_then(|i| self.rows.get(i))
    }

    fn selected_content(&self) -> Vec<String> {
        let Some(row) = self.selected_row() else {
            return vec!["Deck has no slides".to_string()];
        };
        let slide_text = self.texts.get(&row.path).and_then(|text| {
            let start = mapping::char_to_byte_offset(text, row.range.start);
            let end = mapping::char_to_byte_offset(text, row.range.end);
            text.get(start..end)
        });
        match slide_text {
            Some(slide_text) => slide_text.lines().map(str::to_string).collect(),
            None => vec![format!("Could not read {}", row.path.display())],
        }
    }

    fn selected_url(&self) -> String {
        let Some(deck) = self.session.deck(self.deck) else {
            return String::new();
        };
        let slide = self
            .selected_row()
            .map(|row| row.global)
            .unwrap_or(SlideCoord::FIRST);
        preview_url(&self.preview_base_url, deck.url_path(), slide)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_deck(app: &App) {
    if let Some(deck) = app.session.deck(app.deck) {
        println!("Deck: {}", deck.site_root().join(io::CONTENT_DIR).join(deck.url_path().as_str()).display());
    }
    for row in &app.rows {
        println!(
            "{:>7}  {}  {}..{}",
            row.global.to_string(),
            file_name(&row.path),
            row.range.start,
            row.range.end
        );
    }
    println!("{}", app.selected_url());
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();

    let args: Vec<String> = env::args().collect();
    let print_only = args.iter().skip(1).any(|arg| arg == "--print");
    let files: Vec<&String> = args.iter().skip(1).filter(|arg| *arg != "--print").collect();
    let config_path = Config::config_path();

    let config = match Config::load_or_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let file = match files.as_slice() {
        [file] => PathBuf::from(file),
        [] => match config.default_file.clone() {
            Some(file) => file,
            None => {
                eprintln!("Error: No markdown file provided and no default_file configured");
                eprintln!("Usage: {} [--print] <markdown-file>", args[0]);
                eprintln!("Or set default_file in {}", config_path.display());
                process::exit(1);
            }
        },
        _ => {
            eprintln!("Usage: {} [--print] [markdown-file]", args[0]);
            process::exit(1);
        }
    };
    let mut app = App::new(&file, config.preview_base_url)
        .with_context(|| format!("Could not open deck for '{}'", file.display()))?;

    if print_only {
        print_deck(&app);
        return Ok(());
    }
    if app.rows.is_empty() {
        return Err(anyhow!("Deck for '{}' has no slides", file.display()));
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next_slide(),
                KeyCode::Up | KeyCode::Char('k') => app.previous_slide(),
                KeyCode::Char('r') => app.reload(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(rows[0]);

    let slide_items: Vec<ListItem> = app
        .rows
        .iter()
        .map(|row| {
            let indent = if row.global.vertical > 0 { "  " } else { "" };
            let display_text = format!("{indent}{}  {}", row.global, file_name(&row.path));
            ListItem::new(vec![Line::from(vec![Span::raw(display_text)])])
        })
        .collect();

    let title = app
        .session
        .deck(app.deck)
        .map(|deck| format!("Slides: /{}", deck.url_path()))
        .unwrap_or_else(|| "Slides".to_string());
    let slide_list = List::new(slide_items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    f.render_stateful_widget(slide_list, panes[0], &mut app.slide_list_state);

    let content_text: Vec<Line> = app
        .selected_content()
        .into_iter()
        .map(|line| Line::from(vec![Span::raw(line)]))
        .collect();
    let content = Paragraph::new(content_text)
        .block(Block::default().borders(Borders::ALL).title("Source"))
        .wrap(ratatui::widgets::Wrap { trim: false });

    f.render_widget(content, panes[1]);

    let footer = vec![
        Line::from(vec![Span::styled(
            app.selected_url(),
            Style::default().fg(Color::Cyan),
        )]),
        Line::from(vec![
            Span::raw("q: Quit | ↑/k: Previous | ↓/j: Next | r: Reload"),
            Span::raw(if app.status.is_empty() { "" } else { " | " }),
            Span::raw(app.status.clone()),
        ]),
    ];

    f.render_widget(Paragraph::new(footer).block(Block::default()), rows[1]);
}
