use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{debug, info, warn};

use crate::io::board::{self, BoardError};
use crate::io::config_io::read_config;
use crate::io::store::{JsonTaskStore, StoreError};
use crate::io::watcher::StoreWatcher;
use crate::model::config::Config;
use crate::model::task::Task;

use super::manager::TaskManager;
use super::message::{Intent, Msg, ViewKind};
use super::render;
use super::theme::Theme;

/// Rows taken by the tab bar and status row around the task list
pub const CHROME_ROWS: u16 = 3;

/// The running application: the task manager plus the collaborators that
/// carry out its intents.
pub struct App {
    pub manager: TaskManager,
    pub theme: Theme,
    /// One-line message shown in the status row until the next key
    pub notice: Option<String>,
    pub should_quit: bool,
    dir: PathBuf,
    store: JsonTaskStore,
}

impl App {
    pub fn new(dir: &Path, config: &Config, tasks: Vec<Task>, today: NaiveDate) -> Self {
        App {
            manager: TaskManager::new(tasks, config, today),
            theme: Theme::from_config(&config.ui),
            notice: None,
            should_quit: false,
            dir: dir.to_path_buf(),
            store: JsonTaskStore::open(dir),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Feed a message to the manager and carry out every intent it produces,
    /// including intents caused by the acknowledgements of earlier ones.
    pub fn handle(&mut self, msg: Msg) {
        if matches!(msg, Msg::Key(_)) {
            self.notice = None;
        }
        let mut pending = VecDeque::from([msg]);
        while let Some(msg) = pending.pop_front() {
            for intent in self.manager.update(msg) {
                if let Some(ack) = self.execute(intent) {
                    pending.push_back(ack);
                }
            }
        }
    }

    /// Reload tasks from the store (external change or explicit request)
    pub fn reload(&mut self) {
        let msg = self.load_msg();
        self.handle(msg);
    }

    fn load_msg(&self) -> Msg {
        Msg::TasksReloaded(self.store.load().map_err(|e| e.to_string()))
    }

    fn execute(&mut self, intent: Intent) -> Option<Msg> {
        match intent {
            Intent::UpdateTask(task) => match self.store.upsert(&task) {
                Ok(()) => Some(Msg::TaskUpdated(task)),
                Err(e) => Some(self.store_failed("save task", e)),
            },
            Intent::DeleteTask { id } => match self.store.delete(&id) {
                Ok(_) => Some(Msg::TaskDeleted(id)),
                Err(e) => Some(self.store_failed("delete task", e)),
            },
            Intent::Archive { count } => match self.store.archive_done(self.manager.archive_file()) {
                Ok(archived) => {
                    if archived != count {
                        debug!(expected = count, archived, "archive count differs");
                    }
                    Some(Msg::ArchiveComplete { count: archived })
                }
                Err(e) => Some(self.store_failed("archive", e)),
            },
            Intent::MoveToBoard { task, board } => self.move_to_board(task, board),
            Intent::OpenBoardAt {
                board,
                column,
                card,
            } => {
                self.notice = Some(format!(
                    "Added to {} (column {}, card {})",
                    board::board_name(&board),
                    column + 1,
                    card + 1
                ));
                None
            }
            Intent::FocusTask { id } => {
                debug!(%id, "focus handed to another view");
                None
            }
            Intent::SwitchView(ViewKind::TaskList) => None,
            Intent::SwitchView(view) => {
                // Only the task list is hosted here
                if self.notice.is_none() {
                    self.notice = Some(format!("{} view is not available here", view.label()));
                }
                None
            }
            Intent::Reload => Some(self.load_msg()),
            Intent::Notice(text) => {
                self.notice = Some(text);
                None
            }
            Intent::Quit => {
                self.should_quit = true;
                None
            }
        }
    }

    fn move_to_board(&mut self, task: Task, board_path: String) -> Option<Msg> {
        let path = self.dir.join(&board_path);
        let position = match board::append_card(&path, &task.name) {
            Ok(position) => position,
            Err(e) => {
                self.board_failed(e);
                return None;
            }
        };
        if let Err(e) = self.store.delete(&task.id) {
            return Some(self.store_failed("remove moved task", e));
        }
        info!(id = %task.id, board = %board_path, "task moved to board");
        Some(Msg::TaskMovedToBoard {
            id: task.id,
            board: board_path,
            column: position.column,
            card: position.card,
        })
    }

    /// A failed write leaves the manager ahead of the store; resync from disk
    fn store_failed(&mut self, action: &str, err: StoreError) -> Msg {
        warn!(error = %err, action, "store operation failed");
        self.notice = Some(format!("Could not {}: {}", action, err));
        self.load_msg()
    }

    fn board_failed(&mut self, err: BoardError) {
        warn!(error = %err, "board write failed");
        self.notice = Some(err.to_string());
    }
}

/// Task list rows for a terminal of `height` rows
pub fn list_rows(height: u16) -> usize {
    height.saturating_sub(CHROME_ROWS).max(1) as usize
}

/// Run the TUI against the task directory `dir`
pub fn run(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = read_config(dir)?;
    let store = JsonTaskStore::open(dir);
    let tasks = store.load()?;
    info!(dir = %dir.display(), count = tasks.len(), "starting");

    let mut app = App::new(dir, &config, tasks, Local::now().date_naive());

    let watcher = match StoreWatcher::start(dir) {
        Ok(w) => Some(w),
        Err(e) => {
            warn!(error = %e, "file watching disabled");
            None
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("exiting");
    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&StoreWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut rows = 0;
    loop {
        let height = terminal.size()?.height;
        if list_rows(height) != rows {
            rows = list_rows(height);
            app.handle(Msg::Resize { rows });
        }
        app.manager.set_today(Local::now().date_naive());

        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle(Msg::Key(key));
        }

        if watcher.is_some_and(|w| w.poll_changed()) {
            app.reload();
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
