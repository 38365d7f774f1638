//! Main application logic for the terminal user interface.
//!
//! `App` owns the repository, keeps a fresh snapshot of the task list for
//! drawing, and routes key presses to the screen that is showing (task list,
//! detail, add form, single-field edit, help, delete confirmation).

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};

use crate::fields::{Importance, TaskField};
use crate::render::{format_flag, render_table, TableModel, HEADERS};
use crate::repo::TaskRepository;
use crate::task::{NewTask, Task};
use crate::tui::{
    colors::{rag_color, HEADER_BLUE, RAG_RED},
    enums::{AppState, FormField},
    input::InputField,
    utils::{centered_rect, cursor_in_box},
};

/// Main application state for the terminal user interface.
pub struct App {
    state: AppState,
    repo: TaskRepository,
    tasks: Vec<Task>,
    table: TableModel,
    table_state: TableState,
    form: [InputField; 4],
    form_focus: FormField,
    edit_input: InputField,
    status_message: String,
}

impl App {
    pub fn new(repo: TaskRepository) -> Self {
        let mut app = App {
            state: AppState::TaskList,
            repo,
            tasks: Vec::new(),
            table: TableModel::default(),
            table_state: TableState::default(),
            form: Default::default(),
            form_focus: FormField::Name,
            edit_input: InputField::new(),
            status_message: String::new(),
        };
        app.refresh();
        app
    }

    /// Re-read the task list from the repository and rebuild the table.
    fn refresh(&mut self) {
        self.tasks = self.repo.list();
        self.table = render_table(&self.tasks);
        let len = self.tasks.len();
        match self.table_state.selected() {
            _ if len == 0 => self.table_state.select(None),
            Some(i) if i >= len => self.table_state.select(Some(len - 1)),
            None => self.table_state.select(Some(0)),
            _ => {}
        }
    }

    /// 1-based number of the highlighted task.
    fn selected_number(&self) -> Option<usize> {
        self.table_state.selected().map(|i| i + 1)
    }

    fn selected_task(&self) -> Option<&Task> {
        self.table_state.selected().and_then(|i| self.tasks.get(i))
    }

    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
    }

    fn select_next(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i + 1 < self.tasks.len() => i + 1,
            Some(_) => 0,
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    fn select_previous(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) | None => self.tasks.len() - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    fn open_add_form(&mut self) {
        self.form = Default::default();
        self.form[FormField::Importance.index()] = InputField::with_value(Importance::Medium.as_str());
        self.form_focus = FormField::Name;
        self.state = AppState::AddTask;
    }

    fn open_field_editor(&mut self, field: TaskField) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let current = match field {
            TaskField::Name => task.name.clone(),
            TaskField::Description => task.description.clone(),
            TaskField::Importance => task.importance.to_string(),
            TaskField::DueDate => task.due_date.to_string(),
            TaskField::Status => task.status.to_string(),
            TaskField::Rag => task.rag.to_string(),
        };
        self.edit_input = InputField::with_value(&current);
        self.state = AppState::EditField(field);
    }

    fn cycle_status(&mut self) {
        let (Some(number), Some(status)) = (self.selected_number(), self.selected_task().map(|t| t.status)) else {
            return;
        };
        match self.repo.update(number, TaskField::Status, status.next().as_str()) {
            Ok(t) => self.set_status_message(format!("Task {} is now {}", number, t.status)),
            Err(e) => self.set_status_message(format!("Error: {e}")),
        }
        self.refresh();
    }

    fn submit_add_form(&mut self) {
        let new_task = NewTask {
            name: self.form[FormField::Name.index()].value.clone(),
            description: self.form[FormField::Description.index()].value.clone(),
            importance: self.form[FormField::Importance.index()].value.clone(),
            due_date: self.form[FormField::DueDate.index()].value.clone(),
        };
        match self.repo.add(new_task) {
            Ok(task) => {
                self.refresh();
                self.table_state.select(Some(self.tasks.len() - 1));
                self.set_status_message(format!("Added task {}: {}", self.tasks.len(), task.name));
                self.state = AppState::TaskList;
            }
            Err(e) => self.set_status_message(format!("Error: {e}")),
        }
    }

    fn submit_field_edit(&mut self, field: TaskField) {
        let Some(number) = self.selected_number() else {
            self.state = AppState::TaskList;
            return;
        };
        match self.repo.update(number, field, &self.edit_input.value) {
            Ok(_) => {
                self.refresh();
                self.set_status_message(format!("Updated {} of task {}", field.label(), number));
                self.state = AppState::TaskDetail;
            }
            Err(e) => self.set_status_message(format!("Error: {e}")),
        }
    }

    fn delete_selected_task(&mut self) {
        let Some(number) = self.selected_number() else {
            return;
        };
        match self.repo.delete(number) {
            Ok(task) => self.set_status_message(format!("Deleted task {}: {}", number, task.name)),
            Err(e) => self.set_status_message(format!("Error: {e}")),
        }
        self.refresh();
    }

    /// Handle keyboard input in the task list.
    ///
    /// Returns true if the application should quit.
    fn handle_task_list_input(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Enter => {
                if self.selected_task().is_some() {
                    self.state = AppState::TaskDetail;
                }
            }
            KeyCode::Char('a') => self.open_add_form(),
            KeyCode::Char('s') => self.cycle_status(),
            KeyCode::Char('d') | KeyCode::Delete => {
                if self.selected_task().is_some() {
                    self.state = AppState::Confirm;
                }
            }
            KeyCode::Char('h') | KeyCode::Char('?') => self.state = AppState::Help,
            _ => {}
        }
        false
    }

    fn handle_detail_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('q') => self.state = AppState::TaskList,
            KeyCode::Char('n') => self.open_field_editor(TaskField::Name),
            KeyCode::Char('e') => self.open_field_editor(TaskField::Description),
            KeyCode::Char('i') => self.open_field_editor(TaskField::Importance),
            KeyCode::Char('u') => self.open_field_editor(TaskField::DueDate),
            KeyCode::Char('s') => self.open_field_editor(TaskField::Status),
            KeyCode::Char('r') => self.open_field_editor(TaskField::Rag),
            KeyCode::Char('c') => self.cycle_status(),
            KeyCode::Char('d') => self.state = AppState::Confirm,
            _ => {}
        }
    }

    fn handle_form_input(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        let idx = self.form_focus.index();
        match key {
            KeyCode::Esc => self.state = AppState::TaskList,
            KeyCode::Enter => self.submit_add_form(),
            KeyCode::Tab | KeyCode::Down => self.form_focus = self.form_focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.form_focus = self.form_focus.prev(),
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => self.form[idx].handle_char(c),
            KeyCode::Backspace => self.form[idx].handle_backspace(),
            KeyCode::Delete => self.form[idx].handle_delete(),
            KeyCode::Left => self.form[idx].move_cursor_left(),
            KeyCode::Right => self.form[idx].move_cursor_right(),
            KeyCode::Home => self.form[idx].move_home(),
            KeyCode::End => self.form[idx].move_end(),
            _ => {}
        }
    }

    fn handle_edit_input(&mut self, key: KeyCode, modifiers: KeyModifiers, field: TaskField) {
        match key {
            KeyCode::Esc => self.state = AppState::TaskDetail,
            KeyCode::Enter => self.submit_field_edit(field),
            KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => self.edit_input.clear(),
            KeyCode::Char(c) => self.edit_input.handle_char(c),
            KeyCode::Backspace => self.edit_input.handle_backspace(),
            KeyCode::Delete => self.edit_input.handle_delete(),
            KeyCode::Left => self.edit_input.move_cursor_left(),
            KeyCode::Right => self.edit_input.move_cursor_right(),
            KeyCode::Home => self.edit_input.move_home(),
            KeyCode::End => self.edit_input.move_end(),
            _ => {}
        }
    }

    fn handle_confirm_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.delete_selected_task();
                self.state = AppState::TaskList;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.state = AppState::TaskList;
            }
            _ => {}
        }
    }

    /// Dispatch one key press. Returns true if the application should quit.
    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        if key == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        self.status_message.clear();
        match self.state {
            AppState::TaskList => return self.handle_task_list_input(key),
            AppState::TaskDetail => self.handle_detail_input(key),
            AppState::AddTask => self.handle_form_input(key, modifiers),
            AppState::EditField(field) => self.handle_edit_input(key, modifiers, field),
            AppState::Help => self.state = AppState::TaskList,
            AppState::Confirm => self.handle_confirm_input(key),
        }
        false
    }

    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(self.handle_key(key.code, key.modifiers));
                }
            }
        }
        Ok(false)
    }

    /// Render the task table, one background colour per RAG rating.
    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let header_block = Paragraph::new(Line::from(vec![
            Span::styled("TASK TRACKER", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                self.repo.store().path().display().to_string(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ]))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
        f.render_widget(header_block, chunks[0]);

        let header = Row::new(
            HEADERS
                .iter()
                .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD))),
        )
        .style(Style::default().bg(HEADER_BLUE).fg(Color::White))
        .height(1);

        let rows: Vec<Row> = self
            .table
            .rows
            .iter()
            .map(|row| {
                Row::new(row.cells.iter().map(|c| Cell::from(c.as_str())))
                    .style(Style::default().bg(rag_color(row.rag)).fg(Color::White))
            })
            .collect();

        let widths = [
            Constraint::Length(6),  // T. No.
            Constraint::Min(20),    // Task
            Constraint::Length(10), // Importance
            Constraint::Length(15), // Has Description
            Constraint::Length(10), // Date Made
            Constraint::Length(10), // Due Date
            Constraint::Length(11), // Status
            Constraint::Length(10), // RAG rating
        ];

        let title = if self.table.is_empty() {
            "No tasks found. Press 'a' to add one, 'h' for help".to_string()
        } else {
            format!("Tasks ({}) - Press 'h' for help", self.table.rows.len())
        };
        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(title))
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, chunks[1], &mut self.table_state);
    }

    /// Render every field of the selected task.
    fn render_task_detail(&mut self, f: &mut Frame, area: Rect) {
        let Some(task) = self.selected_task() else {
            f.render_widget(Paragraph::new("No task selected"), area);
            return;
        };
        let number = self.selected_number().unwrap_or(0);
        let label = |s: &'static str| Span::styled(format!("{s:<17}"), Style::default().fg(Color::Cyan));
        let rag_text = if task.rag_override.is_some() {
            format!("{} (set manually)", task.rag)
        } else {
            task.rag.to_string()
        };

        let text = vec![
            Line::from(Span::styled(
                task.name.clone(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![label("Task Number"), Span::raw(number.to_string())]),
            Line::from(vec![label("Description"), Span::raw(if task.has_description { task.description.clone() } else { "-".into() })]),
            Line::from(vec![label("Has Description"), Span::raw(format_flag(task.has_description))]),
            Line::from(vec![label("Importance"), Span::raw(task.importance.to_string())]),
            Line::from(vec![label("Date Made"), Span::raw(task.date_made.to_string())]),
            Line::from(vec![label("Due Date"), Span::raw(task.due_date.to_string())]),
            Line::from(vec![label("Status"), Span::raw(task.status.to_string())]),
            Line::from(vec![
                label("RAG rating"),
                Span::styled(rag_text, Style::default().bg(rag_color(task.rag)).fg(Color::White)),
            ]),
            Line::from(""),
            Line::from("n name  e description  i importance  u due date  s status  r RAG"),
            Line::from("c cycle status  d delete  Esc back"),
        ];

        let paragraph = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title("Task Details"))
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    fn render_task_form(&mut self, f: &mut Frame, area: Rect) {
        let area = centered_rect(60, 60, area);
        f.render_widget(Clear, area);
        let block = Block::default().borders(Borders::ALL).title("Add Task");
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(inner);

        for field in FormField::ALL {
            let i = field.index();
            let focused = field == self.form_focus;
            let style = if focused {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            let input = Paragraph::new(self.form[i].value.as_str())
                .block(Block::default().borders(Borders::ALL).title(field.label()).border_style(style));
            f.render_widget(input, chunks[i]);
            if focused {
                f.set_cursor_position(cursor_in_box(chunks[i], self.form[i].cursor));
            }
        }

        let hint = Paragraph::new("Tab/Shift+Tab move  Enter save  Esc cancel")
            .alignment(Alignment::Center);
        f.render_widget(hint, chunks[4]);
    }

    fn render_field_editor(&mut self, f: &mut Frame, area: Rect, field: TaskField) {
        let area = centered_rect(60, 20, area);
        f.render_widget(Clear, area);
        let hint = match field {
            TaskField::Importance => " (high, medium, low)",
            TaskField::DueDate => " (YYYY-MM-DD)",
            TaskField::Status => " (Pending, In Progress, Completed)",
            TaskField::Rag => " (red, amber, green)",
            TaskField::Name | TaskField::Description => "",
        };
        let title = format!("New {}{} - Enter save, Esc cancel", field.label(), hint);
        let input = Paragraph::new(self.edit_input.value.as_str())
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(input, area);
        f.set_cursor_position(cursor_in_box(area, self.edit_input.cursor));
    }

    fn render_help(&mut self, f: &mut Frame, area: Rect) {
        let text = vec![
            Line::from(Span::styled("Task list", Style::default().add_modifier(Modifier::BOLD))),
            Line::from("  Up/k, Down/j   move selection"),
            Line::from("  Enter          show task details"),
            Line::from("  a              add a task"),
            Line::from("  s              cycle status (Pending > In Progress > Completed)"),
            Line::from("  d              delete selected task"),
            Line::from("  q / Esc        quit"),
            Line::from(""),
            Line::from(Span::styled("Task details", Style::default().add_modifier(Modifier::BOLD))),
            Line::from("  n e i u s r    edit name, description, importance, due date, status, RAG"),
            Line::from("  c              cycle status"),
            Line::from(""),
            Line::from(Span::styled("RAG rating", Style::default().add_modifier(Modifier::BOLD))),
            Line::from("  red    overdue and not completed"),
            Line::from("  amber  overdue but completed"),
            Line::from("  green  due today or later"),
            Line::from(""),
            Line::from("Press any key to return"),
        ];
        let paragraph = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title("Help"));
        f.render_widget(paragraph, area);
    }

    fn render_confirm(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Confirm Action")
            .borders(Borders::ALL)
            .style(Style::default().bg(RAG_RED));

        let area = centered_rect(50, 20, area);
        f.render_widget(Clear, area);

        let target = self
            .selected_task()
            .map(|t| format!("Delete task {}: {}", self.selected_number().unwrap_or(0), t.name))
            .unwrap_or_default();
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "Are you sure you want to:",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(target),
            Line::from(""),
            Line::from("Later tasks will be renumbered."),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, area);
    }

    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                AppState::TaskList => format!("Tasks: {} | Press 'h' for help", self.tasks.len()),
                AppState::TaskDetail => "Task Details".to_string(),
                AppState::AddTask => "Add New Task".to_string(),
                AppState::EditField(field) => format!("Edit {}", field.label()),
                AppState::Help => "Help".to_string(),
                AppState::Confirm => "Confirm Action".to_string(),
            }
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(HEADER_BLUE).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());

        match self.state {
            AppState::TaskList => self.render_task_list(f, chunks[0]),
            AppState::TaskDetail => self.render_task_detail(f, chunks[0]),
            AppState::AddTask => {
                self.render_task_list(f, chunks[0]);
                self.render_task_form(f, chunks[0]);
            }
            AppState::EditField(field) => {
                self.render_task_detail(f, chunks[0]);
                self.render_field_editor(f, chunks[0], field);
            }
            AppState::Help => self.render_help(f, chunks[0]),
            AppState::Confirm => {
                self.render_task_list(f, chunks[0]);
                self.render_confirm(f, chunks[0]);
            }
        }

        self.render_status_bar(f, chunks[1]);
    }

    /// Main event loop: draw, then handle input, until the user quits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}
