//! Table and detail rendering for the command line.
//!
//! `render_table` builds a fresh [`TableModel`] from a task snapshot; the
//! printers and the TUI both draw from that model, so there is no shared
//! table state between renders.

use crossterm::style::{Color, Stylize};

use crate::fields::Rag;
use crate::task::Task;

pub const HEADERS: [&str; 8] = [
    "T. No.",
    "Task",
    "Importance",
    "Has Description",
    "Date Made",
    "Due Date",
    "Status",
    "RAG rating",
];

/// Cells wider than this are truncated in the printed table.
pub const MAX_CELL_WIDTH: usize = 40;

/// Background used for amber rows (xterm "orange red").
pub const AMBER_RGB: (u8, u8, u8) = (255, 95, 0);

/// One rendered row: display number, rating and the text of each column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub number: usize,
    pub rag: Rag,
    pub cells: [String; 8],
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableModel {
    pub rows: Vec<TableRow>,
}

impl TableModel {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Widest cell (in chars) of each column, headers included, capped at [`MAX_CELL_WIDTH`].
    pub fn column_widths(&self) -> [usize; 8] {
        let mut widths = HEADERS.map(|h| h.chars().count());
        for row in &self.rows {
            for (w, cell) in widths.iter_mut().zip(row.cells.iter()) {
                *w = (*w).max(cell.chars().count().min(MAX_CELL_WIDTH));
            }
        }
        widths
    }
}

/// Build the table for `tasks`, numbered from 1 in the order given.
pub fn render_table(tasks: &[Task]) -> TableModel {
    let rows = tasks
        .iter()
        .enumerate()
        .map(|(i, t)| TableRow {
            number: i + 1,
            rag: t.rag,
            cells: [
                (i + 1).to_string(),
                t.name.clone(),
                t.importance.to_string(),
                format_flag(t.has_description).to_string(),
                t.date_made.to_string(),
                t.due_date.to_string(),
                t.status.to_string(),
                t.rag.to_string(),
            ],
        })
        .collect();
    TableModel { rows }
}

pub fn format_flag(b: bool) -> &'static str {
    if b {
        "True"
    } else {
        "False"
    }
}

/// Print the task table to stdout with one background colour per rating.
pub fn print_table(model: &TableModel) {
    if model.is_empty() {
        println!("No tasks found.");
        return;
    }
    let widths = model.column_widths();
    println!("{}", "Tasks".bold());
    println!("{}", pad_line(&HEADERS.map(String::from), &widths).bold());
    for row in &model.rows {
        let line = pad_line(&row.cells, &widths).with(Color::White);
        let styled = match row.rag {
            Rag::Red => line.on(Color::DarkRed),
            Rag::Amber => {
                let (r, g, b) = AMBER_RGB;
                line.on(Color::Rgb { r, g, b })
            }
            Rag::Green => line.on(Color::DarkGreen),
        };
        println!("{styled}");
    }
}

/// Print every field of one task.
pub fn print_detail(number: usize, task: &Task) {
    println!("{} {}", task.name.as_str().red().bold(), "Task Details".cyan());
    println!("Task Number:      {number}");
    println!(
        "Description:      {}",
        if task.has_description { task.description.as_str() } else { "-" }
    );
    println!("Has Description:  {}", format_flag(task.has_description));
    println!("Importance:       {}", task.importance);
    println!("Date Made:        {}", task.date_made);
    println!("Due Date:         {}", task.due_date);
    println!("Status:           {}", task.status);
    match task.rag_override {
        Some(_) => println!("RAG rating:       {} (set manually)", task.rag),
        None => println!("RAG rating:       {}", task.rag),
    }
}

fn pad_line(cells: &[String; 8], widths: &[usize; 8]) -> String {
    cells
        .iter()
        .zip(widths.iter())
        .map(|(c, &w)| format!("{:<w$}", truncate(c, MAX_CELL_WIDTH)))
        .collect::<Vec<_>>()
        .join("  ")
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}
