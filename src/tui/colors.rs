//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::Rag;
use crate::render::AMBER_RGB;

// Row backgrounds follow the RAG rating so overdue work stands out.

/// Overdue and not yet completed
pub const RAG_RED: Color = Color::Rgb(150, 0, 0);
/// Overdue but completed
pub const RAG_AMBER: Color = Color::Rgb(AMBER_RGB.0, AMBER_RGB.1, AMBER_RGB.2);
/// On track
pub const RAG_GREEN: Color = Color::Rgb(0, 95, 0);
/// Header and status bar background
pub const HEADER_BLUE: Color = Color::Rgb(0, 40, 100);

pub fn rag_color(rag: Rag) -> Color {
    match rag {
        Rag::Red => RAG_RED,
        Rag::Amber => RAG_AMBER,
        Rag::Green => RAG_GREEN,
    }
}
