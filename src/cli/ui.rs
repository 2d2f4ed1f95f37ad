use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::core::currency::format_amount;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Label,
    Amount,
    Warning,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Label => style(text).bold(),
        StyleType::Amount => style(text).green().bold(),
        StyleType::Warning => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Right-aligned cell for a derived metric, shown as a whole number.
pub fn metric_cell(value: f64) -> Cell {
    Cell::new(format_amount(value, 0)).set_alignment(CellAlignment::Right)
}

/// Right-aligned cell for an exchange rate, shown with four decimals.
pub fn rate_cell(rate: f64) -> Cell {
    Cell::new(format!("{rate:.4}")).set_alignment(CellAlignment::Right)
}

/// Dim cell showing the formula a metric was derived with.
pub fn formula_cell(text: &str) -> Cell {
    Cell::new(text).fg(Color::DarkGrey)
}

/// Creates a spinner shown while the exchange-rate fetch is in flight.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Prints a separator line matching the terminal width.
pub fn print_separator() {
    let term_width = console::Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80);
    println!("\n{}", "─".repeat(term_width));
}
