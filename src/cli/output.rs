//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.
//! Status lines go to stderr so snapshot JSON on stdout stays pipeable.

use colored::Colorize;

use crate::domain::NodeCounts;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark) to stderr
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{} {}", "✓".green(), msg);
}

/// Print failure status (red X) to stderr
pub fn failure(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print completed action (green label) to stderr
pub fn action(label: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", label.green(), msg);
}

/// Print indented detail (no color) to stderr
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("  {}", msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print plain output (no color, for data)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// Print node totals, one rank per line
pub fn counts(counts: &NodeCounts) {
    println!("{:<10}{}", "Programs".blue(), counts.programs);
    println!("{:<10}{}", "Phases".blue(), counts.phases);
    println!("{:<10}{}", "Blocks".green(), counts.blocks);
    println!("{:<10}{}", "Total".bold(), counts.total());
}
