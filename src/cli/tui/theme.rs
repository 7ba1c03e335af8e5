use console::style;
use inquire::ui::{Attributes, Color, RenderConfig, StyleSheet, Styled};
use std::path::Path;

pub fn shelfsearch_theme() -> RenderConfig<'static> {
    RenderConfig {
        prompt_prefix: Styled::new("›").with_fg(Color::LightGreen),
        highlighted_option_prefix: Styled::new("▸").with_fg(Color::LightGreen),
        answer: StyleSheet::new()
            .with_fg(Color::LightYellow)
            .with_attr(Attributes::BOLD),
        help_message: StyleSheet::new()
            .with_fg(Color::DarkGrey)
            .with_attr(Attributes::ITALIC),
        ..Default::default()
    }
}

/// Header shown once when the interactive menu starts.
pub fn print_banner(source: &Path, model: &str) {
    let rule = style("─".repeat(48)).dim();
    println!();
    println!("  {}", rule);
    println!(
        "  {}  {}",
        style("📚").green(),
        style("shelfsearch").green().bold()
    );
    println!(
        "  {} {}   {} {}",
        style("library").dim(),
        source.display(),
        style("model").dim(),
        model
    );
    println!("  {}", rule);
    println!();
}

pub fn print_success(message: &str) {
    println!("  {} {}", style("✓").green(), message);
}

pub fn print_warning(message: &str) {
    println!("  {} {}", style("!").yellow().bold(), style(message).yellow());
}

pub fn print_error(message: &str) {
    eprintln!("  {} {}", style("✗").red().bold(), message);
}
