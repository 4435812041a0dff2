//! Terminal rendering of status trees

use colored::*;
use statusci_core::domain::status::{Signal, Status, StatusBody};

/// Presentation parameters
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub now_millis: i64,
    pub age_interval_millis: i64,
}

/// Renders a status and its children, one line per node
pub fn render_tree(status: &Status, options: &RenderOptions) -> String {
    let mut out = String::new();
    render_node(&mut out, status, 0, options);
    out
}

fn render_node(out: &mut String, status: &Status, depth: usize, options: &RenderOptions) {
    let indent = "  ".repeat(depth);
    let mut line = format!("{}{} {}", indent, marker(status), status.name.bold());

    match &status.body {
        StatusBody::Pending => line.push_str(&format!("  {}", "pending".dimmed())),
        StatusBody::Error { kind, message } => {
            line.push_str(&format!("  {}: {}", kind.to_string().red().bold(), message));
        }
        StatusBody::Container(children) => {
            line.push_str(&format!("  {}", format!("{} job(s)", children.len()).dimmed()));
        }
        StatusBody::Leaf(_) => {
            line.push_str(&format!("  {}", colorize_signal(status.signal())));

            if status.computing() {
                let progress = status
                    .progress()
                    .map(|p| format!("building {}%", p))
                    .unwrap_or_else(|| "building".to_string());
                line.push_str(&format!("  {}", progress.cyan()));
            } else if let Some(age) = status.age(options.now_millis, options.age_interval_millis) {
                line.push_str(&format!("  {}", format!("age {}", age).dimmed()));
            }

            if let Some(health) = status.health() {
                line.push_str(&format!("  {}", format!("health {}%", health).dimmed()));
            }
        }
    }

    if status.loading {
        line.push_str(&format!("  {}", "…".dimmed()));
    }

    out.push_str(&line);
    out.push('\n');

    if let Some(children) = status.children() {
        for child in children {
            render_node(out, child, depth + 1, options);
        }
    }
}

fn marker(status: &Status) -> ColoredString {
    match &status.body {
        StatusBody::Container(_) => "▸".cyan(),
        StatusBody::Error { .. } => "✖".red(),
        StatusBody::Pending => "○".dimmed(),
        StatusBody::Leaf(_) => match status.signal() {
            Signal::Success => "●".green(),
            Signal::Warning => "●".yellow(),
            Signal::Error => "●".red(),
            Signal::Unknown | Signal::Undefined => "●".white(),
        },
    }
}

/// Colorize a signal for display
fn colorize_signal(signal: Signal) -> ColoredString {
    let text = signal.to_string().to_uppercase();
    match signal {
        Signal::Success => text.green(),
        Signal::Warning => text.yellow(),
        Signal::Error => text.red(),
        Signal::Unknown | Signal::Undefined => text.white(),
    }
}
