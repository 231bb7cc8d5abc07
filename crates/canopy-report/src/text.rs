use colored::Colorize;

use canopy_core::diff::{display_path, Change, DiffResult};
use canopy_core::metrics::{LargerSide, Metrics};

/// Format a full comparison report for terminal output.
pub fn format_report(delta: &DiffResult, metrics: &Metrics) -> String {
    let mut out = String::new();

    out.push_str(&format!("\n{}\n", "Canopy - Tree Comparison".bold()));
    out.push_str(&format!("{}\n\n", "=".repeat(40)));

    out.push_str(&format_metrics_section(metrics));

    if delta.is_empty() {
        out.push_str(&format!("\n{}\n", "No differences found!".green().bold()));
    } else {
        out.push_str(&format!(
            "\n{} ({} found)\n{}\n",
            "Differences".red().bold(),
            delta.change_count(),
            "-".repeat(40),
        ));
        out.push_str(&format_category("value_changed", &delta.value_changed));
        out.push_str(&format_category("item_added", &delta.item_added));
        out.push_str(&format_category("item_removed", &delta.item_removed));
    }

    out.push('\n');
    out
}

fn format_category(name: &str, changes: &[Change]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "\n  {}: {} change(s)\n",
        name.bold(),
        changes.len()
    ));
    for change in changes {
        out.push_str(&format!("    {}\n", display_path(&change.path).cyan()));
        if let Some(ref old) = change.old_value {
            out.push_str(&format!("      old: {old}\n"));
        }
        if let Some(ref new) = change.new_value {
            out.push_str(&format!("      new: {new}\n"));
        }
    }
    out
}

fn format_metrics_section(metrics: &Metrics) -> String {
    let mut out = String::new();

    let pct_str = format!("{:.2}%", metrics.difference_percentage);
    let pct_colored = if metrics.difference_percentage == 0.0 {
        pct_str.green()
    } else if metrics.difference_percentage < 10.0 {
        pct_str.yellow()
    } else {
        pct_str.red()
    };
    out.push_str(&format!("{}: {}\n", "Difference".bold(), pct_colored));

    match metrics.larger_side {
        LargerSide::Equal => {
            out.push_str("  Both sides serialize to the same size\n");
        }
        side => {
            out.push_str(&format!(
                "  The {side} side is larger by {:.2}%\n",
                metrics.size_skew_percentage
            ));
        }
    }

    out
}

/// Format a check result for CI use. Returns (text, passed): passed is
/// false when any difference exists.
pub fn format_check(delta: &DiffResult, metrics: &Metrics) -> (String, bool) {
    let passed = delta.is_empty();
    let mut out = format_report(delta, metrics);

    if passed {
        out.push_str(&format!("{}\n", "CHECK PASSED".green().bold()));
    } else {
        out.push_str(&format!(
            "{}: {} difference(s) found\n",
            "CHECK FAILED".red().bold(),
            delta.change_count(),
        ));
    }

    (out, passed)
}
