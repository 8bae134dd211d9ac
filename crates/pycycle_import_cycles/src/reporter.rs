use std::io::{self, Write};

use colored::{ColoredString, Colorize};
use log::debug;
use pycycle_core::ImportKind;

use crate::{
    export::GraphDict,
    types::{CheckResult, Cycle, Severity},
};

fn paint(severity: Severity, text: &str) -> ColoredString {
    match severity {
        Severity::Bad => text.red().bold(),
        Severity::Complicated => text.yellow(),
        Severity::Good => text.green(),
        Severity::Skip => text.dimmed(),
    }
}

fn format_tags(tags: &[ImportKind]) -> String {
    tags.iter().map(ImportKind::as_str).collect::<Vec<_>>().join(", ")
}

/// Writes the exported graph as JSON.
pub fn print_graph_json<W: Write>(
    writer: &mut W,
    graph: &GraphDict,
    compact: bool,
) -> io::Result<()> {
    debug!("Printing graph of {} modules as JSON", graph.len());
    if compact {
        serde_json::to_writer(&mut *writer, graph)?;
    } else {
        serde_json::to_writer_pretty(&mut *writer, graph)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

pub fn print_no_cycles_message<W: Write>(writer: &mut W, result: &CheckResult) -> io::Result<()> {
    debug!("No cycles detected");
    writeln!(
        writer,
        "{} No import cycles in '{}' ({} modules)",
        "✓".green().bold(),
        result.package,
        result.modules_analyzed
    )?;
    writer.flush()?;
    Ok(())
}

/// Writes all cycles grouped by severity, most severe first, followed by a summary.
pub fn print_cycles_tree<W: Write>(writer: &mut W, result: &CheckResult) -> io::Result<()> {
    debug!("Printing cycles tree for {} cycles", result.cycles.len());
    writeln!(
        writer,
        "{} Import cycles detected in '{}'\n",
        "⚠".yellow().bold(),
        result.package.bold()
    )?;

    for severity in Severity::ALL {
        let cycles: Vec<&Cycle> = result.cycles.iter().filter(|c| c.severity == severity).collect();
        if cycles.is_empty() {
            continue;
        }
        writeln!(writer, "{} ({})", paint(severity, severity.as_str()), cycles.len())?;

        for (idx, cycle) in cycles.iter().enumerate() {
            let prefix = if idx == cycles.len() - 1 { "└──" } else { "├──" };
            let (first, second) = &cycle.modules;
            writeln!(
                writer,
                "{}  {} {} {}  [{} | {}]",
                prefix.dimmed(),
                first.as_str().blue(),
                "⇄".dimmed(),
                second.as_str().blue(),
                format_tags(&cycle.forward),
                format_tags(&cycle.backward)
            )?;
        }
        writeln!(writer)?;
    }

    print_summary(writer, result)?;

    writer.flush()?;
    Ok(())
}

fn print_summary<W: Write>(writer: &mut W, result: &CheckResult) -> io::Result<()> {
    writeln!(writer, "{}", "─".repeat(60).dimmed())?;
    writeln!(writer, "{}", "Summary".bold())?;
    writeln!(writer, "  Total cycles: {}", result.cycles.len().to_string().yellow().bold())?;
    for severity in Severity::ALL {
        let count = result.count(severity);
        if count > 0 {
            writeln!(writer, "    {}: {}", paint(severity, severity.as_str()), count)?;
        }
    }
    writeln!(writer, "  Modules analyzed: {}", result.modules_analyzed)?;
    Ok(())
}
