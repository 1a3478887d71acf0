//! Markdown rendering of a [`Report`].

use std::fmt::Write;

use crate::output::{Report, COST_CONFIDENCE};
use crate::Result;

/// Render `report` as a Markdown document.
pub fn to_markdown(report: &Report) -> Result<String> {
    let unit = &report.costs.time_unit;
    let mut out = String::new();

    writeln!(out, "# {}", report.label)?;
    writeln!(out)?;
    if !report.description.is_empty() {
        writeln!(out, "{}", report.description)?;
        writeln!(out)?;
    }

    writeln!(out, "## Tasks")?;
    writeln!(out)?;
    if report.tasks.is_empty() {
        writeln!(out, "_No tasks yet._")?;
    } else {
        writeln!(out, "| Task | Category | Optimistic | Likely | Pessimistic | Estimate |")?;
        writeln!(out, "|---|---|---:|---:|---:|---:|")?;
        for task in &report.tasks {
            let e = &task.estimations;
            writeln!(
                out,
                "| {} | {} | {} | {} | {} | {} ± {} {} |",
                cell(&task.label),
                cell(&task.category_label),
                number(e.optimistic),
                number(e.likely),
                number(e.pessimistic),
                number(task.calculated.weighted_mean),
                number(task.calculated.standard_deviation),
                unit,
            )?;
        }
    }
    writeln!(out)?;

    writeln!(out, "## Estimation")?;
    writeln!(out)?;
    writeln!(out, "| Confidence | Estimate | Range |")?;
    writeln!(out, "|---|---:|---:|")?;
    for interval in report.intervals().into_iter().rev() {
        writeln!(
            out,
            "| {} | {} ± {} {unit} | {} - {} {unit} |",
            interval.level,
            number(interval.mean),
            number(interval.deviation),
            number(interval.min.max(0.0)),
            number(interval.max),
        )?;
    }
    writeln!(out)?;

    let shares: Vec<_> = report
        .category_distribution
        .iter()
        .filter(|d| d.percentage > 0.0)
        .collect();
    if !shares.is_empty() {
        writeln!(out, "## Category repartition")?;
        writeln!(out)?;
        writeln!(out, "| Category | Time | Share |")?;
        writeln!(out, "|---|---:|---:|")?;
        for share in shares {
            writeln!(
                out,
                "| {} | {} {unit} | {:.1}% |",
                cell(&share.category_label),
                number(share.time),
                share.percentage,
            )?;
        }
        writeln!(out)?;
    }

    let currency = &report.costs.currency;
    writeln!(out, "## Costs ({} confidence)", COST_CONFIDENCE)?;
    writeln!(out)?;
    writeln!(
        out,
        "- Maximum: {:.2} {currency} ({} {unit})",
        report.costs.max.cost,
        number(report.costs.max.time),
    )?;
    writeln!(
        out,
        "- Minimum: {:.2} {currency} ({} {unit})",
        report.costs.min.cost,
        number(report.costs.min.time),
    )?;

    Ok(out)
}

/// Whole numbers without decimals, everything else with two.
fn number(value: f64) -> String {
    // Normalizes -0.0, e.g. from ceil(-0.3)
    let value = value + 0.0;
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use guesstimate_core::{Config, Estimation, Task};

    #[test]
    fn test_number() {
        assert_eq!(number(6.0), "6");
        assert_eq!(number(0.745356), "0.75");
        assert_eq!(number((-0.3f64).ceil()), "0");
    }

    #[test]
    fn test_cell_escapes_pipes() {
        assert_eq!(cell("a|b\nc"), "a\\|b c");
    }

    #[test]
    fn test_markdown_sections() {
        let config = Config::default();
        let mut estimation = Estimation::new("Website");
        estimation.description = "Marketing site".to_string();
        let mut task = Task::new("Landing | hero", "development");
        task.set_estimations(2.0, 4.0, 6.0, 0.33);
        estimation.add_task(task).unwrap();

        let md = to_markdown(&Report::build(&estimation, &config)).unwrap();
        assert!(md.starts_with("# Website\n\nMarketing site\n"));
        assert!(md.contains("| Landing \\| hero | Development | 2 | 4 | 6 | 4 ± 1 md |"));
        assert!(md.contains("| 99.7% |"));
        assert!(md.contains("| Development | 4 md | 100.0% |"));
        assert!(!md.contains("| Testing |"));
        assert!(md.contains("## Costs (99.7% confidence)"));
        assert!(md.contains("- Maximum: "));
    }

    #[test]
    fn test_markdown_empty_estimation() {
        let md = to_markdown(&Report::build(&Estimation::new("Empty"), &Config::default())).unwrap();
        assert!(md.contains("_No tasks yet._"));
        assert!(!md.contains("## Category repartition"));
        assert!(md.contains("- Minimum: 0.00 € H.T. (0 md)"));
    }
}
