//! Markdown summary of the sentiment and theme datasets.

use std::collections::BTreeMap;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use cxa_core::{read_csv, DataLayout, SentimentLabel, SentimentRecord};
use cxa_sentiment::ThemeCount;

const LABEL_COLUMNS: [SentimentLabel; 3] = [
    SentimentLabel::Positive,
    SentimentLabel::Negative,
    SentimentLabel::Neutral,
];

/// Render the report body.
///
/// Banks are listed alphabetically; theme rows keep the order of `themes`,
/// which the theme stage writes sorted by `(bank, theme)`.
pub(crate) fn render_report(
    records: &[SentimentRecord],
    themes: &[ThemeCount],
    generated: DateTime<Utc>,
) -> String {
    let mut by_bank: BTreeMap<&str, BTreeMap<SentimentLabel, usize>> = BTreeMap::new();
    for record in records {
        *by_bank
            .entry(record.bank.as_str())
            .or_default()
            .entry(record.distilbert_label)
            .or_default() += 1;
    }

    let mut lines = vec![
        "# Review Analytics Report".to_string(),
        String::new(),
        format!("**Generated**: {}", generated.format("%Y-%m-%d %H:%M UTC")),
        format!("**Reviews**: {}", records.len()),
        String::new(),
        "---".to_string(),
        String::new(),
        "## Classifier sentiment by bank".to_string(),
        String::new(),
        "| Bank | Positive | Negative | Neutral | Total |".to_string(),
        "|------|----------|----------|---------|-------|".to_string(),
    ];

    for (bank, counts) in &by_bank {
        let cells: Vec<String> = LABEL_COLUMNS
            .iter()
            .map(|label| counts.get(label).copied().unwrap_or(0).to_string())
            .collect();
        let total: usize = counts.values().sum();
        lines.push(format!("| {bank} | {} | {total} |", cells.join(" | ")));
    }

    lines.extend([
        String::new(),
        "## Themes by bank".to_string(),
        String::new(),
        "| Bank | Theme | Reviews |".to_string(),
        "|------|-------|---------|".to_string(),
    ]);
    for theme in themes {
        lines.push(format!(
            "| {} | {} | {} |",
            theme.bank, theme.theme, theme.count
        ));
    }

    lines.push(String::new());
    lines.join("\n")
}

/// Write `report.md` from the sentiment dataset and the theme counts.
///
/// # Errors
///
/// Returns an error if either input dataset is missing or unreadable, or the
/// report cannot be written.
pub(crate) fn run_report(layout: &DataLayout) -> anyhow::Result<()> {
    let records: Vec<SentimentRecord> = read_csv(&layout.sentiment_file())
        .context("no sentiment dataset; run `cxa sentiment` first")?;
    let themes: Vec<ThemeCount> = read_csv(&layout.theme_aggregates_file())
        .context("no theme aggregates; run `cxa themes` first")?;

    let path = layout.report_file();
    std::fs::write(&path, render_report(&records, &themes, Utc::now()))
        .with_context(|| format!("failed to write {}", path.display()))?;

    println!("report written to {}", path.display());
    Ok(())
}
