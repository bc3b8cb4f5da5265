//! Fixed-width text view of the forecast table

use crate::types::{ForecastRow, ForecastTable};

/// Format a money cell with two decimals
pub fn format_money(value: f64) -> String {
    format!("{:.2}", value)
}

fn row_cells(table: &ForecastTable, row: &ForecastRow) -> Vec<String> {
    let mut cells = vec![
        row.contact.clone(),
        row.opportunity.clone(),
        row.milestone.clone().unwrap_or_default(),
        row.owner.clone().unwrap_or_default(),
        row.updated
            .map(|u| u.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default(),
        row.status.clone().unwrap_or_default(),
        if row.alert { "YES".to_string() } else { String::new() },
    ];
    cells.extend(row.values.iter().take(table.months.len()).map(|v| format_money(*v)));
    cells
}

/// Render header plus rows, columns padded to their widest cell
pub fn render_table_text(table: &ForecastTable) -> String {
    let headers = table.column_names();
    let body: Vec<Vec<String>> = table.rows.iter().map(|r| row_cells(table, r)).collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for cells in &body {
        for (idx, cell) in cells.iter().enumerate() {
            if let Some(w) = widths.get_mut(idx) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let numeric_from = headers.len() - table.months.len();
    let format_line = |cells: &[String]| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(idx, cell)| {
                let width = widths.get(idx).copied().unwrap_or(0);
                if idx >= numeric_from {
                    format!("{:>width$}", cell, width = width)
                } else {
                    format!("{:<width$}", cell, width = width)
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut output = String::new();
    output.push_str(&format_line(&headers));
    output.push('\n');
    let rule_len = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    output.push_str(&"─".repeat(rule_len));
    output.push('\n');
    for cells in &body {
        output.push_str(&format_line(cells));
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::YearMonth;

    #[test]
    fn test_render_header_only_for_empty_table() {
        let text = render_table_text(&ForecastTable::default());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Contact Name"));
        assert!(lines[0].ends_with("Alert"));
    }

    #[test]
    fn test_render_rows_and_month_columns() {
        let table = ForecastTable {
            months: vec![YearMonth::new(2024, 1)],
            rows: vec![ForecastRow {
                contact: "Acme".to_string(),
                opportunity: "Deal1".to_string(),
                milestone: None,
                owner: Some("Sam".to_string()),
                updated: None,
                status: None,
                alert: true,
                values: vec![150.0],
            }],
        };
        let text = render_table_text(&table);
        assert!(text.contains("2024-01"));
        assert!(text.contains("150.00"));
        assert!(text.contains("YES"));
        assert_eq!(text.lines().count(), 3);
    }
}
