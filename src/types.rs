use chrono::{Datelike, NaiveDateTime};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A single spreadsheet cell as read by the loader
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Cell rendered as text, `None` for empty cells
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) if s.trim().is_empty() => None,
            Cell::Text(s) => Some(s.trim().to_string()),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                Some(format!("{}", *n as i64))
            }
            Cell::Number(n) => Some(n.to_string()),
            Cell::Bool(b) => Some(b.to_string()),
            Cell::DateTime(dt) => Some(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }
}

/// Row-oriented contents of one worksheet: a header row plus data rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl SheetTable {
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of a header, ignoring surrounding whitespace
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    /// Cell at (row, col); short rows read as empty
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        const EMPTY: &Cell = &Cell::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(EMPTY)
    }
}

/// Calendar month key, displayed as `YYYY-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn from_datetime(dt: &NaiveDateTime) -> Self {
        Self {
            year: dt.year(),
            month: dt.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| format!("Invalid year-month '{}'", s))?;
        if year.len() != 4 || month.len() != 2 {
            return Err(format!("Invalid year-month '{}'", s));
        }
        let year: i32 = year
            .parse()
            .map_err(|_| format!("Invalid year in '{}'", s))?;
        let month: u32 = month
            .parse()
            .map_err(|_| format!("Invalid month in '{}'", s))?;
        if !(1..=12).contains(&month) {
            return Err(format!("Month out of range in '{}'", s));
        }
        Ok(Self { year, month })
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One projected source row with dates normalized
#[derive(Debug, Clone, PartialEq)]
pub struct Opportunity {
    pub contact: String,
    pub opportunity: String,
    pub milestone: Option<String>,
    pub value: f64,
    pub close_date: Option<NaiveDateTime>,
    pub owner: Option<String>,
    pub updated: Option<NaiveDateTime>,
    pub status: Option<String>,
}

/// Descriptive attributes merged onto forecast rows by contact name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Descriptor {
    pub milestone: Option<String>,
    pub owner: Option<String>,
    pub updated: Option<NaiveDateTime>,
    pub status: Option<String>,
}

/// One output row, keyed by (contact, opportunity)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRow {
    pub contact: String,
    pub opportunity: String,
    pub milestone: Option<String>,
    pub owner: Option<String>,
    pub updated: Option<NaiveDateTime>,
    pub status: Option<String>,
    pub alert: bool,
    /// Aligned with `ForecastTable::months`
    pub values: Vec<f64>,
}

impl ForecastRow {
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// The wide forecast: one value column per month, ascending
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForecastTable {
    pub months: Vec<YearMonth>,
    pub rows: Vec<ForecastRow>,
}

impl ForecastTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn find(&self, contact: &str, opportunity: &str) -> Option<&ForecastRow> {
        self.rows
            .iter()
            .find(|r| r.contact == contact && r.opportunity == opportunity)
    }

    /// Value for a row and month label such as `2024-01`
    pub fn value(&self, row: &ForecastRow, month: &str) -> Option<f64> {
        let ym: YearMonth = month.parse().ok()?;
        let idx = self.months.iter().position(|m| *m == ym)?;
        row.values.get(idx).copied()
    }

    /// Column headers in output order (identity and descriptive first)
    pub fn column_names(&self) -> Vec<String> {
        let mut names: Vec<String> = crate::schema::OUTPUT_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .collect();
        names.extend(self.months.iter().map(|m| m.to_string()));
        names
    }
}

/// Sum of all forecast values for a single month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    pub month: String,
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_year_month_display_zero_pads() {
        assert_eq!(YearMonth::new(2024, 1).to_string(), "2024-01");
        assert_eq!(YearMonth::new(999, 12).to_string(), "0999-12");
    }

    #[test]
    fn test_year_month_from_datetime() {
        let dt = NaiveDate::from_ymd_opt(2025, 11, 30)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap();
        assert_eq!(YearMonth::from_datetime(&dt), YearMonth::new(2025, 11));
    }

    #[test]
    fn test_year_month_ordering_is_chronological() {
        let mut months = vec![
            YearMonth::new(2025, 1),
            YearMonth::new(2024, 12),
            YearMonth::new(2024, 2),
        ];
        months.sort();
        assert_eq!(
            months,
            vec![
                YearMonth::new(2024, 2),
                YearMonth::new(2024, 12),
                YearMonth::new(2025, 1)
            ]
        );
    }

    #[test]
    fn test_year_month_parse() {
        assert_eq!("2024-03".parse::<YearMonth>(), Ok(YearMonth::new(2024, 3)));
        assert!("2024-3".parse::<YearMonth>().is_err());
        assert!("2024-13".parse::<YearMonth>().is_err());
        assert!("Status".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_cell_as_text() {
        assert_eq!(Cell::Empty.as_text(), None);
        assert_eq!(Cell::Text("  ".to_string()).as_text(), None);
        assert_eq!(Cell::Text(" Acme ".to_string()).as_text(), Some("Acme".to_string()));
        assert_eq!(Cell::Number(42.0).as_text(), Some("42".to_string()));
        assert_eq!(Cell::Number(1.5).as_text(), Some("1.5".to_string()));
    }

    #[test]
    fn test_sheet_table_short_rows_read_empty() {
        let mut table = SheetTable::new("s", vec!["A".into(), "B".into()]);
        table.add_row(vec![Cell::Number(1.0)]);
        assert_eq!(table.cell(0, 1), &Cell::Empty);
        assert_eq!(table.cell(5, 0), &Cell::Empty);
        assert_eq!(table.column_index(" B"), None);
        assert_eq!(table.column_index("B"), Some(1));
    }
}
