//! Input and output column schema
//!
//! Every column name the pipeline touches is defined here, so projection,
//! merging and export cannot drift apart.

/// Sheet read from the uploaded workbook
pub const SOURCE_SHEET: &str = "opportunities";

pub const CONTACT_NAME: &str = "Contact Name";
pub const OPPORTUNITY_NAME: &str = "Opportunity Name";
pub const MILESTONE: &str = "Milestone";
pub const GBP_VALUE: &str = "GBP Value";
pub const CLOSE_DATE: &str = "Close Date";
pub const OWNER: &str = "Owner";
pub const UPDATED: &str = "Updated";
pub const STATUS: &str = "Status";
pub const ALERT: &str = "Alert";

/// Columns the source sheet must provide
pub const REQUIRED_COLUMNS: [&str; 8] = [
    CONTACT_NAME,
    OPPORTUNITY_NAME,
    MILESTONE,
    GBP_VALUE,
    CLOSE_DATE,
    OWNER,
    UPDATED,
    STATUS,
];

/// Fixed leading columns of the forecast table; month columns follow
pub const OUTPUT_COLUMNS: [&str; 7] = [
    CONTACT_NAME,
    OPPORTUNITY_NAME,
    MILESTONE,
    OWNER,
    UPDATED,
    STATUS,
    ALERT,
];

/// Download file name and its single worksheet
pub const EXPORT_FILE_NAME: &str = "forecast_data.xlsx";
pub const EXPORT_SHEET: &str = "Sheet1";

/// Pattern a melted column label must match to count as a month
pub const MONTH_KEY_PATTERN: &str = r"^\d{4}-\d{2}$";
