//! Forecast engine: projection, pivot, descriptive merge, staleness

pub mod merge;
pub mod pivot;
pub mod projection;
pub mod transformer;

pub use merge::{build_descriptors, is_stale};
pub use pivot::{pivot, PivotRow, PivotTable};
pub use projection::{project, ColumnMap};
pub use transformer::{build_forecast, ProjectionStats, Transformer};
