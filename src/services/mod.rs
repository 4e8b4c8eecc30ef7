mod exporter;

pub use exporter::{ExportFormat, Exporter};
