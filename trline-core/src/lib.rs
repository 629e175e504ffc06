pub mod config;
pub mod dates;
pub mod delay;
pub mod export;
pub mod ingest;
pub mod milestone;
pub mod models;
pub mod palette;
pub mod sample;
pub mod snapshot;
pub mod span;
pub mod timeline;

// Re-export commonly used types
pub use config::{get_config_path, ConfigError, TimelineConfig};
pub use dates::{normalize, RawValue};
pub use delay::compute_delay;
pub use export::ExportFormat;
pub use ingest::{load_or_sample, load_records, DataSource, Dataset, IngestionError};
pub use milestone::{DateSlot, Milestone};
pub use models::{GlobalTimeline, MilestoneObservation, ProjectTimeline, RawProjectRecord};
pub use palette::{Palette, Rgb};
pub use sample::sample_records;
pub use snapshot::{Marker, ProjectRow, TimelineSnapshot, TimelineView, ViewRequest};
pub use span::{resolve_span, Span, SpanPolicy};
pub use timeline::{build_timelines, monthly_ticks, tick_label};
