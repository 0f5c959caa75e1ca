pub mod vfs;
pub mod byte_compare;
pub mod reconcile;
pub mod filter;
pub mod report;
pub mod scheduler;

pub use vfs::LocalVfs;
pub use byte_compare::ByteComparator;
pub use reconcile::reconcile;
pub use filter::EntryFilter;
pub use report::{MemorySink, ReportSink, WriterSink};
pub use scheduler::{ComparisonScheduler, RunSummary};
