/// Loading and saving snapshots of the external system of record.
pub mod snapshot;
pub use snapshot::{Format, LoadError, Snapshot};
