//! Replace a running container in place.
//!
//! [`Migrator`] inspects the source container, stages the requested files,
//! creates `<name>_newContainer` from the source's configuration, stops the
//! source, starts the replacement, copies the staged files in, and finally
//! swaps the names so the replacement answers to `<name>`.
//!
//! Every step is fail-fast. Nothing already done is undone when a later step
//! fails; the operator cleans up any stranded `_newContainer` or
//! `_oldContainer`.

pub mod merge;
pub mod migrator;
pub mod staging;

pub use hotswap_common::{MigrationPlan, Result, SwapError};
pub use merge::replacement_spec;
pub use migrator::{Migrator, MigratorConfig, SwapOutcome};
pub use staging::StagedFile;
