//! # Task System Core Trait
//!
//! A [`Task`] is a self-contained unit of work. It is moved to a worker thread,
//! consumed by [`Task::process`], and its output is moved back to the thread
//! that submitted it.
//!
//! ## Task Lifecycle
//! 1. A task is created on the main thread and owns every piece of data it needs
//! 2. It is sent to a worker through a [`super::TaskChannel`]
//! 3. `process()` runs on the worker and produces the output
//! 4. The output is received on the main thread by polling the channel
//!
//! ## Thread Safety
//! - Tasks and their outputs must be `Send`
//! - Tasks never share mutable state with the main thread

/// A unit of work that can be executed on a background worker.
///
/// # Implementation Guidelines
/// - Should be relatively coarse-grained to amortize the channel round trip
/// - Should own its input instead of referencing data modified elsewhere
pub trait Task: Send + 'static {
    /// What the task hands back to the main thread.
    type Output: Send + 'static;

    /// Processes the task on the worker thread.
    fn process(self) -> Self::Output;
}
