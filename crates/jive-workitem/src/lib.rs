//! # jive-workitem
//!
//! The work-item hierarchy (forest), the dependency graph (DAG) over it, and the progress/
//! analytics engine built on top of both. Everything here is namespace-scoped and talks to
//! storage exclusively through [`jive_store::StoreAdapter`].

#![warn(missing_docs, missing_debug_implementations, clippy::all)]
#![deny(unsafe_code)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

mod config;
mod error;
mod graph;
mod model;
mod progress;
mod query;
mod repository;

pub use config::WorkItemConfig;
pub use error::{WorkItemError, WorkItemResult};
pub use model::{
    Complexity, DependencyType, ExecutionLog, ExecutionState, ItemType, Milestone, NewWorkItem,
    Priority, ProgressEvent, WorkItem, WorkItemDependency, WorkItemPatch, WorkItemStatus,
};
pub use progress::{AnalyticsReport, GroupBy, MilestoneOutcome, ProgressEngine, ProgressReport, ReportGroup, TimePeriod};
pub use query::{DeleteMode, Direction, GraphViolation, SortField, ValidationScope, WorkItemListFilter, WorkItemOutcome};
pub use repository::WorkItemRepository;
