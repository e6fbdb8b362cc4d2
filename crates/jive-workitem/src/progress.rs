//! The Progress/Analytics Engine (C10): `track`, `get_report`, `set_milestone`, `get_analytics`.
//!
//! All aggregation is computed on demand from stored `ProgressEvent`/`WorkItem` rows; there is
//! no materialized view.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use jive_core::Namespace;
use jive_store::{Filter, Page, Row, StoreAdapter, Table};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{WorkItemError, WorkItemResult};
use crate::model::{Milestone, ProgressEvent, WorkItemStatus};
use crate::repository::WorkItemRepository;

/// Grouping key for `get_report`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    /// Group by `status`.
    Status,
    /// Group by `priority`.
    Priority,
    /// Group by `item_type`.
    ItemType,
}

/// A single group's rollup in a report.
#[derive(Debug, Clone)]
pub struct ReportGroup {
    /// The group's key, e.g. `"in_progress"`.
    pub key: String,
    /// Number of items in this group.
    pub count: usize,
    /// Average `progress_percentage` across the group.
    pub average_progress: f64,
}

/// Output of `get_report`.
#[derive(Debug, Clone)]
pub struct ProgressReport {
    /// One entry per distinct group-by value.
    pub groups: Vec<ReportGroup>,
    /// Flattened event history, present only when requested.
    pub history: Option<Vec<ProgressEvent>>,
}

/// An inclusive time window; either bound may be open.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimePeriod {
    /// Earliest timestamp to include.
    pub since: Option<DateTime<Utc>>,
    /// Latest timestamp to include.
    pub until: Option<DateTime<Utc>>,
}

impl TimePeriod {
    fn contains(&self, at: DateTime<Utc>) -> bool {
        self.since.is_none_or(|since| at >= since) && self.until.is_none_or(|until| at <= until)
    }
}

/// Output of `get_analytics`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalyticsReport {
    /// Item counts keyed by `status`.
    pub counts_by_status: HashMap<String, usize>,
    /// Fraction of items in `completed` status.
    pub completion_rate: f64,
    /// Average hours from first `in_progress` event to first `completed` event, per item.
    pub average_cycle_time_hours: Option<f64>,
    /// Completed items per week within the requested period.
    pub velocity_per_week: f64,
}

/// A stored milestone plus its computed distance to target.
#[derive(Debug, Clone)]
pub struct MilestoneOutcome {
    /// The persisted milestone.
    pub milestone: Milestone,
    /// Days until `target_date`; negative if the date has passed.
    pub days_to_target: i64,
}

/// The progress/analytics engine, layered over a [`WorkItemRepository`] and the raw store.
pub struct ProgressEngine {
    adapter: Arc<dyn StoreAdapter>,
    repository: Arc<WorkItemRepository>,
}

impl std::fmt::Debug for ProgressEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressEngine").field("repository", &self.repository).finish_non_exhaustive()
    }
}

impl ProgressEngine {
    /// Build an engine sharing the given store and repository.
    #[must_use]
    pub fn new(adapter: Arc<dyn StoreAdapter>, repository: Arc<WorkItemRepository>) -> Self {
        Self { adapter, repository }
    }

    /// Record a progress update: appends a `ProgressEvent`, updates the live work item, and
    /// rolls the change up through its ancestor chain.
    pub async fn track(
        &self,
        namespace: &Namespace,
        entity_id: &str,
        entity_type: &str,
        progress_percentage: u8,
        status: Option<WorkItemStatus>,
        notes: String,
        blockers: Vec<String>,
    ) -> WorkItemResult<ProgressEvent> {
        let event = ProgressEvent {
            id: Uuid::new_v4().to_string(),
            namespace: namespace.clone(),
            entity_id: entity_id.to_string(),
            entity_type: entity_type.to_string(),
            progress_percentage,
            status: status.map_or_else(String::new, |s| format!("{s:?}")),
            notes,
            blockers,
            recorded_at: Utc::now().to_rfc3339(),
        };
        self.adapter
            .upsert(namespace, Table::ProgressEvent, vec![event_to_row(&event)?])
            .await?;

        if entity_type == "work_item" {
            self.repository.set_progress(namespace, entity_id, progress_percentage, status).await?;
            for ancestor in self.repository.get_ancestors(namespace, entity_id).await?.into_iter().rev() {
                self.repository.rollup_progress(namespace, &ancestor.id).await?;
            }
        }

        Ok(event)
    }

    /// Aggregate current work-item snapshots by `group_by`, optionally flattening event
    /// history for every matched item.
    pub async fn get_report(
        &self,
        namespace: &Namespace,
        group_by: GroupBy,
        include_history: bool,
    ) -> WorkItemResult<ProgressReport> {
        let items = self
            .repository
            .list(
                namespace,
                &crate::query::WorkItemListFilter::default(),
                crate::query::SortField::CreatedAt,
                false,
                100_000,
                0,
            )
            .await?;

        let mut buckets: HashMap<String, Vec<u8>> = HashMap::new();
        for item in &items {
            let key = match group_by {
                GroupBy::Status => format!("{:?}", item.status),
                GroupBy::Priority => format!("{:?}", item.priority),
                GroupBy::ItemType => format!("{:?}", item.item_type),
            };
            buckets.entry(key).or_default().push(item.progress_percentage);
        }

        let mut groups: Vec<ReportGroup> = buckets
            .into_iter()
            .map(|(key, values)| {
                #[allow(clippy::cast_precision_loss)]
                let average = values.iter().map(|v| f64::from(*v)).sum::<f64>() / values.len() as f64;
                ReportGroup { key, count: values.len(), average_progress: average }
            })
            .collect();
        groups.sort_by(|a, b| a.key.cmp(&b.key));

        let history = if include_history {
            let rows = self
                .adapter
                .scan(namespace, Table::ProgressEvent, Filter::all(), Page::new(100_000, 0), None)
                .await?;
            Some(rows.into_iter().map(row_to_event).collect::<WorkItemResult<Vec<_>>>()?)
        } else {
            None
        };

        Ok(ProgressReport { groups, history })
    }

    /// Persist a milestone and compute its distance to `target_date`.
    pub async fn set_milestone(&self, namespace: &Namespace, milestone: Milestone) -> WorkItemResult<MilestoneOutcome> {
        let target = DateTime::parse_from_rfc3339(&milestone.target_date)
            .map_err(|e| WorkItemError::InvalidInput(format!("invalid target_date: {e}")))?
            .with_timezone(&Utc);
        let days_to_target = (target - Utc::now()).num_days();

        let mut value = serde_json::to_value(&milestone).map_err(|e| WorkItemError::InvalidInput(e.to_string()))?;
        if let Some(object) = value.as_object_mut() {
            object.insert("updated_at".to_string(), serde_json::Value::String(milestone.created_at.clone()));
        }
        let row = Row::from_value(value).map_err(WorkItemError::InvalidInput)?;
        self.adapter.upsert(namespace, Table::Milestone, vec![row]).await?;

        Ok(MilestoneOutcome { milestone, days_to_target })
    }

    /// Status counts, completion rate, average cycle time, and weekly velocity over `period`.
    pub async fn get_analytics(&self, namespace: &Namespace, period: TimePeriod) -> WorkItemResult<AnalyticsReport> {
        let items = self
            .repository
            .list(
                namespace,
                &crate::query::WorkItemListFilter::default(),
                crate::query::SortField::CreatedAt,
                false,
                100_000,
                0,
            )
            .await?;

        let mut counts_by_status: HashMap<String, usize> = HashMap::new();
        for item in &items {
            *counts_by_status.entry(format!("{:?}", item.status)).or_insert(0) += 1;
        }
        #[allow(clippy::cast_precision_loss)]
        let completion_rate = if items.is_empty() {
            0.0
        } else {
            *counts_by_status.get("Completed").unwrap_or(&0) as f64 / items.len() as f64
        };

        let rows = self
            .adapter
            .scan(namespace, Table::ProgressEvent, Filter::all(), Page::new(100_000, 0), None)
            .await?;
        let events: Vec<ProgressEvent> = rows.into_iter().map(row_to_event).collect::<WorkItemResult<_>>()?;

        let mut first_in_progress: HashMap<String, DateTime<Utc>> = HashMap::new();
        let mut first_completed: HashMap<String, DateTime<Utc>> = HashMap::new();
        let mut completions_in_period = 0usize;

        for event in &events {
            let Ok(recorded_at) = DateTime::parse_from_rfc3339(&event.recorded_at) else { continue };
            let recorded_at = recorded_at.with_timezone(&Utc);
            if event.status.eq_ignore_ascii_case("inprogress") || event.status.eq_ignore_ascii_case("in_progress") {
                first_in_progress.entry(event.entity_id.clone()).or_insert(recorded_at);
            }
            if event.status.eq_ignore_ascii_case("completed") {
                first_completed.entry(event.entity_id.clone()).or_insert(recorded_at);
                if period.contains(recorded_at) {
                    completions_in_period += 1;
                }
            }
        }

        let cycle_times: Vec<f64> = first_completed
            .iter()
            .filter_map(|(id, completed_at)| {
                first_in_progress.get(id).map(|started_at| (*completed_at - *started_at).num_minutes() as f64 / 60.0)
            })
            .collect();
        #[allow(clippy::cast_precision_loss)]
        let average_cycle_time_hours = if cycle_times.is_empty() {
            None
        } else {
            Some(cycle_times.iter().sum::<f64>() / cycle_times.len() as f64)
        };

        let weeks = match (period.since, period.until) {
            (Some(since), Some(until)) => ((until - since).num_days() as f64 / 7.0).max(1.0 / 7.0),
            _ => 1.0,
        };
        #[allow(clippy::cast_precision_loss)]
        let velocity_per_week = completions_in_period as f64 / weeks;

        Ok(AnalyticsReport {
            counts_by_status,
            completion_rate,
            average_cycle_time_hours,
            velocity_per_week,
        })
    }
}

/// `ProgressEvent` is append-only and has no `updated_at` of its own; mirror `recorded_at` into
/// it so it satisfies the store's row model.
fn event_to_row(event: &ProgressEvent) -> WorkItemResult<Row> {
    let mut value = serde_json::to_value(event).map_err(|e| WorkItemError::InvalidInput(e.to_string()))?;
    if let Some(object) = value.as_object_mut() {
        object.insert("updated_at".to_string(), serde_json::Value::String(event.recorded_at.clone()));
    }
    Row::from_value(value).map_err(WorkItemError::InvalidInput)
}

fn row_to_event(row: Row) -> WorkItemResult<ProgressEvent> {
    serde_json::from_value(row.into_value()).map_err(|e| WorkItemError::InvalidInput(e.to_string()))
}
