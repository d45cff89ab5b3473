//! Local analytics: page-view counter, event log, and search history.
//!
//! Everything lives in the [`LocalStore`]; nothing leaves the machine.
//! All functions are fail-soft and return a default when storage is
//! unavailable.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::SearchFilters;
use crate::store::{LocalStore, KEY_EVENTS, KEY_PAGE_VIEWS, KEY_RECENT_SEARCHES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    PageView,
    ProjectView,
    Search,
    Filter,
    Click,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

pub async fn stored_events(store: &LocalStore) -> Vec<StoredEvent> {
    store.get_json_or(KEY_EVENTS, Vec::new()).await
}

/// Appends an event, keeping only the newest `max_events`.
pub async fn track_event(store: &LocalStore, kind: EventKind, data: Option<serde_json::Value>) {
    let event = StoredEvent {
        kind,
        data,
        timestamp: chrono::Utc::now().timestamp_millis(),
    };
    let max = store.limits().max_events;

    let appended = store
        .update_json(KEY_EVENTS, Vec::<StoredEvent>::new(), |mut events| {
            events.push(event);
            if events.len() > max {
                events.drain(..events.len() - max);
            }
            events
        })
        .await;

    if let Err(e) = appended {
        tracing::warn!("error tracking event: {:#}", e);
    }
}

pub async fn page_view_count(store: &LocalStore) -> u64 {
    match store.get_item(KEY_PAGE_VIEWS).await {
        Ok(Some(raw)) => raw.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Adds exactly one view and returns the new total (0 if storage fails).
pub async fn increment_page_view(store: &LocalStore) -> u64 {
    match store.increment(KEY_PAGE_VIEWS).await {
        Ok(count) => {
            track_event(store, EventKind::PageView, None).await;
            count.max(0) as u64
        }
        Err(e) => {
            tracing::debug!("page view not counted: {:#}", e);
            0
        }
    }
}

/// Most frequent search queries in the event log. Ties keep the order in
/// which each query was first seen.
pub async fn popular_searches(store: &LocalStore, limit: usize) -> Vec<String> {
    popular_from_events(&stored_events(store).await, limit)
}

fn popular_from_events(events: &[StoredEvent], limit: usize) -> Vec<String> {
    let mut order: Vec<String> = Vec::new();
    let mut frequency: HashMap<String, usize> = HashMap::new();

    for event in events.iter().filter(|e| e.kind == EventKind::Search) {
        let Some(query) = event
            .data
            .as_ref()
            .and_then(|d| d.get("query"))
            .and_then(|q| q.as_str())
            .filter(|q| !q.is_empty())
        else {
            continue;
        };
        let count = frequency.entry(query.to_string()).or_insert(0);
        if *count == 0 {
            order.push(query.to_string());
        }
        *count += 1;
    }

    order.sort_by(|a, b| frequency[b].cmp(&frequency[a]));
    order.truncate(limit);
    order
}

pub async fn recent_searches(store: &LocalStore) -> Vec<String> {
    store.get_json_or(KEY_RECENT_SEARCHES, Vec::new()).await
}

/// Moves `query` to the front of the recent list, de-duplicated and capped.
pub async fn record_recent_search(store: &LocalStore, query: &str) -> Vec<String> {
    let query = query.trim();
    if query.is_empty() {
        return recent_searches(store).await;
    }
    let cap = store.limits().max_recent_searches;

    match store
        .update_json(KEY_RECENT_SEARCHES, Vec::new(), |recent| {
            push_recent(recent, query, cap)
        })
        .await
    {
        Ok(recent) => recent,
        Err(e) => {
            tracing::warn!("error saving recent searches: {:#}", e);
            push_recent(recent_searches(store).await, query, cap)
        }
    }
}

fn push_recent(mut recent: Vec<String>, query: &str, cap: usize) -> Vec<String> {
    recent.retain(|q| q != query);
    recent.insert(0, query.to_string());
    recent.truncate(cap);
    recent
}

/// Records a submitted search the same way for every entry point: a
/// `search` event with the query and result count plus the recent-searches
/// entry when the query is not blank, and a `filter` event when any filter
/// is set.
pub async fn record_search(
    store: &LocalStore,
    query: &str,
    filters: &SearchFilters,
    results: usize,
) {
    let query = query.trim();
    if !query.is_empty() {
        track_event(
            store,
            EventKind::Search,
            Some(serde_json::json!({ "query": query, "results": results })),
        )
        .await;
        record_recent_search(store, query).await;
    }
    if !filters.is_empty() {
        track_event(store, EventKind::Filter, serde_json::to_value(filters).ok()).await;
    }
}
