//! Toast notification queue.

use serde::Serialize;
use std::time::{Duration, Instant};

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, Serialize)]
pub struct Toast {
    pub id: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: ToastKind,
    /// `None` means sticky: only an explicit dismiss removes it.
    #[serde(skip)]
    pub expires_at: Option<Instant>,
}

#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a toast. `duration` of `None` uses the default; a zero
    /// duration makes it sticky. Returns the toast id.
    pub fn push(
        &mut self,
        kind: ToastKind,
        message: impl Into<String>,
        duration: Option<Duration>,
        now: Instant,
    ) -> String {
        let duration = duration.unwrap_or(DEFAULT_TOAST_DURATION);
        let expires_at = if duration.is_zero() {
            None
        } else {
            Some(now + duration)
        };
        let id = uuid::Uuid::new_v4().to_string();
        self.toasts.push(Toast {
            id: id.clone(),
            message: message.into(),
            kind,
            expires_at,
        });
        id
    }

    pub fn dismiss(&mut self, id: &str) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    /// Drops expired toasts and returns how many were removed.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.toasts.len();
        self.toasts
            .retain(|t| t.expires_at.map_or(true, |deadline| now < deadline));
        before - self.toasts.len()
    }

    /// Time until the next toast expires, for scheduling a wakeup.
    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        self.toasts
            .iter()
            .filter_map(|t| t.expires_at)
            .min()
            .map(|d| d.saturating_duration_since(now))
    }

    pub fn visible(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_dismiss_after_default() {
        let start = Instant::now();
        let mut q = ToastQueue::new();
        q.push(ToastKind::Success, "Link copied", None, start);
        assert_eq!(q.expire(start + Duration::from_millis(2999)), 0);
        assert_eq!(q.expire(start + Duration::from_millis(3000)), 1);
        assert!(q.is_empty());
    }

    #[test]
    fn test_sticky_toast() {
        let start = Instant::now();
        let mut q = ToastQueue::new();
        let id = q.push(ToastKind::Error, "Failed", Some(Duration::ZERO), start);
        assert_eq!(q.expire(start + Duration::from_secs(3600)), 0);
        assert_eq!(q.next_deadline(start), None);
        assert!(q.dismiss(&id));
        assert!(!q.dismiss(&id));
    }

    #[test]
    fn test_next_deadline_is_soonest() {
        let start = Instant::now();
        let mut q = ToastQueue::new();
        q.push(ToastKind::Info, "a", Some(Duration::from_millis(5000)), start);
        q.push(ToastKind::Info, "b", Some(Duration::from_millis(1000)), start);
        assert_eq!(q.next_deadline(start), Some(Duration::from_millis(1000)));
        assert_eq!(q.visible().len(), 2);
    }
}
