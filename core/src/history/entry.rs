//! History entries and the bounded most-recent-first list

use crate::calc::{integral_latex, CalculationRequest, IntegralKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One past calculation.
///
/// Field names on disk match the browser client's local storage format so
/// exported histories load unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "funcStr")]
    pub expression: String,
    #[serde(rename = "type")]
    pub kind: IntegralKind,
    #[serde(rename = "lowerStr", default)]
    pub lower_bound: String,
    #[serde(rename = "upperStr", default)]
    pub upper_bound: String,
    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    /// Create a new entry stamped with the current time
    pub fn new(
        expression: impl Into<String>,
        kind: IntegralKind,
        lower_bound: impl Into<String>,
        upper_bound: impl Into<String>,
    ) -> Self {
        Self {
            expression: expression.into(),
            kind,
            lower_bound: lower_bound.into(),
            upper_bound: upper_bound.into(),
            timestamp: Utc::now(),
        }
    }

    /// Entry recording a submitted request
    pub fn from_request(request: &CalculationRequest) -> Self {
        Self::new(
            request.expression.clone(),
            request.kind,
            request.lower_bound.clone(),
            request.upper_bound.clone(),
        )
    }

    /// Same expression and kind; bounds and time are ignored
    pub fn same_calculation(&self, other: &HistoryEntry) -> bool {
        self.expression == other.expression && self.kind == other.kind
    }

    /// Integral as LaTeX for the history panel
    pub fn latex(&self) -> String {
        integral_latex(
            &self.expression,
            self.kind,
            &self.lower_bound,
            &self.upper_bound,
        )
    }
}

/// Bounded history, most recent first
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    max_size: usize,
}

impl History {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_size,
        }
    }

    /// Build from stored entries (already most recent first)
    pub fn from_entries(entries: Vec<HistoryEntry>, max_size: usize) -> Self {
        let mut history = Self {
            entries: entries.into(),
            max_size,
        };
        history.trim_to_max_size();
        history
    }

    /// Add a new entry at the front.
    ///
    /// Returns false when the entry repeats the most recent calculation,
    /// in which case nothing changes.
    pub fn push(&mut self, entry: HistoryEntry) -> bool {
        if let Some(head) = self.entries.front() {
            if head.same_calculation(&entry) {
                return false;
            }
        }

        self.entries.push_front(entry);
        self.trim_to_max_size();
        true
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn head(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries as a vector for serialization
    pub fn to_vec(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Trim history to maximum size
    fn trim_to_max_size(&mut self) {
        while self.entries.len() > self.max_size {
            self.entries.pop_back();
        }
    }
}
