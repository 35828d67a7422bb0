//! Core data models for the bucket list generator

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

//
// ================= Status =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActivityStatus {
    #[serde(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Completed")]
    Completed,
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActivityStatus::ToDo => "To Do",
            ActivityStatus::InProgress => "In Progress",
            ActivityStatus::Completed => "Completed",
        };
        write!(f, "{}", s)
    }
}

//
// ================= Activities =================
//

/// Raw activity as produced by the text model, before any enrichment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivityDraft {
    pub activity: String,
    pub description: String,
}

/// An activity with its best-effort image attached. The image is optional
/// and its absence must never block list display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedActivity {
    pub activity: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl EnrichedActivity {
    pub fn with_image(draft: ActivityDraft, image_url: String) -> Self {
        Self {
            activity: draft.activity,
            description: draft.description,
            image_url: Some(image_url),
        }
    }
}

impl From<ActivityDraft> for EnrichedActivity {
    fn from(draft: ActivityDraft) -> Self {
        Self {
            activity: draft.activity,
            description: draft.description,
            image_url: None,
        }
    }
}

/// A session-held list entry. The id is assigned exactly once, at
/// materialization, and never mutated; status transitions are caller-driven.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketListItem {
    pub id: Uuid,
    pub activity: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub status: ActivityStatus,
}

impl BucketListItem {
    /// Materialize an enriched activity into a list entry with a fresh id
    /// and the default `To Do` status.
    pub fn materialize(enriched: EnrichedActivity) -> Self {
        Self {
            id: Uuid::new_v4(),
            activity: enriched.activity,
            description: enriched.description,
            image_url: enriched.image_url,
            status: ActivityStatus::ToDo,
        }
    }
}

//
// ================= Requests =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Comma-separated interests and preferences, 10-500 chars.
    pub interests: String,
    /// Optional budget or other constraints; empty counts as absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
}

//
// ================= Enrichment Outputs =================
//

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TimingSuggestion {
    pub best_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimate {
    pub estimated_cost: String,
    pub currency: String,
    pub cost_breakdown: String,
}
