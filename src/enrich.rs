//! Fan-out image enrichment
//!
//! Image generation is the slowest and least reliable call, so it runs once
//! per activity, concurrently. A single bad image call must not sink the
//! batch: each per-item failure degrades to "no image" for that item alone.
//! The join settles every call before returning, and the output matches the
//! input in length and order regardless of completion order.

use crate::flows::image::generate_activity_image;
use crate::gemini::GenerativeBackend;
use crate::models::{ActivityDraft, EnrichedActivity};
use futures::future::join_all;
use tracing::warn;

/// Per-item enrichment result. Degradation stays an explicit variant rather
/// than a silently-missing field, so callers can still count failures.
#[derive(Debug)]
pub enum EnrichmentOutcome {
    Enriched(EnrichedActivity),
    Degraded(ActivityDraft),
}

impl EnrichmentOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, EnrichmentOutcome::Degraded(_))
    }

    pub fn into_activity(self) -> EnrichedActivity {
        match self {
            EnrichmentOutcome::Enriched(activity) => activity,
            EnrichmentOutcome::Degraded(draft) => draft.into(),
        }
    }
}

/// Attach a best-effort image to every draft, concurrently, preserving
/// input order.
pub async fn enrich_all(
    backend: &dyn GenerativeBackend,
    drafts: Vec<ActivityDraft>,
) -> Vec<EnrichedActivity> {
    let outcomes = join_all(drafts.into_iter().map(|draft| enrich_one(backend, draft))).await;
    outcomes
        .into_iter()
        .map(EnrichmentOutcome::into_activity)
        .collect()
}

/// Enrich a single draft. Failure is swallowed into `Degraded`; it never
/// retries, delays, or fails any other item's outcome.
pub async fn enrich_one(backend: &dyn GenerativeBackend, draft: ActivityDraft) -> EnrichmentOutcome {
    match generate_activity_image(backend, &draft.activity).await {
        Ok(image_url) => EnrichmentOutcome::Enriched(EnrichedActivity::with_image(draft, image_url)),
        Err(e) => {
            warn!(
                activity = %draft.activity,
                error = %e,
                "Image enrichment failed, continuing without image"
            );
            EnrichmentOutcome::Degraded(draft)
        }
    }
}
