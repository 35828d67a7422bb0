//! Activity image generation flow

use crate::gemini::GenerativeBackend;
use crate::prompt::render;
use crate::Result;

const PROMPT_TEMPLATE: &str = "A vibrant, high-quality, photorealistic image representing \
the activity: {{activity}}. The image should be inspiring and visually appealing.";

/// Generate an image for an activity; returns a data URI. Fails with a
/// generation error when the backend returns no media payload — the fan-out
/// orchestrator treats that as "omit image", not as a retry case.
pub async fn generate_activity_image(
    backend: &dyn GenerativeBackend,
    activity: &str,
) -> Result<String> {
    let prompt = render(PROMPT_TEMPLATE, &[("activity", Some(activity))]);
    backend.generate_image(&prompt).await
}
