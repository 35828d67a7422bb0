//! Best-time-of-year suggestion flow

use crate::gemini::GenerativeBackend;
use crate::models::TimingSuggestion;
use crate::prompt::render;
use crate::schema::{Field, Schema, STR};
use crate::Result;

const PROMPT_TEMPLATE: &str = "Suggest the best time of year to do the following activity, \
with a short explanation of why:\n\n{{activity}}";

static OUTPUT_SCHEMA: Schema = Schema {
    name: "suggestActivityTimingOutput",
    fields: &[Field {
        name: "bestTime",
        kind: STR,
        required: true,
        describe: "The best time of year to do the activity, with a short explanation of why.",
    }],
};

/// Fixed placeholder shown when the retry budget runs out.
pub const FALLBACK_MESSAGE: &str = "Could not get a suggestion. Please try again.";

pub fn fallback_suggestion() -> TimingSuggestion {
    TimingSuggestion {
        best_time: FALLBACK_MESSAGE.to_string(),
    }
}

/// One un-retried suggestion call; the serving layer wraps this in the
/// per-card retry policy.
pub async fn suggest_activity_timing(
    backend: &dyn GenerativeBackend,
    activity: &str,
) -> Result<TimingSuggestion> {
    let prompt = render(PROMPT_TEMPLATE, &[("activity", Some(activity))]);
    let output = backend
        .generate_structured("suggestActivityTiming", &prompt, &OUTPUT_SCHEMA)
        .await?;
    Ok(serde_json::from_value(output)?)
}
