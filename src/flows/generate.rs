//! Personalized bucket list generation flow
//!
//! Validates the caller's request, renders the list prompt, invokes the text
//! model against the declared output schema, then fans out best-effort image
//! enrichment over the generated drafts.

use crate::enrich::enrich_all;
use crate::gemini::GenerativeBackend;
use crate::models::{ActivityDraft, EnrichedActivity, GenerationRequest};
use crate::prompt::render;
use crate::schema::{Field, FieldKind, Schema, STR};
use crate::Result;
use tracing::info;

const PROMPT_TEMPLATE: &str = "You are a bucket list expert, skilled at creating \
personalized lists of activities and experiences for users.\n\n\
Based on the user's interests and preferences, and taking into account any budget \
they have, generate a list of bucket list items.\n\n\
Interests and Preferences: {{interests}}\n\
{{#if budget}}Budget: {{budget}}\n{{/if}}";

static REQUEST_SCHEMA: Schema = Schema {
    name: "generateBucketListInput",
    fields: &[
        Field {
            name: "interests",
            kind: FieldKind::Str {
                min_len: Some(10),
                max_len: Some(500),
            },
            required: true,
            describe: "A comma-separated list of the user's interests and preferences.",
        },
        Field {
            name: "budget",
            kind: STR,
            required: false,
            describe: "Optional budget or other constraints the user has.",
        },
    ],
};

static ITEM_SCHEMA: Schema = Schema {
    name: "bucketListItem",
    fields: &[
        Field {
            name: "activity",
            kind: STR,
            required: true,
            describe: "The name of the activity.",
        },
        Field {
            name: "description",
            kind: STR,
            required: true,
            describe: "A brief description of the activity.",
        },
    ],
};

static OUTPUT_SCHEMA: Schema = Schema {
    name: "generateBucketListOutput",
    fields: &[Field {
        name: "bucketListItems",
        kind: FieldKind::ObjectArray(&ITEM_SCHEMA),
        required: true,
        describe: "A list of personalized bucket list items.",
    }],
};

/// Generate a personalized list and attach best-effort images. Text
/// generation is not retried here; image failures degrade per item without
/// failing the batch.
pub async fn generate_bucket_list(
    backend: &dyn GenerativeBackend,
    request: &GenerationRequest,
) -> Result<Vec<EnrichedActivity>> {
    REQUEST_SCHEMA.validate(&serde_json::to_value(request)?)?;

    let prompt = render(
        PROMPT_TEMPLATE,
        &[
            ("interests", Some(request.interests.as_str())),
            ("budget", request.budget.as_deref()),
        ],
    );

    let output = backend
        .generate_structured("generateBucketList", &prompt, &OUTPUT_SCHEMA)
        .await?;
    let drafts: Vec<ActivityDraft> = serde_json::from_value(output["bucketListItems"].clone())?;

    info!(count = drafts.len(), "Generated bucket list drafts");

    Ok(enrich_all(backend, drafts).await)
}
