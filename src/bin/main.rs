use bucketlist_generator::flows::generate::generate_bucket_list;
use bucketlist_generator::gemini::GeminiClient;
use bucketlist_generator::models::GenerationRequest;
use tracing::info;

/// One-shot CLI generation: pass interests (and optionally a budget via
/// BUDGET env var) on the command line, print the enriched list.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    dotenv::dotenv().ok();

    let gemini_api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let interests = if args.is_empty() {
        "hiking in mountains, trying exotic foods, learning new languages".to_string()
    } else {
        args.join(" ")
    };

    let request = GenerationRequest {
        interests,
        budget: std::env::var("BUDGET").ok(),
    };

    info!(interests = %request.interests, "Generating bucket list");

    let backend = GeminiClient::new(gemini_api_key);

    match generate_bucket_list(&backend, &request).await {
        Ok(list) => {
            println!("\n=== YOUR BUCKET LIST ===");
            for (i, item) in list.iter().enumerate() {
                println!("\n{}. {}", i + 1, item.activity);
                println!("   {}", item.description);
                match &item.image_url {
                    Some(url) => println!("   image: {} bytes of data URI", url.len()),
                    None => println!("   image: unavailable"),
                }
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Generation failed: {}", e);
            Err(Box::new(e) as Box<dyn std::error::Error>)
        }
    }
}
