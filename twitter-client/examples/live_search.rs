use sentiment_engine::VaderScorer;
use sentiscope_core::{AppConfig, Category, ErrorExt, PostSource};
use std::io::{self, Write};
use twitter_client::{PostFetcher, RetryPolicy, SystemClock, TwitterApiClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    println!("=== Twitter Recent Search Live Test ===\n");

    let config = AppConfig::load(None)?;
    if let Err(e) = config.require_bearer_token() {
        println!("❌ {}. Add it to .env or the environment first.", e);
        return Ok(());
    }
    println!("✅ Credentials found, searching {}\n", config.api_base_url);

    print!("Enter keyword: ");
    io::stdout().flush()?;
    let mut keyword = String::new();
    io::stdin().read_line(&mut keyword)?;
    let keyword = keyword.trim();

    if keyword.is_empty() {
        println!("❌ Keyword cannot be empty");
        return Ok(());
    }

    let client = TwitterApiClient::from_config(&config)?;
    let fetcher = PostFetcher::new(
        client,
        VaderScorer::new(),
        RetryPolicy::from(&config.retry),
        SystemClock,
    )
    .with_search_window(chrono::Duration::minutes(config.search_window_minutes as i64));

    println!("\n🔄 Fetching up to 10 posts for {:?}...", keyword);
    match fetcher.fetch(keyword, 10).await {
        Ok(records) if records.is_empty() => println!("⚠️  No posts found"),
        Ok(records) => {
            println!("✅ Found {} posts:", records.len());
            for (i, record) in records.iter().enumerate() {
                let flag = if record.category == Category::HighlyNegative {
                    "🛑 "
                } else {
                    ""
                };
                println!(
                    "   {}. {}[{}] {:.3} {}",
                    i + 1,
                    flag,
                    record.category,
                    record.sentiment.compound,
                    record.text
                );
            }
        }
        Err(e) => println!("❌ {}", e.user_friendly_message()),
    }

    println!("\n📊 Fetch Metrics:");
    let metrics = fetcher.metrics().await;
    println!("   Attempts: {}", metrics.attempts);
    println!("   Empty pages: {}", metrics.empty_pages);
    println!("   Rate limit waits: {}", metrics.rate_limit_waits);
    println!("   Total backoff: {:?}", metrics.total_backoff);

    Ok(())
}
