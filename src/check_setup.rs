//! Setup verification: checks credentials, directories, the ffmpeg install
//! and live reachability of the three external endpoints. Run this before
//! starting the server for the first time.

use anyhow::Result;
use std::path::Path;

use ai_news_shorts::api::groq::GroqClient;
use ai_news_shorts::api::newsapi::{Headline, NewsClient};
use ai_news_shorts::api::pexels::PexelsClient;
use ai_news_shorts::config::Config;
use ai_news_shorts::generator::build_http_client;
use ai_news_shorts::init;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    println!("AI News Shorts - setup check");
    println!("============================");

    let config = match Config::from_env() {
        Ok(config) => {
            println!("[ OK ] environment: all API keys present");
            config
        }
        Err(err) => {
            println!("[FAIL] environment: {err}");
            std::process::exit(1);
        }
    };

    let mut ok = true;

    for dir in [&config.output_dir, &config.temp_dir] {
        if Path::new(dir).exists() {
            println!("[ OK ] directory: {dir}");
        } else {
            println!("[WARN] directory missing (created at server startup): {dir}");
        }
    }

    if init::check_ffmpeg().await {
        println!("[ OK ] ffmpeg found in PATH");
    } else {
        println!("[FAIL] ffmpeg not found in PATH");
        ok = false;
    }

    let client = build_http_client()?;

    let news = NewsClient::new(client.clone(), config.news_key.clone());
    match news.fetch_trending(1).await {
        Ok(headlines) => println!("[ OK ] NewsAPI reachable ({} headline(s))", headlines.len()),
        Err(err) => {
            println!("[FAIL] NewsAPI: {err}");
            ok = false;
        }
    }

    let pexels = PexelsClient::new(client.clone(), config.pexels_key.clone());
    match pexels.search_photo("nature").await {
        Ok(Some(_)) => println!("[ OK ] Pexels reachable"),
        Ok(None) => println!("[WARN] Pexels reachable but returned no photos"),
        Err(err) => {
            println!("[FAIL] Pexels: {err}");
            ok = false;
        }
    }

    let groq = GroqClient::new(client, config.groq_key.clone());
    let probe = Headline {
        title: "Setup check".to_string(),
        description: "Connectivity probe".to_string(),
        source: "check-setup".to_string(),
        published_at: String::new(),
    };
    match groq.generate_script(&probe).await {
        Ok(script) => println!(
            "[ OK ] Groq reachable (model returned {} scene(s))",
            script.scenes.len()
        ),
        Err(err) => {
            println!("[FAIL] Groq: {err}");
            ok = false;
        }
    }

    println!("============================");
    if ok {
        println!("All checks passed. Run the server with: cargo run --bin ai-news-shorts");
    } else {
        println!("Some checks failed. Fix the issues above before starting the server.");
        std::process::exit(1);
    }
    Ok(())
}
