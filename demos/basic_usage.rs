//! Basic usage example
//!
//! Scores a few sentences, runs a multi-API request and, when a private cloud is
//! configured, lists its collections.
//!
//! The API key is read from `INDICO_API_KEY` or `.indicorc.yaml`; set
//! `INDICO_CLOUD` to try the private-cloud calls.
//!
//! Usage:
//!   INDICO_API_KEY=your_key cargo run --example basic_usage

use indicoio::{Api, CallOptions, Client};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    if std::env::var("INDICO_API_KEY").is_err() {
        eprintln!("Warning: INDICO_API_KEY not set. Calls will be rejected unless a config file provides a key.");
    }

    let client = Client::new()?;
    let opts = CallOptions::new();

    let single = client.sentiment("Worst movie I have ever seen.", &opts)?;
    println!("sentiment: {:?}", single.into_single());

    let batch = client.sentiment(vec!["Loved it!", "Meh.", "Never again."], &opts)?;
    println!("batch sentiment: {:?}", batch.into_vec());

    let tags = client.text_tags(
        "The central bank raised rates again this quarter.",
        &CallOptions::new().param("top_n", 3),
    )?;
    println!("text tags: {:?}", tags.into_single());

    let multi = client.predict_text(
        "Ce film était magnifique.",
        &[Api::Sentiment, Api::Language],
        &opts,
    )?;
    for (api, output) in &multi {
        println!("{api}: {output:?}");
    }

    if client.config().cloud.is_some() {
        for (name, info) in client.collections(&opts)? {
            println!("collection {name}: {:?}", info.status);
        }
    } else {
        println!("No private cloud configured; skipping collections.");
    }

    Ok(())
}
