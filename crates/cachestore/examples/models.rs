// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Storing typed models with structured logging.
//!
//! Every operation is printed by the `fmt` subscriber, including hits and
//! misses because the client is built with debug enabled.

use std::time::Duration;

use cachestore::Client;
use serde::{Deserialize, Serialize};
use tick::Clock;

#[derive(Debug, Serialize, Deserialize)]
struct Profile {
    name: String,
    languages: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), cachestore::Error> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    let client = Client::builder(Clock::new_tokio()).memory().logs().debug(true).build().await?;

    let profile = Profile {
        name: "Ada".to_owned(),
        languages: vec!["en".to_owned(), "fr".to_owned()],
    };
    client.set_model("profile:ada", &profile, Some(Duration::from_secs(600))).await?;

    let loaded: Option<Profile> = client.get_model("profile:ada").await?;
    println!("loaded: {loaded:?}");

    let missing: Option<Profile> = client.get_model("profile:grace").await?;
    println!("missing: {missing:?}");

    client.set("profile:broken", "{ not json").await?;
    if let Err(e) = client.get_model::<Profile>("profile:broken").await {
        println!("decode failed: {e}");
    }

    client.close();
    Ok(())
}
