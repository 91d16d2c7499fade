// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Using a Redis server.
//!
//! Expects a server at `redis://localhost:6379`, or the address in the
//! `REDIS_URL` environment variable. Locks taken here exclude every other
//! process using the same server.

use std::time::Duration;

use cachestore::{Client, RedisConfig};
use tick::Clock;

#[tokio::main]
async fn main() -> Result<(), cachestore::Error> {
    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| RedisConfig::default().url);
    let config = RedisConfig::new(url).with_response_timeout(Duration::from_secs(2));

    let client = Client::builder(Clock::new_tokio()).redis(config).build().await?;
    println!("connected to {}", client.engine());

    client.set_with_ttl("example:greeting", "hello", Duration::from_secs(30)).await?;
    println!("greeting = {:?}", client.get("example:greeting").await?);

    let secret = client.wait_acquire("example:lock", Duration::from_secs(10), Duration::from_secs(3)).await?;
    println!("holding example:lock");
    println!("released: {}", client.release("example:lock", &secret).await?);

    client.delete("example:greeting").await?;
    client.close();
    Ok(())
}
