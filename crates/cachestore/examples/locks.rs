// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Guarding a job with a lock.
//!
//! Two workers race for the same lock. The first wins immediately; the second
//! waits until the first releases it or the wait budget runs out.

use std::time::Duration;

use cachestore::{Client, ErrorKind};
use tick::Clock;

#[tokio::main]
async fn main() -> Result<(), cachestore::Error> {
    let clock = Clock::new_tokio();
    let client = Client::builder(clock.clone())
        .memory()
        .lock_poll_interval(Duration::from_millis(50))
        .build()
        .await?;

    let ttl = Duration::from_secs(5);
    let secret = client.acquire("reports:nightly", ttl).await?;
    println!("worker 1 holds the lock");

    match client.acquire("reports:nightly", ttl).await {
        Err(e) if e.kind() == ErrorKind::LockConflict => println!("worker 2 sees a conflict"),
        other => println!("unexpected: {other:?}"),
    }

    let waiter = {
        let client = client.clone();
        tokio::spawn(async move { client.wait_acquire("reports:nightly", ttl, Duration::from_secs(2)).await })
    };

    clock.delay(Duration::from_millis(200)).await;
    client.release("reports:nightly", &secret).await?;
    println!("worker 1 released the lock");

    match waiter.await {
        Ok(Ok(secret)) => {
            println!("worker 2 acquired the lock after waiting");
            client.release("reports:nightly", &secret).await?;
        }
        Ok(Err(e)) => println!("worker 2 gave up: {e}"),
        Err(e) => println!("worker 2 panicked: {e}"),
    }

    // A caller-owned secret lets a process refresh its own lock.
    client.acquire_with_secret("leader", "node-a", ttl).await?;
    client.acquire_with_secret("leader", "node-a", ttl).await?;
    println!("node-a refreshed its leadership");

    let deadline = clock.delay(Duration::from_millis(300));
    match client
        .wait_acquire_until("leader", ttl, Duration::from_secs(10), deadline)
        .await
    {
        Err(e) if e.kind() == ErrorKind::Cancelled => println!("node-b stopped waiting at its deadline"),
        other => println!("unexpected: {other:?}"),
    }

    client.close();
    Ok(())
}
