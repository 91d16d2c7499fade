// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg(feature = "memory")]

//! JSON model storage.

use std::collections::BTreeMap;
use std::time::Duration;

use cachestore::{Client, ErrorKind};
use serde::{Deserialize, Serialize};
use tick::{Clock, ClockControl};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Order {
    id: u64,
    customer: String,
    lines: Vec<Line>,
    tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Line {
    sku: String,
    quantity: u32,
}

fn order() -> Order {
    Order {
        id: 7,
        customer: "ada".to_owned(),
        lines: vec![
            Line {
                sku: "A-1".to_owned(),
                quantity: 2,
            },
            Line {
                sku: "B-9".to_owned(),
                quantity: 1,
            },
        ],
        tags: BTreeMap::from([("priority".to_owned(), "high".to_owned())]),
    }
}

#[tokio::test]
async fn nested_model_round_trips() {
    let client = Client::builder(Clock::new_frozen()).build().await.unwrap();

    client.set_model("order:7", &order(), None).await.unwrap();

    assert_eq!(client.get_model::<Order>("order:7").await.unwrap(), Some(order()));
}

#[tokio::test]
async fn model_is_stored_as_json() {
    let client = Client::builder(Clock::new_frozen()).build().await.unwrap();

    client
        .set_model(
            "line",
            &Line {
                sku: "A-1".to_owned(),
                quantity: 2,
            },
            None,
        )
        .await
        .unwrap();

    let raw = client.get("line").await.unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["sku"], "A-1");
    assert_eq!(value["quantity"], 2);
}

#[tokio::test]
async fn missing_model_is_none() {
    let client = Client::builder(Clock::new_frozen()).build().await.unwrap();

    assert_eq!(client.get_model::<Order>("order:404").await.unwrap(), None);
}

#[tokio::test]
async fn model_expires_with_ttl() {
    let control = ClockControl::new();
    let client = Client::builder(control.to_clock()).build().await.unwrap();

    client
        .set_model("order:7", &order(), Some(Duration::from_secs(10)))
        .await
        .unwrap();
    control.advance(Duration::from_secs(10));

    assert_eq!(client.get_model::<Order>("order:7").await.unwrap(), None);
}

#[tokio::test]
async fn wrong_shape_is_serialization_error() {
    let client = Client::builder(Clock::new_frozen()).build().await.unwrap();
    client.set_model("order:7", &order(), None).await.unwrap();

    let error = client.get_model::<Line>("order:7").await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Serialization);
}

#[tokio::test]
async fn unsized_models() {
    let client = Client::builder(Clock::new_frozen()).build().await.unwrap();

    client.set_model("text", "hello", None).await.unwrap();
    client.set_model("numbers", &[1, 2, 3][..], None).await.unwrap();

    assert_eq!(client.get_model::<String>("text").await.unwrap().as_deref(), Some("hello"));
    assert_eq!(client.get_model::<Vec<i32>>("numbers").await.unwrap(), Some(vec![1, 2, 3]));
}

#[tokio::test]
async fn unencodable_model_is_serialization_error() {
    let client = Client::builder(Clock::new_frozen()).build().await.unwrap();
    // JSON object keys must be strings.
    let map = BTreeMap::from([(vec![1_u8], 1)]);

    let error = client.set_model("bad", &map, None).await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Serialization);
    assert_eq!(client.get("bad").await.unwrap(), None);
}
