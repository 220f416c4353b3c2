//! Concurrent evaluation against a shared policy.

use std::sync::Arc;
use std::time::{Duration, Instant};

use auth_responder::{decide, load_policy};

mod common;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_shared_policy_concurrent_decisions() {
    let policy = Arc::new(load_policy(common::ACCESS_DOCUMENT.as_bytes()).unwrap());

    let tasks: Vec<_> = (0..32)
        .map(|i| {
            let policy = policy.clone();
            tokio::spawn(async move {
                for _ in 0..500 {
                    assert!(decide(&policy, "bob", "/private/x", "example.com"));
                    assert!(!decide(&policy, "carol", "/private/x", "example.com"));
                    assert!(decide(&policy, "alice", &format!("/{}", i), "nowhere"));
                }
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap();
    }
}

#[tokio::test]
async fn test_http_load() {
    let (addr, running) = common::start_tcp().await;

    let concurrency: usize = 20;
    let requests_per_task: usize = 25;
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let start = Instant::now();

    let tasks: Vec<_> = (0..concurrency)
        .map(|i| {
            let client = client.clone();
            tokio::spawn(async move {
                let mut statuses = Vec::with_capacity(requests_per_task);
                let user = if i % 2 == 0 { "bob" } else { "mallory" };
                for _ in 0..requests_per_task {
                    let res = client
                        .get(format!("http://{}/", addr))
                        .header("REMOTE-USER", user)
                        .header("X-URI", "/private/report")
                        .header("X-Host", "example.com")
                        .send()
                        .await
                        .unwrap();
                    statuses.push((user, res.status().as_u16()));
                }
                statuses
            })
        })
        .collect();

    let mut total = 0usize;
    for task in tasks {
        for (user, status) in task.await.unwrap() {
            let expected = if user == "bob" { 200 } else { 403 };
            assert_eq!(status, expected);
            total += 1;
        }
    }

    assert_eq!(total, concurrency * requests_per_task);
    assert!(start.elapsed() < Duration::from_secs(30));

    running.stop().await;
}
