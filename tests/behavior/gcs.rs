// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::time::Duration;

use anyhow::Result;
use bytes::Bytes;
use futures::StreamExt;
use futures::TryStreamExt;
use pretty_assertions::assert_eq;
use uniblob::services::Gcs;
use uniblob::ErrorKind;
use uniblob::OpList;
use uniblob::OpWrite;
use uniblob::Operator;
use wiremock::matchers::header;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::matchers::query_param;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;

use super::fake_gcs::FakeGcs;
use super::utils::*;

fn emulator(server: &MockServer) -> Gcs {
    init_logger();
    Gcs::default()
        .project(GCS_PROJECT)
        .bucket(GCS_BUCKET)
        .emulator_host(&server.uri())
        .env(|_| None)
}

/// Key prefix of the dsn is folded into the fully-qualified prefix.
#[tokio::test]
async fn test_dsn_with_key_prefix() -> Result<()> {
    init_logger();
    let server = FakeGcs::start(GCS_BUCKET).await;

    let op = Operator::from_dsn(&format!(
        "gcs://proj/bucket/prefix/inner?emulator_host={}",
        server.uri()
    ))?;
    assert_eq!(op.info().binding().prefix(), "gcs://proj/bucket/prefix/inner/");
    assert_eq!(op.info().name(), "bucket");

    op.write("a.txt", "in prefix").await?;
    assert_eq!(
        op.read("gcs://proj/bucket/prefix/inner/a.txt").await?,
        Bytes::from("in prefix")
    );

    // The same object seen from the bucket root.
    let root = Operator::new(emulator(&server))?;
    assert_eq!(
        root.read("prefix/inner/a.txt").await?,
        Bytes::from("in prefix")
    );
    assert_eq!(
        collect(root.list("prefix/").await?).await?,
        vec!["prefix/inner/a.txt".to_string()]
    );
    Ok(())
}

#[tokio::test]
async fn test_containment_of_key_prefix() -> Result<()> {
    let server = FakeGcs::start(GCS_BUCKET).await;
    let op = Operator::new(emulator(&server).root("prefix"))?;

    let cases = vec![
        ("other key prefix", "gcs://proj/bucket/other/a"),
        ("other bucket", "gcs://proj/other-bucket/prefix/a"),
        ("other project", "gcs://other/bucket/prefix/a"),
        ("bucket name sharing prefix", "gcs://proj/bucket2/prefix/a"),
        ("climbing out of key prefix", "gcs://proj/bucket/prefix/../a"),
    ];

    for (name, address) in cases {
        let err = op.read(address).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ContainmentViolation, "{name}");
        assert_eq!(
            err.context("expected"),
            Some("gcs://proj/bucket/prefix/"),
            "{name}"
        );
    }
    Ok(())
}

#[tokio::test]
async fn test_content_type() -> Result<()> {
    let server = FakeGcs::start(GCS_BUCKET).await;
    let op = Operator::new(emulator(&server))?;

    op.write_with(
        "site/index.html",
        "<html></html>",
        OpWrite::new().with_content_type("text/html"),
    )
    .await?;
    op.write("site/raw", "raw").await?;

    let mut resources: Vec<_> = op.list("site/").await?.try_collect().await?;
    resources.sort_by(|a, b| a.address().cmp(b.address()));
    assert_eq!(resources[0].address(), "site/index.html");
    assert_eq!(resources[0].content_type(), Some("text/html"));
    assert_eq!(resources[1].address(), "site/raw");
    assert_eq!(resources[1].content_type(), None);

    let mut lister = op.list("site/index.html").await?;
    let res = lister.try_next().await?.expect("must exist");
    assert_eq!(res.address(), "site/index.html");
    assert_eq!(res.content_type(), Some("text/html"));
    Ok(())
}

#[tokio::test]
async fn test_folder_placeholders_skipped() -> Result<()> {
    let server = FakeGcs::start(GCS_BUCKET).await;
    let op = Operator::new(emulator(&server))?;

    // Placeholders are created by other tools like the cloud console.
    Mock::given(method("GET"))
        .and(path("/storage/v1/b/bucket/o"))
        .and(query_param("prefix", "dir/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [{"name": "dir/"}, {"name": "dir/file"}, {"name": "dir/sub/"}]
        })))
        .with_priority(1)
        .mount(&server)
        .await;

    assert_eq!(collect(op.list("dir/").await?).await?, vec!["dir/file".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_list_pagination() -> Result<()> {
    let server = FakeGcs::start(GCS_BUCKET).await;
    let op = Operator::new(emulator(&server))?;

    for i in 0..150 {
        op.write(&format!("pages/{i:03}"), "x").await?;
    }

    let entries = collect(op.list("pages/").await?).await?;
    assert_eq!(entries.len(), 150);
    assert_eq!(entries[0], "pages/000");
    assert_eq!(entries[149], "pages/149");
    Ok(())
}

/// A failed page terminates the sequence with that error.
#[tokio::test]
async fn test_list_error_mid_traversal() -> Result<()> {
    let server = FakeGcs::start(GCS_BUCKET).await;
    let op = Operator::new(emulator(&server))?;

    for i in 0..100 {
        op.write(&format!("broken/{i:03}"), "x").await?;
    }
    Mock::given(method("GET"))
        .and(path("/storage/v1/b/bucket/o"))
        .and(query_param("pageToken", "64"))
        .respond_with(ResponseTemplate::new(503).set_body_string("backend unavailable"))
        .with_priority(1)
        .mount(&server)
        .await;

    let mut lister = op.list("broken/").await?;
    let mut count = 0;
    let err = loop {
        match lister.next().await {
            Some(Ok(_)) => count += 1,
            Some(Err(err)) => break err,
            None => panic!("listing must fail"),
        }
    };

    assert_eq!(count, 64);
    assert_eq!(err.kind(), ErrorKind::Unexpected);
    assert_eq!(err.message(), "backend unavailable");
    assert_eq!(err.context("address"), Some("broken/"));
    assert!(lister.next().await.is_none());
    Ok(())
}

#[tokio::test]
async fn test_accessor_unsupported_without_service_account() -> Result<()> {
    let server = FakeGcs::start(GCS_BUCKET).await;
    let op = Operator::new(emulator(&server))?;
    op.write("file", "x").await?;

    assert!(!op.info().capability().accessor);
    let err = op.accessor("file").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unsupported);
    Ok(())
}

#[tokio::test]
async fn test_static_token_is_sent() -> Result<()> {
    init_logger();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/storage/v1/b/bucket/o/secret.txt"))
        .and(query_param("alt", "media"))
        .and(header("authorization", "Bearer t0ken"))
        .respond_with(ResponseTemplate::new(200).set_body_string("authorized"))
        .mount(&server)
        .await;

    let op = Operator::new(
        Gcs::default()
            .project(GCS_PROJECT)
            .bucket(GCS_BUCKET)
            .endpoint(&server.uri())
            .env(|k| (k == "STORAGE_ACCESS_TOKEN").then(|| "t0ken".to_string())),
    )?;

    assert_eq!(op.read("secret.txt").await?, Bytes::from("authorized"));
    Ok(())
}

#[tokio::test]
async fn test_emulator_requests_unsigned() -> Result<()> {
    init_logger();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/storage/v1/b/bucket/o/open.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("open"))
        .mount(&server)
        .await;

    let uri = server.uri();
    let op = Operator::new(
        Gcs::default()
            .project(GCS_PROJECT)
            .bucket(GCS_BUCKET)
            .env(move |k| match k {
                "STORAGE_EMULATOR_HOST" => Some(uri.clone()),
                "STORAGE_ACCESS_TOKEN" => Some("ignored".to_string()),
                _ => None,
            }),
    )?;

    assert_eq!(op.read("open.txt").await?, Bytes::from("open"));

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
    Ok(())
}

#[test]
fn test_credential_not_found() {
    init_logger();
    let err = Operator::new(
        Gcs::default()
            .project(GCS_PROJECT)
            .bucket(GCS_BUCKET)
            .disable_config_load()
            .env(|_| None),
    )
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CredentialNotFound);
}

/// A cancelled listing drops its in-flight page and requests no more.
#[tokio::test]
async fn test_list_cancel_stops_paging() -> Result<()> {
    let server = FakeGcs::start(GCS_BUCKET).await;
    let op = Operator::new(emulator(&server))?;

    for i in 0..200 {
        op.write(&format!("slow/{i:03}"), "x").await?;
    }
    // The second page is slow, a live producer would fetch the third right
    // after it.
    Mock::given(method("GET"))
        .and(path("/storage/v1/b/bucket/o"))
        .and(query_param("pageToken", "64"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({
                    "items": [{"name": "slow/064"}],
                    "nextPageToken": "128",
                }))
                .set_delay(Duration::from_millis(300)),
        )
        .with_priority(1)
        .mount(&server)
        .await;

    let mut lister = op
        .list_with("slow/", OpList::new().with_buffer(1000))
        .await?;
    assert!(lister.try_next().await?.is_some());
    lister.cancel();

    tokio::time::sleep(Duration::from_millis(1000)).await;
    let pages: Vec<_> = server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|req| req.url.path() == "/storage/v1/b/bucket/o")
        .filter_map(|req| {
            req.url
                .query_pairs()
                .find(|(k, _)| k == "pageToken")
                .map(|(_, v)| v.to_string())
        })
        .collect();
    assert!(
        !pages.contains(&"128".to_string()),
        "no page must be requested after cancel: {pages:?}"
    );
    assert!(lister.next().await.is_none());
    Ok(())
}
