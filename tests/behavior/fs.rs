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

use std::fs;

use anyhow::Result;
use bytes::Bytes;
use futures::TryStreamExt;
use pretty_assertions::assert_eq;
use uniblob::ErrorKind;
use uniblob::OpAccessor;
use uniblob::Operator;
use uniblob::Scheme;

use super::utils::*;

fn fs_operator(root: &std::path::Path) -> Result<Operator> {
    init_logger();
    Ok(Operator::from_dsn(&format!("file://{}", root.display()))?)
}

#[tokio::test]
async fn test_literal_addresses() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let root = tmp.path().display().to_string();
    let op = fs_operator(tmp.path())?;

    op.write("a b/c.txt", "literal").await?;
    assert_eq!(
        fs::read_to_string(tmp.path().join("a b").join("c.txt"))?,
        "literal"
    );

    let qualified = format!("file://{root}/a%20b/c.txt");
    assert_eq!(op.read(&qualified).await?, Bytes::from("literal"));
    assert_eq!(op.qualify("a b/c.txt")?, qualified);
    assert_eq!(op.accessor("a b/c.txt").await?, qualified);
    assert_eq!(op.accessor(&qualified).await?, qualified);

    // The root itself without trailing `/`.
    let entries = collect(op.list(&format!("file://{root}")).await?).await?;
    assert_eq!(entries, vec![qualified]);
    Ok(())
}

#[tokio::test]
async fn test_accessor_not_exist() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let op = fs_operator(tmp.path())?;
    fs::create_dir(tmp.path().join("dir"))?;

    let err = op.accessor("missing").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = op.accessor("dir").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    Ok(())
}

#[tokio::test]
async fn test_list_skips_hidden() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let op = fs_operator(tmp.path())?;

    op.write("A/file1", "1").await?;
    op.write("A/B/file1", "2").await?;
    fs::write(tmp.path().join("A/.hidden"), "h")?;
    fs::create_dir_all(tmp.path().join("A/.git/objects"))?;
    fs::write(tmp.path().join("A/.git/objects/pack"), "p")?;
    fs::create_dir_all(tmp.path().join("A/empty"))?;

    let entries = collect(op.list("A/").await?).await?;
    assert_eq!(entries, vec!["A/B/file1".to_string(), "A/file1".to_string()]);
    Ok(())
}

/// A sub directory is yielded as a whole before its next sibling.
#[tokio::test]
async fn test_list_depth_first() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let op = fs_operator(tmp.path())?;

    for path in ["t/a", "t/B/1", "t/B/2", "t/B/C/3", "t/z", "t/D/4"] {
        op.write(path, "x").await?;
    }

    let entries: Vec<String> = op
        .list("t")
        .await?
        .map_ok(|v| v.into_address())
        .try_collect()
        .await?;
    assert_eq!(entries.len(), 6);

    let positions: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(_, v)| v.starts_with("t/B/"))
        .map(|(idx, _)| idx)
        .collect();
    assert_eq!(positions.len(), 3);
    assert_eq!(positions[2] - positions[0], 2, "{entries:?}");
    Ok(())
}

#[tokio::test]
async fn test_list_content_type() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let op = fs_operator(tmp.path())?;

    op.write("docs/index.html", "<html></html>").await?;
    op.write("docs/data", "raw").await?;

    let mut resources: Vec<_> = op.list("docs/").await?.try_collect().await?;
    resources.sort_by(|a, b| a.address().cmp(b.address()));

    assert_eq!(resources[0].address(), "docs/data");
    assert_eq!(resources[0].content_type(), None);
    assert_eq!(resources[1].address(), "docs/index.html");
    assert_eq!(resources[1].content_type(), Some("text/html"));

    let mut lister = op.list("docs/index.html").await?;
    let res = lister.try_next().await?.expect("must exist");
    assert_eq!(res.content_type(), Some("text/html"));
    Ok(())
}

#[tokio::test]
async fn test_list_file_as_container() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let op = fs_operator(tmp.path())?;
    op.write("file", "x").await?;

    let err = op.list("file/").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    Ok(())
}

#[tokio::test]
async fn test_init_creates_root() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let root = tmp.path().join("not/created/yet");
    let op = fs_operator(&root)?;

    assert!(!root.exists());
    let err = op.read("any").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    op.init().await?;
    assert!(root.is_dir());
    op.init().await?;
    Ok(())
}

#[tokio::test]
async fn test_write_replaces_directory_fails() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let op = fs_operator(tmp.path())?;
    fs::create_dir(tmp.path().join("dir"))?;

    let err = op.write("dir", "x").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unexpected);
    assert!(err.context("address").is_some());
    Ok(())
}

#[test]
fn test_relative_root() -> Result<()> {
    let op = Operator::from_iter(
        Scheme::Fs,
        [("root".to_string(), "relative/dir".to_string())],
    )?;

    let root = op.info().root();
    assert!(root.starts_with('/'), "{root}");
    assert!(root.ends_with("/relative/dir/"), "{root}");
    Ok(())
}

#[test]
fn test_dsn_errors() {
    let cases = vec![
        ("host is not allowed", "file://host/srv", ErrorKind::InvalidUrl),
        ("not an url", "/srv/blobs", ErrorKind::InvalidUrl),
        ("unknown scheme", "ftp://host/srv", ErrorKind::Unsupported),
    ];

    for (name, dsn, kind) in cases {
        let err = Operator::from_dsn(dsn).unwrap_err();
        assert_eq!(err.kind(), kind, "{name}");
        assert_eq!(err.context("dsn"), Some(dsn), "{name}");
    }
}

#[tokio::test]
async fn test_reader_bytes_stream() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let op = fs_operator(tmp.path())?;

    // Larger than one read chunk so the stream yields more than once.
    let content = vec![7u8; 200 * 1024];
    op.write("big", content.clone()).await?;

    let chunks: Vec<Bytes> = op
        .reader("big")
        .await?
        .into_bytes_stream()
        .try_collect()
        .await?;
    assert!(chunks.len() > 1);
    assert_eq!(chunks.concat(), content);

    // file urls never expire.
    let url = op
        .accessor_with(
            "big",
            OpAccessor::new().with_expire(std::time::Duration::from_secs(1)),
        )
        .await?;
    assert_eq!(url, op.qualify("big")?);
    Ok(())
}

#[tokio::test]
async fn test_root_with_reserved_chars() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let root = tmp.path().join("a+b@c=d;e,f$");
    let op = fs_operator(&root)?;
    op.init().await?;

    op.write("x.txt", "reserved").await?;

    let literal = format!("file://{}/x.txt", root.display());
    let canonical = url::Url::from_file_path(root.join("x.txt"))
        .map_err(|_| anyhow::anyhow!("root must be absolute"))?
        .to_string();
    for address in [literal.clone(), canonical, op.qualify("x.txt")?] {
        assert_eq!(op.read(&address).await?, Bytes::from("reserved"), "{address}");
        assert_eq!(op.qualify(&address)?, op.qualify("x.txt")?, "{address}");
    }

    let entries = collect(op.list(&format!("file://{}", root.display())).await?).await?;
    assert_eq!(entries, vec![op.qualify("x.txt")?]);

    op.delete(&literal).await?;
    let err = op.read("x.txt").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    Ok(())
}

/// A directory that can't be opened mid-walk terminates the listing with
/// that error instead of finishing early.
#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_list_error_mid_traversal() -> Result<()> {
    use futures::StreamExt;

    let tmp = tempfile::tempdir()?;
    let op = fs_operator(tmp.path())?;
    op.write("deep/first", "x").await?;

    // Nest directories with long names bottom-up so every single call stays
    // short, while the full path of the innermost one exceeds PATH_MAX.
    let long = "d".repeat(250);
    let mut cur = tmp.path().join("chain0");
    fs::create_dir(&cur)?;
    fs::write(cur.join("leaf"), "x")?;
    for i in 1..20 {
        let parent = tmp.path().join(format!("chain{i}"));
        fs::create_dir(&parent)?;
        fs::rename(&cur, parent.join(&long))?;
        cur = parent;
    }
    fs::rename(&cur, tmp.path().join("deep").join(&long))?;

    let mut lister = op.list("deep/").await?;
    let err = loop {
        match lister.next().await {
            Some(Ok(_)) => continue,
            Some(Err(err)) => break err,
            None => panic!("listing must fail"),
        }
    };
    assert_eq!(err.kind(), ErrorKind::Unexpected);
    assert_eq!(err.context("address"), Some("deep/"));
    assert!(lister.next().await.is_none());
    Ok(())
}
