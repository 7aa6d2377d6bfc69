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

use anyhow::Result;
use bytes::Bytes;
use futures::StreamExt;
use futures::TryStreamExt;
use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;
use uniblob::ErrorKind;
use uniblob::OpList;
use uniblob::OpRead;
use uniblob::Operator;

use super::utils::*;

/// Generate test cases against every service.
macro_rules! behavior_tests {
    ($($test:ident),* $(,)?) => {
        mod services_fs {
            $(
                #[tokio::test]
                async fn $test() -> anyhow::Result<()> {
                    let fixture = crate::utils::Fixture::fs().await?;
                    crate::behavior::$test(fixture.op.clone()).await
                }
            )*
        }

        mod services_gcs {
            $(
                #[tokio::test]
                async fn $test() -> anyhow::Result<()> {
                    let fixture = crate::utils::Fixture::gcs().await?;
                    crate::behavior::$test(fixture.op.clone()).await
                }
            )*
        }
    };
}

behavior_tests!(
    test_init_twice,
    test_write_relative_read_qualified,
    test_write_qualified_read_relative,
    test_qualify,
    test_overwrite,
    test_write_nested,
    test_write_with_special_chars,
    test_reader_writer_stream,
    test_read_not_exist,
    test_delete_then_read_and_delete,
    test_containment,
    test_container_address_rejected,
    test_list_container,
    test_list_container_without_slash,
    test_list_qualified,
    test_list_single_resource,
    test_list_not_exist,
    test_list_cancel,
    test_list_parent_cancel,
    test_read_cancelled,
);

/// Init on an existing container should succeed.
pub async fn test_init_twice(op: Operator) -> Result<()> {
    op.init().await?;
    op.init().await?;
    Ok(())
}

/// Written via relative form, read via fully-qualified form.
pub async fn test_write_relative_read_qualified(op: Operator) -> Result<()> {
    op.write("equal/a.txt", "relative").await?;

    let bs = op.read(&qualified(&op, "equal/a.txt")).await?;
    assert_eq!(bs, Bytes::from("relative"));
    Ok(())
}

/// Written via fully-qualified form, read via relative form.
pub async fn test_write_qualified_read_relative(op: Operator) -> Result<()> {
    op.write(&qualified(&op, "equal/b.txt"), "qualified").await?;

    let bs = op.read("equal/b.txt").await?;
    assert_eq!(bs, Bytes::from("qualified"));

    // Leading `/` and dot segments are the same resource.
    let bs = op.read("/equal/./x/../b.txt").await?;
    assert_eq!(bs, Bytes::from("qualified"));
    Ok(())
}

pub async fn test_qualify(op: Operator) -> Result<()> {
    assert_eq!(op.qualify("dir/file")?, qualified(&op, "dir/file"));
    assert_eq!(op.qualify(&qualified(&op, "dir/file"))?, qualified(&op, "dir/file"));
    assert_eq!(op.qualify("")?, op.info().binding().prefix());
    Ok(())
}

/// Writing twice leaves exactly the second payload.
pub async fn test_overwrite(op: Operator) -> Result<()> {
    op.write("overwrite", "the first payload is longer").await?;
    op.write(&qualified(&op, "overwrite"), "second").await?;

    assert_eq!(op.read("overwrite").await?, Bytes::from("second"));
    assert_eq!(
        op.read(&qualified(&op, "overwrite")).await?,
        Bytes::from("second")
    );
    Ok(())
}

/// Missing intermediate containers are created transparently.
pub async fn test_write_nested(op: Operator) -> Result<()> {
    op.write("x/y/z/file", "nested").await?;

    assert_eq!(op.read("x/y/z/file").await?, Bytes::from("nested"));
    Ok(())
}

pub async fn test_write_with_special_chars(op: Operator) -> Result<()> {
    let rel = "special/ 1-2=3+4 &你好.txt";
    op.write(rel, "special").await?;

    assert_eq!(op.read(&op.qualify(rel)?).await?, Bytes::from("special"));
    assert_eq!(collect(op.list("special/").await?).await?, vec![rel.to_string()]);
    Ok(())
}

pub async fn test_reader_writer_stream(op: Operator) -> Result<()> {
    let chunk = vec![7u8; 100 * 1024];

    let mut w = op.writer("stream").await?;
    for _ in 0..3 {
        w.write(chunk.clone()).await?;
    }
    w.close().await?;

    let mut r = op.reader(&qualified(&op, "stream")).await?;
    let mut total = 0;
    loop {
        let bs = r.read().await?;
        if bs.is_empty() {
            break;
        }
        assert!(bs.iter().all(|v| *v == 7));
        total += bs.len();
    }
    assert_eq!(total, chunk.len() * 3);
    Ok(())
}

pub async fn test_read_not_exist(op: Operator) -> Result<()> {
    let err = op.read("not-exist").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.context("address"), Some("not-exist"));
    Ok(())
}

/// After a delete both read and delete fail with NotFound via either form.
pub async fn test_delete_then_read_and_delete(op: Operator) -> Result<()> {
    op.write("delete/me", "bye").await?;
    op.delete(&qualified(&op, "delete/me")).await?;

    for address in ["delete/me".to_string(), qualified(&op, "delete/me")] {
        let err = op.read(&address).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound, "read {address}");

        let err = op.delete(&address).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound, "delete {address}");
    }
    Ok(())
}

/// Addresses outside of the binding fail for every operation.
pub async fn test_containment(op: Operator) -> Result<()> {
    op.write("inside", "inside").await?;

    let scheme = op.info().scheme().url_scheme();
    let cases = vec![
        ("foreign scheme", "s3://bucket/inside".to_string()),
        ("other binding", format!("{scheme}://elsewhere/inside")),
        ("climbing above root", "../inside".to_string()),
        ("climbing in the middle", "a/../../inside".to_string()),
        ("qualified climbing", qualified(&op, "../inside")),
    ];

    for (name, address) in cases {
        let errs = vec![
            op.read(&address).await.err(),
            op.write(&address, "escaped").await.err(),
            op.delete(&address).await.err(),
            op.accessor(&address).await.err(),
            op.list(&address).await.err(),
        ];
        for err in errs {
            let err = err.unwrap_or_else(|| panic!("{name} must fail"));
            assert_eq!(err.kind(), ErrorKind::ContainmentViolation, "{name}: {err}");
            assert_eq!(err.context("address"), Some(address.as_str()), "{name}");
            assert_eq!(err.to_string().matches("address: ").count(), 1, "{name}");
            assert_eq!(
                err.context("expected"),
                Some(op.info().binding().prefix()),
                "{name}"
            );
        }
    }

    assert_eq!(op.read("inside").await?, Bytes::from("inside"));
    Ok(())
}

pub async fn test_container_address_rejected(op: Operator) -> Result<()> {
    let cases = vec!["dir/", "", "/"];

    for address in cases {
        let err = op.read(address).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidUrl, "{address}");
    }
    Ok(())
}

/// Listing `A/` yields exactly every leaf under it.
pub async fn test_list_container(op: Operator) -> Result<()> {
    op.write("A/file1", "1").await?;
    op.write("A/B/file1", "2").await?;
    op.write("AB/file1", "sibling with shared prefix").await?;

    let addresses = collect(op.list("A/").await?).await?;
    assert_eq!(addresses, vec!["A/B/file1".to_string(), "A/file1".to_string()]);
    Ok(())
}

pub async fn test_list_container_without_slash(op: Operator) -> Result<()> {
    op.write("A/file1", "1").await?;
    op.write("A/B/file1", "2").await?;

    let addresses = collect(op.list("A").await?).await?;
    assert_eq!(addresses, vec!["A/B/file1".to_string(), "A/file1".to_string()]);
    Ok(())
}

/// Resources are yielded in the form the caller used.
pub async fn test_list_qualified(op: Operator) -> Result<()> {
    op.write("A/file1", "1").await?;
    op.write("A/B/file1", "2").await?;

    let addresses = collect(op.list(&qualified(&op, "A/")).await?).await?;
    assert_eq!(
        addresses,
        vec![qualified(&op, "A/B/file1"), qualified(&op, "A/file1")]
    );
    Ok(())
}

pub async fn test_list_single_resource(op: Operator) -> Result<()> {
    op.write("A/file1.json", "{}").await?;

    for address in ["A/file1.json".to_string(), qualified(&op, "A/file1.json")] {
        let mut lister = op.list(&address).await?;
        let res = lister.try_next().await?.expect("must have one resource");
        assert_eq!(res.address(), address);
        assert!(lister.try_next().await?.is_none());
    }
    Ok(())
}

pub async fn test_list_not_exist(op: Operator) -> Result<()> {
    let err = list_error(&op, "missing/").await.expect("must fail");
    assert_eq!(err.kind(), ErrorKind::NotFound);

    // Listing root of an empty store is not an error.
    let op_root = collect(op.list("").await?).await?;
    assert!(op_root.is_empty());
    Ok(())
}

/// Cancelled lister stops yielding even with buffered resources.
pub async fn test_list_cancel(op: Operator) -> Result<()> {
    for i in 0..150 {
        op.write(&format!("many/{i:03}"), "x").await?;
    }

    let mut lister = op.list_with("many/", OpList::new().with_buffer(4)).await?;
    assert!(lister.try_next().await?.is_some());

    lister.cancel();
    assert!(lister.is_cancelled());
    assert!(lister.next().await.is_none());
    assert!(lister.next().await.is_none());
    Ok(())
}

pub async fn test_list_parent_cancel(op: Operator) -> Result<()> {
    for i in 0..150 {
        op.write(&format!("many/{i:03}"), "x").await?;
    }

    let token = CancellationToken::new();
    let mut lister = op
        .list_with("many/", OpList::new().with_buffer(1).with_cancel(token.clone()))
        .await?;
    assert!(lister.try_next().await?.is_some());

    token.cancel();
    assert!(lister.next().await.is_none());
    Ok(())
}

pub async fn test_read_cancelled(op: Operator) -> Result<()> {
    op.write("cancelled", "x").await?;

    let token = CancellationToken::new();
    token.cancel();
    let err = op
        .read_with("cancelled", OpRead::new().with_cancel(token))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Cancelled);
    Ok(())
}
