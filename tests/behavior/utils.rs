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
use futures::TryStreamExt;
use tempfile::TempDir;
use uniblob::services::Gcs;
use uniblob::*;
use wiremock::MockServer;

use super::fake_gcs::FakeGcs;

pub const GCS_PROJECT: &str = "proj";
pub const GCS_BUCKET: &str = "bucket";

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Fixture keeps the backing store of an operator alive.
pub struct Fixture {
    pub op: Operator,
    _guard: Guard,
}

#[allow(dead_code)]
enum Guard {
    Dir(TempDir),
    Server(MockServer),
}

impl Fixture {
    /// An fs operator rooted at a fresh temp dir.
    pub async fn fs() -> Result<Fixture> {
        init_logger();

        let dir = tempfile::tempdir()?;
        let op = Operator::from_dsn(&format!("file://{}", dir.path().display()))?;
        op.init().await?;

        Ok(Fixture {
            op,
            _guard: Guard::Dir(dir),
        })
    }

    /// A gcs operator talking to a fresh fake server through the emulator
    /// branch.
    pub async fn gcs() -> Result<Fixture> {
        init_logger();

        let server = FakeGcs::start(GCS_BUCKET).await;
        let op = Operator::new(
            Gcs::default()
                .project(GCS_PROJECT)
                .bucket(GCS_BUCKET)
                .emulator_host(&server.uri())
                .env(|_| None),
        )?;
        op.init().await?;

        Ok(Fixture {
            op,
            _guard: Guard::Server(server),
        })
    }
}

/// The fully-qualified form of a relative address, spelled out by hand.
pub fn qualified(op: &Operator, rel: &str) -> String {
    format!("{}{}", op.info().binding().prefix(), rel)
}

/// Drain a lister into sorted addresses.
pub async fn collect(lister: Lister) -> Result<Vec<String>> {
    let mut addresses: Vec<String> = lister
        .map_ok(|v| v.into_address())
        .try_collect()
        .await?;
    addresses.sort();
    Ok(addresses)
}

/// Listing an absent container fails either at the call or at the first pull.
pub async fn list_error(op: &Operator, address: &str) -> Option<Error> {
    match op.list(address).await {
        Err(err) => Some(err),
        Ok(mut lister) => lister.try_next().await.err(),
    }
}
