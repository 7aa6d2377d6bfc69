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

use crate::raw::*;
use crate::services::FsBackend;
use crate::services::FsLister;
use crate::services::FsReader;
use crate::services::FsWriter;
use crate::services::GcsBackend;
use crate::services::GcsLister;
use crate::services::GcsReader;
use crate::services::GcsWriter;
use crate::*;

/// Backend is the closed set of services that an [`Operator`] can bind.
///
/// Adding a new service means adding a variant here and a branch in
/// [`Operator::from_dsn`].
#[derive(Debug)]
pub enum Backend {
    /// Local file system backend.
    Fs(FsBackend),
    /// Google Cloud Storage backend.
    Gcs(GcsBackend),
}

impl From<FsBackend> for Backend {
    fn from(v: FsBackend) -> Self {
        Backend::Fs(v)
    }
}

impl From<GcsBackend> for Backend {
    fn from(v: GcsBackend) -> Self {
        Backend::Gcs(v)
    }
}

impl<L> Listing<L> {
    fn map<M>(self, f: impl FnOnce(L) -> M) -> Listing<M> {
        match self {
            Listing::Resource(content_type) => Listing::Resource(content_type),
            Listing::Container(l) => Listing::Container(f(l)),
        }
    }
}

impl Access for Backend {
    type Reader = TwoWays<FsReader, GcsReader>;
    type Writer = TwoWays<FsWriter, GcsWriter>;
    type Lister = TwoWays<FsLister, GcsLister>;

    fn info(&self) -> &AccessorInfo {
        match self {
            Backend::Fs(b) => b.info(),
            Backend::Gcs(b) => b.info(),
        }
    }

    async fn init(&self, args: OpInit) -> Result<()> {
        match self {
            Backend::Fs(b) => b.init(args).await,
            Backend::Gcs(b) => b.init(args).await,
        }
    }

    async fn read(&self, path: &str, args: OpRead) -> Result<Self::Reader> {
        match self {
            Backend::Fs(b) => b.read(path, args).await.map(TwoWays::One),
            Backend::Gcs(b) => b.read(path, args).await.map(TwoWays::Two),
        }
    }

    async fn write(&self, path: &str, args: OpWrite) -> Result<Self::Writer> {
        match self {
            Backend::Fs(b) => b.write(path, args).await.map(TwoWays::One),
            Backend::Gcs(b) => b.write(path, args).await.map(TwoWays::Two),
        }
    }

    async fn delete(&self, path: &str, args: OpDelete) -> Result<()> {
        match self {
            Backend::Fs(b) => b.delete(path, args).await,
            Backend::Gcs(b) => b.delete(path, args).await,
        }
    }

    async fn list(&self, path: &str, args: &OpList) -> Result<Listing<Self::Lister>> {
        match self {
            Backend::Fs(b) => Ok(b.list(path, args).await?.map(TwoWays::One)),
            Backend::Gcs(b) => Ok(b.list(path, args).await?.map(TwoWays::Two)),
        }
    }

    async fn accessor(&self, path: &str, args: OpAccessor) -> Result<String> {
        match self {
            Backend::Fs(b) => b.accessor(path, args).await,
            Backend::Gcs(b) => b.accessor(path, args).await,
        }
    }
}
