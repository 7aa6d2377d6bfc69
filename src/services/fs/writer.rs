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

use bytes::Bytes;
use tokio::io::AsyncWriteExt;

use crate::raw::*;
use crate::*;

/// Writer of a local file.
///
/// The file has been truncated while opening, `close` flushes and syncs it.
pub struct FsWriter {
    f: tokio::fs::File,
}

impl FsWriter {
    pub(super) fn new(f: tokio::fs::File) -> Self {
        Self { f }
    }
}

impl oio::Write for FsWriter {
    async fn write(&mut self, bs: Bytes) -> Result<usize> {
        self.f.write_all(&bs).await.map_err(new_std_io_error)?;

        Ok(bs.len())
    }

    async fn close(&mut self) -> Result<()> {
        self.f.flush().await.map_err(new_std_io_error)?;
        self.f.sync_all().await.map_err(new_std_io_error)?;

        Ok(())
    }
}
