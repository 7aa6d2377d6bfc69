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
use bytes::BytesMut;
use tokio::io::AsyncReadExt;

use crate::raw::*;
use crate::*;

/// Size of every chunk returned by [`FsReader`].
const CHUNK_SIZE: usize = 64 * 1024;

/// Reader of a local file, yields the content in fixed size chunks.
pub struct FsReader {
    f: tokio::fs::File,
    done: bool,
}

impl FsReader {
    pub(super) fn new(f: tokio::fs::File) -> Self {
        Self { f, done: false }
    }
}

impl oio::Read for FsReader {
    async fn read(&mut self) -> Result<Bytes> {
        if self.done {
            return Ok(Bytes::new());
        }

        let mut buf = BytesMut::with_capacity(CHUNK_SIZE);
        while buf.len() < CHUNK_SIZE {
            let n = self.f.read_buf(&mut buf).await.map_err(new_std_io_error)?;
            if n == 0 {
                self.done = true;
                break;
            }
        }

        Ok(buf.freeze())
    }
}
