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

use std::sync::Arc;

use bytes::Bytes;
use bytes::BytesMut;

use super::core::GcsCore;
use super::error::parse_error;
use crate::raw::*;
use crate::*;

/// GcsWriter buffers the whole object in memory and uploads it on close.
///
/// The object is replaced as a whole only after a successful close.
pub struct GcsWriter {
    core: Arc<GcsCore>,
    path: String,
    op: OpWrite,

    buf: BytesMut,
    closed: bool,
}

impl GcsWriter {
    pub(super) fn new(core: Arc<GcsCore>, path: &str, op: OpWrite) -> Self {
        GcsWriter {
            core,
            path: path.to_string(),
            op,

            buf: BytesMut::new(),
            closed: false,
        }
    }
}

impl oio::Write for GcsWriter {
    async fn write(&mut self, bs: Bytes) -> Result<usize> {
        if self.closed {
            return Err(Error::new(
                ErrorKind::Unexpected,
                "writer has been closed",
            ));
        }

        self.buf.extend_from_slice(&bs);
        Ok(bs.len())
    }

    async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        let body = self.buf.clone().freeze();
        let resp = self
            .core
            .gcs_insert_object(&self.path, self.op.content_type(), body)
            .await?;

        if !resp.status().is_success() {
            return Err(parse_error(resp));
        }

        self.buf.clear();
        self.closed = true;
        Ok(())
    }
}
