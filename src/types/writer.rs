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
use tokio_util::sync::CancellationToken;

use crate::raw::*;
use crate::*;

/// Writer is designed to write data into given resource in an asynchronous
/// manner.
///
/// The resource is created if absent and fully replaced if present. Data is
/// only guaranteed to be persisted after [`Writer::close`] returns `Ok`.
///
/// ```no_run
/// # use uniblob::Operator;
/// # use uniblob::Result;
/// # async fn test(op: Operator) -> Result<()> {
/// let mut w = op.writer("path/to/file").await?;
/// w.write("hello, ").await?;
/// w.write("world").await?;
/// w.close().await?;
/// # Ok(())
/// # }
/// ```
pub struct Writer {
    inner: <Backend as Access>::Writer,
    cancel: Option<CancellationToken>,
    address: String,
}

impl Writer {
    pub(crate) fn new(
        inner: <Backend as Access>::Writer,
        cancel: Option<CancellationToken>,
        address: &str,
    ) -> Self {
        Writer {
            inner,
            cancel,
            address: address.to_string(),
        }
    }

    /// Write given bytes into the resource.
    pub async fn write(&mut self, bs: impl Into<Bytes>) -> Result<()> {
        let mut bs = bs.into();
        while !bs.is_empty() {
            let n = cancellable(self.cancel.as_ref(), oio::Write::write(&mut self.inner, bs.clone()))
                .await
                .map_err(|err| {
                    err.with_operation(Operation::WriterWrite)
                        .with_context("address", &self.address)
                })?;
            bs = bs.slice(n..);
        }
        Ok(())
    }

    /// Close the writer and make sure all data have been committed.
    pub async fn close(&mut self) -> Result<()> {
        cancellable(self.cancel.as_ref(), oio::Write::close(&mut self.inner))
            .await
            .map_err(|err| {
                err.with_operation(Operation::WriterClose)
                    .with_context("address", &self.address)
            })
    }
}
