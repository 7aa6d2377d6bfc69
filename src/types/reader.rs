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
use futures::Stream;
use tokio_util::sync::CancellationToken;

use crate::raw::*;
use crate::*;

/// Reader is designed to read data from given resource in an asynchronous
/// manner.
///
/// Data is consumed chunk by chunk starting from the beginning of the
/// resource. An empty chunk marks the end.
///
/// # Usage
///
/// ```no_run
/// # use uniblob::Operator;
/// # use uniblob::Result;
/// # async fn test(op: Operator) -> Result<()> {
/// let mut r = op.reader("path/to/file").await?;
/// loop {
///     let bs = r.read().await?;
///     if bs.is_empty() {
///         break;
///     }
///     println!("got {} bytes", bs.len());
/// }
/// # Ok(())
/// # }
/// ```
pub struct Reader {
    inner: <Backend as Access>::Reader,
    cancel: Option<CancellationToken>,
    address: String,
}

impl Reader {
    pub(crate) fn new(
        inner: <Backend as Access>::Reader,
        cancel: Option<CancellationToken>,
        address: &str,
    ) -> Self {
        Reader {
            inner,
            cancel,
            address: address.to_string(),
        }
    }

    /// Read the next chunk of the resource.
    ///
    /// Returns an empty `Bytes` once the end has been reached.
    pub async fn read(&mut self) -> Result<Bytes> {
        cancellable(self.cancel.as_ref(), oio::Read::read(&mut self.inner))
            .await
            .map_err(|err| {
                err.with_operation(Operation::ReaderRead)
                    .with_context("address", &self.address)
            })
    }

    /// Read all remaining data of the resource.
    pub async fn read_all(&mut self) -> Result<Bytes> {
        cancellable(self.cancel.as_ref(), oio::Read::read_all(&mut self.inner))
            .await
            .map_err(|err| {
                err.with_operation(Operation::ReaderRead)
                    .with_context("address", &self.address)
            })
    }

    /// Convert the reader into a stream of chunks.
    pub fn into_bytes_stream(self) -> impl Stream<Item = Result<Bytes>> + Send + Unpin {
        Box::pin(futures::stream::try_unfold(self, |mut r| async move {
            let bs = r.read().await?;
            if bs.is_empty() {
                Ok(None)
            } else {
                Ok(Some((bs, r)))
            }
        }))
    }
}
