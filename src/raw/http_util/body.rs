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
use futures::StreamExt;

use crate::raw::*;
use crate::*;

/// The streaming body that uniblob's HttpClient returned.
///
/// We implement [`oio::Read`] for the `HttpBody`. Services can use `HttpBody` as
/// [`Access::Reader`].
pub struct HttpBody {
    stream: Box<dyn Stream<Item = Result<Bytes>> + Send + Sync + Unpin + 'static>,
}

impl HttpBody {
    /// Create a new `HttpBody` with given stream.
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes>> + Send + Sync + Unpin + 'static,
    {
        HttpBody {
            stream: Box::new(stream),
        }
    }
}

impl oio::Read for HttpBody {
    async fn read(&mut self) -> Result<Bytes> {
        // Empty chunks are skipped so that an empty result always means EOF.
        while let Some(bs) = self.stream.next().await.transpose()? {
            if !bs.is_empty() {
                return Ok(bs);
            }
        }
        Ok(Bytes::new())
    }
}
