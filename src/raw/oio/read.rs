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

use std::future::Future;

use bytes::Bytes;
use bytes::BytesMut;

use crate::*;

/// Read is the internal trait used by uniblob to read data from storage.
///
/// Users should not use or import this trait unless they are implementing
/// a backend.
pub trait Read: Unpin + Send + Sync {
    /// Read the next chunk of data.
    ///
    /// Returns an empty `Bytes` once the whole resource has been consumed.
    /// Any following call will return empty too.
    fn read(&mut self) -> impl Future<Output = Result<Bytes>> + Send;

    /// Read all data until the end of the resource.
    fn read_all(&mut self) -> impl Future<Output = Result<Bytes>> + Send {
        async {
            let mut buf = BytesMut::new();
            loop {
                let bs = self.read().await?;
                if bs.is_empty() {
                    return Ok(buf.freeze());
                }
                buf.extend_from_slice(&bs);
            }
        }
    }
}
