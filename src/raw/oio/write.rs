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

use crate::*;

/// Write is the trait that uniblob returns to callers.
///
/// # Notes
///
/// Data is only guaranteed to be persisted after `close` returns `Ok`.
pub trait Write: Unpin + Send + Sync {
    /// Write given bytes into the sink.
    ///
    /// Returns the size that has been consumed.
    fn write(&mut self, bs: Bytes) -> impl Future<Output = Result<usize>> + Send;

    /// Close the writer and make sure all data has been flushed.
    fn close(&mut self) -> impl Future<Output = Result<()>> + Send;
}
