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

use crate::*;

/// Parse std io error into uniblob::Error.
///
/// Only `NotFound` and `Unsupported` have a dedicated kind, every other io
/// failure is `Unexpected` with the io error kept as source.
pub fn new_std_io_error(err: std::io::Error) -> Error {
    use std::io::ErrorKind::*;

    let kind = match err.kind() {
        NotFound => ErrorKind::NotFound,
        Unsupported => ErrorKind::Unsupported,
        _ => ErrorKind::Unexpected,
    };

    Error::new(kind, err.kind().to_string()).set_source(err)
}

/// Parse tokio join error from `spawn_blocking` into uniblob::Error.
pub fn new_task_join_error(err: tokio::task::JoinError) -> Error {
    Error::new(ErrorKind::Unexpected, "blocking task failed to complete").set_source(err)
}
