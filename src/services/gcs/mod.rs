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

mod backend;
pub use backend::GcsBackend;
pub use backend::GcsBuilder as Gcs;
pub use backend::STORAGE_ACCESS_TOKEN;
pub use backend::STORAGE_EMULATOR_HOST;

mod config;
pub use config::GcsConfig;

mod core;
mod error;

mod lister;
pub use lister::GcsLister;

mod writer;
pub use writer::GcsWriter;

/// Reader of gcs objects, streams the response body.
pub type GcsReader = crate::raw::HttpBody;
