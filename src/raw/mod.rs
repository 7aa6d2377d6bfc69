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

//! Raw modules provide raw APIs that used by underlying services
//!
//! # Notes
//!
//! - Only developers who want to develop new services or layers need to
//!   access raw APIs.
//! - Raw APIs should only be accessed via `uniblob::raw::Xxxx`, any public
//!   API should never expose raw API directly.
//! - Raw APIs are far less stable than public API, please don't rely on them
//!   whenever possible.

mod accessor;
pub use accessor::Access;
pub use accessor::AccessorInfo;
pub use accessor::Listing;

mod backend;
pub use backend::Backend;

mod enum_utils;
pub use enum_utils::TwoWays;

mod futures_util;
pub use futures_util::cancellable;
pub use futures_util::new_cancelled_error;

mod http_util;
pub use http_util::*;

mod locator;
pub use locator::Binding;
pub use locator::Locator;

mod logging;
pub(crate) use logging::OperationLogger;
pub(crate) use logging::LOGGING_TARGET;

mod operation;
pub use operation::Operation;

mod path;
pub use path::*;

mod serde_util;
pub use serde_util::*;

mod std_io_util;
pub use std_io_util::*;

pub mod oio;
