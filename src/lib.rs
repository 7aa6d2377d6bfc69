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

//! uniblob gives one capability set over heterogeneous blob stores: read,
//! write, delete, list, and obtain an externally usable accessor url,
//! regardless of backend.
//!
//! - Construct an [`Operator`] once from a configuration dsn like
//!   `file:///srv/blobs` or `gcs://my-project/my-bucket/prefix`.
//! - Address resources by a relative path (`dir/file`) or by the
//!   fully-qualified url (`gcs://my-project/my-bucket/prefix/dir/file`);
//!   both resolve to the same object, and qualified urls outside of the
//!   bound root or bucket are rejected.
//! - [`Operator::list`] streams every leaf resource under an address from a
//!   cancellable background traversal.
//!
//! # Quick Start
//!
//! ```no_run
//! use futures::TryStreamExt;
//! use uniblob::Operator;
//! use uniblob::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let op = Operator::from_dsn("file:///tmp/blobs")?;
//!     op.init().await?;
//!
//!     // Write data
//!     op.write("dir/hello.txt", "Hello, World!").await?;
//!
//!     // Read data back through the fully-qualified address
//!     let bs = op.read("file:///tmp/blobs/dir/hello.txt").await?;
//!
//!     // List everything under dir/
//!     let mut lister = op.list("dir/").await?;
//!     while let Some(res) = lister.try_next().await? {
//!         println!("{}", res.address());
//!     }
//!
//!     // Delete
//!     op.delete("dir/hello.txt").await?;
//!
//!     Ok(())
//! }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]
// Deny unused qualifications.
#![deny(unused_qualifications)]

// Private module with public types, they will be accessed via `uniblob::Xxxx`
mod types;
pub use types::*;

// Public modules, they will be accessed like `uniblob::services::Xxxx`
pub mod raw;
pub mod services;
