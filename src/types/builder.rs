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

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::raw::*;
use crate::*;

/// Builder is used to set up underlying services.
///
/// This trait allows the developer to define a builder struct that can:
///
/// - build a service via builder style API.
/// - configure in-memory options like the environment lookup.
///
/// Usually, users don't need to use or import this trait directly, they can use `Operator` API instead.
///
/// For example:
///
/// ```no_run
/// # use anyhow::Result;
/// use uniblob::services::Fs;
/// use uniblob::Operator;
/// async fn test() -> Result<()> {
///     // Create fs backend builder.
///     let builder = Fs::default().root("/tmp");
///
///     // Build an `Operator` to start operating the storage.
///     let op: Operator = Operator::new(builder)?;
///
///     Ok(())
/// }
/// ```
pub trait Builder: Default + 'static {
    /// Associated scheme for this builder. It indicates what underlying service is.
    const SCHEME: Scheme;
    /// Associated configuration for this builder.
    type Config: Configurator<Builder = Self>;
    /// The accessor that built by this builder.
    type Accessor: Access + Into<Backend>;

    /// Consume the accessor builder to build a service.
    ///
    /// Every parameter and credential is resolved here. A failure means no
    /// accessor is returned at all.
    fn build(self) -> Result<Self::Accessor>;
}

/// Configurator is used to configure the underlying service.
///
/// This trait allows the developer to define a configuration struct that can:
///
/// - deserialize from an iterator like hashmap or vector.
/// - fill from a configuration [`Dsn`].
/// - convert into a service builder and finally build the underlying services.
///
/// For example:
///
/// ```no_run
/// # use anyhow::Result;
/// use uniblob::services::FsConfig;
/// use uniblob::Operator;
/// async fn test() -> Result<()> {
///     let mut cfg = FsConfig::default();
///     cfg.root = Some("/tmp".to_string());
///
///     // Build an `Operator` to start operating the storage.
///     let op: Operator = Operator::from_config(cfg)?;
///
///     Ok(())
/// }
/// ```
pub trait Configurator: Serialize + DeserializeOwned + Debug + 'static {
    /// The builder this configuration converts into.
    type Builder: Builder<Config = Self>;

    /// Deserialize from an iterator.
    ///
    /// This API is provided by uniblob, developer should not implement it.
    fn from_iter(iter: impl IntoIterator<Item = (String, String)>) -> Result<Self> {
        let cfg = ConfigDeserializer::new(iter.into_iter().collect());

        Self::deserialize(cfg).map_err(|err| {
            Error::new(ErrorKind::InvalidUrl, "failed to deserialize config").set_source(err)
        })
    }

    /// Build the configuration from a parsed [`Dsn`].
    ///
    /// The DSN's query pairs are taken as extra options.
    fn from_dsn(dsn: &Dsn) -> Result<Self>;

    /// Convert this configuration into a service builder.
    fn into_builder(self) -> Self::Builder;
}
