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

use std::sync::Arc;

use super::core::*;
use super::error::parse_error;
use crate::raw::*;
use crate::*;

/// Max objects returned by one list call.
const PAGE_SIZE: usize = 64;

/// GcsLister walks every object under a key prefix.
///
/// Folder placeholder objects (names ending with `/`) are skipped.
pub struct GcsLister {
    inner: oio::PageLister<GcsPages>,
}

impl GcsLister {
    /// `path` is a container path like `a/b/`, or `/` for root.
    pub(super) fn new(core: Arc<GcsCore>, path: &str) -> Self {
        let prefix = build_abs_path(&core.root, path);

        Self {
            inner: oio::PageLister::new(GcsPages {
                core,
                prefix,
                is_root: path == "/",
            }),
        }
    }
}

impl oio::List for GcsLister {
    async fn next(&mut self) -> Result<Option<oio::Entry>> {
        self.inner.next().await
    }
}

struct GcsPages {
    core: Arc<GcsCore>,
    prefix: String,
    is_root: bool,
}

impl oio::PageList for GcsPages {
    async fn next_page(&mut self, ctx: &mut oio::PageContext) -> Result<()> {
        let first = ctx.token.is_empty();

        let resp = self
            .core
            .gcs_list_objects(&self.prefix, &ctx.token, PAGE_SIZE)
            .await?;
        if !resp.status().is_success() {
            return Err(parse_error(resp));
        }

        let output: ListResponse =
            serde_json::from_slice(resp.body()).map_err(new_json_deserialize_error)?;

        // Object stores have no real containers, an empty prefix doesn't exist.
        if first && !self.is_root && output.items.is_empty() && output.next_page_token.is_none()
        {
            return Err(
                Error::new(ErrorKind::NotFound, "no object found under prefix")
                    .with_context("prefix", &self.prefix),
            );
        }

        if let Some(token) = output.next_page_token {
            ctx.token = token;
        } else {
            ctx.done = true;
        }

        for object in output.items {
            if object.name.ends_with('/') {
                continue;
            }

            let path = build_rel_path(&self.core.root, &object.name);
            let content_type = if object.content_type.is_empty() {
                None
            } else {
                Some(object.content_type)
            };

            ctx.entries
                .push_back(oio::Entry::new(path).with_content_type(content_type));
        }

        Ok(())
    }
}
