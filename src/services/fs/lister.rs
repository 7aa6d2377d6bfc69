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

use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;

use log::warn;
use tokio_util::sync::CancellationToken;

use super::config::guess_content_type;
use crate::raw::*;
use crate::*;

/// Max directory entries scanned by one blocking step, whether they are
/// yielded or skipped.
const PAGE_SIZE: usize = 64;

/// FsLister walks a directory tree depth-first and yields every leaf file.
///
/// - Hidden names (starting with `.`) are skipped together with everything
///   under them.
/// - Symlinks to files are yielded, symlinks to directories are not followed.
/// - A sub-directory is walked completely before its remaining siblings.
///
/// The token is checked before every directory entry. Once it fires, all
/// open directory handles are closed and the walk fails with
/// [`ErrorKind::Cancelled`].
pub struct FsLister {
    walker: Option<Walker>,
    entries: VecDeque<oio::Entry>,
    done: bool,
}

impl FsLister {
    /// Open the directory at `root.join(prefix)`.
    ///
    /// `prefix` is relative to root and is either empty or ends with `/`.
    pub(super) async fn open(
        root: PathBuf,
        prefix: String,
        cancel: CancellationToken,
    ) -> Result<Self> {
        let walker = tokio::task::spawn_blocking(move || Walker::new(root, prefix, cancel))
            .await
            .map_err(new_task_join_error)??;

        Ok(Self {
            walker: Some(walker),
            entries: VecDeque::new(),
            done: false,
        })
    }
}

impl oio::List for FsLister {
    async fn next(&mut self) -> Result<Option<oio::Entry>> {
        loop {
            if let Some(entry) = self.entries.pop_front() {
                return Ok(Some(entry));
            }
            if self.done {
                return Ok(None);
            }

            let Some(mut walker) = self.walker.take() else {
                return Ok(None);
            };
            let (walker, page) = tokio::task::spawn_blocking(move || {
                let page = walker.next_page(PAGE_SIZE);
                (walker, page)
            })
            .await
            .map_err(new_task_join_error)?;

            let (entries, done) = page?;
            self.entries.extend(entries);
            self.done = done;
            self.walker = Some(walker);
        }
    }
}

struct Frame {
    /// Relative path of this dir, empty or ends with `/`.
    rel: String,
    rd: fs::ReadDir,
}

struct Walker {
    root: PathBuf,
    stack: Vec<Frame>,
    cancel: CancellationToken,
}

impl Walker {
    fn new(root: PathBuf, prefix: String, cancel: CancellationToken) -> Result<Self> {
        let rd = fs::read_dir(root.join(&prefix)).map_err(new_std_io_error)?;

        Ok(Self {
            root,
            stack: vec![Frame { rel: prefix, rd }],
            cancel,
        })
    }

    /// Scan at most `size` directory entries, returns the yielded ones with
    /// whether the walk is done.
    ///
    /// The page may be empty while the walk is not done, for example when
    /// every scanned entry is hidden.
    fn next_page(&mut self, size: usize) -> Result<(Vec<oio::Entry>, bool)> {
        let mut entries = Vec::new();

        for _ in 0..size {
            if self.cancel.is_cancelled() {
                self.stack.clear();
                return Err(new_cancelled_error());
            }

            let Some(frame) = self.stack.last_mut() else {
                return Ok((entries, true));
            };

            let de = match frame.rd.next() {
                Some(de) => de.map_err(new_std_io_error)?,
                None => {
                    self.stack.pop();
                    continue;
                }
            };

            let Some(name) = de.file_name().to_str().map(|v| v.to_string()) else {
                warn!(
                    target: LOGGING_TARGET,
                    "entry {:?} is skipped for non utf-8 name",
                    de.path()
                );
                continue;
            };
            if is_hidden(&name) {
                continue;
            }
            let rel = format!("{}{}", frame.rel, name);

            let file_type = de.file_type().map_err(new_std_io_error)?;
            if file_type.is_dir() {
                let rd = match fs::read_dir(de.path()) {
                    Ok(rd) => rd,
                    // Removed while walking.
                    Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
                    Err(err) => return Err(new_std_io_error(err)),
                };
                self.stack.push(Frame {
                    rel: format!("{rel}/"),
                    rd,
                });
                continue;
            }

            let is_file = if file_type.is_symlink() {
                // Dangling links are skipped too.
                fs::metadata(self.root.join(&rel))
                    .map(|m| m.is_file())
                    .unwrap_or_default()
            } else {
                file_type.is_file()
            };
            if !is_file {
                continue;
            }

            let content_type = guess_content_type(&rel);
            entries.push(oio::Entry::new(rel).with_content_type(content_type));
        }

        Ok((entries, self.stack.is_empty()))
    }
}
