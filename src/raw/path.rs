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

/// build_abs_path will build an absolute path with root.
///
/// # Rules
///
/// - Input root MUST be the format like `/abc/def/`
/// - Output will be the format like `path/to/root/path`.
pub fn build_abs_path(root: &str, path: &str) -> String {
    debug_assert!(root.starts_with('/'), "root must start with /");
    debug_assert!(root.ends_with('/'), "root must end with /");

    let p = root[1..].to_string();

    if path == "/" {
        p
    } else {
        debug_assert!(!path.starts_with('/'), "path must not start with /");
        p + path
    }
}

/// build_rel_path will build a relative path towards root.
///
/// # Rules
///
/// - Input root MUST be the format like `/abc/def/`
/// - Input path MUST start with root like `/abc/def/path/to/file`
///   or `abc/def/path/to/file`
/// - Output will be the format like `path/to/file`.
pub fn build_rel_path(root: &str, path: &str) -> String {
    if path.starts_with('/') {
        debug_assert!(
            path.starts_with(root),
            "path {path} doesn't start with root {root}"
        );
        path[root.len()..].to_string()
    } else {
        debug_assert!(
            path.starts_with(&root[1..]),
            "path {path} doesn't start with root {root}"
        );
        path[root.len() - 1..].to_string()
    }
}

/// Normalize a relative path lexically so that it can never leave the root.
///
/// # Normalize Rules
///
/// - Empty segments and `.` are dropped: `abc//./def` => `abc/def`
/// - `..` removes the previous segment: `abc/../def` => `def`
/// - `..` above the root is a [`ErrorKind::ContainmentViolation`]: `../abc`
/// - Path ends with `/` (or with `.`/`..`) keeps the trailing `/`: `abc/def/` => `abc/def/`
/// - Empty path will be `/`: `` => `/`
/// - Path containing NUL is a [`ErrorKind::InvalidUrl`].
///
/// Whitespace is kept as is since object keys may legally carry it.
pub fn normalize_path(path: &str) -> Result<String> {
    if path.contains('\0') {
        return Err(Error::new(ErrorKind::InvalidUrl, "path contains NUL byte"));
    }

    let mut segments: Vec<&str> = Vec::new();
    let mut has_trailing = path.ends_with('/');
    for seg in path.split('/') {
        match seg {
            "" => continue,
            "." => has_trailing = true,
            ".." => {
                has_trailing = true;
                if segments.pop().is_none() {
                    return Err(Error::new(
                        ErrorKind::ContainmentViolation,
                        "path climbs above the root",
                    ));
                }
            }
            v => {
                has_trailing = path.ends_with('/');
                segments.push(v)
            }
        }
    }

    // Fast line for root path.
    if segments.is_empty() {
        return Ok("/".to_string());
    }

    let mut p = segments.join("/");
    if has_trailing {
        p.push('/');
    }
    Ok(p)
}

/// Make sure root is normalized to style like `/abc/def/`.
///
/// # Normalize Rules
///
/// - All leading / will be trimmed: `///abc` => `abc`
/// - Internal // will be replaced by /: `abc///def` => `abc/def`
/// - Empty path will be `/`: `` => `/`
/// - Add leading `/` if not starts with: `abc/` => `/abc/`
/// - Add trailing `/` if not ends with: `/abc` => `/abc/`
///
/// Finally, we will get path like `/path/to/root/`.
pub fn normalize_root(v: &str) -> String {
    let mut v = v
        .split('/')
        .filter(|v| !v.is_empty())
        .collect::<Vec<&str>>()
        .join("/");
    if !v.starts_with('/') {
        v.insert(0, '/');
    }
    if !v.ends_with('/') {
        v.push('/')
    }
    v
}

/// Check if the last segment of given path is hidden (starts with `.`).
pub fn is_hidden(name: &str) -> bool {
    name.trim_end_matches('/')
        .rsplit('/')
        .next()
        .is_some_and(|v| v.starts_with('.'))
}
