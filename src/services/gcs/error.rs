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

use bytes::Bytes;
use http::Response;
use http::StatusCode;
use serde::Deserialize;

use crate::*;

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct GcsErrorResponse {
    error: GcsError,
}

/// GcsError is the error returned by Google Cloud Storage JSON API.
#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct GcsError {
    message: String,
    errors: Vec<GcsErrorDetail>,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct GcsErrorDetail {
    reason: String,
}

/// Parse error response into Error.
pub(super) fn parse_error(resp: Response<Bytes>) -> Error {
    let (parts, bs) = resp.into_parts();

    let kind = match parts.status {
        StatusCode::NOT_FOUND => ErrorKind::NotFound,
        _ => ErrorKind::Unexpected,
    };

    let mut err = match serde_json::from_slice::<GcsErrorResponse>(&bs) {
        Ok(resp) if !resp.error.message.is_empty() => {
            let reasons: Vec<_> = resp.error.errors.iter().map(|v| v.reason.as_str()).collect();
            let err = Error::new(kind, resp.error.message.as_str());
            if reasons.is_empty() {
                err
            } else {
                err.with_context("reason", reasons.join(","))
            }
        }
        _ => Error::new(kind, String::from_utf8_lossy(&bs)),
    };

    err = err.with_context("status", parts.status);
    err
}
