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

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use percent_encoding::percent_decode_str;
use serde_json::json;
use wiremock::matchers::any;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::Request;
use wiremock::Respond;
use wiremock::ResponseTemplate;

/// An in-memory stand-in for the GCS JSON API, enough for one bucket.
#[derive(Clone)]
pub struct FakeGcs {
    bucket: String,
    state: Arc<Mutex<State>>,
}

#[derive(Default)]
struct State {
    created: bool,
    objects: BTreeMap<String, (Vec<u8>, Option<String>)>,
}

impl FakeGcs {
    /// Start a mock server serving given bucket.
    pub async fn start(bucket: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(FakeGcs {
                bucket: bucket.to_string(),
                state: Arc::default(),
            })
            .mount(&server)
            .await;
        server
    }

    fn objects_path(&self) -> String {
        format!("/storage/v1/b/{}/o", self.bucket)
    }

    fn object_key(&self, path: &str) -> Option<String> {
        let key = path.strip_prefix(&format!("{}/", self.objects_path()))?;
        percent_decode_str(key)
            .decode_utf8()
            .ok()
            .map(|v| v.to_string())
    }

    fn not_found(&self, key: &str) -> ResponseTemplate {
        ResponseTemplate::new(404).set_body_json(json!({
            "error": {
                "code": 404,
                "message": format!("No such object: {}/{key}", self.bucket),
                "errors": [{"domain": "global", "reason": "notFound"}],
            }
        }))
    }

    fn list(&self, state: &State, query: &HashMap<String, String>) -> ResponseTemplate {
        let prefix = query.get("prefix").cloned().unwrap_or_default();
        let max: usize = query
            .get("maxResults")
            .and_then(|v| v.parse().ok())
            .unwrap_or(1000);
        let start: usize = query
            .get("pageToken")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);

        let names: Vec<_> = state
            .objects
            .iter()
            .filter(|(k, _)| k.starts_with(&prefix))
            .collect();
        let items: Vec<_> = names
            .iter()
            .skip(start)
            .take(max)
            .map(|(k, (_, ct))| match ct {
                Some(ct) => json!({"name": k, "contentType": ct}),
                None => json!({"name": k}),
            })
            .collect();

        let mut body = json!({"kind": "storage#objects", "items": items});
        if start + max < names.len() {
            body["nextPageToken"] = json!((start + max).to_string());
        }
        ResponseTemplate::new(200).set_body_json(body)
    }
}

impl Respond for FakeGcs {
    fn respond(&self, req: &Request) -> ResponseTemplate {
        let mut state = self.state.lock().unwrap();
        let path = req.url.path().to_string();
        let query: HashMap<String, String> = req.url.query_pairs().into_owned().collect();

        match req.method.as_str() {
            "POST" if path == "/storage/v1/b" => {
                if state.created {
                    ResponseTemplate::new(409).set_body_json(json!({
                        "error": {"code": 409, "message": "bucket already exists"}
                    }))
                } else {
                    state.created = true;
                    ResponseTemplate::new(200).set_body_json(json!({"name": self.bucket}))
                }
            }
            "POST" if path == format!("/upload/storage/v1/b/{}/o", self.bucket) => {
                let Some(name) = query.get("name") else {
                    return ResponseTemplate::new(400);
                };
                let content_type = req
                    .headers
                    .get("content-type")
                    .and_then(|v| v.to_str().ok())
                    .map(|v| v.to_string());
                state
                    .objects
                    .insert(name.clone(), (req.body.clone(), content_type));
                ResponseTemplate::new(200).set_body_json(json!({"name": name}))
            }
            "GET" if path == self.objects_path() => self.list(&state, &query),
            "GET" => {
                let Some(key) = self.object_key(&path) else {
                    return ResponseTemplate::new(400);
                };
                match state.objects.get(&key) {
                    None => self.not_found(&key),
                    Some((bs, _)) if query.get("alt").map(|v| v.as_str()) == Some("media") => {
                        ResponseTemplate::new(200).set_body_bytes(bs.clone())
                    }
                    Some((_, ct)) => ResponseTemplate::new(200).set_body_json(json!({
                        "name": key,
                        "contentType": ct.clone().unwrap_or_default(),
                    })),
                }
            }
            "DELETE" => {
                let Some(key) = self.object_key(&path) else {
                    return ResponseTemplate::new(400);
                };
                match state.objects.remove(&key) {
                    Some(_) => ResponseTemplate::new(204),
                    None => self.not_found(&key),
                }
            }
            _ => ResponseTemplate::new(400),
        }
    }
}
