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

use std::collections::hash_map;
use std::collections::HashMap;

use serde::de;
use serde::de::value::MapDeserializer;
use serde::de::Deserializer;
use serde::de::IntoDeserializer;
use serde::de::Visitor;

use crate::*;

/// Parse json serialize error into uniblob::Error.
pub fn new_json_serialize_error(e: serde_json::Error) -> Error {
    Error::new(ErrorKind::Unexpected, "serialize json").set_source(e)
}

/// Parse json deserialize error into uniblob::Error.
pub fn new_json_deserialize_error(e: serde_json::Error) -> Error {
    Error::new(ErrorKind::Unexpected, "deserialize json").set_source(e)
}

/// ConfigDeserializer turns string options, like the query pairs of a dsn,
/// into a service config.
///
/// - Keys are case insensitive and `-` is the same as `_`, so
///   `Emulator-Host` sets `emulator_host`.
/// - Bools accept `true`/`on` and `false`/`off`.
/// - An empty value leaves an `Option` field as `None`.
pub struct ConfigDeserializer(MapDeserializer<'static, Options, de::value::Error>);

impl ConfigDeserializer {
    /// Create a new config deserializer.
    pub fn new(map: HashMap<String, String>) -> Self {
        Self(MapDeserializer::new(Options(map.into_iter())))
    }
}

impl<'de> Deserializer<'de> for ConfigDeserializer {
    type Error = de::value::Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_map(self.0)
    }

    serde::forward_to_deserialize_any! {
        bool u8 u16 u32 u64 i8 i16 i32 i64 f32 f64 char str string unit seq
        bytes byte_buf unit_struct tuple_struct
        identifier tuple ignored_any option newtype_struct enum
        struct
    }
}

/// Options yields normalized keys together with the raw option.
struct Options(hash_map::IntoIter<String, String>);

impl Iterator for Options {
    type Item = (String, OptionValue);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, value) = self.0.next()?;
        let field = key.to_lowercase().replace('-', "_");
        Some((field, OptionValue { key, value }))
    }
}

/// OptionValue keeps the key as given by user for error output.
struct OptionValue {
    key: String,
    value: String,
}

impl IntoDeserializer<'_, de::value::Error> for OptionValue {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self::Deserializer {
        self
    }
}

impl<'de> Deserializer<'de> for OptionValue {
    type Error = de::value::Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.value.into_deserializer().deserialize_any(visitor)
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        let v = match self.value.to_lowercase().as_str() {
            "true" | "on" => true,
            "false" | "off" => false,
            _ => {
                return Err(de::Error::custom(format_args!(
                    "option '{}' expects true/on or false/off, got '{}'",
                    self.key, self.value
                )))
            }
        };
        visitor.visit_bool(v)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        if self.value.is_empty() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    serde::forward_to_deserialize_any! {
        u8 u16 u32 u64 i8 i16 i32 i64 f32 f64
        char str string unit newtype_struct enum seq
        bytes byte_buf map unit_struct tuple_struct
        identifier tuple ignored_any
        struct
    }
}
