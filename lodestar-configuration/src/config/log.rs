// SPDX-FileCopyrightText: © 2025 Huawei Cloud Computing Technologies Co., Ltd
// SPDX-License-Identifier: Apache-2.0
//
// Copyright 2025 Huawei Cloud Computing Technologies Co., Ltd
//
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
//

use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

/// Where and how verbosely the simulator logs.
///
/// `RUST_LOG` always wins over `log_level`, so a single run can be made
/// more verbose without touching the configuration file.
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Log {
    #[serde(deserialize_with = "deserialize_log_level", serialize_with = "serialize_log_level")]
    #[serde(skip_serializing_if = "Option::is_none", default = "Default::default")]
    pub log_level: Option<EnvFilter>,
    #[serde(skip_serializing_if = "Option::is_none", default = "Default::default")]
    pub log_file: Option<PathBuf>,
}

impl Log {
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().ok().unwrap_or_else(|| match &self.log_level {
            Some(level) => EnvFilter::builder().parse_lossy(level.to_string()),
            None => EnvFilter::builder().with_default_directive(LevelFilter::INFO.into()).parse_lossy(""),
        })
    }
}

impl PartialEq for Log {
    fn eq(&self, other: &Self) -> bool {
        self.log_file == other.log_file
            && self.log_level.as_ref().map(EnvFilter::to_string) == other.log_level.as_ref().map(EnvFilter::to_string)
    }
}
impl Eq for Log {}

fn deserialize_log_level<'de, D>(deserializer: D) -> std::result::Result<Option<EnvFilter>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(directives) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    EnvFilter::builder().parse(directives).map(Some).map_err(|e| {
        serde::de::Error::custom(format!("failed to deserialize log level because of \"{e}\""))
    })
}

fn serialize_log_level<S: Serializer>(
    value: &Option<EnvFilter>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    value.as_ref().map(EnvFilter::to_string).serialize(serializer)
}

#[cfg(test)]
mod test {
    use super::Log;

    #[test]
    fn log_level_directives() {
        let log: Log = serde_yaml::from_str("log_level: debug").unwrap();
        assert_eq!(log.log_level.map(|filter| filter.to_string()), Some("debug".to_owned()));
        assert_eq!(log.log_file, None);
    }

    #[test]
    fn invalid_log_level() {
        let result = serde_yaml::from_str::<Log>("log_level: \"lodestar_lib=loud\"");
        assert!(result.is_err());
    }

    #[test]
    fn empty_log_section_is_default() {
        let log: Log = serde_yaml::from_str("{}").unwrap();
        assert_eq!(log, Log::default());
    }
}
