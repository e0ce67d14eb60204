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

pub mod balancer;
pub use balancer::{BalancerConfig, HashFunction, LbPolicy, TargetConfig};
pub mod common;
pub mod log;
pub use log::Log;

use crate::{config::common::is_default, options::Options, GenericError, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{fs::File, io::Read, path::Path};

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct Config {
    #[serde(skip_serializing_if = "is_default", default)]
    pub logging: Log,
    pub balancer: BalancerConfig,
}

impl Config {
    pub fn new(opt: &Options) -> Result<Self> {
        let config: Self = deserialize_yaml(&opt.config)?;
        if config.balancer.targets.is_empty() {
            tracing::warn!(path = %opt.config.display(), "Configuration does not list any balancer target");
        }
        Ok(config)
    }
}

pub fn deserialize_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|source| GenericError::Io { path: path.to_path_buf(), source })?;
    deserialize_yaml_from_reader(file)
}

pub fn deserialize_yaml_from_reader<T: DeserializeOwned, R: Read>(reader: R) -> Result<T> {
    serde_path_to_error::deserialize(serde_yaml::Deserializer::from_reader(reader)).map_err(GenericError::from)
}

#[cfg(test)]
mod test {
    use super::{deserialize_yaml_from_reader, BalancerConfig, Config, HashFunction, LbPolicy, TargetConfig};
    use crate::GenericError;

    #[test]
    fn minimal_config() {
        let yaml = r#"
balancer:
  targets:
    - name: "0.0.0.0"
    - name: "0.0.0.1"
"#;
        let config: Config = deserialize_yaml_from_reader(yaml.as_bytes()).unwrap();
        assert_eq!(config.logging, Default::default());
        assert_eq!(
            config.balancer,
            BalancerConfig {
                policy: LbPolicy::RoundRobin,
                hash_function: HashFunction::Fnv1a,
                targets: vec![TargetConfig::new("0.0.0.0", 1), TargetConfig::new("0.0.0.1", 1)],
            }
        );
    }

    #[test]
    fn unknown_policy_reports_field_path() {
        let yaml = r#"
balancer:
  policy: consistent_ring
  targets:
    - name: "0.0.0.0"
"#;
        let err = deserialize_yaml_from_reader::<Config, _>(yaml.as_bytes()).unwrap_err();
        match err {
            GenericError::Deserialize { path, .. } => assert_eq!(path, "balancer.policy"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn missing_balancer_section() {
        let yaml = "logging:\n  log_level: debug\n";
        assert!(deserialize_yaml_from_reader::<Config, _>(yaml.as_bytes()).is_err());
    }
}
