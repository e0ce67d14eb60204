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

use std::fmt::{Display, Formatter};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use super::common::is_default;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BalancerConfig {
    #[serde(skip_serializing_if = "is_default", default)]
    pub policy: LbPolicy,
    /// Only read by [`LbPolicy::Hash`].
    #[serde(skip_serializing_if = "is_default", default)]
    pub hash_function: HashFunction,
    pub targets: Vec<TargetConfig>,
}

impl BalancerConfig {
    pub fn weights(&self) -> Vec<u32> {
        self.targets.iter().map(|target| target.weight).collect()
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum LbPolicy {
    #[default]
    RoundRobin,
    WeightedRoundRobin,
    LeastCost,
    Random,
    Hash,
    Crc32,
    Murmur2,
}

impl LbPolicy {
    /// Policies that map a partition key to a target.
    pub fn is_keyed(self) -> bool {
        matches!(self, Self::Hash | Self::Crc32 | Self::Murmur2)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::RoundRobin => "round_robin",
            Self::WeightedRoundRobin => "weighted_round_robin",
            Self::LeastCost => "least_cost",
            Self::Random => "random",
            Self::Hash => "hash",
            Self::Crc32 => "crc32",
            Self::Murmur2 => "murmur2",
        }
    }
}

impl Display for LbPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum HashFunction {
    #[default]
    Fnv1a,
    Crc32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TargetConfig {
    pub name: CompactString,
    #[serde(skip_serializing_if = "is_default_weight", default = "default_weight")]
    pub weight: u32,
}

impl TargetConfig {
    pub fn new(name: impl Into<CompactString>, weight: u32) -> Self {
        Self { name: name.into(), weight }
    }
}

impl Display for TargetConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.name)
    }
}

const fn default_weight() -> u32 {
    1
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_default_weight(weight: &u32) -> bool {
    *weight == default_weight()
}
