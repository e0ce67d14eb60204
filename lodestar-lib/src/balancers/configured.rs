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

use std::sync::Arc;

use lodestar_configuration::config::{BalancerConfig, HashFunction, LbPolicy, TargetConfig};

use super::{
    crc32::Crc32Balancer,
    hash::{HashBalancer, HasherPool},
    least::LeastCostBalancer,
    murmur2::Murmur2Balancer,
    random::RandomBalancer,
    round_robin::RoundRobinBalancer,
    wrr::WeightedBalancer,
    Balancer, BalancerError, CostBalancer, KeyedBalancer, Result,
};

type Crc32Hasher = crc32fast::Hasher;

/// A balancer picked at runtime from an [LbPolicy].
#[derive(Debug)]
pub enum ConfiguredBalancer<E> {
    RoundRobin(RoundRobinBalancer<E>),
    WeightedRoundRobin(WeightedBalancer<E>),
    LeastCost(LeastCostBalancer<E>),
    Random(RandomBalancer<E>),
    Hash(HashBalancer<E>),
    HashCrc32(HashBalancer<E, Crc32Hasher>),
    Crc32(Crc32Balancer<E>),
    Murmur2(Murmur2Balancer<E>),
}

impl<E> ConfiguredBalancer<E> {
    /// `weights` are only read by [LbPolicy::WeightedRoundRobin], and `hash_function` only
    /// by [LbPolicy::Hash].
    pub fn new(policy: LbPolicy, hash_function: HashFunction, targets: Vec<Arc<E>>, weights: Vec<u32>) -> Result<Self> {
        tracing::debug!("Creating {policy} balancer over {} targets", targets.len());
        let balancer = match policy {
            LbPolicy::RoundRobin => Self::RoundRobin(RoundRobinBalancer::new(targets)?),
            LbPolicy::WeightedRoundRobin => Self::WeightedRoundRobin(WeightedBalancer::new(targets, weights)?),
            LbPolicy::LeastCost => Self::LeastCost(LeastCostBalancer::new(targets)?),
            LbPolicy::Random => Self::Random(RandomBalancer::new(targets)?),
            LbPolicy::Hash => match hash_function {
                HashFunction::Fnv1a => Self::Hash(HashBalancer::new(targets)?),
                HashFunction::Crc32 => {
                    let pool = HasherPool::new(Crc32Hasher::new as fn() -> Crc32Hasher);
                    Self::HashCrc32(HashBalancer::with_pool(targets, Arc::new(pool))?)
                },
            },
            LbPolicy::Crc32 => Self::Crc32(Crc32Balancer::new(targets)?),
            LbPolicy::Murmur2 => Self::Murmur2(Murmur2Balancer::new(targets)?),
        };
        Ok(balancer)
    }

    pub fn policy(&self) -> LbPolicy {
        match self {
            Self::RoundRobin(_) => LbPolicy::RoundRobin,
            Self::WeightedRoundRobin(_) => LbPolicy::WeightedRoundRobin,
            Self::LeastCost(_) => LbPolicy::LeastCost,
            Self::Random(_) => LbPolicy::Random,
            Self::Hash(_) | Self::HashCrc32(_) => LbPolicy::Hash,
            Self::Crc32(_) => LbPolicy::Crc32,
            Self::Murmur2(_) => LbPolicy::Murmur2,
        }
    }

    /// Keyed policies need `key`, least cost charges `cost`, the rest ignore both.
    pub fn next_item(&self, key: Option<&[u8]>, cost: u64) -> Result<Arc<E>> {
        let require_key = || key.ok_or(BalancerError::MissingKey { policy: self.policy() });
        match self {
            Self::RoundRobin(balancer) => Ok(balancer.next_item()),
            Self::WeightedRoundRobin(balancer) => Ok(balancer.next_item()),
            Self::LeastCost(balancer) => Ok(balancer.next_item_with_cost(cost)),
            Self::Random(balancer) => Ok(balancer.next_item()),
            Self::Hash(balancer) => balancer.next_item_for_key(require_key()?),
            Self::HashCrc32(balancer) => balancer.next_item_for_key(require_key()?),
            Self::Crc32(balancer) => balancer.next_item_for_key(require_key()?),
            Self::Murmur2(balancer) => balancer.next_item_for_key(require_key()?),
        }
    }

    /// Targets in the order the underlying balancer indexes them.
    pub fn targets(&self) -> Vec<Arc<E>> {
        match self {
            Self::RoundRobin(balancer) => balancer.targets().to_vec(),
            Self::WeightedRoundRobin(balancer) => balancer.targets().cloned().collect(),
            Self::LeastCost(balancer) => balancer.targets().to_vec(),
            Self::Random(balancer) => balancer.targets().to_vec(),
            Self::Hash(balancer) => balancer.targets().to_vec(),
            Self::HashCrc32(balancer) => balancer.targets().to_vec(),
            Self::Crc32(balancer) => balancer.targets().to_vec(),
            Self::Murmur2(balancer) => balancer.targets().to_vec(),
        }
    }
}

impl ConfiguredBalancer<TargetConfig> {
    pub fn from_config(config: &BalancerConfig) -> Result<Self> {
        let targets = config.targets.iter().cloned().map(Arc::new).collect();
        Self::new(config.policy, config.hash_function, targets, config.weights())
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use lodestar_configuration::config::{BalancerConfig, HashFunction, LbPolicy, TargetConfig};
    use tracing_test::traced_test;

    use crate::balancers::{
        test_support::{numbered_keys, partitions, Partition},
        BalancerError,
    };

    use super::ConfiguredBalancer;

    fn balancer(policy: LbPolicy, targets: usize) -> ConfiguredBalancer<Partition> {
        ConfiguredBalancer::new(policy, HashFunction::default(), partitions(targets), vec![1; targets]).unwrap()
    }

    fn keyed_selection(balancer: &ConfiguredBalancer<Partition>) -> Vec<usize> {
        numbered_keys(12).map(|key| balancer.next_item(Some(key.as_bytes()), 0).unwrap().0).collect()
    }

    #[test]
    pub fn test_policy_round_trip() {
        for policy in [
            LbPolicy::RoundRobin,
            LbPolicy::WeightedRoundRobin,
            LbPolicy::LeastCost,
            LbPolicy::Random,
            LbPolicy::Hash,
            LbPolicy::Crc32,
            LbPolicy::Murmur2,
        ] {
            assert_eq!(balancer(policy, 3).policy(), policy);
        }
    }

    #[test]
    pub fn test_keyed_dispatch() {
        assert_eq!(keyed_selection(&balancer(LbPolicy::Hash, 6)), vec![3, 4, 1, 2, 1, 2, 5, 0, 1, 2, 0, 5]);
        assert_eq!(keyed_selection(&balancer(LbPolicy::Crc32, 6)), vec![5, 5, 1, 1, 4, 4, 4, 0, 5, 3, 3, 3]);
        assert_eq!(keyed_selection(&balancer(LbPolicy::Murmur2, 6)), vec![2, 3, 2, 5, 1, 0, 4, 3, 3, 5, 4, 0]);

        let crc32_hash =
            ConfiguredBalancer::new(LbPolicy::Hash, HashFunction::Crc32, partitions(6), Vec::new()).unwrap();
        assert_eq!(crc32_hash.policy(), LbPolicy::Hash);
        assert_eq!(keyed_selection(&crc32_hash), vec![5, 5, 1, 1, 0, 0, 4, 0, 5, 1, 1, 1]);
    }

    #[test]
    pub fn test_keyed_policies_need_a_key() {
        for policy in [LbPolicy::Hash, LbPolicy::Crc32, LbPolicy::Murmur2] {
            assert_eq!(balancer(policy, 3).next_item(None, 0).unwrap_err(), BalancerError::MissingKey { policy });
        }
        assert_eq!(balancer(LbPolicy::Murmur2, 3).next_item(Some(b""), 0).unwrap_err(), BalancerError::EmptyKey);
    }

    #[test]
    pub fn test_unkeyed_policies_ignore_key() {
        let round_robin = balancer(LbPolicy::RoundRobin, 3);
        let selected: Vec<_> = (0..4).map(|_| round_robin.next_item(Some(b"ignored"), 9).unwrap().0).collect();
        assert_eq!(selected, vec![0, 1, 2, 0]);
        assert!(balancer(LbPolicy::Random, 3).next_item(None, 0).is_ok());
    }

    #[test]
    pub fn test_least_cost_charges_cost() {
        let least = balancer(LbPolicy::LeastCost, 3);
        let selected: Vec<_> = [5, 1, 1, 1].into_iter().map(|cost| least.next_item(None, cost).unwrap().0).collect();
        assert_eq!(selected, vec![0, 1, 2, 1]);
    }

    #[test]
    pub fn test_weights_only_read_by_weighted() {
        let round_robin = ConfiguredBalancer::new(LbPolicy::RoundRobin, HashFunction::Fnv1a, partitions(3), vec![]);
        assert!(round_robin.is_ok());
        let weighted = ConfiguredBalancer::new(LbPolicy::WeightedRoundRobin, HashFunction::Fnv1a, partitions(3), vec![]);
        assert_eq!(weighted.unwrap_err(), BalancerError::UnequalLength { targets: 3, weights: 0 });
    }

    #[traced_test]
    #[test]
    pub fn test_from_config() {
        let config: BalancerConfig = serde_yaml::from_str(
            r#"
policy: weighted_round_robin
targets:
  - name: small
    weight: 1
  - name: large
    weight: 3
"#,
        )
        .unwrap();
        let balancer = ConfiguredBalancer::from_config(&config).unwrap();
        assert!(logs_contain("Creating weighted_round_robin balancer over 2 targets"));
        let names: Vec<_> = balancer.targets().iter().map(|target| target.name.clone()).collect();
        assert_eq!(names, vec!["large", "small"]);

        let selected: Vec<_> = (0..8).map(|_| balancer.next_item(None, 0).unwrap().name.clone()).collect();
        assert_eq!(selected.iter().filter(|name| *name == "large").count(), 6);
    }

    #[test]
    pub fn test_from_config_without_targets() {
        let config = BalancerConfig {
            policy: LbPolicy::Murmur2,
            hash_function: HashFunction::default(),
            targets: Vec::<TargetConfig>::new(),
        };
        assert_eq!(ConfiguredBalancer::from_config(&config).unwrap_err(), BalancerError::NoTargets);
    }

    #[test]
    pub fn test_identity_preserved() {
        let targets = partitions(2);
        let balancer =
            ConfiguredBalancer::new(LbPolicy::RoundRobin, HashFunction::Fnv1a, targets.clone(), vec![]).unwrap();
        assert!(Arc::ptr_eq(&balancer.next_item(None, 0).unwrap(), &targets[0]));
    }
}
