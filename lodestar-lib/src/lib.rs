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

//! Partition selection for routers, connection pools and message producers.
//!
//! Every balancer is built once from a fixed, non-empty list of targets and then
//! shared (`&self`) by any number of callers. Targets are opaque `Arc<E>` values:
//! the balancer hands back a clone of the `Arc` it was given and never looks inside.

pub mod balancers;
pub(crate) mod thread_local;

pub use balancers::{
    configured::ConfiguredBalancer,
    crc32::Crc32Balancer,
    hash::{Fnv1a32, Hash32, HashBalancer, HasherPool},
    least::LeastCostBalancer,
    murmur2::{murmur2, Murmur2Balancer},
    random::RandomBalancer,
    round_robin::RoundRobinBalancer,
    wrr::WeightedBalancer,
    Balancer, BalancerError, CostBalancer, KeyedBalancer, Result,
};
pub use thread_local::{Checkout, LocalBuilder, LocalPool};
