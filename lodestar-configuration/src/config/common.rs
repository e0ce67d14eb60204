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

pub(crate) fn is_default<T: PartialEq + Default>(value: &T) -> bool {
    *value == T::default()
}

#[derive(thiserror::Error, Debug)]
pub enum GenericError {
    #[error("failed to open \"{}\"", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Error parsing field {path}")]
    Deserialize {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

impl From<serde_path_to_error::Error<serde_yaml::Error>> for GenericError {
    fn from(value: serde_path_to_error::Error<serde_yaml::Error>) -> Self {
        let path = value.path().to_string();
        Self::Deserialize { path, source: value.into_inner() }
    }
}
