// Copyright Rivtower Technologies LLC.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::Path;

use crate::error::SetupError;

pub const HOSTNAME_PATH: &str = "/etc/hostname";

/// Returns the first line of `path` with surrounding whitespace trimmed.
pub fn read_first_line(path: impl AsRef<Path>) -> Result<String, SetupError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| SetupError::HostRead {
        path: path.to_owned(),
        source,
    })?;

    match content.lines().next().map(str::trim) {
        Some(line) if !line.is_empty() => Ok(line.to_owned()),
        _ => Err(SetupError::HostEmpty {
            path: path.to_owned(),
        }),
    }
}

/// The container/host identifier advertised as the instance address.
pub fn resolve_host() -> Result<String, SetupError> {
    read_first_line(HOSTNAME_PATH)
}
