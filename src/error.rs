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

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Faults that leave the instance unable to register at all.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("read host identifier from {} failed: {source}", path.display())]
    HostRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("host identifier file {} is empty", path.display())]
    HostEmpty { path: PathBuf },
    #[error("build registry http client failed: {0}")]
    Client(#[source] reqwest::Error),
}

/// Faults reported by the registry call itself.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("request to consul failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("consul responded {status}: {body}")]
    Status { status: StatusCode, body: String },
}

#[derive(Debug, Error)]
pub enum Fault {
    #[error("{0}")]
    Fatal(#[from] SetupError),
    #[error("{0}")]
    Transient(#[from] RegistrationError),
}

impl Fault {
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }
}
