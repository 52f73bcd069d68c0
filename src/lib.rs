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

#[macro_use]
extern crate tracing;

pub mod configure;
pub mod consul;
pub mod env;
pub mod error;
#[cfg(feature = "restful")]
pub mod health;
pub mod host;
pub mod identity;
#[cfg(feature = "log")]
pub mod log;
pub mod payload;
pub mod registrar;
#[cfg(feature = "restful")]
pub mod restful;
pub mod service_register;

