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

use crate::{error::RegistrationError, payload::RegistrationRequest};

/// A registry that instances announce themselves to.
pub trait ServiceRegister {
    /// Submits `request` to `endpoint` and returns the raw response body.
    fn register(
        &self,
        endpoint: &str,
        request: &RegistrationRequest,
    ) -> impl std::future::Future<Output = Result<Vec<u8>, RegistrationError>> + Send;

    fn deregister(
        &self,
        endpoint: &str,
    ) -> impl std::future::Future<Output = Result<(), RegistrationError>> + Send;
}
