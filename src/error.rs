// DNA Identity: DID controller subsystem for the DNA smart-contract native service
//
// SPDX-License-Identifier: Apache-2.0
//
// Written in 2026 by the DNA Identity Contributors.
//
// Copyright (C) 2026 DNA Identity Contributors.
// All rights under the above copyright are reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use this file except
// in compliance with the License. You may obtain a copy of the License at
//
//        http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software distributed under the License
// is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express
// or implied. See the License for the specific language governing permissions and limitations under
// the License.

use crate::id::Id;

/// Errors that can be returned by any operation in this crate.
///
/// Every variant corresponds to one of the failure kinds an operation handler must be able to
/// report; the `Display` impl (derived below) yields the lower-case, unpunctuated message that an
/// embedding host surfaces to its caller alongside the boolean failure return.
#[derive(Clone, Eq, PartialEq, Debug, Display, Error)]
#[display(doc_comments)]
pub enum Error {
    /// input buffer is truncated or otherwise malformed.
    MalformedInput,

    /// group serialization is malformed.
    MalformedGroup,

    /// signer list serialization is malformed.
    MalformedSigners,

    /// identifier `{0}` does not match the `did:dna:` method syntax.
    InvalidId(String),

    /// identifier is not registered.
    NotRegistered,

    /// identifier is already registered.
    AlreadyRegistered,

    /// identifier has no controller record.
    MissingController,

    /// group member `{0}` is not registered or has no public key at index 1.
    InvalidMember(String),

    /// referenced public key does not exist.
    UnknownKey,

    /// referenced public key is revoked.
    KeyRevoked,

    /// declared signers do not meet the controller's threshold.
    ThresholdNotMet,

    /// witness verification failed for a declared signer.
    WitnessFailed,

    /// group nesting exceeds the maximum supported depth.
    GroupTooDeep,

    /// collaborator operation failed: {0}
    Internal(String),
}

impl Error {
    pub(crate) fn invalid_member(id: &Id) -> Self { Error::InvalidMember(id.to_display_string()) }

    pub(crate) fn invalid_id(bytes: &[u8]) -> Self {
        Error::InvalidId(String::from_utf8_lossy(bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_lowercase_and_unpunctuated_style() {
        let msg = Error::ThresholdNotMet.to_string();
        assert_eq!(msg, "declared signers do not meet the controller's threshold");
    }

    #[test]
    fn invalid_id_carries_the_offending_bytes() {
        let err = Error::invalid_id(b"not-a-did");
        assert_eq!(err.to_string(), "identifier `not-a-did` does not match the `did:dna:` method syntax");
    }
}
