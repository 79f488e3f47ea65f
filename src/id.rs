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

use std::fmt::{self, Display, Formatter};

use crate::error::Error;

/// The method prefix every identifier recognized by this subsystem must start with.
pub const DID_PREFIX: &[u8] = b"did:dna:";

/// A `did:dna:<suffix>` identifier, as it travels on the wire and in storage.
///
/// Validation performed by [`Id::parse`] is purely syntactic: the prefix contract plus a
/// non-empty, printable-ASCII suffix. The DID method's own registration rules (whether the
/// suffix actually resolves to anything) are enforced by the controller/auth layers, not here.
#[derive(Wrapper, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, From)]
#[wrapper(Deref, AsSlice)]
pub struct Id(Vec<u8>);

impl Id {
    /// Parses and validates a raw identifier, as found in a `VarBytes` field.
    pub fn parse(bytes: &[u8]) -> Result<Self, Error> {
        if !has_did_prefix(bytes) {
            return Err(Error::invalid_id(bytes));
        }
        let suffix = &bytes[DID_PREFIX.len()..];
        if suffix.is_empty() || !suffix.iter().all(|b| b.is_ascii_graphic() || *b == b'.') {
            return Err(Error::invalid_id(bytes));
        }
        Ok(Id(bytes.to_vec()))
    }

    /// Constructs an `Id` without re-validating bytes already known to be well-formed (e.g. bytes
    /// that were just read back out of storage written by [`Id::parse`]).
    pub(crate) fn from_trusted_bytes(bytes: Vec<u8>) -> Self { Id(bytes) }

    pub fn as_bytes(&self) -> &[u8] { &self.0 }

    pub(crate) fn to_display_string(&self) -> String { String::from_utf8_lossy(&self.0).into_owned() }
}

impl Display for Id {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

/// Checks whether `bytes` begins with the `did:dna:` method prefix, without allocating.
///
/// This is the first-8-bytes discriminator used both to recognize a leaf member in a group
/// serialization (§4.A) and to distinguish a Single controller from a serialized Group (§4.C).
pub fn has_did_prefix(bytes: &[u8]) -> bool {
    bytes.len() >= DID_PREFIX.len() && &bytes[..DID_PREFIX.len()] == DID_PREFIX
}

/// Opaque, deterministic encoding of an [`Id`] used as (part of) a storage key.
///
/// Produced exclusively by the external [`crate::host::Host::encode_id`] collaborator; this crate
/// never computes it itself (§6). Bounded to the platform's maximum storage key length.
#[derive(Wrapper, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, From)]
#[wrapper(Deref, AsSlice)]
pub struct EncId(Vec<u8>);

/// Maximum length, in bytes, of a storage key (§5 Resource limits).
pub const MAX_KEY_LEN: usize = 1024;

impl EncId {
    /// Wraps host-produced bytes as an encoded id, enforcing the storage key length limit.
    pub fn new(bytes: Vec<u8>) -> Result<Self, Error> {
        if bytes.len() > MAX_KEY_LEN {
            return Err(Error::Internal("encoded id exceeds maximum storage key length".into()));
        }
        Ok(EncId(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] { &self.0 }

    /// Appends the single-byte controller field tag, as used by the `encId || FIELD_CONTROLLER`
    /// storage key from §6.
    pub fn with_field(&self, field: u8) -> Vec<u8> {
        let mut key = self.0.clone();
        key.push(field);
        key
    }
}
