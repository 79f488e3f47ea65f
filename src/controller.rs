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

//! Controller store (component C): the polymorphic Single/Group discriminator and its storage
//! slot under an identifier's record (§4.C, §6).

use crate::codec::Cursor;
use crate::error::Error;
use crate::group::Group;
use crate::host::Host;
use crate::id::{has_did_prefix, EncId, Id};

/// The single-byte field tag for the controller slot within an identifier's record (§6).
pub const FIELD_CONTROLLER: u8 = 0x02;

/// The resolved controller of an identifier: either another DID (single signer delegation) or an
/// inline threshold group (§3).
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Controller {
    Single(Id),
    Group(Group),
}

impl Controller {
    /// Discriminates and decodes a stored/wire controller blob: if the first
    /// [`crate::id::DID_PREFIX`] bytes match, it's a [`Controller::Single`]; otherwise it is
    /// parsed as a [`Group`] (§4.C).
    pub fn decode(raw: &[u8]) -> Result<Self, Error> {
        if has_did_prefix(raw) {
            Ok(Controller::Single(Id::parse(raw)?))
        } else {
            let mut cursor = Cursor::new(raw);
            let group = Group::decode(&mut cursor)?;
            Ok(Controller::Group(group))
        }
    }

    /// Re-derives this controller's on-wire bytes, for callers constructing a fresh record. Stored
    /// records written by [`put`] keep the bytes exactly as received instead of calling this, so
    /// that re-encoding is never required to make a stored controller legible again.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Controller::Single(id) => id.as_bytes().to_vec(),
            Controller::Group(group) => {
                let mut out = Vec::new();
                group.encode(&mut out);
                out
            }
        }
    }
}

/// Reads the controller record stored for `enc_id`, decoding it into a [`Controller`].
///
/// Returns [`Error::MissingController`] if no controller slot exists, matching the Go
/// `GetController` behavior of treating an absent slot as distinct from an empty one.
pub fn get(host: &impl Host, enc_id: &EncId) -> Result<Controller, Error> {
    let raw = host.cache_get(&enc_id.with_field(FIELD_CONTROLLER)).ok_or(Error::MissingController)?;
    Controller::decode(&raw)
}

/// Stores `raw` (taken verbatim off the wire, not re-encoded) as `enc_id`'s controller record.
pub fn put(host: &mut impl Host, enc_id: &EncId, raw: Vec<u8>) { host.cache_put(&enc_id.with_field(FIELD_CONTROLLER), raw); }

/// Deletes `enc_id`'s controller record, if any.
pub fn delete(host: &mut impl Host, enc_id: &EncId) { host.cache_delete(&enc_id.with_field(FIELD_CONTROLLER)); }
