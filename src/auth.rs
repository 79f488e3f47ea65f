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

//! Authorization engine (component D): verifies that the trailing bytes of an operation's
//! argument buffer prove control of a given controller, per §4.D.
//!
//! A Single controller's proof is one `VarUint` key index; a Group controller's proof is a
//! `VarBytes` blob whose contents are themselves a signer list (count-prefixed `(id, index)`
//! pairs) — the double length-framing from the original `verifyGroupController` is preserved
//! bit-exactly rather than flattened (design note, §9).

use crate::codec::Cursor;
use crate::controller::Controller;
use crate::error::Error;
use crate::group::Group;
use crate::host::{Host, Signer};
use crate::id::Id;

/// Recommended maximum number of signers verified in a single call (§5 Resource limits).
pub const MAX_SIGNERS: usize = 1024;

/// Verifies that `cursor`'s next argument(s) prove control of `controller`, resolving public
/// keys and witnesses through `host`.
pub fn verify_controller_signature(host: &impl Host, controller: &Controller, cursor: &mut Cursor) -> Result<(), Error> {
    match controller {
        Controller::Single(id) => verify_single(host, id, cursor),
        Controller::Group(group) => verify_group(host, group, cursor),
    }
}

fn verify_single(host: &impl Host, id: &Id, cursor: &mut Cursor) -> Result<(), Error> {
    let index = cursor.read_var_uint_u32()?;
    let enc_id = host.encode_id(id)?;
    let pk = host.get_pk(&enc_id, index)?;
    if pk.revoked {
        return Err(Error::KeyRevoked);
    }
    if !host.check_witness(&pk.key) {
        return Err(Error::WitnessFailed);
    }
    Ok(())
}

fn verify_group(host: &impl Host, group: &Group, cursor: &mut Cursor) -> Result<(), Error> {
    let blob = cursor.read_var_bytes()?;
    let signers = decode_signers(&mut Cursor::new(blob))?;

    if !group.verify_threshold(&signers) {
        return Err(Error::ThresholdNotMet);
    }

    // Coverage alone isn't proof: every declared signer's witness must independently check out.
    for signer in &signers {
        let enc_id = host.encode_id(&signer.id)?;
        let pk = host.get_pk(&enc_id, signer.index)?;
        if pk.revoked {
            return Err(Error::KeyRevoked);
        }
        if !host.check_witness(&pk.key) {
            return Err(Error::WitnessFailed);
        }
    }
    Ok(())
}

fn decode_signers(cursor: &mut Cursor) -> Result<Vec<Signer>, Error> {
    let count = cursor.read_var_uint().map_err(|_| Error::MalformedSigners)?;
    if count as usize > MAX_SIGNERS {
        return Err(Error::MalformedSigners);
    }
    let mut signers = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let id_bytes = cursor.read_var_bytes().map_err(|_| Error::MalformedSigners)?;
        let id = Id::parse(id_bytes).map_err(|_| Error::MalformedSigners)?;
        let index = cursor.read_var_uint_u32().map_err(|_| Error::MalformedSigners)?;
        signers.push(Signer { id, index });
    }
    Ok(signers)
}

/// Encodes a signer list in the wire form [`decode_signers`] expects, for use by callers
/// constructing group-controller proofs (and by this module's own tests).
pub fn encode_signers(signers: &[Signer]) -> Vec<u8> {
    use crate::codec::{write_var_bytes, write_var_uint};
    let mut out = Vec::new();
    write_var_uint(&mut out, signers.len() as u64);
    for signer in signers {
        write_var_bytes(&mut out, signer.id.as_bytes());
        write_var_uint(&mut out, signer.index as u64);
    }
    out
}
