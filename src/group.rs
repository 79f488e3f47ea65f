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

//! Group model (component B): the recursive threshold-group tree, its wire decode/encode, and
//! the two traversal operations `validateMembers`/`verifyThreshold` (§4.B).

use crate::codec::{write_var_bytes, write_var_uint, Cursor};
use crate::error::Error;
use crate::host::{Host, Signer};
use crate::id::{has_did_prefix, Id};

/// Maximum nesting depth of a `Group` tree (§5 Resource limits).
pub const MAX_GROUP_DEPTH: usize = 8;

/// Maximum member count accepted for a single group level, bounding the size of a speculative
/// allocation before any member bytes have been read or validated (§5 Resource limits; matches
/// the signer-count bound in `auth::MAX_SIGNERS`, since a member list and a signer list share the
/// same per-level cardinality budget).
pub const MAX_GROUP_MEMBERS: usize = 1024;

/// One entry in a [`Group`]'s member list: either a DID reference or a nested group.
///
/// Modeled as a sum type rather than the runtime type-assertion the source used (Design Notes
/// §9): a cyclic group is structurally impossible since a `Node` owns its child by value, built
/// from a byte string that was decoded, not from a handle back into storage.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Member {
    Leaf(Id),
    Node(Group),
}

/// A (possibly nested) threshold group, as described in §3.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Group {
    pub members: Vec<Member>,
    pub threshold: u32,
}

impl Group {
    /// Decodes a group serialization from `cursor`, enforcing the invariants of §3: at least one
    /// member, `1 <= threshold <= len(members)`, and a nesting depth capped at
    /// [`MAX_GROUP_DEPTH`].
    pub fn decode(cursor: &mut Cursor) -> Result<Self, Error> { Self::decode_at_depth(cursor, 0) }

    fn decode_at_depth(cursor: &mut Cursor, depth: usize) -> Result<Self, Error> {
        if depth >= MAX_GROUP_DEPTH {
            return Err(Error::GroupTooDeep);
        }

        let member_count = cursor.read_var_uint().map_err(|_| Error::MalformedGroup)?;
        if member_count == 0 || member_count > MAX_GROUP_MEMBERS as u64 {
            return Err(Error::MalformedGroup);
        }

        let mut members = Vec::new();
        for _ in 0..member_count {
            let raw = cursor.read_var_bytes().map_err(|_| Error::MalformedGroup)?;
            // Per SPEC_FULL §9 (open question 1): both branches append in wire order.
            if has_did_prefix(raw) {
                let id = Id::parse(raw).map_err(|_| Error::MalformedGroup)?;
                members.push(Member::Leaf(id));
            } else {
                let mut nested = Cursor::new(raw);
                let group = Group::decode_at_depth(&mut nested, depth + 1)?;
                members.push(Member::Node(group));
            }
        }

        let threshold = cursor.read_var_uint().map_err(|_| Error::MalformedGroup)?;
        if threshold == 0 || threshold > member_count {
            return Err(Error::MalformedGroup);
        }

        Ok(Group { members, threshold: threshold as u32 })
    }

    /// Encodes this group back to its wire form. The codec round-trips any value it can decode
    /// (§4.A, Invariant 2 in §8).
    pub fn encode(&self, out: &mut Vec<u8>) {
        write_var_uint(out, self.members.len() as u64);
        for member in &self.members {
            match member {
                Member::Leaf(id) => write_var_bytes(out, id.as_bytes()),
                Member::Node(group) => {
                    let mut nested = Vec::new();
                    group.encode(&mut nested);
                    write_var_bytes(out, &nested);
                }
            }
        }
        write_var_uint(out, self.threshold as u64);
    }

    /// `validateMembers`: every leaf must reference a registered DID with a public key at index
    /// 1; nested groups are validated recursively.
    pub fn validate_members(&self, host: &impl Host) -> Result<(), Error> {
        for member in &self.members {
            match member {
                Member::Leaf(id) => {
                    let enc_id = host.encode_id(id)?;
                    if !host.check_id_existence(&enc_id) {
                        return Err(Error::invalid_member(id));
                    }
                    match host.get_pk(&enc_id, 1) {
                        Ok(pk) if !pk.revoked => {}
                        _ => return Err(Error::invalid_member(id)),
                    }
                }
                Member::Node(group) => group.validate_members(host)?,
            }
        }
        Ok(())
    }

    /// `verifyThreshold`: counts covered members (a leaf is covered iff its id is among
    /// `signers`; a nested group is covered iff its own threshold is met) and compares against
    /// `self.threshold`. Checks coverage only — cryptographic validity is the auth engine's job
    /// (§4.B).
    pub fn verify_threshold(&self, signers: &[Signer]) -> bool {
        let mut covered = 0u32;
        for member in &self.members {
            let is_covered = match member {
                Member::Leaf(id) => signers.iter().any(|s| &s.id == id),
                Member::Node(group) => group.verify_threshold(signers),
            };
            if is_covered {
                covered += 1;
                if covered >= self.threshold {
                    return true;
                }
            }
        }
        covered >= self.threshold
    }
}
