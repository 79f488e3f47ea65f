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

//! External collaborators (§6): the public-key/attribute store, the key-value cache, the
//! witness checker, and the event sink.
//!
//! The teacher crate threads its external collaborators through `Codex::verify` as two traits,
//! `Memory` and `LibRepo`, rather than a process-wide singleton. We follow the same shape but
//! bundle every collaborator this subsystem needs into a single `Host` trait, since every
//! operation handler in §4.E needs all of them together; an embedding application implements
//! `Host` once against its real cache/crypto/event infrastructure and passes `&mut dyn Host`
//! (or a generic `H: Host`) into every call.

use crate::error::Error;
use crate::id::{EncId, Id};

/// A public key entry in the (externally-owned) per-ID key table.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct PublicKey {
    pub key: Vec<u8>,
    pub revoked: bool,
}

/// A claimed signer: a DID and the index of the public key within its key table.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Signer {
    pub id: Id,
    pub index: u32,
}

/// A `(path, attr_type, value)` attribute record attached to a registered ID (§3).
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Attribute {
    pub path: Vec<u8>,
    pub attr_type: Vec<u8>,
    pub value: Vec<u8>,
}

/// Domain events fired by the operation handlers on success (§4.E, §7: "events fire ONLY on
/// success"). An embedding host turns these into its own logging/telemetry representation; this
/// crate makes no assumption about how (or whether) they are persisted.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Event {
    Register { id: Id },
    Revoke { id: Id },
    RemoveController { id: Id },
    PublicKey { action: &'static str, id: Id, pk: Vec<u8>, index: u32 },
    Attribute { action: &'static str, id: Id, paths: Vec<Vec<u8>> },
}

/// Every abstract operation the DID controller subsystem requires of its host (§6).
///
/// Implementations back this with the contract platform's actual key-value cache, public-key
/// table, witness checker and event sink. All methods are synchronous: per §5, the enclosing
/// smart-contract invocation has no suspension points visible to this subsystem.
pub trait Host {
    /// Deterministically encodes a validated identifier into its storage-key form.
    fn encode_id(&self, id: &Id) -> Result<EncId, Error>;

    /// Reads a raw value from the key-value cache.
    fn cache_get(&self, key: &[u8]) -> Option<Vec<u8>>;
    /// Writes a raw value to the key-value cache.
    fn cache_put(&mut self, key: &[u8], value: Vec<u8>);
    /// Deletes a raw value from the key-value cache, if present.
    fn cache_delete(&mut self, key: &[u8]);

    /// `checkIDExistence`: whether the existence flag is set for `enc_id`.
    fn check_id_existence(&self, enc_id: &EncId) -> bool { self.cache_get(enc_id.as_bytes()).is_some() }

    /// `getPk`: looks up the public key at `index` in `enc_id`'s key table.
    fn get_pk(&self, enc_id: &EncId, index: u32) -> Result<PublicKey, Error>;
    /// `insertPk`: appends a new public key, returning its index.
    fn insert_pk(&mut self, enc_id: &EncId, pk: &[u8]) -> Result<u32, Error>;
    /// `revokePkByIndex`: marks the key at `index` revoked, returning its bytes.
    fn revoke_pk_by_index(&mut self, enc_id: &EncId, index: u32) -> Result<Vec<u8>, Error>;

    /// `checkWitness`: host-provided cryptographic proof that `pk` signed the current
    /// invocation.
    fn check_witness(&self, pk: &[u8]) -> bool;

    /// `batchInsertAttr`.
    fn batch_insert_attr(&mut self, enc_id: &EncId, attrs: &[Attribute]) -> Result<(), Error>;
    /// `deleteAttr`.
    fn delete_attr(&mut self, enc_id: &EncId, path: &[u8]) -> Result<(), Error>;

    /// Fire-and-forget event sink (`triggerRegisterEvent`, `triggerPublicEvent`,
    /// `triggerAttributeEvent`, `newEvent`). Called only after a handler's mutation has fully
    /// succeeded (§7).
    fn emit(&mut self, event: Event);
}

/// Returns the attribute paths touched by `attrs`, in order (Go: `getAttrKeys`).
pub fn attr_keys(attrs: &[Attribute]) -> Vec<Vec<u8>> { attrs.iter().map(|a| a.path.clone()).collect() }
