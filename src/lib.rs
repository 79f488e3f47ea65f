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

//! The decentralized-identity controller subsystem of a smart-contract native service (§1-§2):
//! a recursive threshold-group model, a compact binary wire codec, a persisted controller store,
//! an authorization engine, and the public operation handlers built on top of them.
//!
//! This crate has no opinion on storage, cryptography, or event transport: every side effect is
//! expressed through the [`Host`] trait (§6), which an embedding contract platform implements
//! once against its real cache, key table, and witness checker.

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

#[macro_use]
extern crate amplify;

mod auth;
mod codec;
mod controller;
mod error;
mod group;
mod host;
mod id;
mod ops;

pub use auth::{encode_signers, verify_controller_signature, MAX_SIGNERS};
pub use codec::{write_var_bytes, write_var_uint, Cursor};
pub use controller::{Controller, FIELD_CONTROLLER};
pub use error::Error;
pub use group::{Group, Member, MAX_GROUP_DEPTH, MAX_GROUP_MEMBERS};
pub use host::{attr_keys, Attribute, Event, Host, PublicKey, Signer};
pub use id::{has_did_prefix, EncId, Id, DID_PREFIX, MAX_KEY_LEN};
pub use ops::{
    add_attributes_by_controller, add_key_by_controller, reg_id_with_controller, remove_attribute_by_controller,
    remove_controller, remove_key_by_controller, revoke_id_by_controller, verify_controller,
};
