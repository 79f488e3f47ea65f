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

//! Operation handlers (component E): the public entry points of §4.E.
//!
//! Every handler shares a parsing prologue (decode the target `id`, derive its `encId`), applies
//! its own precondition, delegates signature verification to [`crate::auth`] (except
//! `removeController`, which is authorized directly), and only then mutates state through the
//! [`Host`] collaborator — mutation never happens before every check has passed (§4.E, §7).

use crate::auth::verify_controller_signature;
use crate::codec::Cursor;
use crate::controller::{self, Controller};
use crate::error::Error;
use crate::host::{attr_keys, Attribute, Event, Host};
use crate::id::{EncId, Id};

/// Maximum attribute records accepted in a single `addAttributesByController` call, bounding the
/// size of a speculative allocation before any attribute bytes have been read (§5 Resource
/// limits).
const MAX_ATTRIBUTES_PER_CALL: usize = 1024;

fn parse_target(host: &impl Host, cursor: &mut Cursor) -> Result<(Id, EncId), Error> {
    let raw = cursor.read_var_bytes()?;
    let id = Id::parse(raw)?;
    let enc_id = host.encode_id(&id)?;
    Ok((id, enc_id))
}

fn require_registered(host: &impl Host, enc_id: &EncId) -> Result<(), Error> {
    if !host.check_id_existence(enc_id) {
        return Err(Error::NotRegistered);
    }
    Ok(())
}

/// `regIdWithController`: registers `id` with a fresh controller, proven by that controller's own
/// signature over the registration (§4.E, S1/S2).
pub fn reg_id_with_controller(host: &mut impl Host, cursor: &mut Cursor) -> Result<Event, Error> {
    let (id, enc_id) = parse_target(host, cursor)?;
    if host.check_id_existence(&enc_id) {
        return Err(Error::AlreadyRegistered);
    }

    let controller_bytes = cursor.read_var_bytes()?.to_vec();
    let controller = Controller::decode(&controller_bytes)?;
    if let Controller::Group(group) = &controller {
        group.validate_members(host)?;
    }
    verify_controller_signature(host, &controller, cursor)?;

    controller::put(host, &enc_id, controller_bytes);
    host.cache_put(enc_id.as_bytes(), vec![1]);
    let event = Event::Register { id };
    host.emit(event.clone());
    Ok(event)
}

/// `revokeIDByController`: clears the existence flag, terminating the registered→revoked
/// transition (§4.D State machine, S-invariant 6).
pub fn revoke_id_by_controller(host: &mut impl Host, cursor: &mut Cursor) -> Result<Event, Error> {
    let (id, enc_id) = parse_target(host, cursor)?;
    require_registered(host, &enc_id)?;

    let controller = controller::get(host, &enc_id)?;
    verify_controller_signature(host, &controller, cursor)?;

    host.cache_delete(enc_id.as_bytes());
    let event = Event::Revoke { id };
    host.emit(event.clone());
    Ok(event)
}

/// `verifyController`: pure authorization check, no mutation and no event (§4.E table).
pub fn verify_controller(host: &impl Host, cursor: &mut Cursor) -> Result<(), Error> {
    let (_id, enc_id) = parse_target(host, cursor)?;
    require_registered(host, &enc_id)?;

    let controller = controller::get(host, &enc_id)?;
    verify_controller_signature(host, &controller, cursor)
}

/// `removeController`: the one operation authorized by a direct witness of the ID's own key
/// rather than by its controller (§4.E, invariant 7) — a captured controller can never block its
/// own removal.
pub fn remove_controller(host: &mut impl Host, cursor: &mut Cursor) -> Result<Event, Error> {
    let (id, enc_id) = parse_target(host, cursor)?;
    require_registered(host, &enc_id)?;

    let key_index = cursor.read_var_uint_u32()?;
    let pk = host.get_pk(&enc_id, key_index)?;
    if pk.revoked {
        return Err(Error::KeyRevoked);
    }
    if !host.check_witness(&pk.key) {
        return Err(Error::WitnessFailed);
    }

    controller::delete(host, &enc_id);
    let event = Event::RemoveController { id };
    host.emit(event.clone());
    Ok(event)
}

/// `addKeyByController`: appends a new public key, authorized by the stored controller.
pub fn add_key_by_controller(host: &mut impl Host, cursor: &mut Cursor) -> Result<Event, Error> {
    let (id, enc_id) = parse_target(host, cursor)?;
    require_registered(host, &enc_id)?;

    let new_pk = cursor.read_var_bytes()?.to_vec();
    let controller = controller::get(host, &enc_id)?;
    verify_controller_signature(host, &controller, cursor)?;

    let index = host.insert_pk(&enc_id, &new_pk)?;
    let event = Event::PublicKey { action: "add", id, pk: new_pk, index };
    host.emit(event.clone());
    Ok(event)
}

/// `removeKeyByController`: revokes a public key by index, authorized by the stored controller.
pub fn remove_key_by_controller(host: &mut impl Host, cursor: &mut Cursor) -> Result<Event, Error> {
    let (id, enc_id) = parse_target(host, cursor)?;
    require_registered(host, &enc_id)?;

    let pk_index = cursor.read_var_uint_u32()?;
    let controller = controller::get(host, &enc_id)?;
    verify_controller_signature(host, &controller, cursor)?;

    let revoked_pk = host.revoke_pk_by_index(&enc_id, pk_index)?;
    let event = Event::PublicKey { action: "remove", id, pk: revoked_pk, index: pk_index };
    host.emit(event.clone());
    Ok(event)
}

fn read_attribute(cursor: &mut Cursor) -> Result<Attribute, Error> {
    let path = cursor.read_var_bytes()?.to_vec();
    let attr_type = cursor.read_var_bytes()?.to_vec();
    let value = cursor.read_var_bytes()?.to_vec();
    Ok(Attribute { path, attr_type, value })
}

/// `addAttributesByController`: writes a batch of attributes, authorized by the stored
/// controller.
pub fn add_attributes_by_controller(host: &mut impl Host, cursor: &mut Cursor) -> Result<Event, Error> {
    let (id, enc_id) = parse_target(host, cursor)?;
    require_registered(host, &enc_id)?;

    let count = cursor.read_var_uint()?;
    if count as usize > MAX_ATTRIBUTES_PER_CALL {
        return Err(Error::MalformedInput);
    }
    let mut attrs = Vec::new();
    for _ in 0..count {
        attrs.push(read_attribute(cursor)?);
    }

    let controller = controller::get(host, &enc_id)?;
    verify_controller_signature(host, &controller, cursor)?;

    host.batch_insert_attr(&enc_id, &attrs)?;
    let event = Event::Attribute { action: "add", id, paths: attr_keys(&attrs) };
    host.emit(event.clone());
    Ok(event)
}

/// `removeAttributeByController`: removes a single attribute by path, authorized by the stored
/// controller.
pub fn remove_attribute_by_controller(host: &mut impl Host, cursor: &mut Cursor) -> Result<Event, Error> {
    let (id, enc_id) = parse_target(host, cursor)?;
    require_registered(host, &enc_id)?;

    let path = cursor.read_var_bytes()?.to_vec();
    let controller = controller::get(host, &enc_id)?;
    verify_controller_signature(host, &controller, cursor)?;

    host.delete_attr(&enc_id, &path)?;
    let event = Event::Attribute { action: "remove", id, paths: vec![path] };
    host.emit(event.clone());
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{write_var_bytes, write_var_uint};
    use crate::host::test_support::FakeHost;

    fn var_bytes(bytes: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        write_var_bytes(&mut out, bytes);
        out
    }

    #[test]
    fn register_with_single_controller_requires_controller_witness() {
        let mut host = FakeHost::new();
        host.set_pk("did:dna:root", 0, b"pk-root", false);
        host.allow_witness(b"pk-root");

        let mut buf = Vec::new();
        buf.extend(var_bytes(b"did:dna:alice"));
        buf.extend(var_bytes(b"did:dna:root"));
        write_var_uint(&mut buf, 0); // key index for root's signature
        let mut cur = Cursor::new(&buf);

        let event = reg_id_with_controller(&mut host, &mut cur).unwrap();
        assert!(matches!(event, Event::Register { .. }));
        let enc_id = EncId::new(b"did:dna:alice".to_vec()).unwrap();
        assert!(host.check_id_existence(&enc_id));
    }

    #[test]
    fn register_with_group_controller_validates_members_before_storing() {
        let mut host = FakeHost::new();
        host.register_flag("did:dna:a");
        host.register_flag("did:dna:b");
        host.set_pk("did:dna:a", 1, b"pk-a", false);
        host.set_pk("did:dna:b", 1, b"pk-b", false);
        host.allow_witness(b"pk-a");

        let group = crate::group::Group {
            members: vec![
                crate::group::Member::Leaf(Id::parse(b"did:dna:a").unwrap()),
                crate::group::Member::Leaf(Id::parse(b"did:dna:b").unwrap()),
            ],
            threshold: 1,
        };
        let mut controller_bytes = Vec::new();
        group.encode(&mut controller_bytes);

        let signers = vec![crate::host::Signer { id: Id::parse(b"did:dna:a").unwrap(), index: 1 }];
        let mut buf = Vec::new();
        buf.extend(var_bytes(b"did:dna:team"));
        buf.extend(var_bytes(&controller_bytes));
        write_var_bytes(&mut buf, &crate::auth::encode_signers(&signers));
        let mut cur = Cursor::new(&buf);

        assert!(reg_id_with_controller(&mut host, &mut cur).is_ok());
    }

    #[test]
    fn register_with_group_controller_rejects_unregistered_member() {
        let mut host = FakeHost::new();
        host.register_flag("did:dna:a");
        host.set_pk("did:dna:a", 1, b"pk-a", false);
        host.allow_witness(b"pk-a");
        // "did:dna:ghost" is never registered

        let group = crate::group::Group {
            members: vec![
                crate::group::Member::Leaf(Id::parse(b"did:dna:a").unwrap()),
                crate::group::Member::Leaf(Id::parse(b"did:dna:ghost").unwrap()),
            ],
            threshold: 1,
        };
        let mut controller_bytes = Vec::new();
        group.encode(&mut controller_bytes);

        let signers = vec![crate::host::Signer { id: Id::parse(b"did:dna:a").unwrap(), index: 1 }];
        let mut buf = Vec::new();
        buf.extend(var_bytes(b"did:dna:team"));
        buf.extend(var_bytes(&controller_bytes));
        write_var_bytes(&mut buf, &crate::auth::encode_signers(&signers));
        let mut cur = Cursor::new(&buf);

        assert!(matches!(reg_id_with_controller(&mut host, &mut cur), Err(Error::InvalidMember(_))));
        let enc_id = EncId::new(b"did:dna:team".to_vec()).unwrap();
        assert!(!host.check_id_existence(&enc_id));
    }

    #[test]
    fn register_twice_fails_already_registered() {
        let mut host = FakeHost::new();
        host.set_pk("did:dna:root", 0, b"pk-root", false);
        host.allow_witness(b"pk-root");

        let mut buf = Vec::new();
        buf.extend(var_bytes(b"did:dna:alice"));
        buf.extend(var_bytes(b"did:dna:root"));
        write_var_uint(&mut buf, 0);
        let mut cur = Cursor::new(&buf);
        reg_id_with_controller(&mut host, &mut cur).unwrap();

        let mut cur2 = Cursor::new(&buf);
        assert!(matches!(reg_id_with_controller(&mut host, &mut cur2), Err(Error::AlreadyRegistered)));
    }

    #[test]
    fn register_rejected_witness_does_not_mutate_state() {
        let mut host = FakeHost::new();
        host.set_pk("did:dna:root", 0, b"pk-root", false);
        // witness not allow-listed

        let mut buf = Vec::new();
        buf.extend(var_bytes(b"did:dna:alice"));
        buf.extend(var_bytes(b"did:dna:root"));
        write_var_uint(&mut buf, 0);
        let mut cur = Cursor::new(&buf);

        assert!(matches!(reg_id_with_controller(&mut host, &mut cur), Err(Error::WitnessFailed)));
        let enc_id = EncId::new(b"did:dna:alice".to_vec()).unwrap();
        assert!(!host.check_id_existence(&enc_id));
    }

    fn registered_alice(host: &mut FakeHost) {
        host.set_pk("did:dna:root", 0, b"pk-root", false);
        host.allow_witness(b"pk-root");
        let mut buf = Vec::new();
        buf.extend(var_bytes(b"did:dna:alice"));
        buf.extend(var_bytes(b"did:dna:root"));
        write_var_uint(&mut buf, 0);
        let mut cur = Cursor::new(&buf);
        reg_id_with_controller(host, &mut cur).unwrap();
    }

    #[test]
    fn revoke_terminates_registration() {
        let mut host = FakeHost::new();
        registered_alice(&mut host);

        let mut buf = Vec::new();
        buf.extend(var_bytes(b"did:dna:alice"));
        write_var_uint(&mut buf, 0); // root's key index again
        let mut cur = Cursor::new(&buf);

        revoke_id_by_controller(&mut host, &mut cur).unwrap();
        let enc_id = EncId::new(b"did:dna:alice".to_vec()).unwrap();
        assert!(!host.check_id_existence(&enc_id));
    }

    #[test]
    fn remove_controller_requires_subjects_own_witness_not_controllers() {
        let mut host = FakeHost::new();
        registered_alice(&mut host);
        host.set_pk("did:dna:alice", 0, b"pk-alice", false);
        host.allow_witness(b"pk-alice");

        let mut buf = Vec::new();
        buf.extend(var_bytes(b"did:dna:alice"));
        write_var_uint(&mut buf, 0); // alice's own key index
        let mut cur = Cursor::new(&buf);

        let event = remove_controller(&mut host, &mut cur).unwrap();
        assert!(matches!(event, Event::RemoveController { .. }));

        let enc_id = EncId::new(b"did:dna:alice".to_vec()).unwrap();
        assert!(matches!(controller::get(&host, &enc_id), Err(Error::MissingController)));
    }

    #[test]
    fn operations_after_controller_removal_fail_with_missing_controller() {
        let mut host = FakeHost::new();
        registered_alice(&mut host);
        host.set_pk("did:dna:alice", 0, b"pk-alice", false);
        host.allow_witness(b"pk-alice");

        let mut remove_buf = Vec::new();
        remove_buf.extend(var_bytes(b"did:dna:alice"));
        write_var_uint(&mut remove_buf, 0);
        let mut cur = Cursor::new(&remove_buf);
        remove_controller(&mut host, &mut cur).unwrap();

        let mut add_key_buf = Vec::new();
        add_key_buf.extend(var_bytes(b"did:dna:alice"));
        add_key_buf.extend(var_bytes(b"new-pk"));
        write_var_uint(&mut add_key_buf, 0);
        let mut cur2 = Cursor::new(&add_key_buf);
        assert!(matches!(add_key_by_controller(&mut host, &mut cur2), Err(Error::MissingController)));
    }

    #[test]
    fn add_then_remove_attribute_round_trips_through_handlers() {
        let mut host = FakeHost::new();
        registered_alice(&mut host);

        let mut add_buf = Vec::new();
        add_buf.extend(var_bytes(b"did:dna:alice"));
        write_var_uint(&mut add_buf, 1); // one attribute
        add_buf.extend(var_bytes(b"profile"));
        add_buf.extend(var_bytes(b"text/plain"));
        add_buf.extend(var_bytes(b"hello"));
        write_var_uint(&mut add_buf, 0); // root's key index
        let mut cur = Cursor::new(&add_buf);
        let event = add_attributes_by_controller(&mut host, &mut cur).unwrap();
        assert!(matches!(event, Event::Attribute { action: "add", .. }));

        let mut remove_buf = Vec::new();
        remove_buf.extend(var_bytes(b"did:dna:alice"));
        remove_buf.extend(var_bytes(b"profile"));
        write_var_uint(&mut remove_buf, 0);
        let mut cur2 = Cursor::new(&remove_buf);
        let event = remove_attribute_by_controller(&mut host, &mut cur2).unwrap();
        assert!(matches!(event, Event::Attribute { action: "remove", .. }));
    }

    #[test]
    fn add_attributes_rejects_huge_claimed_count_without_allocating_speculatively() {
        let mut host = FakeHost::new();
        registered_alice(&mut host);

        let mut buf = Vec::new();
        buf.extend(var_bytes(b"did:dna:alice"));
        write_var_uint(&mut buf, u64::MAX); // claims far more attributes than the buffer holds
        let mut cur = Cursor::new(&buf);
        assert!(matches!(add_attributes_by_controller(&mut host, &mut cur), Err(Error::MalformedInput)));
    }

    #[test]
    fn verify_controller_on_unregistered_id_fails_not_registered() {
        let host = FakeHost::new();
        let mut buf = Vec::new();
        buf.extend(var_bytes(b"did:dna:ghost"));
        write_var_uint(&mut buf, 0);
        let mut cur = Cursor::new(&buf);
        assert!(matches!(verify_controller(&host, &mut cur), Err(Error::NotRegistered)));
    }
}
