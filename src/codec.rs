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

//! Wire codec (component A): a cursor over a byte buffer plus the `VarUint`/`VarBytes`
//! primitives used throughout the contract platform, and their composite readers for group
//! trees and signer lists (the latter two live in [`crate::group`] and [`crate::auth`]
//! respectively, since they need those modules' types).

use crate::error::Error;

/// A read cursor over a borrowed byte buffer.
///
/// Every sub-parser advances the same cursor by reference (Design Notes §9: "argument buffer
/// threaded through parse + verify"), so a handler can read its own positional arguments and
/// then hand the very same cursor to the authorization engine to consume the trailing signature
/// arguments, with no copying of the remaining bytes.
#[derive(Copy, Clone, Debug)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self { Cursor { buf, pos: 0 } }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> &'a [u8] { &self.buf[self.pos..] }

    pub fn is_empty(&self) -> bool { self.pos >= self.buf.len() }

    fn take(&mut self, n: usize) -> Result<&'a [u8], Error> {
        let end = self.pos.checked_add(n).ok_or(Error::MalformedInput)?;
        if end > self.buf.len() {
            return Err(Error::MalformedInput);
        }
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8, Error> { Ok(self.take(1)?[0]) }

    /// Reads a `VarUint`: a single lead byte under `0xFD` is the value itself; `0xFD`/`0xFE`/
    /// `0xFF` introduce a little-endian `u16`/`u32`/`u64` respectively (§4.A).
    pub fn read_var_uint(&mut self) -> Result<u64, Error> {
        let lead = self.read_u8()?;
        Ok(match lead {
            0..=0xFC => lead as u64,
            0xFD => u16::from_le_bytes(self.take(2)?.try_into().expect("len checked above")) as u64,
            0xFE => u32::from_le_bytes(self.take(4)?.try_into().expect("len checked above")) as u64,
            0xFF => u64::from_le_bytes(self.take(8)?.try_into().expect("len checked above")),
        })
    }

    /// Reads a `VarUint` and narrows it to `u32`, as required for public-key indices (§3 Signer).
    pub fn read_var_uint_u32(&mut self) -> Result<u32, Error> {
        u32::try_from(self.read_var_uint()?).map_err(|_| Error::MalformedInput)
    }

    /// Reads a `VarBytes`: a `VarUint` length prefix followed by exactly that many raw bytes.
    pub fn read_var_bytes(&mut self) -> Result<&'a [u8], Error> {
        let len = self.read_var_uint()? as usize;
        self.take(len)
    }
}

/// Writes a `VarUint` using the same compact-size scheme [`Cursor::read_var_uint`] decodes.
pub fn write_var_uint(out: &mut Vec<u8>, value: u64) {
    match value {
        0..=0xFC => out.push(value as u8),
        0xFD..=0xFFFF => {
            out.push(0xFD);
            out.extend_from_slice(&(value as u16).to_le_bytes());
        }
        0x1_0000..=0xFFFF_FFFF => {
            out.push(0xFE);
            out.extend_from_slice(&(value as u32).to_le_bytes());
        }
        _ => {
            out.push(0xFF);
            out.extend_from_slice(&value.to_le_bytes());
        }
    }
}

/// Writes a `VarBytes`: the length as a `VarUint` followed by the raw bytes.
pub fn write_var_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    write_var_uint(out, bytes.len() as u64);
    out.extend_from_slice(bytes);
}
