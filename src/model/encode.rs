//! Byte encoding of terms for index records.
//!
//! Index keys and values are tagged, length-prefixed term encodings:
//!
//! ```text
//! resource  [b'R'][u32 BE len][uri]
//! blank     [b'B'][u32 BE len][id]
//! literal   [b'L'][u32 BE len][lexical]
//!                 [0|1][u32 BE len][language]?
//!                 [0|1][u32 BE len][datatype]?
//! ```
//!
//! Two encoded terms concatenated form an index key (e.g. subject then
//! predicate for the `sp2o` index); a single encoded term forms the
//! record value.

//---------------------------------------------------------------------------------------------------- Import
use tracing::error;

use crate::{
    error::RuntimeError,
    term::{Term, Uri},
};

//---------------------------------------------------------------------------------------------------- Constants
const TAG_RESOURCE: u8 = b'R';
const TAG_LITERAL: u8 = b'L';
const TAG_BLANK: u8 = b'B';

//---------------------------------------------------------------------------------------------------- Encode
/// Append the encoding of one term.
pub(crate) fn encode_node(out: &mut Vec<u8>, term: &Term) {
    match term {
        Term::Resource(uri) => {
            out.push(TAG_RESOURCE);
            push_str(out, uri.as_str());
        }
        Term::Blank(id) => {
            out.push(TAG_BLANK);
            push_str(out, id);
        }
        Term::Literal {
            lexical,
            language,
            datatype,
        } => {
            out.push(TAG_LITERAL);
            push_str(out, lexical);
            push_opt(out, language.as_deref());
            push_opt(out, datatype.as_ref().map(Uri::as_str));
        }
    }
}

/// Encode one term as an owned buffer.
pub(crate) fn encode_one(term: &Term) -> Vec<u8> {
    let mut out = Vec::new();
    encode_node(&mut out, term);
    out
}

/// Encode two terms back-to-back (an index key).
pub(crate) fn encode_pair(a: &Term, b: &Term) -> Vec<u8> {
    let mut out = Vec::new();
    encode_node(&mut out, a);
    encode_node(&mut out, b);
    out
}

fn push_str(out: &mut Vec<u8>, s: &str) {
    let len = u32::try_from(s.len()).unwrap_or(u32::MAX);
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(s.as_bytes());
}

fn push_opt(out: &mut Vec<u8>, s: Option<&str>) {
    match s {
        Some(s) => {
            out.push(1);
            push_str(out, s);
        }
        None => out.push(0),
    }
}

//---------------------------------------------------------------------------------------------------- Decode
/// Decode one term starting at `*offset`, advancing it.
pub(crate) fn decode_node(buf: &[u8], offset: &mut usize) -> Result<Term, RuntimeError> {
    let tag = *buf.get(*offset).ok_or_else(corrupt)?;
    *offset += 1;

    match tag {
        TAG_RESOURCE => Ok(Term::Resource(Uri::new(take_str(buf, offset)?))),
        TAG_BLANK => Ok(Term::Blank(take_str(buf, offset)?)),
        TAG_LITERAL => {
            let lexical = take_str(buf, offset)?;
            let language = take_opt(buf, offset)?;
            let datatype = take_opt(buf, offset)?.map(Uri::new);
            Ok(Term::Literal {
                lexical,
                language,
                datatype,
            })
        }
        _ => Err(corrupt()),
    }
}

/// Decode a buffer holding exactly one term.
pub(crate) fn decode_one(buf: &[u8]) -> Result<Term, RuntimeError> {
    let mut offset = 0;
    let term = decode_node(buf, &mut offset)?;
    if offset == buf.len() {
        Ok(term)
    } else {
        Err(corrupt())
    }
}

/// Decode a buffer holding exactly two terms.
pub(crate) fn decode_pair(buf: &[u8]) -> Result<(Term, Term), RuntimeError> {
    let mut offset = 0;
    let a = decode_node(buf, &mut offset)?;
    let b = decode_node(buf, &mut offset)?;
    if offset == buf.len() {
        Ok((a, b))
    } else {
        Err(corrupt())
    }
}

fn take_str(buf: &[u8], offset: &mut usize) -> Result<String, RuntimeError> {
    let len_bytes: [u8; 4] = buf
        .get(*offset..*offset + 4)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(corrupt)?;
    *offset += 4;

    let len = u32::from_be_bytes(len_bytes) as usize;
    let bytes = buf.get(*offset..*offset + len).ok_or_else(corrupt)?;
    *offset += len;

    String::from_utf8(bytes.to_vec()).map_err(|_| corrupt())
}

fn take_opt(buf: &[u8], offset: &mut usize) -> Result<Option<String>, RuntimeError> {
    let flag = *buf.get(*offset).ok_or_else(corrupt)?;
    *offset += 1;

    match flag {
        0 => Ok(None),
        1 => Ok(Some(take_str(buf, offset)?)),
        _ => Err(corrupt()),
    }
}

#[cold]
fn corrupt() -> RuntimeError {
    error!(target: "tristore::store", "index record failed to decode");
    RuntimeError::Corrupt
}
