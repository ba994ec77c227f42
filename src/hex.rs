// SPDX-License-Identifier: MIT

//! Conversion between bytes and the `"05 01 09 02"` hex notation used to
//! dump report descriptors and reports.

use ::hex::FromHexError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HexError {
    #[error("Invalid character '{character}' at position {position}")]
    InvalidCharacter { character: char, position: usize },
    #[error("Invalid hex string: {message}")]
    Malformed { message: String },
}

type Result<T> = std::result::Result<T, HexError>;

/// Format the bytes as upper-case hex pairs separated by a single space.
///
/// ```
/// # use hidfield::hex::bytes_to_hex_string;
/// assert_eq!(bytes_to_hex_string(&[0xab, 0xcd, 0x00]), "AB CD 00");
/// ```
pub fn bytes_to_hex_string(bytes: &[u8]) -> String {
    let encoded = ::hex::encode_upper(bytes);
    let mut s = String::with_capacity(bytes.len() * 3);
    for (i, c) in encoded.chars().enumerate() {
        if i > 0 && i % 2 == 0 {
            s.push(' ');
        }
        s.push(c);
    }
    s
}

/// Parse a string of hex digits into bytes.
///
/// Digits are case-insensitive, any `0x` prefixes and all whitespace are
/// ignored. Digits pair up from the end of the string, an odd number of
/// digits is padded with a leading zero. The position of an invalid
/// character counts characters after lower-casing and removal of the
/// `0x` prefixes.
pub fn hex_string_to_bytes(s: &str) -> Result<Vec<u8>> {
    let s = s.to_ascii_lowercase().replace("0x", "");

    // the character position of every byte in `digits`
    let mut positions: Vec<usize> = Vec::with_capacity(s.len());
    let mut digits = String::with_capacity(s.len() + 1);
    for (position, character) in s.chars().enumerate() {
        if character.is_whitespace() {
            continue;
        }
        positions.extend(std::iter::repeat(position).take(character.len_utf8()));
        digits.push(character);
    }

    let padding = digits.len() % 2;
    if padding == 1 {
        digits.insert(0, '0');
    }

    ::hex::decode(&digits).map_err(|e| match e {
        FromHexError::InvalidHexCharacter { index, .. } => {
            let position = positions[index - padding];
            HexError::InvalidCharacter {
                character: s.chars().nth(position).unwrap_or(char::REPLACEMENT_CHARACTER),
                position,
            }
        }
        e => HexError::Malformed {
            message: e.to_string(),
        },
    })
}
