// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules, one per record type.

pub mod conversations;
pub mod engagement;
pub mod leads;
pub mod products;
pub mod turns;

/// Parse a TEXT column into a `FromStr` domain enum, mapping parse failures
/// onto rusqlite's conversion error so they surface as storage errors.
pub(crate) fn parse_text_col<T: std::str::FromStr>(
    idx: usize,
    value: String,
) -> rusqlite::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.parse::<T>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
