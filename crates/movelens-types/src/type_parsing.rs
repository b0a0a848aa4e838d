//! Move type-string parsing utilities.
//!
//! The RPC layer reports parameter, return and field types as strings like
//! `&mut 0x2::coin::Coin<0x2::sui::SUI>`. The analyzer only needs the
//! fully-qualified datatype references embedded in such strings, not a full
//! type grammar, so this module extracts `address::module::Name` triples
//! wherever they occur (behind references, inside vectors, inside generic
//! argument lists).

use crate::address::normalize_address;

/// A fully-qualified datatype reference found inside a type string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    /// Normalized 0x-prefixed 64-hex address.
    pub address: String,
    pub module: String,
    pub name: String,
}

impl TypeRef {
    /// `address::module` of the defining module.
    pub fn module_fqn(&self) -> String {
        format!("{}::{}", self.address, self.module)
    }

    /// `address::module::Name`.
    pub fn fqn(&self) -> String {
        format!("{}::{}::{}", self.address, self.module, self.name)
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Extract every `0x…::module::Name` reference from a type string.
///
/// Duplicates are preserved in occurrence order; callers dedupe as needed.
///
/// # Examples
///
/// ```
/// use movelens_types::type_parsing::extract_type_refs;
///
/// let refs = extract_type_refs("&mut 0x2::coin::Coin<0xdee9::custodian::Account>");
/// assert_eq!(refs.len(), 2);
/// assert_eq!(refs[0].module, "coin");
/// assert_eq!(refs[1].name, "Account");
/// ```
pub fn extract_type_refs(type_str: &str) -> Vec<TypeRef> {
    let mut refs = Vec::new();
    let bytes = type_str.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        // Find the next 0x-prefixed hex run.
        if bytes[i] == b'0' && i + 1 < bytes.len() && bytes[i + 1] == b'x' {
            let hex_start = i + 2;
            let mut j = hex_start;
            while j < bytes.len() && bytes[j].is_ascii_hexdigit() {
                j += 1;
            }
            if j > hex_start {
                if let Some(r) = parse_ref_at(type_str, i, j) {
                    i = r.1;
                    refs.push(r.0);
                    continue;
                }
            }
            i = j.max(i + 1);
        } else {
            i += 1;
        }
    }

    refs
}

/// Try to parse `::module::Name` following the address at `[addr_start, addr_end)`.
/// Returns the reference and the index just past the parsed name.
fn parse_ref_at(s: &str, addr_start: usize, addr_end: usize) -> Option<(TypeRef, usize)> {
    let rest = &s[addr_end..];
    let rest = rest.strip_prefix("::")?;
    let module_len = rest.chars().take_while(|c| is_ident_char(*c)).count();
    if module_len == 0 {
        return None;
    }
    let module = &rest[..module_len];
    let rest2 = rest[module_len..].strip_prefix("::")?;
    let name_len = rest2.chars().take_while(|c| is_ident_char(*c)).count();
    if name_len == 0 {
        return None;
    }
    let name = &rest2[..name_len];

    let consumed = addr_end + 2 + module_len + 2 + name_len;
    Some((
        TypeRef {
            address: normalize_address(&s[addr_start..addr_end]),
            module: module.to_string(),
            name: name.to_string(),
        },
        consumed,
    ))
}

/// Short (struct) name of an FQN: `0x2::coin::Coin<T>` -> `Coin`.
pub fn short_name(fqn: &str) -> &str {
    let base = fqn.split('<').next().unwrap_or(fqn);
    base.rsplit("::").next().unwrap_or(base)
}
