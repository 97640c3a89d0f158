//! Decomposition of a C++ function signature without a C++ parser.
//!
//! The signature text between a hook's address argument and its body is split
//! at the last top-level parenthesis group into a declarator and a parameter
//! list. The declarator is then tokenized by spaces: calling convention
//! keywords are picked out, the last token is the function name and everything
//! else is the return type.
//!
//! ```rust
//! use gdmake::parser::signature::{parse_signature, CallingConvention};
//!
//! let sig = parse_signature("GDMAKE_ATTR(NoLog) void __fastcall cb(int (*f)(int), void*)")?;
//! assert_eq!(sig.return_type, "void");
//! assert_eq!(sig.calling_convention, Some(CallingConvention::Fastcall));
//! assert_eq!(sig.name, "cb");
//! assert_eq!(sig.parameters, "int (*f)(int), void*");
//! assert_eq!(sig.attributes, ["NoLog"]);
//! # Ok::<(), gdmake::Error>(())
//! ```

use std::str::FromStr;

use strum::{Display, EnumIter, EnumString};

use crate::{
    registry::ATTR_MACRO,
    scanner::{find_macro, match_delimiter, strip_comments, Delimiter},
    Result,
};

/// ABI calling conventions recognized in hook declarators.
///
/// Declarators may spell them with or without leading underscores
/// (`__stdcall`, `_stdcall`, `stdcall`). `membercall` is the project specific
/// alias for member functions whose `this` travels in `ecx`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum CallingConvention {
    /// `__fastcall`
    Fastcall,
    /// `__thiscall`
    Thiscall,
    /// `__stdcall`
    Stdcall,
    /// `__cdecl`
    Cdecl,
    /// `__vectorcall`
    Vectorcall,
    /// `__clrcall`
    Clrcall,
    /// `__membercall`
    Membercall,
}

impl CallingConvention {
    /// Recognizes a declarator token.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::from_str(token.trim_start_matches('_')).ok()
    }

    /// The compiler keyword, e.g. `__stdcall`.
    pub fn keyword(self) -> String {
        format!("__{}", self)
    }
}

/// The pieces of a decomposed function signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Return type, tokens joined by single spaces
    pub return_type: String,
    /// Calling convention, if one was spelled out
    pub calling_convention: Option<CallingConvention>,
    /// Function name
    pub name: String,
    /// Parameter list without the outer parentheses
    pub parameters: String,
    /// Arguments of the attribute marker, if present
    pub attributes: Vec<String>,
    /// The signature as written, with only the attribute marker removed
    pub declaration: String,
}

/// Collapses every whitespace run into one space and trims the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Removes the attribute marker from `raw`, returning the remaining text and the
/// marker's comma separated arguments.
fn extract_attributes(raw: &str) -> Result<(String, Vec<String>)> {
    let Some(at) = find_macro(raw, ATTR_MACRO, 0) else {
        return Ok((raw.to_string(), Vec::new()));
    };

    let open = raw[at..]
        .find('(')
        .map(|pos| at + pos)
        .ok_or_else(|| malformed_error!("{} without arguments in '{}'", ATTR_MACRO, raw))?;
    let end = match_delimiter(raw, open + 1, Delimiter::Paren)
        .ok_or_else(|| malformed_error!("Unclosed {} in '{}'", ATTR_MACRO, raw))?;

    let attributes = raw[open + 1..end - 1]
        .split(',')
        .map(str::trim)
        .filter(|attr| !attr.is_empty())
        .map(str::to_string)
        .collect();

    let mut remaining = String::with_capacity(raw.len());
    remaining.push_str(&raw[..at]);
    remaining.push_str(raw[end..].trim_start_matches([' ', '\t']));

    Ok((remaining, attributes))
}

/// Splits at the last top-level parenthesis group.
///
/// Returns the declarator and the parameter list without its parentheses.
fn split_parameters(signature: &str) -> Result<(&str, &str)> {
    let mut depth = 0usize;
    let mut last_open = None;

    for (offset, byte) in signature.bytes().enumerate() {
        match byte {
            b'(' => {
                if depth == 0 {
                    last_open = Some(offset);
                }
                depth += 1;
            }
            b')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    let open = last_open
        .ok_or_else(|| malformed_error!("Signature '{}' has no parameter list", signature))?;
    let close = match_delimiter(signature, open + 1, Delimiter::Paren)
        .ok_or_else(|| malformed_error!("Signature '{}' has an unclosed parameter list", signature))?;

    let trailing = signature[close..].trim();
    if !trailing.is_empty() {
        log::debug!("ignoring '{}' after parameters of '{}'", trailing, signature);
    }

    Ok((signature[..open].trim(), signature[open + 1..close - 1].trim()))
}

/// Decomposes the signature of a hook function.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if there is no parameter list, no
/// function name or no return type.
pub fn parse_signature(raw: &str) -> Result<Signature> {
    let (declaration, attributes) = extract_attributes(raw)?;
    let normalized = normalize_whitespace(&strip_comments(&declaration))
        .replace(":: ", "::")
        .replace(" ::", "::");

    let (declarator, parameters) = split_parameters(&normalized)?;

    let tokens: Vec<&str> = declarator.split(' ').filter(|t| !t.is_empty()).collect();
    let Some((name_token, leading)) = tokens.split_last() else {
        return Err(malformed_error!("Signature '{}' has no function name", raw));
    };

    let name = name_token.trim_start_matches(['*', '&']);
    if name.is_empty() || CallingConvention::from_token(name).is_some() {
        return Err(malformed_error!("Signature '{}' has no function name", raw));
    }
    let indirection = &name_token[..name_token.len() - name.len()];

    let mut calling_convention = None;
    let mut return_tokens = Vec::with_capacity(leading.len());
    for token in leading {
        let bare = token.trim_start_matches(['*', '&']);
        match CallingConvention::from_token(bare) {
            Some(convention) => {
                calling_convention = Some(convention);
                if bare.len() < token.len() {
                    return_tokens.push(&token[..token.len() - bare.len()]);
                }
            }
            None => return_tokens.push(*token),
        }
    }

    if return_tokens.is_empty() {
        return Err(malformed_error!("Signature '{}' has no return type", raw));
    }

    let mut return_type = return_tokens
        .join(" ")
        .replace(" *", "*")
        .replace(" &", "&");
    return_type.push_str(indirection);

    Ok(Signature {
        return_type,
        calling_convention,
        name: name.to_string(),
        parameters: parameters.to_string(),
        attributes,
        declaration,
    })
}
