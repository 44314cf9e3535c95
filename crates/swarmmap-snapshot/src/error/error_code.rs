//! Error codes for the snapshot diagnostic system.
//!
//! Codes are organized by phase:
//! - `E1xx` - JSON syntax and document structure
//! - `E2xx` - Malformed records
//! - `W3xx` - Normalization warnings

use std::fmt;

/// Codes for categorizing snapshot diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Syntax Errors (E1xx)
    // =========================================================================
    /// Invalid JSON.
    ///
    /// The source is not well-formed JSON.
    E100,

    /// Incomplete input.
    ///
    /// The source ended before the JSON document was complete.
    E101,

    /// Unexpected document structure.
    ///
    /// The document is valid JSON but not a snapshot object with `hosts`,
    /// `containers` and `networks` arrays.
    E102,

    // =========================================================================
    // Malformed Records (E2xx)
    // =========================================================================
    /// Malformed host record.
    ///
    /// A host entry has a missing field or a value of the wrong type.
    E200,

    /// Malformed container record.
    E201,

    /// Malformed network record.
    E202,

    /// Missing identifier.
    ///
    /// A record has an empty `id`, or a network has an empty `name`.
    E203,

    /// Duplicate identifier.
    ///
    /// Hosts, containers and networks share one identifier space.
    E204,

    /// Container without host.
    ///
    /// A container in the flat `containers` list has no `hostId`.
    E205,

    // =========================================================================
    // Normalization Warnings (W3xx)
    // =========================================================================
    /// Container of unknown host.
    ///
    /// A flat container names a host that is not in the snapshot; it is
    /// dropped.
    W300,

    /// Ambiguous gateway bridge.
    ///
    /// Several host ids occur in a gateway bridge id; the longest one wins.
    W301,

    /// Extra gateway bridge.
    ///
    /// A host already owns a gateway bridge; later candidates are ignored.
    W302,

    /// Gateway bridge of unknown host.
    ///
    /// A network's explicit `hostId` names no host.
    W303,

    /// Dangling network attachment.
    ///
    /// A container attaches to a network that is not in the snapshot.
    W304,

    /// Dangling host handle.
    ///
    /// An overlay declares a link to a host that is not in the snapshot.
    W305,

    /// Ingress handle out of range.
    ///
    /// An `ingressHandle` outside `[0, 1]` is clamped.
    W306,

    /// Extra singular network.
    ///
    /// Only the first ingress network and the first external network are
    /// placed.
    W307,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E100").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Syntax errors
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            // Malformed records
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E204 => "E204",
            ErrorCode::E205 => "E205",
            // Normalization warnings
            ErrorCode::W300 => "W300",
            ErrorCode::W301 => "W301",
            ErrorCode::W302 => "W302",
            ErrorCode::W303 => "W303",
            ErrorCode::W304 => "W304",
            ErrorCode::W305 => "W305",
            ErrorCode::W306 => "W306",
            ErrorCode::W307 => "W307",
        }
    }

    /// Returns a short description of what this code means.
    pub fn description(&self) -> &'static str {
        match self {
            // Syntax errors
            ErrorCode::E100 => "invalid JSON",
            ErrorCode::E101 => "incomplete input",
            ErrorCode::E102 => "unexpected document structure",
            // Malformed records
            ErrorCode::E200 => "malformed host record",
            ErrorCode::E201 => "malformed container record",
            ErrorCode::E202 => "malformed network record",
            ErrorCode::E203 => "missing identifier",
            ErrorCode::E204 => "duplicate identifier",
            ErrorCode::E205 => "container without host",
            // Normalization warnings
            ErrorCode::W300 => "container of unknown host",
            ErrorCode::W301 => "ambiguous gateway bridge",
            ErrorCode::W302 => "extra gateway bridge",
            ErrorCode::W303 => "gateway bridge of unknown host",
            ErrorCode::W304 => "dangling network attachment",
            ErrorCode::W305 => "dangling host handle",
            ErrorCode::W306 => "ingress handle out of range",
            ErrorCode::W307 => "extra singular network",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
