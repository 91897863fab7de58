//! Identifier grammars
//!
//! Short-form entity UUIDs and namespaced resource locations.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use uuid::Uuid;

use super::error::ParseError;

/// Namespace applied when a resource location omits one
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Marks a resource location as naming a tag rather than a single entry
pub const TAG_TOKEN: char = '#';

static SHORT_UUID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([0-9a-fA-F]{1,8})-([0-9a-fA-F]{1,4})-([0-9a-fA-F]{1,4})-([0-9a-fA-F]{1,4})-([0-9a-fA-F]{1,12})$",
    )
    .expect("uuid pattern is valid")
});

static RESOURCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:([a-z0-9_.\-]+):)?([a-z0-9_.\-/]+)$").expect("resource pattern is valid")
});

/// Parse an entity UUID, accepting groups shorter than canonical width.
///
/// `1-1-1-1-1` normalizes to `00000001-0001-0001-0001-000000000001`.
pub fn parse_uuid(input: &str) -> Option<Uuid> {
    let caps = SHORT_UUID.captures(input)?;
    let widths = [8, 4, 4, 4, 12];
    let padded: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, width)| format!("{:0>width$}", &caps[i + 1], width = width))
        .collect();
    Uuid::parse_str(&padded.join("-")).ok()
}

/// A `namespace:path` identifier, optionally marked as a tag
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceLocation {
    pub namespace: String,
    pub path: String,
    pub tagged: bool,
}

impl ResourceLocation {
    /// Parse a raw token. A leading `#` is only accepted when `allow_tag` is set.
    pub fn parse(raw: &str, allow_tag: bool) -> Result<Self, ParseError> {
        let (tagged, body) = match raw.strip_prefix(TAG_TOKEN) {
            Some(rest) if allow_tag => (true, rest),
            _ => (false, raw),
        };
        let caps = RESOURCE
            .captures(body)
            .ok_or_else(|| ParseError::InvalidResourceLocation {
                input: raw.to_string(),
                cursor: 0,
            })?;
        Ok(Self {
            namespace: caps
                .get(1)
                .map_or(DEFAULT_NAMESPACE, |m| m.as_str())
                .to_string(),
            path: caps[2].to_string(),
            tagged,
        })
    }
}

impl fmt::Display for ResourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tagged {
            write!(f, "{}", TAG_TOKEN)?;
        }
        write!(f, "{}:{}", self.namespace, self.path)
    }
}
