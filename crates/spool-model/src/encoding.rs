//! Listing encodings accepted by report definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Text encoding of the listings a report reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Encoding {
    #[default]
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "ascii")]
    Ascii,
    #[serde(rename = "latin-1")]
    Latin1,
    /// UTF-16 with byte order mark detection, little endian otherwise.
    #[serde(rename = "utf-16")]
    Utf16,
    /// UTF-16 little endian, no byte order mark handling.
    #[serde(rename = "utf-16-le")]
    Utf16Le,
}

impl Encoding {
    pub const ALL: [Encoding; 5] = [
        Encoding::Utf8,
        Encoding::Ascii,
        Encoding::Latin1,
        Encoding::Utf16,
        Encoding::Utf16Le,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Ascii => "ascii",
            Encoding::Latin1 => "latin-1",
            Encoding::Utf16 => "utf-16",
            Encoding::Utf16Le => "utf-16-le",
        }
    }

    /// Case-insensitive lookup; `utf_16_le` is accepted for `utf-16-le`.
    pub fn from_label(label: &str) -> Option<Self> {
        if label.eq_ignore_ascii_case("utf_16_le") {
            return Some(Encoding::Utf16Le);
        }
        Self::ALL
            .into_iter()
            .find(|encoding| encoding.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
