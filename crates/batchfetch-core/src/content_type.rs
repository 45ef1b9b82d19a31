//! Content types a batch can fetch, and the fetcher script each one uses.

use std::fmt;
use std::str::FromStr;

use crate::error::SetupError;

/// Closed set of content-type selectors accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// CTX images.
    Ctx,
    /// HiRISE EDR images.
    HiriseEdr,
    /// HiRISE RDR images.
    HiriseRdr,
}

impl ContentType {
    pub const ALL: [ContentType; 3] = [
        ContentType::Ctx,
        ContentType::HiriseEdr,
        ContentType::HiriseRdr,
    ];

    /// Tag as typed on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Ctx => "ctx",
            ContentType::HiriseEdr => "hirise_edr",
            ContentType::HiriseRdr => "hirise_rdr",
        }
    }

    /// File name of the fetcher script in the scripts directory.
    pub fn script_name(&self) -> &'static str {
        match self {
            ContentType::Ctx => "download_ctx.s",
            ContentType::HiriseEdr => "download_hirise_edr.s",
            ContentType::HiriseRdr => "download_hirise_rdr.s",
        }
    }

    /// Comma-separated list of valid tags, for error messages and help.
    pub fn valid_options() -> String {
        Self::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| SetupError::InvalidContentType {
                given: s.to_string(),
                valid: Self::valid_options(),
            })
    }
}
