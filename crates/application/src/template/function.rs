//! Template function names.

/// A function usable in a `{{...}}` chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TemplateFn {
    /// `readTextFile` / `rtf`: reads a text file.
    ReadTextFile,
    /// `readFile` / `rf`: reads a file as bytes.
    ReadFile,
    /// `base64` / `b64`: base64-encodes the current bytes.
    Base64,
    /// `openFile` / `of`: asks the user for a file path.
    OpenFile,
    /// `get` / `g`: reads a field from the latest cached response.
    Get,
    /// `timestamp` / `ts`: current Unix time in seconds.
    Timestamp,
    /// `md5`: hex MD5 digest.
    Md5,
    /// `sha256`: hex SHA-256 digest.
    Sha256,
    /// `value`: looks up a custom variable by name.
    Value,
    /// Any other name; leaves the value unchanged.
    Unknown(String),
}

impl TemplateFn {
    /// Returns true for functions that touch the file system or the user.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::ReadTextFile | Self::ReadFile | Self::OpenFile)
    }
}

impl From<&str> for TemplateFn {
    fn from(name: &str) -> Self {
        match name {
            "readTextFile" | "rtf" => Self::ReadTextFile,
            "readFile" | "rf" => Self::ReadFile,
            "base64" | "b64" => Self::Base64,
            "openFile" | "of" => Self::OpenFile,
            "get" | "g" => Self::Get,
            "timestamp" | "ts" => Self::Timestamp,
            "md5" => Self::Md5,
            "sha256" => Self::Sha256,
            "value" => Self::Value,
            other => Self::Unknown(other.to_string()),
        }
    }
}
