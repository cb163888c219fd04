//! Coarse browser / OS classification from the User-Agent header.
//!
//! Vendor tokens overlap (Chrome UAs carry `safari/`, Edge UAs carry `chrome/`,
//! Android UAs carry `linux`), so rules are evaluated in a fixed priority order
//! and some carry an exclusion.

use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Browser {
    Edge,
    Chrome,
    Firefox,
    Safari,
    Opera,
    InternetExplorer,
    Unknown,
}

impl Browser {
    /// Classify a User-Agent string; matching is case-insensitive
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_lowercase();

        if ua.contains("edg/") {
            Self::Edge
        } else if ua.contains("chrome/") {
            // Edge already ruled out above
            Self::Chrome
        } else if ua.contains("firefox/") {
            Self::Firefox
        } else if ua.contains("safari/") {
            // Chrome already ruled out above
            Self::Safari
        } else if ua.contains("opera/") || ua.contains("opr/") {
            Self::Opera
        } else if ua.contains("msie") || ua.contains("trident/") {
            Self::InternetExplorer
        } else {
            Self::Unknown
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Edge => "Microsoft Edge",
            Self::Chrome => "Google Chrome",
            Self::Firefox => "Mozilla Firefox",
            Self::Safari => "Apple Safari",
            Self::Opera => "Opera",
            Self::InternetExplorer => "Internet Explorer",
            Self::Unknown => "Unknown Browser",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatingSystem {
    Windows,
    MacOs,
    Linux,
    Android,
    Ios,
    Unknown,
}

impl OperatingSystem {
    /// Classify a User-Agent string; matching is case-insensitive
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_lowercase();

        if ua.contains("windows nt") {
            Self::Windows
        } else if ua.contains("mac os x") || ua.contains("macintosh") {
            Self::MacOs
        } else if ua.contains("linux") {
            Self::Linux
        } else if ua.contains("android") {
            Self::Android
        } else if ua.contains("iphone") || ua.contains("ipad") {
            Self::Ios
        } else {
            Self::Unknown
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::MacOs => "macOS",
            Self::Linux => "Linux",
            Self::Android => "Android",
            Self::Ios => "iOS",
            Self::Unknown => "Unknown OS",
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for OperatingSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Browser {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl Serialize for OperatingSystem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}
