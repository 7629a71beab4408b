//! Version checks for optional companion libraries.
//!
//! Each probe runs at most once per owner and the parsed result is cached.
//! Two threads racing on the first read may both run the probe; the first
//! published value wins and both results are identical.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::error::{BigQueryError, Result};

/// A `major.minor.patch` release number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LibraryVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl LibraryVersion {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl FromStr for LibraryVersion {
    type Err = BigQueryError;

    /// Parses the leading numeric components; pre-release suffixes such as
    /// `rc1` are ignored and missing components default to zero.
    fn from_str(s: &str) -> Result<Self> {
        let mut components = [0u64; 3];
        let mut parts = s.trim().trim_start_matches('v').split('.');
        for (i, slot) in components.iter_mut().enumerate() {
            let Some(part) = parts.next() else { break };
            let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
            if digits.is_empty() {
                if i == 0 {
                    return Err(BigQueryError::format(format!("got version: '{}'", s)));
                }
                break;
            }
            *slot = digits.parse()?;
            if digits.len() != part.len() {
                break;
            }
        }
        Ok(LibraryVersion::new(components[0], components[1], components[2]))
    }
}

impl fmt::Display for LibraryVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

type ProbeFn = Box<dyn Fn() -> Option<String> + Send + Sync>;

/// Lazily resolves and caches the installed version of one library
pub struct VersionProbe {
    library: &'static str,
    probe: ProbeFn,
    installed: OnceLock<LibraryVersion>,
}

impl VersionProbe {
    pub fn new<F>(library: &'static str, probe: F) -> Self
    where
        F: Fn() -> Option<String> + Send + Sync + 'static,
    {
        Self {
            library,
            probe: Box::new(probe),
            installed: OnceLock::new(),
        }
    }

    /// The installed version; `0.0.0` when unknown, since it sorts before any release
    pub fn installed_version(&self) -> LibraryVersion {
        *self.installed.get_or_init(|| {
            let version = match (self.probe)() {
                None => LibraryVersion::default(),
                Some(raw) => raw.parse().unwrap_or_else(|e| {
                    tracing::warn!(
                        library = self.library,
                        error = %e,
                        "unparsable library version"
                    );
                    LibraryVersion::default()
                }),
            };
            tracing::debug!(library = self.library, %version, "resolved library version");
            version
        })
    }
}

impl fmt::Debug for VersionProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionProbe")
            .field("library", &self.library)
            .field("installed", &self.installed.get())
            .finish()
    }
}

const STORAGE_OPTIONAL_READ_SESSION_VERSION: LibraryVersion = LibraryVersion::new(2, 6, 0);

/// Version checks for the storage read client
#[derive(Debug)]
pub struct StorageVersions {
    probe: VersionProbe,
}

impl StorageVersions {
    pub fn new<F>(probe: F) -> Self
    where
        F: Fn() -> Option<String> + Send + Sync + 'static,
    {
        Self {
            probe: VersionProbe::new("bigquery-storage", probe),
        }
    }

    pub fn installed_version(&self) -> LibraryVersion {
        self.probe.installed_version()
    }

    /// True if the read session may be omitted when reading rows
    pub fn is_read_session_optional(&self) -> bool {
        self.installed_version() >= STORAGE_OPTIONAL_READ_SESSION_VERSION
    }
}

/// Version checks for the Arrow library
#[derive(Debug)]
pub struct ArrowVersions {
    probe: VersionProbe,
}

impl ArrowVersions {
    pub fn new<F>(probe: F) -> Self
    where
        F: Fn() -> Option<String> + Send + Sync + 'static,
    {
        Self {
            probe: VersionProbe::new("arrow", probe),
        }
    }

    pub fn installed_version(&self) -> LibraryVersion {
        self.probe.installed_version()
    }

    pub fn use_compliant_nested_type(&self) -> bool {
        self.installed_version().major >= 4
    }
}
