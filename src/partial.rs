// Copyright 2024 the npm_version authors. All rights reserved. MIT license.

use std::cmp::Ordering;

use crate::compare_pre_release;
use crate::grammar;
use crate::Version;
use crate::VersionParseError;

/// A range that could be a wildcard or number value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XRange {
  Wildcard,
  Val(u64),
}

/// Pre-release of a bound. An empty `Parts` means there is no pre-release.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PreRelease {
  /// Compares equal to any pre-release or release.
  Wildcard,
  Parts(Vec<String>),
}

impl PreRelease {
  fn cmp_parts(&self, parts: &[String]) -> Ordering {
    match self {
      PreRelease::Wildcard => Ordering::Equal,
      PreRelease::Parts(self_parts) => compare_pre_release(self_parts, parts),
    }
  }
}

/// A partial version used as the bound of a comparator.
///
/// Wildcard components compare equal to any value, so `1.x` is equal to
/// every `1.*.*` version and greater than every `0.*.*` version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Partial {
  pub major: XRange,
  pub minor: XRange,
  pub patch: XRange,
  pub pre: PreRelease,
}

impl Partial {
  /// The universal version, matching anything.
  pub const ANY: Partial = Partial {
    major: XRange::Wildcard,
    minor: XRange::Wildcard,
    patch: XRange::Wildcard,
    pre: PreRelease::Wildcard,
  };

  pub fn parse(text: &str) -> Result<Partial, VersionParseError> {
    grammar::parse_partial(text)
  }

  /// A wildcard major makes the whole version the universal one.
  pub fn is_any(&self) -> bool {
    self.major == XRange::Wildcard
  }

  pub fn is_pre_release(&self) -> bool {
    match &self.pre {
      PreRelease::Wildcard => false,
      PreRelease::Parts(parts) => !parts.is_empty(),
    }
  }

  pub fn release(&self) -> Partial {
    Partial {
      major: self.major,
      minor: self.minor,
      patch: self.patch,
      pre: PreRelease::Parts(Vec::new()),
    }
  }

  /// Exclusive upper boundary of a tilde range, `None` when unbounded.
  pub fn tilde_bump(&self) -> Option<Version> {
    // ~*            --> (any)
    // ~2, ~2.x      --> <3.0.0
    // ~1.2, ~1.2.x  --> <1.3.0
    // ~1.2.3        --> <1.3.0
    let major = match self.major {
      XRange::Wildcard => return None,
      XRange::Val(major) => major,
    };
    Some(match self.minor {
      XRange::Wildcard => next_major(major),
      XRange::Val(minor) => next_minor(major, minor),
    })
  }

  /// Exclusive upper boundary of a caret range, `None` when unbounded.
  pub fn caret_bump(&self) -> Option<Version> {
    // ^*      -->  (any)
    // ^1.2.3  -->  <2.0.0
    // ^0      -->  <1.0.0
    // ^0.2.3  -->  <0.3.0
    // ^0.0    -->  <0.1.0
    // ^0.0.3  -->  <0.0.4
    let major = match self.major {
      XRange::Wildcard => return None,
      XRange::Val(major) => major,
    };
    if major > 0 {
      return Some(next_major(major));
    }
    let minor = match self.minor {
      XRange::Wildcard => return Some(next_major(major)),
      XRange::Val(minor) => minor,
    };
    if minor > 0 {
      return Some(next_minor(major, minor));
    }
    Some(match self.patch {
      XRange::Wildcard => next_minor(major, minor),
      XRange::Val(patch) => Version {
        major,
        minor,
        patch: patch.saturating_add(1),
        ..Default::default()
      },
    })
  }

  /// Orders this bound relative to a concrete version.
  ///
  /// A wildcard component ends the comparison, so `1.x` is equal to every
  /// `1.*.*` version including its pre-releases.
  pub fn cmp_version(&self, version: &Version) -> Ordering {
    let components = [
      (self.major, version.major),
      (self.minor, version.minor),
      (self.patch, version.patch),
    ];
    for (range, val) in components {
      let cmp_result = match range {
        XRange::Wildcard => return Ordering::Equal,
        XRange::Val(self_val) => self_val.cmp(&val),
      };
      if cmp_result != Ordering::Equal {
        return cmp_result;
      }
    }
    self.pre.cmp_parts(&version.pre)
  }
}

fn next_major(major: u64) -> Version {
  Version {
    major: major.saturating_add(1),
    ..Default::default()
  }
}

fn next_minor(major: u64, minor: u64) -> Version {
  Version {
    major,
    minor: minor.saturating_add(1),
    ..Default::default()
  }
}

impl From<Version> for Partial {
  fn from(version: Version) -> Self {
    Partial {
      major: XRange::Val(version.major),
      minor: XRange::Val(version.minor),
      patch: XRange::Val(version.patch),
      pre: PreRelease::Parts(version.pre),
    }
  }
}

impl PartialEq<Partial> for Version {
  fn eq(&self, other: &Partial) -> bool {
    other.cmp_version(self) == Ordering::Equal
  }
}

impl PartialOrd<Partial> for Version {
  fn partial_cmp(&self, other: &Partial) -> Option<Ordering> {
    Some(other.cmp_version(self).reverse())
  }
}
