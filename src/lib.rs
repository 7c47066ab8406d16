// Copyright 2024 the npm_version authors. All rights reserved. MIT license.

use std::cmp::Ordering;
use std::fmt;

use once_cell::sync::Lazy;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

mod comparator;
mod grammar;
mod partial;
mod range;

pub use self::comparator::Comparator;
pub use self::comparator::Operator;
pub use self::partial::Partial;
pub use self::partial::PreRelease;
pub use self::partial::XRange;
pub use self::range::ComparatorSet;
pub use self::range::RangeOptions;
pub use self::range::RangeParseError;
pub use self::range::VersionReq;

/// Requirement that is satisfied by every release version.
///
/// It uses the default options, so pre-release versions never satisfy it.
pub static WILDCARD_VERSION_REQ: Lazy<VersionReq> = Lazy::new(VersionReq::any);

#[derive(Error, Debug, Clone)]
#[error("Invalid npm version. {source}")]
pub struct VersionParseError {
  #[source]
  pub(crate) source: monch::ParseErrorFailureError,
}

#[derive(Clone, Debug, Default)]
pub struct Version {
  pub major: u64,
  pub minor: u64,
  pub patch: u64,
  pub pre: Vec<String>,
  pub build: Vec<String>,
}

impl Serialize for Version {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

impl<'de> Deserialize<'de> for Version {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: serde::Deserializer<'de>,
  {
    let text = String::deserialize(deserializer)?;
    match Version::parse(&text) {
      Ok(version) => Ok(version),
      Err(err) => Err(serde::de::Error::custom(err)),
    }
  }
}

impl Version {
  /// Parses a version loosely the way npm does (`v1.2.3`, `= 1.2.3`, ...).
  pub fn parse(text: &str) -> Result<Version, VersionParseError> {
    grammar::parse_version(text)
  }

  pub fn is_pre_release(&self) -> bool {
    !self.pre.is_empty()
  }

  /// The same major, minor and patch without pre-release or build.
  pub fn release(&self) -> Version {
    Version {
      major: self.major,
      minor: self.minor,
      patch: self.patch,
      pre: Vec::new(),
      build: Vec::new(),
    }
  }

  pub fn compare(&self, other: &Version) -> Ordering {
    self.cmp(other)
  }
}

impl fmt::Display for Version {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
    if !self.pre.is_empty() {
      write!(f, "-{}", self.pre.join("."))?;
    }
    if !self.build.is_empty() {
      write!(f, "+{}", self.build.join("."))?;
    }
    Ok(())
  }
}

// build metadata never takes part in equality or ordering
impl PartialEq for Version {
  fn eq(&self, other: &Self) -> bool {
    self.cmp(other) == Ordering::Equal
  }
}

impl Eq for Version {}

impl std::cmp::PartialOrd for Version {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl std::cmp::Ord for Version {
  fn cmp(&self, other: &Self) -> Ordering {
    self
      .major
      .cmp(&other.major)
      .then_with(|| self.minor.cmp(&other.minor))
      .then_with(|| self.patch.cmp(&other.patch))
      .then_with(|| compare_pre_release(&self.pre, &other.pre))
  }
}

/// Orders two pre-release identifier lists. An empty list is a release
/// and sorts after any pre-release of the same version.
pub(crate) fn compare_pre_release(a: &[String], b: &[String]) -> Ordering {
  match (a.is_empty(), b.is_empty()) {
    (true, true) => return Ordering::Equal,
    (false, true) => return Ordering::Less,
    (true, false) => return Ordering::Greater,
    (false, false) => {}
  }

  let mut i = 0;
  loop {
    // https://github.com/npm/node-semver/blob/4907647d169948a53156502867ed679268063a9f/internal/identifiers.js
    let a = match a.get(i) {
      Some(a) => a,
      None if b.get(i).is_none() => return Ordering::Equal,
      None => return Ordering::Less,
    };
    let b = match b.get(i) {
      Some(b) => b,
      None => return Ordering::Greater,
    };

    // prefer numbers
    let cmp_result = match (a.parse::<u64>(), b.parse::<u64>()) {
      (Ok(a_num), Ok(b_num)) => a_num.cmp(&b_num),
      (Ok(_), Err(_)) => Ordering::Less,
      (Err(_), Ok(_)) => Ordering::Greater,
      (Err(_), Err(_)) => a.cmp(b),
    };
    if cmp_result != Ordering::Equal {
      return cmp_result;
    }
    i += 1;
  }
}

#[cfg(test)]
mod test {
  use pretty_assertions::assert_eq;

  use super::*;

  macro_rules! assert_cmp {
    ($a:expr, $b:expr, $expected:expr) => {
      assert_eq!(
        $a.cmp(&$b),
        $expected,
        "expected {} to be {:?} {}",
        $a,
        $expected,
        $b
      );
    };
  }

  macro_rules! test_compare {
    ($a:expr, $b:expr, $expected:expr) => {
      let a = Version::parse($a).unwrap();
      let b = Version::parse($b).unwrap();
      assert_cmp!(a, b, $expected);
    };
  }

  #[test]
  fn serialize_deserialize() {
    // should deserialize and serialize with loose parsing
    let text = "= v 1.2.3-pre.other+build.test";
    let version: Version =
      serde_json::from_str(&format!("\"{text}\"")).unwrap();
    let serialized_version = serde_json::to_string(&version).unwrap();
    assert_eq!(serialized_version, "\"1.2.3-pre.other+build.test\"");
  }

  #[test]
  fn deserialize_invalid() {
    let result = serde_json::from_str::<Version>("\"1.2\"");
    assert!(result.is_err());
  }

  #[test]
  fn version_compare() {
    test_compare!("1.2.3", "2.3.4", Ordering::Less);
    test_compare!("1.2.3", "1.2.4", Ordering::Less);
    test_compare!("1.2.3", "1.2.3", Ordering::Equal);
    test_compare!("1.2.3", "1.2.2", Ordering::Greater);
    test_compare!("1.2.3", "1.1.5", Ordering::Greater);
    test_compare!("1.2.3+build", "1.2.3+other", Ordering::Equal);
  }

  #[test]
  fn version_compare_equal() {
    // https://github.com/npm/node-semver/blob/bce42589d33e1a99454530a8fd52c7178e2b11c1/test/fixtures/equality.js
    let fixtures = &[
      ("1.2.3", "v1.2.3"),
      ("1.2.3", "=1.2.3"),
      ("1.2.3", "v 1.2.3"),
      ("1.2.3", "= 1.2.3"),
      ("1.2.3", " v1.2.3"),
      ("1.2.3", " =1.2.3"),
      ("1.2.3", " = 1.2.3"),
      ("1.2.3-0", "v1.2.3-0"),
      ("1.2.3-0", "= 1.2.3-0"),
      ("1.2.3-beta", " v 1.2.3-beta"),
      ("1.2.3-beta+build", " = 1.2.3-beta+otherbuild"),
      ("1.2.3+build", " = 1.2.3+otherbuild"),
      ("  v1.2.3+build", "1.2.3+otherbuild"),
    ];
    for (a, b) in fixtures {
      test_compare!(a, b, Ordering::Equal);
    }
  }

  #[test]
  fn version_comparisons() {
    // https://github.com/npm/node-semver/blob/bce42589d33e1a99454530a8fd52c7178e2b11c1/test/fixtures/comparisons.js
    let fixtures = &[
      ("0.0.0", "0.0.0-foo"),
      ("0.0.1", "0.0.0"),
      ("1.0.0", "0.9.9"),
      ("0.10.0", "0.9.0"),
      ("0.99.0", "0.10.0"),
      ("2.0.0", "1.2.3"),
      ("v0.0.0", "0.0.0-foo"),
      ("1.2.3", "1.2.3-asdf"),
      ("1.2.3", "1.2.3-4"),
      ("1.2.3", "1.2.3-4-foo"),
      ("1.2.3-5-foo", "1.2.3-5"),
      ("1.2.3-5", "1.2.3-4"),
      ("1.2.3-5-foo", "1.2.3-5-Foo"),
      ("3.0.0", "2.7.2+asdf"),
      ("1.2.3-a.10", "1.2.3-a.5"),
      ("1.2.3-a.b", "1.2.3-a.5"),
      ("1.2.3-a.b", "1.2.3-a"),
      ("1.2.3-a.b.c.10.d.5", "1.2.3-a.b.c.5.d.100"),
      ("1.2.3-r2", "1.2.3-r100"),
      ("1.2.3-r100", "1.2.3-R2"),
    ];
    for (a, b) in fixtures {
      let a = Version::parse(a).unwrap();
      let b = Version::parse(b).unwrap();
      assert_cmp!(a, b, Ordering::Greater);
      assert_cmp!(b, a, Ordering::Less);
      assert_cmp!(a, a, Ordering::Equal);
      assert_cmp!(b, b, Ordering::Equal);
    }
  }

  #[test]
  fn release_strips_pre_and_build() {
    let version = Version::parse("1.2.3-beta.1+build").unwrap();
    assert!(version.is_pre_release());
    let release = version.release();
    assert!(!release.is_pre_release());
    assert_eq!(release.to_string(), "1.2.3");
  }

  #[test]
  fn wildcard_version_req() {
    assert!(WILDCARD_VERSION_REQ.satisfies(&Version::parse("0.0.0").unwrap()));
    assert!(WILDCARD_VERSION_REQ.satisfies(&Version::parse("9.8.7").unwrap()));
    assert!(
      !WILDCARD_VERSION_REQ.satisfies(&Version::parse("1.0.0-pre").unwrap())
    );
  }
}
