// Copyright 2024 the npm_version authors. All rights reserved. MIT license.

use capacity_builder::CapacityDisplay;
use capacity_builder::StringAppendable;
use capacity_builder::StringBuilder;
use capacity_builder::StringType;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::grammar;
use crate::Comparator;
use crate::Version;
use crate::VersionParseError;

const LOGICAL_OR: &str = "||";

#[derive(Error, Debug, Clone)]
pub enum RangeParseError {
  #[error("improper constraint: {segment}")]
  MalformedSegment { segment: String },
  /// A token the segment validator accepted but that still doesn't form a
  /// comparator. This points at a grammar bug rather than bad input.
  #[error("improper constraint: {token}")]
  MalformedComparator { token: String },
  #[error(transparent)]
  Version(#[from] VersionParseError),
}

/// Options applied when checking versions against a requirement.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase", default)]
pub struct RangeOptions {
  /// Lets pre-release versions satisfy comparators whose bound is not a
  /// pre-release, comparing them at face value.
  pub include_pre_release: bool,
}

/// Comparators that must all match (an AND group).
#[derive(Debug, Clone, PartialEq, Eq, Hash, CapacityDisplay)]
pub struct ComparatorSet(Vec<Comparator>);

impl ComparatorSet {
  pub fn comparators(&self) -> &[Comparator] {
    &self.0
  }

  pub fn satisfies(&self, version: &Version, options: RangeOptions) -> bool {
    self.0.iter().all(|c| c.matches(version, options))
  }
}

impl<'a> StringAppendable<'a> for &'a ComparatorSet {
  fn append_to_builder<TString: StringType>(
    self,
    builder: &mut StringBuilder<'a, TString>,
  ) {
    for (i, comparator) in self.0.iter().enumerate() {
      if i > 0 {
        builder.append(',');
      }
      builder.append(comparator);
    }
  }
}

/// An npm version requirement: `||` separated alternatives of comparators.
///
/// The display form joins the parsed comparator tokens with `,` and the
/// alternatives with `||`, so it is equivalent to, but not always the same
/// text as, the input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, CapacityDisplay)]
pub struct VersionReq {
  ranges: Vec<ComparatorSet>,
  options: RangeOptions,
}

impl<'a> StringAppendable<'a> for &'a VersionReq {
  fn append_to_builder<TString: StringType>(
    self,
    builder: &mut StringBuilder<'a, TString>,
  ) {
    for (i, range) in self.ranges.iter().enumerate() {
      if i > 0 {
        builder.append(LOGICAL_OR);
      }
      builder.append(range);
    }
  }
}

impl Serialize for VersionReq {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

impl<'de> Deserialize<'de> for VersionReq {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: serde::Deserializer<'de>,
  {
    let text = String::deserialize(deserializer)?;
    VersionReq::parse(&text).map_err(serde::de::Error::custom)
  }
}

impl VersionReq {
  /// A requirement matching every release version.
  pub fn any() -> Self {
    Self {
      ranges: vec![ComparatorSet(vec![Comparator::any()])],
      options: RangeOptions::default(),
    }
  }

  pub fn parse(text: &str) -> Result<Self, RangeParseError> {
    Self::parse_with_options(text, RangeOptions::default())
  }

  pub fn parse_with_options(
    text: &str,
    options: RangeOptions,
  ) -> Result<Self, RangeParseError> {
    let mut ranges = Vec::new();
    for segment in text.split(LOGICAL_OR) {
      if !grammar::is_valid_segment(segment) {
        log::debug!("rejected constraint segment {segment:?} in {text:?}");
        return Err(RangeParseError::MalformedSegment {
          segment: segment.to_string(),
        });
      }

      let comparators = grammar::tokenize_segment(segment)
        .into_iter()
        .map(Comparator::parse)
        .collect::<Result<Vec<_>, _>>()?;
      ranges.push(ComparatorSet(comparators));
    }

    log::trace!("parsed {text:?} into {} alternative(s)", ranges.len());
    Ok(Self { ranges, options })
  }

  pub fn ranges(&self) -> &[ComparatorSet] {
    &self.ranges
  }

  pub fn options(&self) -> RangeOptions {
    self.options
  }

  /// Gets if the version satisfies any of the alternatives.
  pub fn satisfies(&self, version: &Version) -> bool {
    self
      .ranges
      .iter()
      .any(|range| range.satisfies(version, self.options))
  }
}
