// Copyright 2024 the npm_version authors. All rights reserved. MIT license.

use capacity_builder::CapacityDisplay;
use capacity_builder::StringAppendable;
use capacity_builder::StringBuilder;
use capacity_builder::StringType;

use crate::grammar;
use crate::Partial;
use crate::RangeOptions;
use crate::RangeParseError;
use crate::Version;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
  Equal,
  GreaterThan,
  LessThan,
  GreaterThanOrEqual,
  LessThanOrEqual,
  Tilde,
  Caret,
}

impl Operator {
  /// Maps an operator spelling from the grammar, the empty one included.
  pub fn from_text(text: &str) -> Option<Operator> {
    match text {
      "" | "=" | "==" => Some(Operator::Equal),
      ">" => Some(Operator::GreaterThan),
      "<" => Some(Operator::LessThan),
      ">=" | "=>" => Some(Operator::GreaterThanOrEqual),
      "<=" | "=<" => Some(Operator::LessThanOrEqual),
      "~" => Some(Operator::Tilde),
      "^" => Some(Operator::Caret),
      _ => None,
    }
  }

  /// Runs the operator's own predicate, without the pre-release gate.
  fn matches(
    self,
    version: &Version,
    bound: &Partial,
    options: RangeOptions,
  ) -> bool {
    // a pre-release bound only admits pre-releases of its own release line
    let same_line_only = !options.include_pre_release
      && bound.is_pre_release()
      && version.is_pre_release();
    let same_release = || version.release() == bound.release();

    match self {
      Operator::Equal => version == bound,
      Operator::GreaterThan if same_line_only => {
        same_release() && version > bound
      }
      Operator::GreaterThan => version > bound,
      Operator::LessThan if same_line_only => same_release() && version < bound,
      Operator::LessThan => version < bound,
      Operator::GreaterThanOrEqual if same_line_only => {
        same_release() && version >= bound
      }
      Operator::GreaterThanOrEqual => version >= bound,
      Operator::LessThanOrEqual if same_line_only => {
        same_release() && version <= bound
      }
      Operator::LessThanOrEqual => version <= bound,
      Operator::Tilde | Operator::Caret if same_line_only => {
        version >= bound && *version < bound.release()
      }
      Operator::Tilde => version >= bound && below(version, bound.tilde_bump()),
      Operator::Caret => version >= bound && below(version, bound.caret_bump()),
    }
  }
}

fn below(version: &Version, bump: Option<Version>) -> bool {
  match bump {
    Some(end) => *version < end,
    None => true,
  }
}

/// A single operator applied to a bound version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, CapacityDisplay)]
pub struct Comparator {
  bound: Partial,
  operator: Operator,
  original: String,
}

impl<'a> StringAppendable<'a> for &'a Comparator {
  fn append_to_builder<TString: StringType>(
    self,
    builder: &mut StringBuilder<'a, TString>,
  ) {
    builder.append(self.original.as_str());
  }
}

impl Comparator {
  /// The comparator of an empty segment. It has no original text.
  pub fn any() -> Self {
    Self {
      bound: Partial::ANY,
      operator: Operator::Equal,
      original: String::new(),
    }
  }

  /// Builds a comparator from a single token such as `>= 1.2.3`.
  pub fn parse(token: &str) -> Result<Self, RangeParseError> {
    if token.is_empty() {
      return Ok(Self::any());
    }

    let malformed = || RangeParseError::MalformedComparator {
      token: token.to_string(),
    };
    let (op_text, version_text) =
      grammar::split_comparator(token).ok_or_else(malformed)?;
    let operator = Operator::from_text(op_text).ok_or_else(malformed)?;
    let bound = Partial::parse(version_text)?;

    Ok(Self {
      bound,
      operator,
      original: token.to_string(),
    })
  }

  pub fn bound(&self) -> &Partial {
    &self.bound
  }

  pub fn operator(&self) -> Operator {
    self.operator
  }

  pub fn original(&self) -> &str {
    &self.original
  }

  /// Checks the version against this comparator, gating pre-releases.
  pub fn matches(&self, version: &Version, options: RangeOptions) -> bool {
    if !options.include_pre_release
      && version.is_pre_release()
      && !self.bound.is_pre_release()
    {
      return false;
    }
    // "pre-release of anything" would admit every pre-release
    if self.bound.is_pre_release() && self.bound.is_any() {
      return false;
    }
    self.operator.matches(version, &self.bound, options)
  }
}
