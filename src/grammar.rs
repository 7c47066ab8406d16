// Copyright 2024 the npm_version authors. All rights reserved. MIT license.

//! Grammar for npm constraint segments.
//!
//! ```text
//! segment    ::= ( ws* comparator ws* ','? )* ws*
//! comparator ::= operator ws* version
//! operator   ::= '>=' | '=>' | '<=' | '=<' | '==' | '>' | '<' | '=' | '~' | '^' | ''
//! version    ::= 'v'? xr ( '.' xr ( '.' xr )? )? ( '-' parts )? ( '+' parts )?
//! xr         ::= 'x' | 'X' | '*' | ['0'-'9']+
//! parts      ::= part ( '.' part ) *
//! part       ::= [-0-9A-Za-z]+
//! ```
//!
//! The recognizers here only check shape and hand back slices of the input.
//! Field extraction happens in `parse_partial`: `xr` #1 is the major, #2 the
//! minor, #3 the patch (absent ones become wildcards), the `-` parts are the
//! pre-release and the `+` parts are build metadata, which is dropped.

use monch::*;

use crate::Partial;
use crate::PreRelease;
use crate::Version;
use crate::VersionParseError;
use crate::XRange;

/// Operator vocabulary, longest spellings first so that a prefix never
/// shadows a longer operator. The empty operator is implied.
pub const OPERATORS: [&str; 10] =
  [">=", "=>", "<=", "=<", "==", ">", "<", "=", "~", "^"];

pub fn operator(input: &str) -> ParseResult<&str> {
  for op in OPERATORS {
    if let Some(rest) = input.strip_prefix(op) {
      return Ok((rest, &input[..op.len()]));
    }
  }
  Ok((input, ""))
}

/// Checks that a whole `||` segment is a list of comparators.
pub fn is_valid_segment(segment: &str) -> bool {
  with_failure_handling(segment_tokens)(segment).is_ok()
}

/// Extracts the comparator tokens of an already validated segment. A segment
/// without any comparator yields its trimmed text as the single token.
pub fn tokenize_segment(segment: &str) -> Vec<&str> {
  match segment_tokens(segment) {
    Ok((_, tokens)) if !tokens.is_empty() => tokens,
    _ => vec![segment.trim()],
  }
}

// segment ::= ( ws* comparator ws* ','? )* ws*
fn segment_tokens(input: &str) -> ParseResult<Vec<&str>> {
  let mut tokens = Vec::new();
  let (mut input, _) = skip_whitespace(input)?;
  loop {
    match comparator_text(input) {
      Ok((rest, token)) => {
        tokens.push(token);
        let (rest, _) = skip_whitespace(rest)?;
        let (rest, _) = maybe(ch(','))(rest)?;
        let (rest, _) = skip_whitespace(rest)?;
        input = rest;
      }
      Err(ParseError::Backtrace) => break,
      Err(err) => return Err(err),
    }
  }
  Ok((input, tokens))
}

fn comparator_text(input: &str) -> ParseResult<&str> {
  substring(comparator_shape)(input)
}

// comparator ::= operator ws* version
fn comparator_shape(input: &str) -> ParseResult<()> {
  let (input, _) = operator(input)?;
  let (input, _) = skip_whitespace(input)?;
  version_shape(input)
}

/// Splits a comparator token into its operator and version text.
pub fn split_comparator(token: &str) -> Option<(&str, &str)> {
  fn parse(input: &str) -> ParseResult<(&str, &str)> {
    let (input, op) = operator(input)?;
    let (input, _) = skip_whitespace(input)?;
    let (input, version) = substring(version_shape)(input)?;
    Ok((input, (op, version)))
  }

  match parse(token) {
    Ok(("", result)) => Some(result),
    _ => None,
  }
}

// version ::= 'v'? xr ( '.' xr ( '.' xr )? )? ( '-' parts )? ( '+' parts )?
fn version_shape(input: &str) -> ParseResult<()> {
  let (input, _) = maybe(ch('v'))(input)?;
  let (input, _) = xr_text(input)?;
  let (input, maybe_minor) = maybe(preceded(ch('.'), xr_text))(input)?;
  let (input, _) = if maybe_minor.is_some() {
    maybe(preceded(ch('.'), xr_text))(input)?
  } else {
    (input, None)
  };
  let (input, _) = maybe(preceded(ch('-'), parts))(input)?;
  let (input, _) = maybe(preceded(ch('+'), parts))(input)?;
  Ok((input, ()))
}

fn xr_text(input: &str) -> ParseResult<&str> {
  if_true(
    take_while(|c| c.is_ascii_digit() || matches!(c, 'x' | 'X' | '*')),
    |text| {
      matches!(*text, "x" | "X" | "*")
        || (!text.is_empty() && text.chars().all(|c| c.is_ascii_digit()))
    },
  )(input)
}

/// Parses the version part of a comparator into a bound. Missing components
/// are wildcards and a missing pre-release means "no pre-release".
pub fn parse_partial(text: &str) -> Result<Partial, VersionParseError> {
  with_failure_handling(partial)(text.trim())
    .map_err(|source| VersionParseError { source })
}

fn partial(input: &str) -> ParseResult<Partial> {
  let (input, _) = maybe(ch('v'))(input)?; // skip leading v
  let (input, major) = xr(input)?;
  let (input, maybe_minor) = maybe(preceded(ch('.'), xr))(input)?;
  let (input, maybe_patch) = if maybe_minor.is_some() {
    maybe(preceded(ch('.'), xr))(input)?
  } else {
    (input, None)
  };
  let (input, pre) = maybe(preceded(ch('-'), parts))(input)?;
  let (input, _build) = maybe(preceded(ch('+'), parts))(input)?;
  Ok((
    input,
    Partial {
      major,
      minor: maybe_minor.unwrap_or(XRange::Wildcard),
      patch: maybe_patch.unwrap_or(XRange::Wildcard),
      pre: PreRelease::Parts(pre.map(to_owned_parts).unwrap_or_default()),
    },
  ))
}

// xr ::= 'x' | 'X' | '*' | nr
fn xr(input: &str) -> ParseResult<XRange> {
  or(
    map(or3(tag("x"), tag("X"), tag("*")), |_| XRange::Wildcard),
    map(nr, XRange::Val),
  )(input)
}

pub fn parse_version(text: &str) -> Result<Version, VersionParseError> {
  with_failure_handling(version)(text.trim())
    .map_err(|source| VersionParseError { source })
}

fn version(input: &str) -> ParseResult<Version> {
  let (input, _) = maybe(ch('='))(input)?; // skip leading =
  let (input, _) = skip_whitespace(input)?;
  let (input, _) = maybe(ch('v'))(input)?; // skip leading v
  let (input, _) = skip_whitespace(input)?;
  let (input, major) = nr(input)?;
  let (input, _) = ch('.')(input)?;
  let (input, minor) = nr(input)?;
  let (input, _) = ch('.')(input)?;
  let (input, patch) = nr(input)?;
  // the pre-release dash is optional for loose parsing
  let (input, pre) = maybe(preceded(maybe(ch('-')), parts))(input)?;
  let (input, build) = maybe(preceded(ch('+'), parts))(input)?;

  Ok((
    input,
    Version {
      major,
      minor,
      patch,
      pre: pre.map(to_owned_parts).unwrap_or_default(),
      build: build.map(to_owned_parts).unwrap_or_default(),
    },
  ))
}

// nr ::= ['0'-'9']+
fn nr(input: &str) -> ParseResult<u64> {
  // we do loose parsing to support people doing stuff like 01.02.03
  let (input, result) =
    if_not_empty(substring(skip_while(|c| c.is_ascii_digit())))(input)?;
  let val = match result.parse::<u64>() {
    Ok(val) => val,
    Err(err) => {
      return ParseError::fail(
        input,
        format!("Error parsing '{result}' to u64.\n\n{err:#}"),
      )
    }
  };
  Ok((input, val))
}

// parts ::= part ( '.' part ) *
fn parts(input: &str) -> ParseResult<Vec<&str>> {
  let (mut input, first) = part(input)?;
  let mut parts = vec![first];
  // a trailing dot is left in the input for the caller to reject
  while let Some(rest) = input.strip_prefix('.') {
    match part(rest) {
      Ok((rest, text)) => {
        parts.push(text);
        input = rest;
      }
      Err(_) => break,
    }
  }
  Ok((input, parts))
}

// part ::= [-0-9A-Za-z]+
fn part(input: &str) -> ParseResult<&str> {
  if_true(
    take_while(|c| c.is_ascii_alphanumeric() || c == '-'),
    |result| !result.is_empty(),
  )(input)
}

fn to_owned_parts(parts: Vec<&str>) -> Vec<String> {
  parts.into_iter().map(ToOwned::to_owned).collect()
}

#[cfg(test)]
mod test {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn operator_longest_match() {
    assert_eq!(operator(">=1").unwrap(), ("1", ">="));
    assert_eq!(operator("=>1").unwrap(), ("1", "=>"));
    assert_eq!(operator("=<1").unwrap(), ("1", "=<"));
    assert_eq!(operator("==1").unwrap(), ("1", "=="));
    assert_eq!(operator(">1").unwrap(), ("1", ">"));
    assert_eq!(operator("~1").unwrap(), ("1", "~"));
    assert_eq!(operator("^1").unwrap(), ("1", "^"));
    assert_eq!(operator("1.2.3").unwrap(), ("1.2.3", ""));
  }

  #[test]
  fn valid_segments() {
    for segment in [
      "",
      "   ",
      "1.2.3",
      " ^1.2.3 ",
      ">=1.0.0 <2.0.0",
      ">=1.0.0, <2.0.0",
      ">=1.0.0<2.0.0",
      ">= 1.0.0",
      "1.2.3,",
      "v1.2.3",
      "1.x",
      "1.2.X",
      "*",
      "x.x.x",
      "1-alpha",
      "1.2.3-alpha.1+build.5",
      "~1.2.3-beta-2",
      "=<1.0.0 => 0.5.0",
    ] {
      assert!(is_valid_segment(segment), "expected valid: {segment:?}");
    }
  }

  #[test]
  fn invalid_segments() {
    for segment in [
      "1.2.3 & 2.0.0",
      "<>1.0.0",
      "~>1.0.0",
      ",1.2.3",
      "1.2.3,,2.0.0",
      "1.2.3 - 2.0.0",
      "1x",
      "1.2.3-",
      "1.2.3-alpha.",
      "1.2.3.4",
      "latest",
      "|",
    ] {
      assert!(!is_valid_segment(segment), "expected invalid: {segment:?}");
    }
  }

  #[test]
  fn tokenize() {
    assert_eq!(
      tokenize_segment(" >=1.0.0 <2.0.0 "),
      vec![">=1.0.0", "<2.0.0"]
    );
    assert_eq!(
      tokenize_segment(">= 1.0.0,< 2.0.0"),
      vec![">= 1.0.0", "< 2.0.0"]
    );
    assert_eq!(tokenize_segment(">=1.0.0<2.0.0"), vec![">=1.0.0", "<2.0.0"]);
    assert_eq!(tokenize_segment("   "), vec![""]);
    assert_eq!(tokenize_segment(""), vec![""]);
  }

  #[test]
  fn split_comparator_token() {
    assert_eq!(split_comparator(">= 1.2.3"), Some((">=", "1.2.3")));
    assert_eq!(split_comparator("v1.2"), Some(("", "v1.2")));
    assert_eq!(split_comparator("^1.2.3-pre+b"), Some(("^", "1.2.3-pre+b")));
    assert_eq!(split_comparator("1.2.3 extra"), None);
    assert_eq!(split_comparator("<>1"), None);
  }

  #[test]
  fn partial_fields() {
    let partial = parse_partial("v1.2.3-beta.1+build").unwrap();
    assert_eq!(partial.major, XRange::Val(1));
    assert_eq!(partial.minor, XRange::Val(2));
    assert_eq!(partial.patch, XRange::Val(3));
    assert_eq!(
      partial.pre,
      PreRelease::Parts(vec!["beta".to_string(), "1".to_string()])
    );

    let partial = parse_partial("1.x").unwrap();
    assert_eq!(partial.major, XRange::Val(1));
    assert_eq!(partial.minor, XRange::Wildcard);
    assert_eq!(partial.patch, XRange::Wildcard);
    assert_eq!(partial.pre, PreRelease::Parts(Vec::new()));

    let partial = parse_partial("*-alpha").unwrap();
    assert_eq!(partial.major, XRange::Wildcard);
    assert_eq!(partial.pre, PreRelease::Parts(vec!["alpha".to_string()]));
  }

  #[test]
  fn partial_overflow() {
    let err = parse_partial("99999999999999999999.0.0").unwrap_err();
    assert!(err.to_string().starts_with("Invalid npm version."));
  }

  #[test]
  fn version_parse_errors() {
    assert!(parse_version("1.2").is_err());
    assert!(parse_version("1.2.x").is_err());
    assert!(parse_version("a.b.c").is_err());
    assert!(parse_version("1.2.3 4").is_err());
  }

  #[test]
  fn version_loose() {
    let version = parse_version("1.2.3beta").unwrap();
    assert_eq!(version.pre, vec!["beta".to_string()]);
    let version = parse_version(" = v 01.02.03 ").unwrap();
    assert_eq!(version.to_string(), "1.2.3");
  }
}
