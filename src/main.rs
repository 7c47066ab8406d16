// Copyright 2024 the npm_version authors. All rights reserved. MIT license.

use std::cmp::Ordering;
use std::process::exit;

use clap::Parser;
use clap::Subcommand;
use npm_version::RangeOptions;
use npm_version::Version;
use npm_version::VersionReq;

macro_rules! exit_with {
  ($($tt:tt)*) => {{
    eprintln!($($tt)*);
    exit(1)
  }};
}

/// Compare npm versions and check them against version ranges.
#[derive(Parser)]
#[command(name = "npm-version", version)]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Compare two versions, printing -1, 0 or 1
  #[command(alias = "c")]
  Compare { first: String, second: String },
  /// Check if the version satisfies the constraint
  #[command(alias = "s")]
  Satisfy {
    version: String,
    constraint: String,
    /// Let pre-release versions match non pre-release comparators
    #[arg(long)]
    include_pre_release: bool,
  },
}

impl Command {
  fn run(self) -> String {
    match self {
      Command::Compare { first, second } => {
        let first = parse_version(&first);
        let second = parse_version(&second);
        ordering_number(first.compare(&second)).to_string()
      }
      Command::Satisfy {
        version,
        constraint,
        include_pre_release,
      } => {
        let version = parse_version(&version);
        let options = RangeOptions {
          include_pre_release,
        };
        let req = VersionReq::parse_with_options(&constraint, options)
          .unwrap_or_else(|err| {
            exit_with!("failed to parse npm constraint ({constraint}): {err}")
          });
        log::debug!("checking {version} against {req}");
        req.satisfies(&version).to_string()
      }
    }
  }
}

fn parse_version(text: &str) -> Version {
  Version::parse(text).unwrap_or_else(|err| {
    exit_with!("failed to parse npm version ({text}): {err}")
  })
}

fn ordering_number(ordering: Ordering) -> i8 {
  match ordering {
    Ordering::Less => -1,
    Ordering::Equal => 0,
    Ordering::Greater => 1,
  }
}

fn main() {
  env_logger::Builder::from_env(
    env_logger::Env::default().default_filter_or("warn"),
  )
  .init();
  println!("{}", Cli::parse().command.run());
}
