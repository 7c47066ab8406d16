fn main() {
  // Run registered benchmarks.
  divan::main();
}

mod version {
  use npm_version::Version;

  #[divan::bench]
  fn parse() -> usize {
    Version::parse("v1.1.1-pre.2+build").unwrap().pre.len()
  }

  #[divan::bench]
  fn to_string() -> usize {
    Version::parse("1.1.1-pre").unwrap().to_string().len()
  }
}

mod version_req {
  use npm_version::Version;
  use npm_version::VersionReq;

  const RANGE: &str = ">=1.0.0 <2.0.0 || ^3.1.0-beta.2 || ~4.2 || 5.x";

  #[divan::bench]
  fn parse() -> usize {
    VersionReq::parse(RANGE).unwrap().ranges().len()
  }

  #[divan::bench]
  fn satisfies(bencher: divan::Bencher) {
    let req = VersionReq::parse(RANGE).unwrap();
    let version = Version::parse("4.2.9").unwrap();
    bencher.bench_local(|| req.satisfies(&version));
  }

  #[divan::bench]
  fn to_string() -> usize {
    VersionReq::parse(RANGE).unwrap().to_string().len()
  }
}
