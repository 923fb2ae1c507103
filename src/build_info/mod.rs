mod build_time {
    include!(concat!(env!("OUT_DIR"), "/build_time.rs"));
}

/// Formatted build info.
/// To get specific info use helpers `build_time`, `version` and `commit`.
#[must_use]
pub fn build_info() -> String {
    format!(
        "dsstore {} (commit: {}, built on: {})",
        version(),
        commit(),
        build_time()
    )
}

/// Returns package version.
#[must_use]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Returns current commit hash.
#[must_use]
pub fn commit() -> &'static str {
    option_env!("DSSTORE_COMMIT_HASH").unwrap_or("hash-undefined")
}

/// Returns build time.
#[must_use]
pub fn build_time() -> &'static str {
    build_time::BUILD_TIME
}

#[test]
fn print_build_info() {
    let info = build_info();
    assert!(info.starts_with("dsstore "));
    println!("{}", info);
}
