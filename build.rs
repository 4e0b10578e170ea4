//! Build script for FitTrack
//!
//! Embeds a build number and compile timestamp. CI can pin the build number
//! with `FITTRACK_BUILD_NUMBER`; local builds bump a counter file instead.

use std::fs;
use std::path::Path;

const COUNTER_FILE: &str = "build_number.txt";

fn next_build_number(path: &Path) -> u64 {
    let current = fs::read_to_string(path)
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .unwrap_or(0);
    let next = current + 1;

    if let Err(e) = fs::write(path, next.to_string()) {
        println!("cargo:warning=Could not persist build number: {}", e);
    }
    next
}

fn main() {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-env-changed=FITTRACK_BUILD_NUMBER");

    let build_number = match std::env::var("FITTRACK_BUILD_NUMBER") {
        Ok(pinned) => pinned.trim().parse().unwrap_or(0),
        Err(_) => next_build_number(Path::new(COUNTER_FILE)),
    };

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();

    println!("cargo:rustc-env=FITTRACK_BUILD_NUMBER={}", build_number);
    println!("cargo:rustc-env=FITTRACK_BUILD_TIMESTAMP={}", timestamp);
}
