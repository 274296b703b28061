use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=LEAFSCAN_VERSION");
    let version = env::var("LEAFSCAN_VERSION")
        .or_else(|_| env::var("CARGO_PKG_VERSION"))
        .unwrap_or_default();
    println!("cargo:rustc-env=LEAFSCAN_VERSION={version}");
}
