/// Environment variable the compiler version is exported in, read with `env!` by the crate.
const RUSTC_VERSION_ENV_VAR: &str = "EXCEPTION_MARKDOWN_RUSTC_VERSION";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let version = rustc_version::version()?;
    println!("cargo:rustc-env={}={}", RUSTC_VERSION_ENV_VAR, version);
    println!("cargo:rerun-if-changed=build.rs");
    Ok(())
}
