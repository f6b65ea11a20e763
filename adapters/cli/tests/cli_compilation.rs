use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "crypt-caster"])
        .status()
        .expect("failed to invoke cargo check for crypt-caster CLI binary");

    assert!(status.success(), "cargo check --bin crypt-caster should succeed");
}
