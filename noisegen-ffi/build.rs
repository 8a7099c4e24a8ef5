// Generates `noisegen.h` with `cbindgen` when the binary is on PATH;
// otherwise the checked-in `include/noisegen.h` is copied to $OUT_DIR.
//
// Consumers can include the header from either
//   - <repo>/noisegen-ffi/include/noisegen.h   (checked-in)
//   - $OUT_DIR/noisegen.h

use std::{env, fs, path::PathBuf, process::Command};

const HEADER: &str = "noisegen.h";

fn main() {
    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=include/{HEADER}");

    let crate_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by cargo"));
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    let header_repo = crate_dir.join("include").join(HEADER);
    let header_out = out_dir.join(HEADER);

    let cbindgen_ok = Command::new("cbindgen")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false);

    if cbindgen_ok {
        let generated = Command::new("cbindgen")
            .args(["--crate", "noisegen-ffi", "--lang", "C", "--output"])
            .arg(&header_out)
            .current_dir(&crate_dir)
            .status()
            .map(|s| s.success())
            .unwrap_or(false);

        if generated {
            println!("cargo:warning=noisegen-ffi: generated header with cbindgen -> {}", header_out.display());
            return;
        }
        println!("cargo:warning=noisegen-ffi: cbindgen failed; using checked-in header");
    }

    if header_repo.exists() {
        fs::copy(&header_repo, &header_out).expect("failed to copy include/noisegen.h to OUT_DIR");
    } else {
        fs::write(&header_out, b"/* noisegen.h missing: install cbindgen or keep include/noisegen.h */\n")
            .expect("failed to write placeholder header");
    }
}
