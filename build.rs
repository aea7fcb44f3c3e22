use std::{env, fs, path::PathBuf};

use cfg_aliases::cfg_aliases;

fn main() {
    cfg_aliases! {
        // Bare-metal Cortex-M build: `wfi`, SCB access and cycle delays are only real here.
        cortex_m_target: { all(target_arch = "arm", target_os = "none") },
    }

    // Put `memory.x` where the `cortex-m-rt` linker script can find it.
    let out = PathBuf::from(env::var_os("OUT_DIR").unwrap());
    fs::copy("memory.x", out.join("memory.x")).unwrap();
    println!("cargo:rustc-link-search={}", out.display());
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}
