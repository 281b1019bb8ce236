use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-env-changed=FFMPEG_DIR");
    println!("cargo:rerun-if-env-changed=VCPKG_ROOT");
    println!("cargo:rerun-if-env-changed=VCPKGRS_TRIPLET");
    println!("cargo:rerun-if-env-changed=SDL2_LIB_DIR");

    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    let display_enabled = env::var_os("CARGO_FEATURE_DISPLAY").is_some();

    // Extra search path for kiosk images that keep SDL2 outside the default one.
    if let Some(dir) = env::var_os("SDL2_LIB_DIR").filter(|_| display_enabled) {
        println!("cargo:rustc-link-search=native={}", PathBuf::from(dir).display());
    }

    if target_os != "windows" {
        return;
    }

    let vcpkg_root = env::var("VCPKG_ROOT").ok();
    let triplet = env::var("VCPKGRS_TRIPLET").unwrap_or_else(|_| "x64-windows".to_string());
    let installed = vcpkg_root
        .as_ref()
        .map(|root| PathBuf::from(root).join("installed").join(&triplet));

    if env::var_os("FFMPEG_DIR").is_none() {
        match &installed {
            Some(dir) if dir.join("include").join("libavcodec").exists() => println!(
                "cargo:warning=Detected vcpkg FFmpeg at {}. Set FFMPEG_DIR={} so ffmpeg-sys-next finds it.",
                dir.display(),
                dir.display(),
            ),
            Some(dir) => println!(
                "cargo:warning=VCPKG_ROOT is set but no FFmpeg install was found at {}.",
                dir.display(),
            ),
            None => println!(
                "cargo:warning=FFMPEG_DIR is not set. On Windows, install FFmpeg via vcpkg and set VCPKG_ROOT + FFMPEG_DIR."
            ),
        }
    }

    if display_enabled && env::var_os("SDL2_LIB_DIR").is_none() {
        if let Some(lib) = installed.map(|dir| dir.join("lib")).filter(|lib| lib.join("SDL2.lib").exists()) {
            println!("cargo:rustc-link-search=native={}", lib.display());
        } else {
            println!(
                "cargo:warning=The `display` feature needs SDL2. Install it via vcpkg (sdl2) or set SDL2_LIB_DIR, or build with --no-default-features."
            );
        }
    }
}
