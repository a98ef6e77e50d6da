// build.rs

fn main() {
    // Link against Xlib. pkg-config is the normal route; when it is missing or
    // cannot find x11.pc we fall back to plain linker flags.
    match pkg_config::probe_library("x11") {
        Ok(_) => {
            eprintln!("pkg-config found x11. Linking configured automatically.");
        }
        Err(e) => {
            eprintln!(
                "pkg-config failed for library 'x11' ({}). Falling back to manual linking.",
                e
            );
            println!("cargo:rustc-link-lib=X11");
            // Standard library path on most distributions. LIBRARY_PATH covers the rest.
            println!("cargo:rustc-link-search=/usr/lib");
            eprintln!(
                "Manual linking flags applied. Ensure the X11 development library is installed."
            );
        }
    }
}
