const WINDOWS_ICON: &str = "assets/icon.ico";

fn main() {
    println!("cargo:rerun-if-changed={}", WINDOWS_ICON);

    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if target_os != "windows" {
        return;
    }

    if !std::path::Path::new(WINDOWS_ICON).exists() {
        println!(
            "cargo:warning=Icon file not found at {}, skipping resource embedding",
            WINDOWS_ICON
        );
        return;
    }

    let mut res = winres::WindowsResource::new();
    res.set_icon(WINDOWS_ICON);
    if let Err(err) = res.compile() {
        println!("cargo:warning=Failed to embed Windows resources: {}", err);
    }
}
