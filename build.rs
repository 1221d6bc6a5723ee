fn main() {
    // Stamp the build date so `bambufy --version` output can carry it
    let build_date = chrono::Utc::now().format("%Y-%m-%d").to_string();
    println!("cargo:rustc-env=BUILD_DATE={}", build_date);
}
