use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=TII_VERSION_HINT");

    let hint = env::var("TII_VERSION_HINT").ok();

    if let Some(raw_hint) = hint {
        let trimmed = raw_hint.trim();
        if !trimmed.is_empty() {
            println!("cargo:rustc-env=TII_VERSION_HINT={trimmed}");
        }
    }
}
