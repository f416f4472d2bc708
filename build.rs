use std::fs;

const CATALOG: &str = "catalog/packages.toml";

fn main() {
    println!("cargo:rerun-if-changed={}", CATALOG);

    let catalog_toml = fs::read_to_string(CATALOG).expect("Failed to read catalog/packages.toml");
    let catalog: toml::Value = catalog_toml
        .parse()
        .expect("Failed to parse catalog/packages.toml");

    let packages = catalog
        .get("packages")
        .and_then(|p| p.as_array())
        .expect("catalog/packages.toml has no [[packages]] entries");

    for package in packages {
        let name = package
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or("<unnamed>");
        for field in ["price", "duration"] {
            match package.get(field).and_then(|v| v.as_integer()) {
                Some(value) if value > 0 => {}
                _ => panic!("package {} needs a positive {}", name, field),
            }
        }
    }

    println!("cargo:rustc-env=CATALOG_PACKAGE_COUNT={}", packages.len());
}
