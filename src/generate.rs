use std::error::Error;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use padnav::config::{Bindings, Preferences};
use schemars::schema_for;

const SCHEMA_DIR: &str = "./rootfs/usr/share/padnav/schema";

fn main() -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(SCHEMA_DIR)?;

    let bindings_schema = schema_for!(Bindings);
    write_schema("bindings.json", &bindings_schema)?;

    let preferences_schema = schema_for!(Preferences);
    write_schema("preferences.json", &preferences_schema)?;

    Ok(())
}

fn write_schema(name: &str, schema: &schemars::schema::RootSchema) -> Result<(), Box<dyn Error>> {
    let path = Path::new(SCHEMA_DIR).join(name);
    let mut file = File::create(&path)?;
    write!(file, "{}", serde_json::to_string_pretty(schema)?)?;
    println!("Wrote {}", path.display());
    Ok(())
}
