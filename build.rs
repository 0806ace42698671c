use entities::ENTITIES;
use std::io::Write;
use std::{env, path::PathBuf};

fn main() {
    let out_dir: PathBuf = env::var("OUT_DIR").unwrap().parse().unwrap();

    // entity::lookup is handed just the inner entity name, like "amp" for
    // "&amp;"; attribute values only decode references with a trailing ";".
    //
    // entities::ENTITIES includes many both with and without a trailing ";".
    // Keep only those with one, and key the map by the bare name.
    let mut map = phf_codegen::Map::new();
    let mut longest = 0;
    for e in ENTITIES
        .iter()
        .filter(|e| e.entity.starts_with('&') && e.entity.ends_with(';'))
    {
        let name = &e.entity[1..e.entity.len() - 1];
        longest = longest.max(name.len());
        map.entry(name, &format!("{:?}", e.characters));
    }

    let out = std::fs::File::create(out_dir.join("entitydata.rs")).unwrap();
    let mut bw = std::io::BufWriter::new(out);
    writeln!(bw, "mod entitydata {{").unwrap();
    writeln!(bw, "    pub const MAX_NAME_LENGTH: usize = {};", longest).unwrap();
    writeln!(
        bw,
        "    pub static TRANSLATED_ENTITIES: phf::Map<&'static str, &'static str> = {};",
        map.build()
    )
    .unwrap();
    writeln!(bw, "}}").unwrap();
}
