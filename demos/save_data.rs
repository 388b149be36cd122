//! Saving and loading a document in both encodings.
//!
//! Run with: RUST_LOG=ubo=debug cargo run --example save_data

use std::error::Error;

use tracing_subscriber::EnvFilter;
use ubo::{
    data, from_text, read_file, read_file_compressed, to_text_pretty, write_file,
    write_file_compressed, DataList, DataType, DataValue,
};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut doc = data!({
        "name": "world",
        "seed": 1234567890123i64,
        "spawn": [0, 64, 0],
        "rules": { "pvp": true, "difficulty": 2i8 }
    });

    // Typed accessors on the root map
    if let Some(map) = doc.as_map_mut() {
        map.put_list("players", DataList::new(DataType::Uuid));
        map.put_int_array("heights", vec![62, 63, 64, 64, 65]);
        println!("seed: {}", map.get_long("seed", 0));
    }

    println!("As USO:\n{}\n", to_text_pretty(&doc));

    let dir = std::env::temp_dir().join("ubo-save-data");
    std::fs::create_dir_all(&dir)?;
    let plain = dir.join("world.ubo");
    let packed = dir.join("world.ubo.gz");

    write_file(&plain, &doc)?;
    write_file_compressed(&packed, &doc)?;
    println!(
        "binary: {} bytes, compressed: {} bytes",
        std::fs::metadata(&plain)?.len(),
        std::fs::metadata(&packed)?.len()
    );

    let loaded = read_file(&plain, Some(DataType::Map))?;
    assert_eq!(loaded, doc);
    assert_eq!(read_file_compressed(&packed, None)?, doc);

    // Asking for the wrong root type fails before the payload is read
    if let Err(err) = read_file(&plain, Some(DataType::List)) {
        println!("expected failure: {}", err);
    }

    let edited: DataValue = from_text(r#"{"name": "copy", "seed": 1L}"#)?;
    println!("parsed: {}", edited);

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}
