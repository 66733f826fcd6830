use std::env;
use std::fs;
use std::path::PathBuf;

use formats::manifest::{PackageManifest, PartEntry, PartKind};
use formats::package::{DataPackage, MANIFEST_FILE_NAME};

fn main() {
    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let mut args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(usage());
    }

    let cmd = args[1].clone();
    args.drain(0..2);

    match cmd.as_str() {
        "pack" => cmd_pack(args),
        "verify" => cmd_verify(args),
        _ => Err(usage()),
    }
}

/// atlas-pack pack <out_dir> --observations FILE --boundaries FILE
///     [--indicators FILE] [--name NAME] [--id ID]
///
/// Copies each part into the package directory and writes a manifest with
/// blake3 content hashes stamped in.
fn cmd_pack(args: Vec<String>) -> Result<(), String> {
    if args.is_empty() {
        return Err(usage());
    }

    let out_dir = PathBuf::from(&args[0]);
    let mut observations: Option<PathBuf> = None;
    let mut boundaries: Option<PathBuf> = None;
    let mut indicators: Option<PathBuf> = None;
    let mut name: Option<String> = None;
    let mut package_id = "data-package".to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--observations" => observations = Some(PathBuf::from(take_value(&args, &mut i)?)),
            "--boundaries" => boundaries = Some(PathBuf::from(take_value(&args, &mut i)?)),
            "--indicators" => indicators = Some(PathBuf::from(take_value(&args, &mut i)?)),
            "--name" => name = Some(take_value(&args, &mut i)?),
            "--id" => package_id = take_value(&args, &mut i)?,
            s => return Err(format!("unknown arg: {s}\n\n{}", usage())),
        }
        i += 1;
    }

    let observations = observations.ok_or("pack requires --observations")?;
    let boundaries = boundaries.ok_or("pack requires --boundaries")?;

    fs::create_dir_all(&out_dir).map_err(|e| format!("create {out_dir:?}: {e}"))?;

    let mut manifest = PackageManifest::new(package_id);
    manifest.name = name;

    let mut parts = vec![
        (PartKind::Observations, observations, "observations.json"),
        (PartKind::Boundaries, boundaries, "boundaries.json"),
    ];
    if let Some(indicators) = indicators {
        parts.push((PartKind::Indicators, indicators, "indicators.json"));
    }

    for (kind, source, file_name) in parts {
        let payload = fs::read_to_string(&source).map_err(|e| format!("read {source:?}: {e}"))?;
        let hash = blake3::hash(payload.as_bytes()).to_hex().to_string();
        fs::write(out_dir.join(file_name), &payload)
            .map_err(|e| format!("write {file_name}: {e}"))?;
        manifest.parts.push(PartEntry {
            kind,
            path: file_name.to_string(),
            content_hash: Some(hash),
        });
    }

    let payload =
        serde_json::to_string_pretty(&manifest).map_err(|e| format!("serialize manifest: {e}"))?;
    fs::write(out_dir.join(MANIFEST_FILE_NAME), payload)
        .map_err(|e| format!("write manifest: {e}"))?;

    println!("packed {} parts into {}", manifest.parts.len(), out_dir.display());
    Ok(())
}

/// atlas-pack verify <package_dir>
fn cmd_verify(args: Vec<String>) -> Result<(), String> {
    if args.len() != 1 {
        return Err(usage());
    }

    let root = PathBuf::from(&args[0]);
    let package = DataPackage::load(&root).map_err(|e| format!("verify {root:?}: {e}"))?;
    println!(
        "ok: {} observations, {} boundary features, {} indicators",
        package.table.rows.len(),
        package.atlas.len(),
        package.catalogue.entries.len(),
    );
    Ok(())
}

fn take_value(args: &[String], i: &mut usize) -> Result<String, String> {
    let flag = args[*i].clone();
    *i += 1;
    args.get(*i)
        .cloned()
        .ok_or_else(|| format!("{flag} requires a value"))
}

fn usage() -> String {
    "usage:\n  atlas-pack pack <out_dir> --observations FILE --boundaries FILE \
     [--indicators FILE] [--name NAME] [--id ID]\n  atlas-pack verify <package_dir>"
        .to_string()
}
