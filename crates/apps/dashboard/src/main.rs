//! Command-line entry point: loads a dataset package, applies the requested
//! selection, and writes the rendered dashboard as an SVG document.

mod controller;

use std::env;
use std::fs;
use std::path::PathBuf;

use controller::{DashboardCommand, DashboardController};
use formats::package::DataPackage;
use model::AreaRequest;

fn main() {
    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        return Err(usage());
    }

    let package_dir = PathBuf::from(&args[0]);
    let mut region: Option<String> = None;
    let mut country: Option<String> = None;
    let mut comparisons: Vec<String> = Vec::new();
    let mut indicator: Option<String> = None;
    let mut years: Option<(i32, i32)> = None;
    let mut out_path = PathBuf::from("dashboard.svg");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--region" => region = Some(take_value(&args, &mut i)?),
            "--country" => country = Some(take_value(&args, &mut i)?),
            "--compare" => comparisons.push(take_value(&args, &mut i)?),
            "--indicator" => indicator = Some(take_value(&args, &mut i)?),
            "--years" => years = Some(parse_years(&take_value(&args, &mut i)?)?),
            "--out" => out_path = PathBuf::from(take_value(&args, &mut i)?),
            s => return Err(format!("unknown arg: {s}\n\n{}", usage())),
        }
        i += 1;
    }

    let package =
        DataPackage::load(&package_dir).map_err(|e| format!("load {package_dir:?}: {e}"))?;
    let mut dashboard = DashboardController::new(package);

    if region.is_some() || country.is_some() {
        dashboard.submit(DashboardCommand::SetArea(AreaRequest { region, country }));
    }
    if let Some(code) = indicator {
        dashboard.submit(DashboardCommand::SetIndicator(code));
    }
    if let Some((min_year, max_year)) = years {
        dashboard.submit(DashboardCommand::SetInterval {
            min_year: Some(min_year),
            max_year: Some(max_year),
        });
    }
    for name in comparisons {
        dashboard.submit(DashboardCommand::AddComparison(name));
    }

    fs::write(&out_path, dashboard.svg()).map_err(|e| format!("write {out_path:?}: {e}"))?;

    println!("wrote {}", out_path.display());
    println!(
        "selected areas: {}",
        dashboard.selection().all_selected_areas().join(", ")
    );
    for (name, value) in dashboard.metrics().snapshot().gauges {
        println!("{name}: {value}");
    }
    for event in dashboard.drain_events() {
        println!("event [cycle {}]: {}", event.cycle_index, event.notice.kind());
    }

    Ok(())
}

fn take_value(args: &[String], i: &mut usize) -> Result<String, String> {
    let flag = args[*i].clone();
    *i += 1;
    args.get(*i)
        .cloned()
        .ok_or_else(|| format!("{flag} requires a value"))
}

fn parse_years(raw: &str) -> Result<(i32, i32), String> {
    let (min, max) = raw
        .split_once(':')
        .ok_or_else(|| format!("--years expects MIN:MAX, got {raw}"))?;
    let min = min
        .parse::<i32>()
        .map_err(|e| format!("bad min year {min}: {e}"))?;
    let max = max
        .parse::<i32>()
        .map_err(|e| format!("bad max year {max}: {e}"))?;
    Ok((min, max))
}

fn usage() -> String {
    "usage: dashboard <package_dir> [--region NAME] [--country NAME] [--compare NAME]... \
     [--indicator CODE] [--years MIN:MAX] [--out FILE]"
        .to_string()
}
