//! JSON output of artifact bundles.

use std::io::Write;
use std::path::{Path, PathBuf};

use blossom_map_chart_models::{ChartArtifacts, ChartKind};
use serde::Serialize;

/// The JSON of one chart in a bundle.
pub fn chart_json(
    artifacts: &ChartArtifacts,
    kind: ChartKind,
) -> Result<serde_json::Value, serde_json::Error> {
    match kind {
        ChartKind::Bar => serde_json::to_value(&artifacts.bar),
        ChartKind::Timeline => serde_json::to_value(&artifacts.timeline),
        ChartKind::Diameter => serde_json::to_value(&artifacts.diameter),
        ChartKind::Density => serde_json::to_value(&artifacts.density),
        ChartKind::Map => serde_json::to_value(&artifacts.map),
    }
}

/// Writes `<kind>.json` for every chart into `dir`, creating it if
/// needed. Returns the written paths.
pub fn write_charts(
    dir: &Path,
    artifacts: &ChartArtifacts,
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(ChartKind::all().len());
    for kind in ChartKind::all() {
        let path = dir.join(format!("{kind}.json"));
        let file = std::fs::File::create(&path)?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), &chart_json(artifacts, *kind)?)?;
        log::debug!("Wrote {}", path.display());
        written.push(path);
    }

    Ok(written)
}

/// Prints `value` as JSON on stdout.
pub fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), serde_json::Error> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}

/// Writes `value` as a single line of JSON.
pub fn write_line<T: Serialize>(
    out: &mut impl Write,
    value: &T,
) -> Result<(), Box<dyn std::error::Error>> {
    serde_json::to_writer(&mut *out, value)?;
    out.write_all(b"\n")?;
    Ok(())
}
