use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tradeflow_config::{load_config, Config, ConfigError, CONFIG_ENV_VAR};
use tradeflow_geo::{
    decode_features, format_compact, render_collection, summarize, FlowSummary, RenderSettings,
    RenderedLayers, TradeDataset,
};

/// Loads the configuration file named by `--config`, then
/// `$TRADEFLOW_CONFIG`, then `/etc/tradeflow.conf`.
pub fn load_configuration(path: Option<&Path>) -> Result<Config> {
    let from_env = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
    resolve_configuration(path, from_env.as_deref())
}

/// A file that was asked for explicitly must exist. Only a missing
/// default file falls back to the built-in settings.
fn resolve_configuration(cli: Option<&Path>, env: Option<&Path>) -> Result<Config> {
    if let Some(path) = cli.or(env) {
        return Ok(Config::load(path)?);
    }
    match load_config() {
        Ok(config) => Ok(config),
        Err(ConfigError::ConfigDoesNotExist(path)) => {
            warn!("{path} not found, using default settings");
            Ok(Config::default())
        }
        Err(e) => Err(e.into()),
    }
}

pub fn render(config: &Config, item: &str, year: u16, output: Option<&Path>) -> Result<()> {
    let collection = TradeDataset::from_config(config).load(item, year)?;
    let layers = render_collection(&collection, &RenderSettings::from(config));

    let output_directory = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&config.output_directory));
    let written = write_layers(&output_directory, item, year, &layers)?;

    println!(
        "Rendered {} flows ({} skipped) from {} files",
        layers.arcs.len(),
        layers.skipped,
        collection.metadata.source_files.len()
    );
    for path in written {
        println!("  {}", path.display());
    }
    Ok(())
}

pub fn write_layers(
    directory: &Path,
    item: &str,
    year: u16,
    layers: &RenderedLayers,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(directory)
        .with_context(|| format!("Unable to create {}", directory.display()))?;

    let arcs_path = directory.join(format!("{item}_{year}_arcs.geojson"));
    let labels_path = directory.join(format!("{item}_{year}_labels.geojson"));
    std::fs::write(&arcs_path, serde_json::to_string(&layers.arcs)?)
        .with_context(|| format!("Unable to write {}", arcs_path.display()))?;
    std::fs::write(&labels_path, serde_json::to_string(&layers.labels)?)
        .with_context(|| format!("Unable to write {}", labels_path.display()))?;
    info!("Wrote {} and {}", arcs_path.display(), labels_path.display());

    Ok(vec![arcs_path, labels_path])
}

pub fn summary(config: &Config, item: &str, year: u16) -> Result<()> {
    let collection = TradeDataset::from_config(config).load(item, year)?;
    let decoded = decode_features(&collection.features);
    let summary = summarize(&decoded.records, config.top_n);
    print!("{}", summary_report(item, year, &summary));
    Ok(())
}

pub fn summary_report(item: &str, year: u16, summary: &FlowSummary) -> String {
    let mut report = format!("{item} {year}\n");
    report += &format!(
        "Total trade:   ${}\n",
        format_compact(summary.total_trade_value)
    );
    report += &format!("Trade flows:   {}\n", summary.total_flows);
    report += &format!(
        "Average trade: ${}\n",
        format_compact(summary.average_trade_value)
    );
    report += &format!("Quantity:      {}\n", format_compact(summary.total_quantity));

    let sections = [
        ("Top exporters", &summary.top_exporters),
        ("Top importers", &summary.top_importers),
    ];
    for (title, places) in sections {
        report += &format!("\n{title}\n");
        for (rank, place) in places.iter().enumerate() {
            report += &format!(
                "  #{} {:30} ${:>8} ({} flows)\n",
                rank + 1,
                place.name,
                format_compact(place.value),
                place.flows
            );
        }
    }
    report
}

pub fn check_config(config: &Config) -> Result<()> {
    config
        .validate()
        .map_err(|reason| anyhow::anyhow!("Invalid configuration: {reason}"))?;
    println!("Configuration OK\n");
    println!("{config:#?}");
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use tradeflow_geo::{render_records, FlowRecord, GeoPoint};

    #[test]
    fn explicit_missing_config_is_an_error() {
        let missing = Path::new("/nonexistent/tradeflow.conf");
        assert!(resolve_configuration(Some(missing), None).is_err());
        assert!(resolve_configuration(None, Some(missing)).is_err());
    }

    #[test]
    fn command_line_wins_over_environment() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let raw = "version = \"1.0\"\n\
                   data_directory = \"/srv/flows\"\n\
                   output_directory = \"/srv/out\"\n";
        std::io::Write::write_all(&mut file, raw.as_bytes()).unwrap();
        let missing = Path::new("/nonexistent/tradeflow.conf");
        let config = resolve_configuration(Some(file.path()), Some(missing)).unwrap();
        assert_eq!(config.data_directory, "/srv/flows");
    }

    #[test]
    fn layers_are_written_as_geojson() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![FlowRecord::new(
            "Chile",
            "China",
            GeoPoint::new(-71.5, -35.7),
            GeoPoint::new(103.9, 36.6),
            9.0e9,
        )];
        let layers = render_records(&records, Some("copper"), &RenderSettings::default());
        let written = write_layers(dir.path(), "copper", 2023, &layers).unwrap();
        assert_eq!(written.len(), 2);
        assert!(written[0].ends_with("copper_2023_arcs.geojson"));

        let arcs: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&written[0]).unwrap()).unwrap();
        assert_eq!(arcs["type"], "FeatureCollection");
        assert_eq!(arcs["features"][0]["geometry"]["type"], "LineString");
        assert_eq!(arcs["features"][0]["properties"]["flow_key"], "Chile-China");

        let labels: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&written[1]).unwrap()).unwrap();
        assert_eq!(labels["features"][0]["properties"]["text"], "Chile → China");
    }

    #[test]
    fn report_lists_rankings() {
        let flow = |origin: &str, value: f64| {
            FlowRecord::new(
                origin,
                "China",
                GeoPoint::new(0.0, 0.0),
                GeoPoint::new(1.0, 1.0),
                value,
            )
        };
        let records = vec![flow("Chile", 2.5e6), flow("Peru", 1.0e6)];
        let report = summary_report("copper", 2023, &summarize(&records, 3));
        assert!(report.starts_with("copper 2023\n"));
        assert!(report.contains("Total trade:   $3.5M"));
        assert!(report.contains("#1 Chile"));
        assert!(report.contains("#2 Peru"));
    }
}
