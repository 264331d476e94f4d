//! Synthesize a shell, write it out, load it back and scan it

use std::fs::{self, File};

use chrono::{Duration, TimeZone, Utc};

use constellation_tool::{commands, loader, ToolConfig};
use orbital_mechanics::GeodeticPosition;
use visibility_scanner::report::{write_aggregate_csv, write_detail_csv};
use visibility_scanner::TimeGrid;

#[test]
fn test_synthesize_scan_summarize() {
    let dir = tempfile::tempdir().unwrap();
    let epoch = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

    let mut config = ToolConfig::default();
    config.constellation.prefix = "GPS".to_string();
    let shell = commands::synthesize(&config, 24, 20_200.0, 55.0, epoch).unwrap();
    let tle_path = dir.path().join("GPS.txt");
    fs::write(&tle_path, shell.to_tle_text()).unwrap();

    config.constellation.prefix = "RELAY".to_string();
    config.constellation.base_catalog_number = 30001;
    let relay = commands::synthesize(&config, 1, 10_500.0, 45.0, epoch).unwrap();
    let relay_path = dir.path().join("relay.txt");
    fs::write(&relay_path, relay.to_tle_text()).unwrap();

    let catalog = loader::load_catalog(&tle_path).unwrap();
    assert_eq!(catalog.len(), 24);
    assert_eq!(catalog[23].name, "GPS-24");
    let relays = loader::load_catalog(&relay_path).unwrap();
    let relay = loader::select_entry(&relays, Some("RELAY-1")).unwrap();

    let grid = TimeGrid::new(epoch, Duration::minutes(20), 9).unwrap();

    let ground = commands::scan(
        &config,
        &catalog,
        GeodeticPosition::on_surface(32.08, 34.78).unwrap(),
        &grid,
    )
    .unwrap();
    let aggregate_path = dir.path().join("visibleSats.csv");
    write_aggregate_csv(File::create(&aggregate_path).unwrap(), &ground.records).unwrap();
    assert_eq!(fs::read_to_string(&aggregate_path).unwrap().lines().count(), 10);

    let detail = commands::relay(&config, &catalog, &relay, &grid).unwrap();
    let detail_path = dir.path().join("visibleSatsForSat.csv");
    write_detail_csv(File::create(&detail_path).unwrap(), &detail.records).unwrap();

    let counts = commands::summary(File::open(&detail_path).unwrap()).unwrap();
    let total: usize = counts.iter().map(|(_, n)| n).sum();
    assert_eq!(total, detail.records.len());
    assert!(counts.windows(2).all(|w| w[0].0 < w[1].0));
}
