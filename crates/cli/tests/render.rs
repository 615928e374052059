use std::fs;

use clap::Parser;

use choromap_cli::{cli::{Cli, Commands}, commands::render};

const STATES: &str = r#"{"type":"FeatureCollection","features":[
    {"type":"Feature","id":"01","properties":{"name":"Alabama"},
     "geometry":{"type":"Polygon","coordinates":[[[0,0],[10,0],[10,10],[0,10],[0,0]]]}},
    {"type":"Feature","id":"02","properties":{"name":"Alaska"},
     "geometry":{"type":"Polygon","coordinates":[[[20,0],[30,0],[30,10],[20,10],[20,0]]]}}
]}"#;

const COUNTIES: &str = r#"{"type":"FeatureCollection","features":[
    {"type":"Feature","properties":{"GEOID":"01001","name":"Autauga"},
     "geometry":{"type":"Polygon","coordinates":[[[0,0],[5,0],[5,10],[0,10],[0,0]]]}},
    {"type":"Feature","properties":{"GEOID":"01003","name":"Baldwin"},
     "geometry":{"type":"Polygon","coordinates":[[[5,0],[10,0],[10,10],[5,10],[5,0]]]}}
]}"#;

const METRICS: &str = r#"[
    {"GeoFIPS": "01", "2021": 45000}, {"GeoFIPS": "02", "2021": 65000},
    {"GeoFIPS": "01001", "2021": 40000}, {"GeoFIPS": "01003", "2021": "(NA)"}
]"#;

fn render_with(extra: &[&str]) -> String {
    let dir = tempfile::tempdir().unwrap();
    let path = |name: &str| dir.path().join(name).to_string_lossy().into_owned();
    fs::write(path("states.json"), STATES).unwrap();
    fs::write(path("counties.json"), COUNTIES).unwrap();
    fs::write(path("metrics.json"), METRICS).unwrap();

    let mut argv = vec![
        "choromap".to_string(),
        "render".to_string(),
        path("states.json"),
        path("counties.json"),
        path("metrics.json"),
        "--year".to_string(),
        "2021".to_string(),
        "-o".to_string(),
        path("out.svg"),
    ];
    argv.extend(extra.iter().map(|arg| arg.to_string()));

    let cli = Cli::parse_from(argv);
    let Commands::Render(args) = &cli.command;
    render::run(&cli, args).unwrap();
    fs::read_to_string(path("out.svg")).unwrap()
}

#[test]
fn renders_national_view() {
    let svg = render_with(&[]);
    assert_eq!(svg.matches("<path").count(), 2);
    assert!(svg.contains(r#"data-id="02""#));
    assert!(!svg.contains(r#"class="county"#));
}

#[test]
fn renders_drilled_state_with_counties() {
    let svg = render_with(&["--drill", "01"]);
    assert_eq!(svg.matches(r#"class="county"#).count(), 2);
    // Baldwin has no value for the year.
    assert!(svg.contains(r#"data-id="01003" style="fill:#d3d3d3"#));
}
