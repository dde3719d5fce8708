use newsnet::dataset::{load_edges, load_sources, DatasetHandle, SourceIndex, TableRole};
use newsnet::{DashboardConfig, DashboardError, FilterSelection, Grouping, Session};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const EDGES: &str = "from_index\tto_index\tparsed_date\ttopic1\ttopic2\n\
    0\t1\t2020-09-01 08:00:00\tpolitics\t\n\
    0\t1\t2020-09-01 09:30:00\tsports\tpolitics\n\
    1\t2\t2020-09-02 12:00:00\teconomy\t\n\
    0\t2\t2020-09-03 18:45:00\tpolitics\t\n";

const SOURCES: &str = "index\tname\tcategory\tregion\tcountry\tlang\tlat\tlon\n\
    0\tLe Monde\tnews\tEU\tFrance\tfr\t48.85\t2.35\n\
    1\tEl Pais\tnews\tEU\tSpain\tes\t40.41\t-3.70\n\
    2\tHerald\tnews\tUS\tUSA\ten\t\t\n";

fn write_dataset(dir: &Path) -> DatasetHandle {
    let edgelist = dir.join("edgelist.tsv");
    let sources = dir.join("sources.tsv");
    fs::write(&edgelist, EDGES).unwrap();
    fs::write(&sources, SOURCES).unwrap();
    DatasetHandle::new(edgelist, sources)
}

#[test]
fn test_load_from_disk() {
    let dir = TempDir::new().unwrap();
    let handle = write_dataset(dir.path());

    let edges = load_edges(&handle.edgelist).unwrap();
    assert_eq!(edges.len(), 4);

    let sources = load_sources(&handle.sources).unwrap();
    let herald = sources.get(SourceIndex(2)).unwrap();
    assert_eq!(herald.display_name(), "Herald");
    assert_eq!(herald.lat, None);
}

#[test]
fn test_missing_file_is_load_error() {
    let dir = TempDir::new().unwrap();
    let handle = DatasetHandle::new(dir.path().join("nope.tsv"), dir.path().join("sources.tsv"));

    let err = handle.load().unwrap_err();
    assert!(matches!(
        err,
        DashboardError::DataLoad {
            role: TableRole::Edgelist,
            ..
        }
    ));
    assert!(!err.is_sentinel());
}

#[test]
fn test_missing_source_column_is_schema_error() {
    let dir = TempDir::new().unwrap();
    let handle = write_dataset(dir.path());
    fs::write(&handle.sources, "index\tname\tregion\n0\tLe Monde\tEU\n").unwrap();

    let err = handle.load().unwrap_err();
    assert!(matches!(err, DashboardError::Schema(ref m) if m.contains("country")));
}

#[test]
fn test_handle_from_json() {
    let handle: DatasetHandle =
        serde_json::from_str(r#"{"edgelist": "a.tsv", "sources": "b.tsv"}"#).unwrap();
    assert_eq!(handle.location(TableRole::Sources), Path::new("b.tsv"));
}

#[test]
fn test_session_over_files() {
    let dir = TempDir::new().unwrap();
    let handle = write_dataset(dir.path());
    let session = Session::open(&handle, DashboardConfig::default()).unwrap();

    let options = session.filter_options();
    assert_eq!(
        options.get(newsnet::Dimension::Topics),
        ["economy".to_string(), "politics".to_string(), "sports".to_string()]
    );

    let report = session.summary(&FilterSelection::new()).unwrap();
    assert_eq!(report.from_sources.value(0, "name"), Some("Le Monde"));
    assert_eq!(report.from_sources.rows[0].count, 3);
    let window = report.series[0].window.unwrap();
    assert_eq!(window.central.to_string(), "2020-09-01");

    let network = session.network(&FilterSelection::new(), Grouping::Country).unwrap();
    assert_eq!(network.edges.len(), 3);
}

#[test]
fn test_preset_from_yaml_config() {
    let dir = TempDir::new().unwrap();
    let handle = write_dataset(dir.path());
    let yaml = format!(
        "datasets:\n  local:\n    edgelist: {}\n    sources: {}\ntop_n: 2\n",
        handle.edgelist.display(),
        handle.sources.display()
    );
    let config_path = dir.path().join("newsnet.yaml");
    fs::write(&config_path, yaml).unwrap();

    let config = DashboardConfig::from_yaml_file(&config_path).unwrap();
    let session = Session::open_preset("local", config).unwrap();
    let report = session.summary(&FilterSelection::new()).unwrap();
    assert!(report.ranked.len() <= 2);

    let err = Session::open_preset("sep", DashboardConfig::from_yaml_file(&config_path).unwrap())
        .unwrap_err();
    assert!(matches!(err, DashboardError::Config(_)));
}
