use graphscout::config::*;
use tempfile::TempDir;

#[test]
fn test_default_config_file_names() {
    let config = ScoutConfig::default();
    assert_eq!(config.version, 1);
    assert_eq!(config.snapshot_file, "graph.json");
    assert_eq!(config.vectors_file, "vectors.json");
    assert!(config.project_id.is_empty());
    assert!(config.embedding.is_none());
}

#[test]
fn test_save_and_load_config() {
    let dir = TempDir::new().unwrap();
    let config = ScoutConfig {
        project_id: "proj".to_string(),
        embedding: Some(EmbeddingConfig {
            endpoint: "http://localhost:11434/v1".to_string(),
            model: "nomic-embed-text".to_string(),
            api_key_env: Some("EMBEDDINGS_API_KEY".to_string()),
            timeout_secs: 10,
        }),
        ..ScoutConfig::default()
    };
    save_config(dir.path(), &config).unwrap();

    let loaded = load_config(dir.path()).unwrap();
    assert_eq!(config, loaded);
}

#[test]
fn test_missing_config_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let loaded = load_config(dir.path()).unwrap();
    assert_eq!(loaded, ScoutConfig::default());
}

#[test]
fn test_partial_config_fills_defaults() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(get_graphscout_dir(dir.path())).unwrap();
    std::fs::write(
        get_config_path(dir.path()),
        r#"{"version": 1, "embedding": {"endpoint": "http://e", "model": "m"}}"#,
    )
    .unwrap();

    let loaded = load_config(dir.path()).unwrap();
    assert_eq!(loaded.snapshot_file, "graph.json");
    let embedding = loaded.embedding.unwrap();
    assert_eq!(embedding.timeout_secs, 30);
    assert!(embedding.api_key_env.is_none());
}

#[test]
fn test_invalid_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(get_graphscout_dir(dir.path())).unwrap();
    std::fs::write(get_config_path(dir.path()), "not json").unwrap();

    let err = load_config(dir.path()).unwrap_err();
    assert!(err.to_string().contains("failed to parse config file"));
}

#[test]
fn test_data_paths_live_under_graphscout_dir() {
    let dir = TempDir::new().unwrap();
    let config = ScoutConfig::default();
    assert_eq!(
        config.snapshot_path(dir.path()),
        dir.path().join(".graphscout").join("graph.json")
    );
    assert_eq!(
        config.vectors_path(dir.path()),
        dir.path().join(".graphscout").join("vectors.json")
    );
}
