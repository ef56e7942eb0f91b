use super::*;

#[test]
fn test_missing_env_files_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_env_files(dir.path()).is_ok());
}

#[test]
fn test_env_file_values_reach_the_environment() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".env"),
        "FEEDSCOUT_LOADER_TEST_VALUE=from-dotenv\n",
    )
    .unwrap();

    load_env_files(dir.path()).unwrap();

    assert_eq!(
        std::env::var("FEEDSCOUT_LOADER_TEST_VALUE").as_deref(),
        Ok("from-dotenv")
    );
}

#[test]
fn test_unparseable_env_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".env.local"), "NOT A VALID LINE\n").unwrap();

    match load_env_files(dir.path()) {
        Err(ConfigError::EnvFileError { file, .. }) => assert!(file.ends_with(".env.local")),
        other => panic!("expected env file error, got {other:?}"),
    }
}
