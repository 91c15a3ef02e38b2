/*!
 * Common test utilities for the scenestock test suite
 */

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use tempfile::TempDir;


/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// The single-scene script document used by the end-to-end tests
pub fn single_scene_script() -> Vec<u8> {
    br#"{"scenes":[{"order":1,"type":"intro","phrase":"A sunrise over mountains"}]}"#.to_vec()
}

/// A three-scene script document covering intro, action, and outro
pub fn multi_scene_script() -> Vec<u8> {
    br#"{"scenes":[
        {"order":1,"type":"intro","phrase":"A sunrise over mountains"},
        {"order":2,"type":"action","phrase":"A river rushing through a canyon"},
        {"order":3,"type":"outro","phrase":"Stars appear over a quiet valley"}
    ]}"#
    .to_vec()
}
