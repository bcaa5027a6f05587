/*!
 * Common test utilities for the scriptsmith test suite
 */

use std::path::{Path, PathBuf};
use std::fs;
use std::sync::Arc;
use anyhow::Result;
use tempfile::TempDir;

use scriptsmith::app_config::{AiProvider, Config};
use scriptsmith::app_controller::Controller;
use scriptsmith::database::Repository;
use scriptsmith::providers::MockProvider;

/// Annotated script in the shape AI models usually return
pub const SAMPLE_SCRIPT: &str = r#"**Title: Morning Routines**
**Target Duration:** 60 seconds

## Hook
(0:00-0:05) (Narrator – upbeat) Ever wonder why some people wake up energized?
**[SCENE: bedroom, soft light]**
**Host:** Today we break down three simple habits.

(0:05-0:20) - First, drink a glass of water (pours water).
**(VISUAL CUE: close-up of glass)**
NARRATOR (V.O.): Second, open the curtains.

**Key Considerations**
- Keep it short
(0:50-0:60) Thanks for watching!"#;

/// Narration expected from `SAMPLE_SCRIPT`
pub const SAMPLE_NARRATION: &str = "Ever wonder why some people wake up energized?
Today we break down three simple habits.
First, drink a glass of water.
Second, open the curtains.
Keep it short
Thanks for watching!";

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Configuration that never reaches the network
pub fn mock_config() -> Config {
    let mut config = Config::default();
    config.generation.provider = AiProvider::Mock;
    config.generation.common.retry_count = 0;
    config
}

/// Controller backed by `provider` and an in-memory history
pub fn mock_controller(provider: MockProvider) -> Result<Controller> {
    Ok(Controller::with_parts(
        mock_config(),
        Arc::new(provider),
        Some(Repository::new_in_memory()?),
    ))
}

/// Route library logs to the test output when RUST_LOG is set
pub fn init_test_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
