/*!
 * Integration tests for the on-disk generation history
 */

use anyhow::Result;

use scriptsmith::app_controller::Controller;
use scriptsmith::database::{DatabaseConnection, GenerationKind, Repository};
use scriptsmith::enhancer::EnhanceRequest;
use scriptsmith::generator::ScriptRequest;
use crate::common;

/// Results written by one controller are visible after reopening the database
#[tokio::test]
async fn test_history_acrossControllers_shouldPersistToDisk() -> Result<()> {
    common::init_test_logger();
    let temp_dir = common::create_temp_dir()?;
    let db_path = temp_dir.path().join("data").join("history.db");

    let mut config = common::mock_config();
    config.storage.database_path = Some(db_path.clone());

    {
        let controller = Controller::with_config(config.clone())?;
        assert!(controller.is_storing());
        controller.generate_script(&ScriptRequest::new("lighthouses")).await?;
        controller.generate_script(&ScriptRequest::new("lighthouses")).await?;
        controller.enhance(&EnhanceRequest::new("a lighthouse at night", 2)).await?;
    }

    assert!(db_path.exists());

    let controller = Controller::with_config(config)?;
    let stats = controller.history_stats().await?;
    assert_eq!(stats.total, 3);
    assert_eq!(stats.scripts, 2);
    assert_eq!(stats.enhancements, 1);
    assert_eq!(stats.contracts, 0);
    assert_eq!(stats.unique_contents, 2);
    assert!(stats.file_size_bytes > 0);

    let latest = controller.history_list(None, 1).await?;
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].kind, GenerationKind::Enhancement);

    let scripts = controller.history_list(Some(GenerationKind::Script), 10).await?;
    assert_eq!(scripts.len(), 2);
    assert!(scripts.iter().all(|r| r.prompt == "lighthouses" && r.model == "mock-model"));

    Ok(())
}

#[tokio::test]
async fn test_historyShowAndDelete_shouldRemoveOnlyThatRecord() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let db_path = temp_dir.path().join("history.db");
    let mut config = common::mock_config();
    config.storage.database_path = Some(db_path);

    let controller = Controller::with_config(config)?;
    let script = controller.generate_script(&ScriptRequest::new("owls")).await?;
    controller.generate_script(&ScriptRequest::new("foxes")).await?;

    let records = controller.history_list(Some(GenerationKind::Script), 10).await?;
    let owl = records.iter().find(|r| r.prompt == "owls").expect("owl record stored");

    let shown = controller.history_show(&owl.id).await?;
    assert_eq!(shown.content, script.raw);
    assert_eq!(shown.narration.as_deref(), Some(script.narration.as_str()));
    assert_eq!(shown.content_hash, Repository::hash_text(&script.raw));

    controller.history_delete(&owl.id).await?;

    assert!(controller.history_show(&owl.id).await.is_err());
    assert!(controller.history_delete(&owl.id).await.is_err());
    let remaining = controller.history_list(None, 10).await?;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].prompt, "foxes");

    Ok(())
}

#[tokio::test]
async fn test_findByHash_shouldLocateStoredContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let db_path = temp_dir.path().join("history.db");
    let mut config = common::mock_config();
    config.storage.database_path = Some(db_path.clone());

    let controller = Controller::with_config(config)?;
    let script = controller.generate_script(&ScriptRequest::new("glass frogs")).await?;
    drop(controller);

    let repository = Repository::new(DatabaseConnection::new(&db_path)?);
    let found = repository.find_by_hash(&Repository::hash_text(&script.raw)).await?;

    assert_eq!(found.map(|r| r.prompt), Some("glass frogs".to_string()));
    assert!(repository.find_by_hash("0000").await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_history_withStorageDisabled_shouldNotCreateDatabase() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let db_path = temp_dir.path().join("history.db");
    let mut config = common::mock_config();
    config.storage.enabled = false;
    config.storage.database_path = Some(db_path.clone());

    let controller = Controller::with_config(config)?;
    controller.generate_script(&ScriptRequest::new("rain")).await?;

    assert!(!controller.is_storing());
    assert!(!db_path.exists());
    assert!(controller.history_stats().await.is_err());

    Ok(())
}
