//! Background loading of the game data

use std::sync::Arc;

use parking_lot::Mutex;
use sv_data::{DataError, DatasetStore, GameSource};

/// Progress of the one-shot load, shared between the loader task and the UI
#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Loading,
    Ready { games: usize },
    Failed(String),
}

pub type LoadSlot = Arc<Mutex<LoadStatus>>;

pub fn new_slot() -> LoadSlot {
    Arc::new(Mutex::new(LoadStatus::Loading))
}

/// Load `source` into `store`, returning the number of games.
pub async fn load_into(source: &dyn GameSource, store: &DatasetStore) -> Result<usize, DataError> {
    let dataset = source.load().await?;
    let games = dataset.games().len();
    store.set_dataset(dataset);
    Ok(games)
}

/// Run the load on `runtime` and report into `slot`. There is no retry.
pub fn spawn_load(
    runtime: &tokio::runtime::Handle,
    source: Box<dyn GameSource>,
    store: Arc<DatasetStore>,
    slot: LoadSlot,
    ctx: egui::Context,
) {
    runtime.spawn(async move {
        let status = match load_into(source.as_ref(), &store).await {
            Ok(games) => {
                tracing::info!(games, source = source.source_name(), "load finished");
                LoadStatus::Ready { games }
            }
            Err(err) => {
                tracing::error!(source = source.source_name(), "failed to load games: {err}");
                LoadStatus::Failed(err.to_string())
            }
        };
        *slot.lock() = status;
        ctx.request_repaint();
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sv_data::{Dataset, PrecomputedAggregates};

    struct FailingSource;

    #[async_trait]
    impl GameSource for FailingSource {
        async fn load(&self) -> Result<Dataset, DataError> {
            Err(DataError::EmptyDataset("games.csv".to_string()))
        }

        fn source_name(&self) -> &str {
            "failing"
        }
    }

    struct EmptySource;

    #[async_trait]
    impl GameSource for EmptySource {
        async fn load(&self) -> Result<Dataset, DataError> {
            Ok(Dataset::new(Vec::new(), PrecomputedAggregates::default()))
        }

        fn source_name(&self) -> &str {
            "empty"
        }
    }

    #[tokio::test]
    async fn test_load_into_fills_store() {
        let store = DatasetStore::new();
        assert_eq!(load_into(&EmptySource, &store).await.unwrap(), 0);
        assert!(store.is_loaded());
    }

    #[tokio::test]
    async fn test_failed_load_leaves_store_empty() {
        let store = DatasetStore::new();
        assert!(load_into(&FailingSource, &store).await.is_err());
        assert!(!store.is_loaded());
    }

    #[test]
    fn test_spawned_failure_reaches_slot() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let slot = new_slot();
        spawn_load(
            runtime.handle(),
            Box::new(FailingSource),
            Arc::new(DatasetStore::new()),
            Arc::clone(&slot),
            egui::Context::default(),
        );
        runtime.block_on(async {
            for _ in 0..100 {
                if *slot.lock() != LoadStatus::Loading {
                    break;
                }
                tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            }
        });
        assert!(matches!(&*slot.lock(), LoadStatus::Failed(msg) if msg.contains("games.csv")));
    }
}
