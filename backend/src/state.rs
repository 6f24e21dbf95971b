use std::sync::Arc;

use crate::{
    config::Config,
    db::connection::DbPool,
    services::{
        activity_facade::ActivityLogger,
        activity_log::{ActivityLogStore, ActivityRecorder},
    },
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Config,
    pub activity: ActivityLogger,
}

impl AppState {
    pub fn new(pool: DbPool, config: Config) -> Self {
        let activity = ActivityLogger::new(ActivityRecorder::postgres(pool.clone()));
        Self {
            pool,
            config,
            activity,
        }
    }

    /// Same as [`AppState::new`] but records activity through `store`.
    pub fn with_activity_store(
        pool: DbPool,
        config: Config,
        store: Arc<dyn ActivityLogStore>,
    ) -> Self {
        Self {
            pool,
            config,
            activity: ActivityLogger::new(ActivityRecorder::new(store)),
        }
    }
}
