use std::{path::PathBuf, sync::Arc};

use super::config::Config;

pub struct State {
    pub config: Config,
}

impl State {
    pub fn new(config: Config) -> Arc<Self> {
        Arc::new(Self { config })
    }

    pub fn resume_path(&self) -> PathBuf {
        self.config.resume_path()
    }
}
