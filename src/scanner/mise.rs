use crate::model::Manager;
use crate::platform::installs_dir;
use async_trait::async_trait;
use std::path::PathBuf;

pub struct MiseScanner;

#[async_trait]
impl super::Scanner for MiseScanner {
    fn name(&self) -> &'static str {
        "mise Installs"
    }

    fn manager(&self) -> Manager {
        Manager::Mise
    }

    fn installs_dir(&self) -> Option<PathBuf> {
        installs_dir(Manager::Mise)
    }
}
