use crate::model::Manager;
use crate::platform::installs_dir;
use async_trait::async_trait;
use std::path::PathBuf;

pub struct AsdfScanner;

#[async_trait]
impl super::Scanner for AsdfScanner {
    fn name(&self) -> &'static str {
        "asdf Installs"
    }

    fn manager(&self) -> Manager {
        Manager::Asdf
    }

    fn installs_dir(&self) -> Option<PathBuf> {
        installs_dir(Manager::Asdf)
    }
}
