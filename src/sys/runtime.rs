use crate::events::AppEvent;
use async_channel::Sender;
use std::path::PathBuf;
use std::thread;
use tokio::runtime::Runtime;

pub fn start_background_services(config_path: PathBuf, tx: Sender<AppEvent>) {
    thread::spawn(move || {
        let rt = match Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("Failed to create Tokio runtime: {}", e);
                return;
            }
        };

        rt.block_on(async {
            tokio::spawn(crate::config::run_async_watcher(config_path, tx));

            std::future::pending::<()>().await;
        });
    });
}
