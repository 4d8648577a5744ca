use rask_log_monitor::app;
use std::process;

#[tokio::main]
async fn main() {
    let code = app::main().await;
    process::exit(code);
}
