use std::sync::Arc;

use clap::Parser;
use snippetbox::app::App;
use snippetbox::config::Config;
use snippetbox::models::{MemorySnippets, MemoryUsers};
use snippetbox::{Error, Server, logging};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::parse();
    logging::init(config.log_format)?;

    let app = App::new(
        Arc::new(MemorySnippets::new()),
        Arc::new(MemoryUsers::new(config.bcrypt_cost)),
        config.static_dir.clone(),
    );

    info!(addr = %config.addr, static_dir = %config.static_dir.display(), "starting server");
    Server::bind(config.addr)
        .header_read_timeout(config.read_timeout())
        .serve(app.routes())
        .await
}
