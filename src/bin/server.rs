use clap::Parser;
use quickdis::config::Config;
use quickdis::{server, Error};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::parse();

    server::run(config).await
}
