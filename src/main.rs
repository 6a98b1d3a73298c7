use log::info;
use pipeline_panel::{Error, FileConfigStore, GithubRunSource, Resolver, Server};
use std::{path::PathBuf, sync::Arc};
use structopt::StructOpt;

#[derive(StructOpt)]
struct Options {
    #[structopt(short, long, parse(from_os_str), default_value = "pipeline-panel.toml")]
    /// config file to use
    config: PathBuf,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(StructOpt)]
enum Command {
    #[structopt(name = "serve")]
    /// Serve the panel's operations over HTTP
    Serve(ServeOptions),
}

#[derive(StructOpt)]
struct ServeOptions {
    #[structopt(long, default_value = "3000")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let opts = Options::from_args();

    // set up logging, allowing info level logging by default
    env_logger::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("pipeline-panel starting");

    let store = FileConfigStore::new(opts.config);
    // Fail early on a missing or malformed config rather than on the first request
    pipeline_panel::Config::from_file(store.path())?;
    info!("using config {}", store.path().display());

    match opts.command {
        Command::Serve(options) => {
            let addr = ([127, 0, 0, 1], options.port).into();
            let resolver = Resolver::new(Arc::new(store), Arc::new(GithubRunSource));
            Server::new(resolver).start(addr).await
        }
    }
}
