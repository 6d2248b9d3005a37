pub(crate) mod account;
pub(crate) mod opt;
mod run;
pub(crate) mod schema;

use crate::opt::Commands;
use anyhow::Error;
use kokoro::Config;
use kokoro_utils::args::api::ApiArgs;

fn config(api: &ApiArgs) -> Config {
    Config::new(api.api_url.clone()).with_timeout(api.timeout())
}

pub(crate) async fn exec(command: Commands, api: &ApiArgs) -> Result<(), Error> {
    let config = config(api);
    match command {
        Commands::Assess(o) => run::run(o, config).await,
        Commands::History(o) => account::history(o, config).await,
        Commands::Latest(o) => account::latest(o, config).await,
        Commands::Resources(o) => account::resources(o, config).await,
        Commands::Register(o) => account::register(o, config).await,
        Commands::Status => account::status(config).await,
        Commands::Schema(o) => schema::exec(o),
    }
}
