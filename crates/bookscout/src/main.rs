use crate::prelude::*;
use clap::Parser;

mod details;
mod error;
mod featured;
mod live;
mod openlibrary;
mod prelude;
mod search;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Search and browse the Open Library catalog from the terminal"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "BOOKSCOUT_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Search the catalog (featured titles first, then Open Library)
    Search(search::SearchOptions),

    /// Look up one book's details by ISBN
    Details(details::DetailsOptions),

    /// List the featured catalog
    Featured(featured::FeaturedOptions),

    /// Interactive search session with debounced live results
    Live(live::LiveOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Search(options) => search::run(options, app.global).await,
        SubCommands::Details(options) => details::run(options, app.global).await,
        SubCommands::Featured(options) => featured::run(options, app.global).await,
        SubCommands::Live(options) => live::run(options, app.global).await,
    }
}
