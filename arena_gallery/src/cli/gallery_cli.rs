use arena_gallery::config::Config;
use arena_gallery::helper::arena_client::{ArenaClient, Endpoints};
use arena_gallery::helper::filter_helpers::{Category, Filter};
use arena_gallery::helper::loader_helpers;
use arena_gallery::helper::page_helpers::{build_gallery_page, RegionStatus};
use arena_gallery::helper::render_helpers;
use arena_gallery::models::Region;
use arena_gallery::AppState;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gallery_cli", author, version, about = "Inspect the configured Are.na channel from the terminal.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the .env configuration file.
    #[arg(long, required = true, value_name = "FILE")]
    env_file: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Header, contributors and block counts per filter category.
    Summary,
    /// One line per block: id, category, title.
    Blocks {
        /// all, Image, Text, Attachment or audio
        #[arg(long, default_value = "all")]
        filter: Filter,
    },
}

#[actix_web::main]
async fn main() {
    let cli = Cli::parse();

    let config = Config::from_env(&cli.env_file)
        .expect("FATAL: Failed to load or parse configuration.");
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(&config.log_level));

    let endpoints = match Endpoints::from_config(&config) {
        Ok(endpoints) => endpoints,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            return;
        }
    };

    // The three chains run concurrently; the CLI waits for all of them.
    let client = ArenaClient::new(&config);
    let state = AppState::default();
    futures_util::join!(
        loader_helpers::load_channel(&client, &endpoints, &config, &state),
        loader_helpers::load_profile(&client, &endpoints, &config, &state),
        loader_helpers::load_blocks(&client, &endpoints, &config, &state),
    );

    match cli.command {
        Commands::Summary => print_summary(&state, &config),
        Commands::Blocks { filter } => print_blocks(&state, filter),
    }
}

fn print_summary(state: &AppState, config: &Config) {
    let page = build_gallery_page(state, config, Filter::All, None);

    match (&page.header.data, &page.header.message) {
        (Some(header), _) => {
            println!("{} ({} blocks)", header.title, header.count);
            println!("{}", header.channel_url);
        }
        (None, message) => eprintln!("❌ {}", message.as_deref().unwrap_or("Channel unavailable")),
    }

    println!("\nContributors:");
    for contributor in &page.contributors {
        match (&contributor.status, &contributor.data) {
            (RegionStatus::Ready, Some(c)) => {
                println!("- {} {}", c.name, c.profile_url.as_deref().unwrap_or_default())
            }
            _ => println!("- {}", contributor.message.as_deref().unwrap_or_default()),
        }
    }

    let blocks = state.blocks();
    match &*blocks {
        Region::Ready(all) => {
            println!("\nBlocks by category:");
            for category in [Category::Image, Category::Text, Category::Attachment, Category::Audio] {
                let count = all.iter().filter(|b| render_helpers::category(b) == category).count();
                println!("- {:<10} {}", category.as_str(), count);
            }
        }
        Region::Failed(e) => eprintln!("❌ Error loading blocks: {}", e),
        Region::Loading => eprintln!("❌ Blocks did not finish loading."),
    }
}

fn print_blocks(state: &AppState, filter: Filter) {
    let blocks = state.blocks();
    let all = match &*blocks {
        Region::Ready(all) => all,
        Region::Failed(e) => {
            eprintln!("❌ Error loading blocks: {}", e);
            return;
        }
        Region::Loading => {
            eprintln!("❌ Blocks did not finish loading.");
            return;
        }
    };

    let mut shown = 0;
    for block in all.iter().filter(|b| filter.matches(render_helpers::category(b))) {
        println!(
            "{:>10}  {:<10}  {}",
            block.id(),
            render_helpers::category(block).as_str(),
            render_helpers::block_title(block)
        );
        shown += 1;
    }
    println!("\n{} of {} blocks shown (filter: {})", shown, all.len(), filter.as_str());
}
