use clap::Parser;
use notes::cli::{
    configured_log_filter, handle_add, handle_delete, handle_edit, handle_get, handle_init,
    handle_list, handle_route, Cli, Commands,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(configured_log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let user = cli.user;

    let result = match cli.command {
        Commands::Init => handle_init(),
        Commands::Add {
            title,
            text,
            slug,
            stdin,
            json,
        } => handle_add(user, title, text, slug, stdin, json),
        Commands::List { json } => handle_list(user, json),
        Commands::Get { slug, json } => handle_get(user, slug, json),
        Commands::Edit {
            slug,
            title,
            text,
            new_slug,
            json,
        } => handle_edit(user, slug, title, text, new_slug, json),
        Commands::Delete { slug, force } => handle_delete(user, slug, force),
        Commands::Route { path, json } => handle_route(user, path, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
