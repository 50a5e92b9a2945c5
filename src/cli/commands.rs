use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "notes")]
#[command(version, about = "Personal notes addressed by slug, visible only to their author")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Act as this user (anonymous when omitted)
    #[arg(long, short = 'u', global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new notes project in the current directory
    Init,

    /// Add a new note
    Add {
        /// Note title
        title: String,

        /// Note text
        #[arg(long, default_value = "")]
        text: String,

        /// Slug to address the note by (derived from the title when omitted)
        #[arg(long)]
        slug: Option<String>,

        /// Read text from stdin
        #[arg(long)]
        stdin: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List your notes
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one of your notes
    Get {
        /// Note slug
        slug: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit one of your notes
    Edit {
        /// Slug of the note to edit
        slug: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New text
        #[arg(long)]
        text: Option<String>,

        /// New slug
        #[arg(long = "slug")]
        new_slug: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete one of your notes
    Delete {
        /// Note slug
        slug: String,

        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Resolve a site path and show what it would answer
    Route {
        /// URL path, e.g. /edit/1996/
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
