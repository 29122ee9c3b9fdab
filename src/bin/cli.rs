//! catalogd CLI Client
//!
//! Command-line interface for interacting with catalogd.

use catalogd::Client;
use clap::{Parser, Subcommand};

/// catalogd CLI
#[derive(Parser, Debug)]
#[command(name = "catalogd-cli")]
#[command(about = "CLI for the catalogd categories server")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:5000")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read the collection or a single category
    Read {
        /// Path to read
        #[arg(default_value = "/api/categories")]
        path: String,
    },

    /// Create a category
    Create {
        /// Name of the new category
        name: String,
    },

    /// Rename a category
    Update {
        /// Category id
        id: i64,

        /// New name
        name: String,
    },

    /// Delete a category
    Delete {
        /// Category id
        id: i64,
    },

    /// Echo a body back from the server
    Echo {
        /// Text to echo
        body: String,
    },

    /// Send a raw JSON payload as-is
    Raw {
        /// The payload
        payload: String,
    },
}

fn main() {
    let args = Args::parse();
    let client = Client::new(&args.server);

    let result = match &args.command {
        Commands::Read { path } => client.read(path),
        Commands::Create { name } => client.create(name),
        Commands::Update { id, name } => client.update(*id, name),
        Commands::Delete { id } => client.delete(*id),
        Commands::Echo { body } => client.echo(body),
        Commands::Raw { payload } => client.send_raw(payload.as_bytes()),
    };

    match result {
        Ok(envelope) => {
            println!("{}", envelope.status);
            if let Some(body) = envelope.body {
                println!("{}", body);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
