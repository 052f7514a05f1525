mod defaults;
mod docker;
mod format;
mod reconstruct;

use clap::Parser;
use std::process::exit;

use docker::DockerInspector;
use reconstruct::reconstruct_command;

// ======================================================
// CLI
// ======================================================

#[derive(Parser)]
#[command(name = "runback")]
#[command(about = "Reconstruct the docker run command for an existing container")]
#[command(version)]
struct Cli {
    /// Container name or ID
    container: String,
}

// ======================================================
// MAIN
// ======================================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let inspector = match DockerInspector::connect() {
        Ok(inspector) => inspector,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    };

    match reconstruct_command(&inspector, &cli.container).await {
        Ok(line) => println!("{}", line),
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    }
}
