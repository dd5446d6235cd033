//! CLI module for the storage gateway

pub mod serve;

use clap::{Parser, Subcommand};

/// Storage Gateway - typed HTTP facade over table, blob, queue and file-share storage
#[derive(Parser)]
#[command(name = "storage-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the gateway HTTP server
    Serve(serve::ServeArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::try_parse_from(["storage-gateway", "serve", "--port", "9000"]).unwrap();

        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.port, Some(9000));
                assert_eq!(args.host, None);
            }
        }
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["storage-gateway"]).is_err());
    }
}
