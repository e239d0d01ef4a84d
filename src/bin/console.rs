//! Bike Share Network Role Console
//!
//! Command-line rendition of the browser console: log in under an
//! organization, inspect the role's operation menu, and submit operations
//! to the gateway.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::info;

use bsn_gateway::common::init_logger;
use bsn_gateway::console::{menu, ConsoleClient, ConsoleResult, Session};
use bsn_gateway::network::Org;
use bsn_gateway::VERSION;

/// Role console for the bike-share network gateway
#[derive(Parser, Debug)]
#[clap(author, version = VERSION, about, long_about = None)]
struct Cli {
    /// Gateway base URL
    #[clap(long, env = "BSN_GATEWAY_URL", default_value = "http://localhost:8080")]
    gateway: String,

    /// Session file holding the access token
    #[clap(long, env = "BSN_SESSION_FILE", default_value = ".bsn-session.json")]
    session_file: PathBuf,

    /// Log level
    #[clap(long, default_value = "warn")]
    log_level: String,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the issued token
    Login {
        /// Operator name
        #[clap(long)]
        username: String,

        /// Password (accepted, not verified; login enrolls the identity)
        #[clap(long, default_value = "")]
        password: String,

        /// Organization name (userorg, repairerorg, providerorg)
        #[clap(long)]
        org: String,
    },

    /// Print the operations available to a role
    Menu {
        /// Organization to list; defaults to the logged-in one
        #[clap(long)]
        org: Option<String>,
    },

    /// Submit an operation with positional arguments
    Call {
        /// Operation name from the role menu
        function: String,

        /// Positional arguments in menu order
        args: Vec<String>,
    },

    /// Forget the stored session
    Logout,
}

fn main() {
    let cli = Cli::parse();
    init_logger(&cli.log_level);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> ConsoleResult<()> {
    let client = ConsoleClient::new(&cli.gateway);

    match cli.command {
        Command::Login {
            username,
            password,
            org,
        } => {
            let org = Org::from_str(&org)?;
            let token = client.login(&username, &password, org)?;
            info!("Logged in as {} ({})", username, org);

            let session = Session::new(&token, &username, org);
            session.save(&cli.session_file)?;

            // First-time non-admin logins are written into the ledger
            if let Some(message) = client.register_first_login(&token, &username, org)? {
                println!("{}", message);
            }
            println!("Logged in as {} ({})", username, org);
            Ok(())
        }

        Command::Menu { org } => {
            let org = match org {
                Some(name) => Org::from_str(&name)?,
                None => Session::load(&cli.session_file)?.org,
            };

            println!("Operations for {}:", org);
            for op in menu(org) {
                if op.hint.is_empty() {
                    println!("  {}", op.name);
                } else {
                    println!("  {} {}", op.name, op.hint);
                }
            }
            Ok(())
        }

        Command::Call { function, args } => {
            let session = Session::load(&cli.session_file)?;
            let message = client.submit(&session.token, session.org, &function, &args)?;
            println!("{}", message);
            Ok(())
        }

        Command::Logout => {
            Session::clear(&cli.session_file)?;
            println!("Logged out");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_call_with_args() {
        let cli = Cli::parse_from([
            "bsn-console",
            "call",
            "startRide",
            "alice",
            "b1",
            "13.4",
            "52.5",
        ]);
        match cli.command {
            Command::Call { function, args } => {
                assert_eq!(function, "startRide");
                assert_eq!(args.len(), 4);
            }
            _ => panic!("expected call command"),
        }
    }

    #[test]
    fn test_cli_login_requires_org() {
        let result = Cli::try_parse_from(["bsn-console", "login", "--username", "alice"]);
        assert!(result.is_err());
    }
}
