//! Command-line argument parsing for musicfox.

use std::path::PathBuf;

use clap::{ ArgAction, Parser, Subcommand };

use musicfox_core::ListKind;


/// Musicfox - inspect music service responses from the terminal.
#[derive( Parser, Debug )]
#[command( name = "musicfox" )]
#[command( version, about, long_about = None )]
pub struct Args {
    /// Log more detail (-v for debug, -vv for trace).
    #[arg( short, long, action = ArgAction::Count, global = true )]
    pub verbose: u8,

    /// Print results as JSON regardless of the configured output.
    #[arg( long, global = true )]
    pub json: bool,

    #[command( subcommand )]
    pub command: CliCommand,
}


#[derive( Subcommand, Debug )]
pub enum CliCommand {
    /// Print the local data directory, creating it if needed.
    DataDir,

    /// List the response kinds `extract` understands.
    Kinds,

    /// Extract a typed list from a JSON response.
    Extract {
        /// Response kind, e.g. daily-songs or search-albums.
        kind: ListKind,

        /// Response file; reads stdin when omitted.
        file: Option<PathBuf>,
    },

    /// Classify the `code` field of a JSON response.
    Code {
        /// Response file; reads stdin when omitted.
        file: Option<PathBuf>,
    },

    /// Classify a raw response code.
    Check {
        #[arg( allow_negative_numbers = true )]
        code: f64,
    },

    /// Encode or decode storage keys.
    Id {
        #[command( subcommand )]
        action: IdAction,
    },

    /// Show or change settings.
    Config {
        #[command( subcommand )]
        action: ConfigAction,
    },
}


#[derive( Subcommand, Debug )]
pub enum IdAction {
    /// Print the 8-byte key of an ID as hex.
    Encode { id: u64 },

    /// Print the ID stored in a hex key.
    Decode { hex: String },
}


#[derive( Subcommand, Debug )]
pub enum ConfigAction {
    /// Print the current settings.
    Show,

    /// Print the settings file location.
    Path,

    /// Set a value (output, replace_special_chars, log_level).
    Set { key: String, value: String },
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_parse_extract_stdin() {
        let args = Args::try_parse_from([ "musicfox", "extract", "daily-songs" ]).unwrap();
        match args.command {
            CliCommand::Extract { kind, file } => {
                assert_eq!( kind, ListKind::DailySongs );
                assert!( file.is_none() );
            }
            other => panic!( "unexpected command: {:?}", other ),
        }
    }


    #[test]
    fn test_parse_extract_unknown_kind() {
        assert!( Args::try_parse_from([ "musicfox", "extract", "nope" ]).is_err() );
    }


    #[test]
    fn test_parse_global_flags() {
        let args = Args::try_parse_from([ "musicfox", "check", "301", "-vv", "--json" ]).unwrap();
        assert_eq!( args.verbose, 2 );
        assert!( args.json );
        assert!( matches!( args.command, CliCommand::Check { code } if code == 301.0 ) );
    }


    #[test]
    fn test_parse_id_decode() {
        let args = Args::try_parse_from([ "musicfox", "id", "decode", "0000000000000100" ]).unwrap();
        assert!( matches!(
            args.command,
            CliCommand::Id { action: IdAction::Decode { ref hex } } if hex == "0000000000000100"
        ));
    }
}
