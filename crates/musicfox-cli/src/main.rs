//! Musicfox CLI - inspect music service responses from the terminal

mod cli;
mod settings;
mod view;

use std::fs;
use std::io::{ self, Read };
use std::path::Path;

use anyhow::{ bail, Context, Result };
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{ Args, CliCommand, ConfigAction, IdAction };
use settings::{ OutputFormat, Settings };

use musicfox_core::{
    codec::{ self, ID_LEN },
    response,
    ListKind,
};


fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = start_logging( Settings::load(), args.verbose );

    let output = if args.json { OutputFormat::Json } else { settings.output };

    match args.command {
        CliCommand::DataDir => {
            let dir = musicfox_core::local_data_dir()?;
            println!( "{}", dir.display() );
        }
        CliCommand::Kinds => {
            for kind in ListKind::ALL {
                println!( "{:<20} {}", kind.name(), kind.path().join( "." ) );
            }
        }
        CliCommand::Extract { kind, file } => {
            let data = read_input( file.as_deref() )?;
            let extracted = kind.extract( &data );
            tracing::info!( "Extracted {} {} entries", extracted.len(), kind.name() );

            match output {
                OutputFormat::Json => println!( "{}", serde_json::to_string_pretty( &extracted )? ),
                OutputFormat::Text => {
                    for line in view::render( &extracted, settings.replace_special_chars ) {
                        println!( "{}", line );
                    }
                }
            }
        }
        CliCommand::Code { file } => {
            let data = read_input( file.as_deref() )?;
            let code = response::code_of( &data ).context( "Response has no numeric code field" )?;
            print_code( code, output );
        }
        CliCommand::Check { code } => print_code( code, output ),
        CliCommand::Id { action } => match action {
            IdAction::Encode { id } => println!( "{}", to_hex( &codec::id_to_bin( id ) ) ),
            IdAction::Decode { hex } => println!( "{}", codec::bin_to_id( &from_hex( &hex )? )? ),
        },
        CliCommand::Config { action } => match action {
            ConfigAction::Show => println!( "{}", serde_json::to_string_pretty( &settings )? ),
            ConfigAction::Path => println!( "{}", Settings::settings_path()?.display() ),
            ConfigAction::Set { key, value } => {
                settings.set( &key, &value )?;
                settings.save()?;
                tracing::info!( "Set {} = {}", key, value );
            }
        },
    }

    Ok(())
}


/// Installs logging at the configured level, then reports a failed settings load.
fn start_logging( loaded: Result<Settings>, verbose: u8 ) -> Settings {
    let default = Settings::default();
    let level = match &loaded {
        Ok( settings ) => settings.log_level.as_str(),
        Err( _ ) => default.log_level.as_str(),
    };

    init_logging( level, verbose );
    settings_or_default( loaded )
}


/// Falls back to default settings, logging why.
fn settings_or_default( loaded: Result<Settings> ) -> Settings {
    loaded.unwrap_or_else( |e| {
        tracing::warn!( "Using default settings: {:#}", e );
        Settings::default()
    })
}


/// Installs the stderr log subscriber.
///
/// RUST_LOG wins over `-v`, which wins over the configured level.
fn init_logging( level: &str, verbose: u8 ) {
    let default = match verbose {
        0 => level,
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else( |_| EnvFilter::try_new( default ) )
        .unwrap_or_else( |_| EnvFilter::new( "warn" ) );

    tracing_subscriber::fmt()
        .with_env_filter( filter )
        .with_writer( io::stderr )
        .init();
}


/// Reads the whole response from a file, or stdin when no file is given.
fn read_input( file: Option<&Path> ) -> Result<Vec<u8>> {
    match file {
        Some( path ) => fs::read( path ).with_context( || format!( "Failed to read {:?}", path ) ),
        None => {
            let mut data = Vec::new();
            io::stdin().read_to_end( &mut data ).context( "Failed to read stdin" )?;
            Ok( data )
        }
    }
}


fn print_code( code: f64, output: OutputFormat ) {
    let result = response::check_code( code );
    match output {
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({ "code": code, "result": result as u8, "message": result.to_string() })
        ),
        OutputFormat::Text => println!( "{}\t{}", code, result ),
    }
}


fn to_hex( bytes: &[u8] ) -> String {
    bytes.iter().map( |b| format!( "{:02x}", b ) ).collect()
}


/// Parses a hex storage key, accepting an optional `0x` prefix.
fn from_hex( s: &str ) -> Result<Vec<u8>> {
    let s = s.trim();
    let s = s.strip_prefix( "0x" ).unwrap_or( s );

    if s.len() % 2 != 0 || !s.is_ascii() {
        bail!( "Invalid hex key: '{}'", s );
    }
    if s.len() < ID_LEN * 2 {
        tracing::debug!( "Key '{}' is shorter than {} bytes", s, ID_LEN );
    }

    ( 0..s.len() )
        .step_by( 2 )
        .map( |i| {
            u8::from_str_radix( &s[ i..i + 2 ], 16 )
                .with_context( || format!( "Invalid hex byte: '{}'", &s[ i..i + 2 ] ) )
        })
        .collect()
}


#[cfg( test )]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{ Arc, Mutex };


    #[derive( Clone, Default )]
    struct Captured( Arc<Mutex<Vec<u8>>> );


    impl Write for Captured {
        fn write( &mut self, buf: &[u8] ) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice( buf );
            Ok( buf.len() )
        }


        fn flush( &mut self ) -> io::Result<()> {
            Ok(())
        }
    }


    #[test]
    fn test_malformed_settings_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join( "settings.json" );
        fs::write( &path, "{ broken" ).unwrap();

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi( false )
            .with_writer( move || writer.clone() )
            .finish();

        let settings = tracing::subscriber::with_default( subscriber, || {
            settings_or_default( Settings::load_from( &path ) )
        });

        assert_eq!( settings, Settings::default() );
        let logged = String::from_utf8( captured.0.lock().unwrap().clone() ).unwrap();
        assert!( logged.contains( "WARN" ) );
        assert!( logged.contains( "Malformed settings" ) );
    }


    #[test]
    fn test_loaded_settings_pass_through() {
        let settings = Settings { log_level: "debug".into(), ..Settings::default() };
        assert_eq!( settings_or_default( Ok( settings.clone() ) ), settings );
    }


    #[test]
    fn test_hex_round_trip() {
        let key = codec::id_to_bin( 256 );
        assert_eq!( to_hex( &key ), "0000000000000100" );
        assert_eq!( from_hex( "0x0000000000000100" ).unwrap(), key.to_vec() );
    }


    #[test]
    fn test_from_hex_rejects_garbage() {
        assert!( from_hex( "abc" ).is_err() );
        assert!( from_hex( "zz" ).is_err() );
        assert!( from_hex( "éé" ).is_err() );
    }


    #[test]
    fn test_read_input_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join( "resp.json" );
        fs::write( &path, br#"{"code":200}"# ).unwrap();

        let data = read_input( Some( &path ) ).unwrap();
        assert_eq!( response::code_of( &data ), Some( 200.0 ) );
        assert!( read_input( Some( &dir.path().join( "missing.json" ) ) ).is_err() );
    }
}
