//! Home and local data directory resolution
//!
//! Finds the current user's home directory across platforms and derives
//! the directory musicfox keeps its local data in.

use std::env;
use std::fs;
use std::path::{ Path, PathBuf };
use std::process::Command;

use thiserror::Error;


/// Name of the data directory created under the user's home.
pub const APP_LOCAL_DATA_DIR: &str = ".musicfox";

/// Environment variable that overrides the data directory location.
pub const ROOT_ENV: &str = "MUSICFOX_ROOT";


/// Errors that can occur while resolving directories.
#[derive( Debug, Error )]
pub enum PathsError {
    #[error( "HOMEDRIVE, HOMEPATH, and USERPROFILE are blank" )]
    WindowsEnvBlank,

    #[error( "blank output when reading home directory" )]
    BlankShellOutput,

    #[error( "failed to query shell for home directory: {0}" )]
    Shell( #[from] std::io::Error ),

    #[error( "shell exited with {0} while reading home directory" )]
    ShellStatus( std::process::ExitStatus ),
}


/// Returns the current user's home directory.
///
/// The OS user database is consulted first. When it has no answer the
/// platform environment is used, which keeps cross-compiled builds working.
pub fn home_dir() -> Result<PathBuf, PathsError> {
    if let Some( home ) = dirs::home_dir() {
        return Ok( home );
    }

    tracing::debug!( "User database has no home directory, falling back to environment" );

    if cfg!( target_os = "windows" ) {
        home_windows( env_var )
    } else {
        home_unix( env_var, shell_home )
    }
}


/// Returns the local data directory without touching the filesystem.
///
/// `MUSICFOX_ROOT` takes precedence over `~/.musicfox` when set.
pub fn data_dir_path() -> Result<PathBuf, PathsError> {
    if let Some( root ) = env_var( ROOT_ENV ) {
        return Ok( PathBuf::from( root ) );
    }

    Ok( home_dir()?.join( APP_LOCAL_DATA_DIR ) )
}


/// Returns the local data directory, creating it if it is missing.
pub fn local_data_dir() -> Result<PathBuf, PathsError> {
    let dir = data_dir_path()?;
    ensure_dir( &dir );
    Ok( dir )
}


/// Returns `<home>/.musicfox`, creating it if it is missing.
///
/// A creation failure is logged and the path is returned regardless.
pub fn local_data_dir_in( home: &Path ) -> PathBuf {
    let dir = home.join( APP_LOCAL_DATA_DIR );
    ensure_dir( &dir );
    dir
}


fn ensure_dir( dir: &Path ) {
    if dir.exists() {
        return;
    }

    if let Err( e ) = fs::create_dir( dir ) {
        tracing::warn!( "Failed to create data directory {:?}: {}", dir, e );
    }
}


/// Reads a non-empty environment variable.
fn env_var( key: &str ) -> Option<String> {
    env::var( key ).ok().filter( |v| !v.is_empty() )
}


/// Resolves the home directory from the Windows environment.
fn home_windows<F>( lookup: F ) -> Result<PathBuf, PathsError>
where
    F: Fn( &str ) -> Option<String>,
{
    let drive = lookup( "HOMEDRIVE" ).unwrap_or_default();
    let path = lookup( "HOMEPATH" ).unwrap_or_default();

    let home = if drive.is_empty() || path.is_empty() {
        lookup( "USERPROFILE" ).unwrap_or_default()
    } else {
        format!( "{}{}", drive, path )
    };

    if home.is_empty() {
        return Err( PathsError::WindowsEnvBlank );
    }

    Ok( PathBuf::from( home ) )
}


/// Resolves the home directory on Unix-like systems.
///
/// `HOME` wins; otherwise the shell is asked to expand `~$USER`.
fn home_unix<F, S>( lookup: F, shell: S ) -> Result<PathBuf, PathsError>
where
    F: Fn( &str ) -> Option<String>,
    S: FnOnce() -> Result<String, PathsError>,
{
    if let Some( home ) = lookup( "HOME" ).filter( |h| !h.is_empty() ) {
        return Ok( PathBuf::from( home ) );
    }

    let output = shell()?;
    let result = output.trim();
    if result.is_empty() {
        return Err( PathsError::BlankShellOutput );
    }

    Ok( PathBuf::from( result ) )
}


fn shell_home() -> Result<String, PathsError> {
    let output = Command::new( "sh" )
        .arg( "-c" )
        .arg( "eval echo ~$USER" )
        .output()?;

    if !output.status.success() {
        return Err( PathsError::ShellStatus( output.status ) );
    }

    Ok( String::from_utf8_lossy( &output.stdout ).into_owned() )
}


#[cfg( test )]
mod tests {
    use super::*;
    use std::collections::HashMap;


    fn env_of( pairs: &[( &str, &str )] ) -> impl Fn( &str ) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter()
            .map( |( k, v )| ( k.to_string(), v.to_string() ) )
            .collect();
        move |key: &str| map.get( key ).cloned()
    }


    #[test]
    fn test_windows_drive_and_path() {
        let lookup = env_of( &[( "HOMEDRIVE", "C:" ), ( "HOMEPATH", r"\Users\fox" )] );
        assert_eq!( home_windows( lookup ).unwrap(), PathBuf::from( r"C:\Users\fox" ) );
    }


    #[test]
    fn test_windows_falls_back_to_userprofile() {
        let lookup = env_of( &[( "HOMEDRIVE", "C:" ), ( "USERPROFILE", r"D:\profiles\fox" )] );
        assert_eq!( home_windows( lookup ).unwrap(), PathBuf::from( r"D:\profiles\fox" ) );
    }


    #[test]
    fn test_windows_all_blank() {
        let result = home_windows( env_of( &[] ) );
        assert!( matches!( result, Err( PathsError::WindowsEnvBlank ) ) );
    }


    #[test]
    fn test_unix_prefers_home() {
        let result = home_unix(
            env_of( &[( "HOME", "/home/fox" )] ),
            || panic!( "shell should not be consulted" ),
        );
        assert_eq!( result.unwrap(), PathBuf::from( "/home/fox" ) );
    }


    #[test]
    fn test_unix_shell_output_is_trimmed() {
        let result = home_unix( env_of( &[] ), || Ok( "  /home/fox\n".to_string() ) );
        assert_eq!( result.unwrap(), PathBuf::from( "/home/fox" ) );
    }


    #[test]
    fn test_unix_blank_shell_output() {
        let result = home_unix( env_of( &[( "HOME", "" )] ), || Ok( " \n".to_string() ) );
        assert!( matches!( result, Err( PathsError::BlankShellOutput ) ) );
    }


    #[test]
    fn test_unix_shell_errors_propagate() {
        let result = home_unix( env_of( &[] ), || {
            Err( PathsError::Shell( std::io::Error::new( std::io::ErrorKind::NotFound, "no sh" ) ) )
        });
        assert!( matches!( result, Err( PathsError::Shell( ref e ) ) if e.kind() == std::io::ErrorKind::NotFound ) );
    }


    #[cfg( unix )]
    #[test]
    fn test_unix_shell_status_propagates() {
        use std::os::unix::process::ExitStatusExt;

        let status = std::process::ExitStatus::from_raw( 1 << 8 );
        let result = home_unix( env_of( &[] ), || Err( PathsError::ShellStatus( status ) ) );
        assert!( matches!( result, Err( PathsError::ShellStatus( s ) ) if s == status ) );
    }


    // The only test touching MUSICFOX_ROOT, so no other test races on it.
    #[test]
    fn test_root_env_override() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join( "custom-root" );

        env::set_var( ROOT_ENV, &root );
        assert_eq!( data_dir_path().unwrap(), root );
        assert!( !root.exists() );
        assert_eq!( local_data_dir().unwrap(), root );
        assert!( root.is_dir() );

        // Empty value falls through to the home-based path
        env::set_var( ROOT_ENV, "" );
        let expected = home_dir().unwrap().join( APP_LOCAL_DATA_DIR );
        assert_eq!( data_dir_path().unwrap(), expected );

        env::remove_var( ROOT_ENV );
    }


    #[test]
    fn test_local_data_dir_is_created() {
        let home = tempfile::tempdir().unwrap();
        let dir = local_data_dir_in( home.path() );

        assert_eq!( dir, home.path().join( APP_LOCAL_DATA_DIR ) );
        assert!( dir.is_dir() );

        // Second call finds the existing directory
        assert_eq!( local_data_dir_in( home.path() ), dir );
    }


    #[test]
    fn test_local_data_dir_missing_home_still_returns_path() {
        let home = tempfile::tempdir().unwrap();
        let missing = home.path().join( "nope" );
        let dir = local_data_dir_in( &missing );

        assert_eq!( dir, missing.join( APP_LOCAL_DATA_DIR ) );
        assert!( !dir.exists() );
    }
}
