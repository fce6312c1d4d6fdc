//! Application settings management
//!
//! Settings persist as JSON in the local data directory.

use std::fs;
use std::path::{ Path, PathBuf };

use anyhow::{ bail, Context, Result };
use serde::{ Deserialize, Serialize };


const SETTINGS_FILE: &str = "settings.json";


/// How command results are printed.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize )]
#[serde( rename_all = "lowercase" )]
pub enum OutputFormat {
    /// One line per entity
    #[default]
    Text,

    /// Pretty-printed JSON
    Json,
}


/// Application settings.
#[derive( Debug, Clone, PartialEq, Serialize, Deserialize )]
#[serde( default )]
pub struct Settings {
    /// Output format for extracted lists
    pub output: OutputFormat,

    /// Replace typographic quotes and middle dots in text output
    pub replace_special_chars: bool,

    /// Default log filter when RUST_LOG is unset
    pub log_level: String,
}


impl Default for Settings {
    fn default() -> Self {
        Self {
            output: OutputFormat::Text,
            replace_special_chars: true,
            log_level: "warn".to_string(),
        }
    }
}


impl Settings {
    /// Returns the path to the settings file.
    ///
    /// Resolving the path never creates the data directory.
    pub fn settings_path() -> Result<PathBuf> {
        let dir = musicfox_core::data_dir_path().context( "No data directory for settings" )?;
        Ok( dir.join( SETTINGS_FILE ) )
    }


    /// Loads settings from disk, or returns defaults if not found.
    pub fn load() -> Result<Self> {
        Self::load_from( &Self::settings_path()? )
    }


    /// Loads settings from a specific file; a missing file gives defaults.
    pub fn load_from( path: &Path ) -> Result<Self> {
        if !path.exists() {
            return Ok( Self::default() );
        }

        let contents = fs::read_to_string( path )
            .with_context( || format!( "Failed to read settings {:?}", path ) )?;
        serde_json::from_str( &contents )
            .with_context( || format!( "Malformed settings {:?}", path ) )
    }


    /// Saves settings to disk.
    pub fn save( &self ) -> Result<()> {
        self.save_to( &Self::settings_path()? )
    }


    /// Saves settings to a specific file.
    pub fn save_to( &self, path: &Path ) -> Result<()> {
        // Create parent directory if needed
        if let Some( parent ) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all( parent )
                    .with_context( || format!( "Failed to create {:?}", parent ) )?;
            }
        }

        let json = serde_json::to_string_pretty( self )?;
        fs::write( path, json ).with_context( || format!( "Failed to save settings to {:?}", path ) )?;
        Ok(())
    }


    /// Updates one setting by name from its string form.
    pub fn set( &mut self, key: &str, value: &str ) -> Result<()> {
        match key {
            "output" => {
                self.output = match value.to_lowercase().as_str() {
                    "text" => OutputFormat::Text,
                    "json" => OutputFormat::Json,
                    other => bail!( "Invalid output format: '{}'. Use 'text' or 'json'", other ),
                };
            }
            "replace_special_chars" => {
                self.replace_special_chars = match value.to_lowercase().as_str() {
                    "true" | "on" | "1" => true,
                    "false" | "off" | "0" => false,
                    other => bail!( "Invalid boolean: '{}'", other ),
                };
            }
            "log_level" => self.log_level = value.to_string(),
            other => bail!( "Unknown setting: {}", other ),
        }
        Ok(())
    }
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Settings::load_from( &dir.path().join( "none.json" ) ).unwrap();
        assert_eq!( loaded, Settings::default() );
        assert!( !dir.path().join( "none.json" ).exists() );
    }


    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join( "nested" ).join( SETTINGS_FILE );

        let mut settings = Settings::default();
        settings.set( "output", "json" ).unwrap();
        settings.set( "replace_special_chars", "off" ).unwrap();
        settings.save_to( &path ).unwrap();

        let loaded = Settings::load_from( &path ).unwrap();
        assert_eq!( loaded.output, OutputFormat::Json );
        assert!( !loaded.replace_special_chars );
        assert_eq!( loaded.log_level, "warn" );
    }


    #[test]
    fn test_partial_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join( SETTINGS_FILE );

        fs::write( &path, r#"{ "log_level": "debug" }"# ).unwrap();
        let loaded = Settings::load_from( &path ).unwrap();
        assert_eq!( loaded.log_level, "debug" );
        assert!( loaded.replace_special_chars );

        fs::write( &path, "{ broken" ).unwrap();
        let err = Settings::load_from( &path ).unwrap_err();
        assert!( err.to_string().starts_with( "Malformed settings" ) );
    }


    // The only test in this crate touching MUSICFOX_ROOT.
    #[test]
    fn test_load_does_not_create_data_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join( "fresh" );
        std::env::set_var( musicfox_core::paths::ROOT_ENV, &root );

        assert_eq!( Settings::settings_path().unwrap(), root.join( SETTINGS_FILE ) );
        assert_eq!( Settings::load().unwrap(), Settings::default() );
        assert!( !root.exists() );

        std::env::remove_var( musicfox_core::paths::ROOT_ENV );
    }


    #[test]
    fn test_set_rejects_bad_values() {
        let mut settings = Settings::default();
        assert!( settings.set( "output", "xml" ).is_err() );
        assert!( settings.set( "replace_special_chars", "maybe" ).is_err() );
        assert!( settings.set( "volume", "10" ).is_err() );
        assert_eq!( settings, Settings::default() );
    }
}
