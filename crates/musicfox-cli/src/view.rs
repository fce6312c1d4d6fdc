//! Text rendering of extracted entities.
//!
//! One line per entity, ID first, so output can be piped into other tools.

use std::time::Duration;

use musicfox_core::{ replace_special_str, Album, Artist, DjRadio, Extracted, Playlist, Song, User };


/// Renders an entity as a single line of text.
pub trait Line {
    fn line( &self ) -> String;
}


fn join_artists( artists: &[Artist] ) -> String {
    artists.iter()
        .map( |a| a.name.as_str() )
        .collect::<Vec<_>>()
        .join( " / " )
}


/// Formats a duration as `m:ss`.
fn format_duration( d: Duration ) -> String {
    let secs = d.as_secs();
    format!( "{}:{:02}", secs / 60, secs % 60 )
}


impl Line for Song {
    fn line( &self ) -> String {
        let mut line = format!( "{}\t{}", self.id, self.name );
        if !self.artists.is_empty() {
            line.push_str( &format!( " - {}", join_artists( &self.artists ) ) );
        }
        line.push_str( &format!( "\t[{}]", format_duration( self.duration() ) ) );
        if !self.album.name.is_empty() {
            line.push_str( &format!( "\t{}", self.album.name ) );
        }
        line
    }
}


impl Line for Album {
    fn line( &self ) -> String {
        if self.artists.is_empty() {
            format!( "{}\t{}", self.id, self.name )
        } else {
            format!( "{}\t{} - {}", self.id, self.name, join_artists( &self.artists ) )
        }
    }
}


impl Line for Artist {
    fn line( &self ) -> String {
        format!( "{}\t{}", self.id, self.name )
    }
}


impl Line for Playlist {
    fn line( &self ) -> String {
        format!( "{}\t{}", self.id, self.name )
    }
}


impl Line for User {
    fn line( &self ) -> String {
        format!( "{}\t{}", self.user_id, self.nickname )
    }
}


impl Line for DjRadio {
    fn line( &self ) -> String {
        if self.dj.nickname.is_empty() {
            format!( "{}\t{}", self.id, self.name )
        } else {
            format!( "{}\t{} (DJ {})", self.id, self.name, self.dj.nickname )
        }
    }
}


fn lines_of<T: Line>( items: &[T] ) -> Vec<String> {
    items.iter().map( Line::line ).collect()
}


/// Renders every extracted entity, optionally normalising special characters.
pub fn render( extracted: &Extracted, replace_special: bool ) -> Vec<String> {
    let lines = match extracted {
        Extracted::Songs( v ) => lines_of( v ),
        Extracted::Albums( v ) => lines_of( v ),
        Extracted::Artists( v ) => lines_of( v ),
        Extracted::Playlists( v ) => lines_of( v ),
        Extracted::Users( v ) => lines_of( v ),
        Extracted::DjRadios( v ) => lines_of( v ),
    };

    if replace_special {
        lines.iter().map( |l| replace_special_str( l ) ).collect()
    } else {
        lines
    }
}


#[cfg( test )]
mod tests {
    use super::*;


    fn song() -> Song {
        Song {
            id: 1,
            name: "“Quoted”".into(),
            duration_ms: 125_000,
            album: Album { name: "A·B".into(), ..Album::default() },
            artists: vec![
                Artist { id: 2, name: "x".into(), ..Artist::default() },
                Artist { id: 3, name: "y".into(), ..Artist::default() },
            ],
            ..Song::default()
        }
    }


    #[test]
    fn test_song_line() {
        assert_eq!( song().line(), "1\t“Quoted” - x / y\t[2:05]\tA·B" );
    }


    #[test]
    fn test_render_replaces_special_chars() {
        let extracted = Extracted::Songs( vec![ song() ] );
        assert_eq!( render( &extracted, true ), vec![ "1\t\"Quoted\" - x / y\t[2:05]\tA.B".to_string() ] );
        assert_eq!( render( &extracted, false ), vec![ song().line() ] );
    }


    #[test]
    fn test_dj_radio_line() {
        let radio = DjRadio {
            id: 5,
            name: "night".into(),
            dj: User { user_id: 1, nickname: "host".into(), ..User::default() },
            ..DjRadio::default()
        };
        assert_eq!( radio.line(), "5\tnight (DJ host)" );
        assert_eq!( DjRadio::default().line(), "0\t" );
    }


    #[test]
    fn test_format_duration() {
        assert_eq!( format_duration( Duration::from_secs( 0 ) ), "0:00" );
        assert_eq!( format_duration( Duration::from_secs( 3601 ) ), "60:01" );
    }
}
