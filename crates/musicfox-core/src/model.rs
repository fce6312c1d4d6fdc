//! Domain entities and their per-item JSON constructors
//!
//! The upstream API describes the same entity in several shapes depending
//! on the endpoint. Each constructor here accepts one array item from a
//! response and only insists on the entity's ID; every other field is
//! best-effort and falls back to its default.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;


/// Errors that can occur while building an entity from a JSON item.
#[derive( Debug, Error, PartialEq, Eq )]
pub enum ModelError {
    #[error( "Item is not a JSON object" )]
    NotAnObject,

    #[error( "Missing or non-integer field: {0}" )]
    MissingId( &'static str ),

    #[error( "Missing nested object: {0}" )]
    MissingField( &'static str ),
}


/// An artist.
#[derive( Debug, Clone, PartialEq, Eq, Default, Serialize )]
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub pic_url: String,
}


/// An album.
#[derive( Debug, Clone, PartialEq, Eq, Default, Serialize )]
pub struct Album {
    pub id: i64,
    pub name: String,
    pub pic_url: String,
    /// Milliseconds since the Unix epoch, 0 when unknown
    pub publish_time: i64,
    pub artists: Vec<Artist>,
}


/// A playable song.
#[derive( Debug, Clone, PartialEq, Eq, Default, Serialize )]
pub struct Song {
    pub id: i64,
    pub name: String,
    pub duration_ms: i64,
    /// Recommendation algorithm tag attached by the service
    pub alg: String,
    pub album: Album,
    pub artists: Vec<Artist>,
}


/// A playlist (only the fields needed to fetch its tracks).
#[derive( Debug, Clone, PartialEq, Eq, Default, Serialize )]
pub struct Playlist {
    pub id: i64,
    pub name: String,
}


/// A user profile.
#[derive( Debug, Clone, PartialEq, Eq, Default, Serialize )]
pub struct User {
    pub user_id: i64,
    pub nickname: String,
    pub avatar_url: String,
}


/// A DJ radio station.
#[derive( Debug, Clone, PartialEq, Eq, Default, Serialize )]
pub struct DjRadio {
    pub id: i64,
    pub name: String,
    pub pic_url: String,
    pub dj: User,
}


/// Field naming used by a song payload.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
enum SongShape {
    /// `dt`, `al`, `ar`
    Short,
    /// `duration`, `album`, `artists`
    Long,
}


impl SongShape {
    fn duration_key( self ) -> &'static str {
        match self {
            SongShape::Short => "dt",
            SongShape::Long => "duration",
        }
    }


    fn album_key( self ) -> &'static str {
        match self {
            SongShape::Short => "al",
            SongShape::Long => "album",
        }
    }


    fn artists_key( self ) -> &'static str {
        match self {
            SongShape::Short => "ar",
            SongShape::Long => "artists",
        }
    }
}


fn as_object( value: &Value ) -> Result<&Value, ModelError> {
    if value.is_object() {
        Ok( value )
    } else {
        Err( ModelError::NotAnObject )
    }
}


fn require_id( value: &Value, key: &'static str ) -> Result<i64, ModelError> {
    value.get( key )
        .and_then( Value::as_i64 )
        .ok_or( ModelError::MissingId( key ) )
}


fn int_or_default( value: &Value, key: &str ) -> i64 {
    value.get( key ).and_then( Value::as_i64 ).unwrap_or_default()
}


fn string_or_default( value: &Value, key: &str ) -> String {
    value.get( key )
        .and_then( Value::as_str )
        .unwrap_or_default()
        .to_string()
}


/// Collects the artist objects of an array, tolerating missing fields.
fn embedded_artists( value: Option<&Value> ) -> Vec<Artist> {
    value.and_then( Value::as_array )
        .map( |items| {
            items.iter()
                .filter( |item| item.is_object() )
                .map( Artist::embedded )
                .collect()
        })
        .unwrap_or_default()
}


impl Artist {
    /// Builds an artist from a standalone artist object (search results).
    pub fn from_json( value: &Value ) -> Result<Self, ModelError> {
        let value = as_object( value )?;
        let id = require_id( value, "id" )?;

        Ok( Self { id, ..Self::embedded( value ) } )
    }


    fn embedded( value: &Value ) -> Self {
        let mut pic_url = string_or_default( value, "picUrl" );
        if pic_url.is_empty() {
            pic_url = string_or_default( value, "img1v1Url" );
        }

        Self {
            id: int_or_default( value, "id" ),
            name: string_or_default( value, "name" ),
            pic_url,
        }
    }
}


impl Album {
    /// Builds an album from a full album object.
    ///
    /// Artists come from the `artists` array, or from the single `artist`
    /// object when the array is absent.
    pub fn from_album_json( value: &Value ) -> Result<Self, ModelError> {
        let value = as_object( value )?;
        let id = require_id( value, "id" )?;

        let mut album = Self::embedded( value );
        album.id = id;
        album.publish_time = int_or_default( value, "publishTime" );
        album.artists = match value.get( "artists" ) {
            Some( artists ) if artists.is_array() => embedded_artists( Some( artists ) ),
            _ => value.get( "artist" )
                .filter( |a| a.is_object() )
                .map( |a| vec![ Artist::embedded( a ) ] )
                .unwrap_or_default(),
        };

        Ok( album )
    }


    /// Album summary nested inside a song.
    fn embedded( value: &Value ) -> Self {
        Self {
            id: int_or_default( value, "id" ),
            name: string_or_default( value, "name" ),
            pic_url: string_or_default( value, "picUrl" ),
            ..Self::default()
        }
    }
}


impl Song {
    /// Song length.
    pub fn duration( &self ) -> Duration {
        Duration::from_millis( self.duration_ms.max( 0 ) as u64 )
    }


    /// Item of the daily recommendation list.
    pub fn from_daily_songs_json( value: &Value ) -> Result<Self, ModelError> {
        Self::parse( value, SongShape::Short )
    }


    /// Track of a playlist detail response.
    pub fn from_playlist_songs_json( value: &Value ) -> Result<Self, ModelError> {
        Self::parse( value, SongShape::Short )
    }


    /// Track of an album detail response.
    pub fn from_album_songs_json( value: &Value ) -> Result<Self, ModelError> {
        Self::parse( value, SongShape::Short )
    }


    /// Song of an artist's top songs response.
    pub fn from_artist_songs_json( value: &Value ) -> Result<Self, ModelError> {
        Self::parse( value, SongShape::Short )
    }


    /// Song of a search response.
    pub fn from_search_result_json( value: &Value ) -> Result<Self, ModelError> {
        Self::parse( value, SongShape::Short )
    }


    /// Song of the personal FM stream, which uses long field names.
    pub fn from_fm_json( value: &Value ) -> Result<Self, ModelError> {
        Self::parse( value, SongShape::Long )
    }


    /// Item of the intelligence (heart mode) list; the song sits under `songInfo`.
    pub fn from_intelligence_json( value: &Value ) -> Result<Self, ModelError> {
        let info = as_object( value )?
            .get( "songInfo" )
            .ok_or( ModelError::MissingField( "songInfo" ) )?;

        Self::parse( info, SongShape::Short )
    }


    /// Program of a DJ radio; the song sits under `mainSong`.
    pub fn from_dj_radio_program_json( value: &Value ) -> Result<Self, ModelError> {
        let main = as_object( value )?
            .get( "mainSong" )
            .ok_or( ModelError::MissingField( "mainSong" ) )?;

        Self::parse( main, SongShape::Long )
    }


    fn parse( value: &Value, shape: SongShape ) -> Result<Self, ModelError> {
        let value = as_object( value )?;
        let id = require_id( value, "id" )?;

        let album = value.get( shape.album_key() )
            .filter( |a| a.is_object() )
            .map( Album::embedded )
            .unwrap_or_default();

        Ok( Self {
            id,
            name: string_or_default( value, "name" ),
            duration_ms: int_or_default( value, shape.duration_key() ),
            alg: string_or_default( value, "alg" ),
            album,
            artists: embedded_artists( value.get( shape.artists_key() ) ),
        })
    }
}


impl Playlist {
    /// Builds a playlist from a playlist object.
    pub fn from_json( value: &Value ) -> Result<Self, ModelError> {
        let value = as_object( value )?;

        Ok( Self {
            id: require_id( value, "id" )?,
            name: string_or_default( value, "name" ),
        })
    }
}


impl User {
    /// Builds a user from a search result profile.
    pub fn from_search_result_json( value: &Value ) -> Result<Self, ModelError> {
        let value = as_object( value )?;
        let user_id = require_id( value, "userId" )?;

        Ok( Self { user_id, ..Self::embedded( value ) } )
    }


    fn embedded( value: &Value ) -> Self {
        Self {
            user_id: int_or_default( value, "userId" ),
            nickname: string_or_default( value, "nickname" ),
            avatar_url: string_or_default( value, "avatarUrl" ),
        }
    }
}


impl DjRadio {
    /// Builds a radio station from a radio object.
    pub fn from_json( value: &Value ) -> Result<Self, ModelError> {
        let value = as_object( value )?;

        Ok( Self {
            id: require_id( value, "id" )?,
            name: string_or_default( value, "name" ),
            pic_url: string_or_default( value, "picUrl" ),
            dj: value.get( "dj" )
                .filter( |d| d.is_object() )
                .map( User::embedded )
                .unwrap_or_default(),
        })
    }
}


#[cfg( test )]
mod tests {
    use super::*;
    use serde_json::json;


    #[test]
    fn test_short_name_song() {
        let item = json!({
            "id": 186016,
            "name": "晴天",
            "dt": 269000,
            "alg": "itembased",
            "al": { "id": 18903, "name": "叶惠美", "picUrl": "http://p1/cover.jpg" },
            "ar": [ { "id": 6452, "name": "周杰伦" } ]
        });

        let song = Song::from_daily_songs_json( &item ).unwrap();
        assert_eq!( song.id, 186016 );
        assert_eq!( song.name, "晴天" );
        assert_eq!( song.duration(), Duration::from_secs( 269 ) );
        assert_eq!( song.alg, "itembased" );
        assert_eq!( song.album.id, 18903 );
        assert_eq!( song.album.pic_url, "http://p1/cover.jpg" );
        assert_eq!( song.artists, vec![ Artist { id: 6452, name: "周杰伦".into(), pic_url: String::new() } ] );
    }


    #[test]
    fn test_long_name_song() {
        let item = json!({
            "id": 1,
            "name": "fm",
            "duration": 1000,
            "album": { "id": 2, "name": "a" },
            "artists": [ { "id": 3, "name": "x" }, { "id": 4, "name": "y" } ]
        });

        let song = Song::from_fm_json( &item ).unwrap();
        assert_eq!( song.duration_ms, 1000 );
        assert_eq!( song.album.name, "a" );
        assert_eq!( song.artists.len(), 2 );

        // Short-name parser does not read long-name fields
        let short = Song::from_search_result_json( &item ).unwrap();
        assert_eq!( short.duration_ms, 0 );
        assert!( short.artists.is_empty() );
    }


    #[test]
    fn test_song_without_id_is_rejected() {
        let item = json!({ "name": "nameless" });
        assert_eq!( Song::from_playlist_songs_json( &item ), Err( ModelError::MissingId( "id" ) ) );

        let item = json!({ "id": "123" });
        assert_eq!( Song::from_album_songs_json( &item ), Err( ModelError::MissingId( "id" ) ) );
    }


    #[test]
    fn test_song_non_object() {
        assert_eq!( Song::from_artist_songs_json( &json!( 5 ) ), Err( ModelError::NotAnObject ) );
    }


    #[test]
    fn test_mistyped_optional_fields_default() {
        let item = json!({ "id": 9, "name": 42, "dt": "long", "al": "none", "ar": {} });
        let song = Song::from_daily_songs_json( &item ).unwrap();

        assert_eq!( song.name, "" );
        assert_eq!( song.duration_ms, 0 );
        assert_eq!( song.album, Album::default() );
        assert!( song.artists.is_empty() );
    }


    #[test]
    fn test_intelligence_song() {
        let item = json!({ "id": 77, "songInfo": { "id": 5, "name": "heart", "dt": 10 } });
        let song = Song::from_intelligence_json( &item ).unwrap();
        assert_eq!( song.id, 5 );
        assert_eq!( song.name, "heart" );

        let missing = json!({ "id": 77 });
        assert_eq!( Song::from_intelligence_json( &missing ), Err( ModelError::MissingField( "songInfo" ) ) );
    }


    #[test]
    fn test_dj_program_song() {
        let item = json!({
            "id": 1000,
            "mainSong": { "id": 8, "name": "episode", "duration": 60000, "artists": [ { "id": 1, "name": "dj" } ] }
        });

        let song = Song::from_dj_radio_program_json( &item ).unwrap();
        assert_eq!( song.id, 8 );
        assert_eq!( song.duration(), Duration::from_secs( 60 ) );
        assert_eq!( song.artists[ 0 ].name, "dj" );
    }


    #[test]
    fn test_album_artists_fallback() {
        let with_array = json!({
            "id": 1, "name": "A", "publishTime": 1600000000000_i64,
            "artists": [ { "id": 2, "name": "B" } ],
            "artist": { "id": 3, "name": "C" }
        });
        let album = Album::from_album_json( &with_array ).unwrap();
        assert_eq!( album.publish_time, 1600000000000 );
        assert_eq!( album.artists.len(), 1 );
        assert_eq!( album.artists[ 0 ].id, 2 );

        let single = json!({ "id": 1, "artist": { "id": 3, "name": "C" } });
        let album = Album::from_album_json( &single ).unwrap();
        assert_eq!( album.artists[ 0 ].name, "C" );
    }


    #[test]
    fn test_artist_pic_fallback() {
        let item = json!({ "id": 1, "name": "n", "img1v1Url": "http://img" });
        assert_eq!( Artist::from_json( &item ).unwrap().pic_url, "http://img" );

        let item = json!({ "id": 1, "picUrl": "http://pic", "img1v1Url": "http://img" });
        assert_eq!( Artist::from_json( &item ).unwrap().pic_url, "http://pic" );
    }


    #[test]
    fn test_user_and_radio() {
        let user = User::from_search_result_json( &json!({ "userId": 42, "nickname": "fox" }) ).unwrap();
        assert_eq!( user.user_id, 42 );
        assert_eq!( user.nickname, "fox" );

        assert_eq!(
            User::from_search_result_json( &json!({ "id": 42 }) ),
            Err( ModelError::MissingId( "userId" ) )
        );

        let radio = DjRadio::from_json( &json!({
            "id": 3, "name": "night", "dj": { "userId": 9, "nickname": "host" }
        }) ).unwrap();
        assert_eq!( radio.dj.user_id, 9 );
        assert_eq!( radio.dj.nickname, "host" );
    }


    #[test]
    fn test_playlist() {
        let playlist = Playlist::from_json( &json!({ "id": 24381616, "name": "liked" }) ).unwrap();
        assert_eq!( playlist, Playlist { id: 24381616, name: "liked".into() } );
    }
}
