//! List extraction from API responses
//!
//! Each response nests its result array under a fixed key path. The
//! functions here locate that array, build one entity per item and keep
//! the ones that parse, in response order. Anything malformed (the body,
//! the path, or a single item) yields fewer results rather than an error.

use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use crate::model::{ Album, Artist, DjRadio, ModelError, Playlist, Song, User };


/// Extracts the array at `path` from `data`, keeping items `parse` accepts.
pub fn extract_list<T, F>( data: &[u8], path: &[&str], parse: F ) -> Vec<T>
where
    F: Fn( &Value ) -> Result<T, ModelError>,
{
    let root: Value = match serde_json::from_slice( data ) {
        Ok( v ) => v,
        Err( e ) => {
            tracing::debug!( "Skipping unparseable response: {}", e );
            return Vec::new();
        }
    };

    let items = match path.iter().try_fold( &root, |node, key| node.get( key ) ) {
        Some( Value::Array( items ) ) => items,
        Some( _ ) => {
            tracing::debug!( "Value at {:?} is not an array", path );
            return Vec::new();
        }
        None => {
            tracing::debug!( "No value at {:?}", path );
            return Vec::new();
        }
    };

    items.iter()
        .enumerate()
        .filter_map( |( index, item )| match parse( item ) {
            Ok( entity ) => Some( entity ),
            Err( e ) => {
                tracing::trace!( "Dropping item {} at {:?}: {}", index, path, e );
                None
            }
        })
        .collect()
}


/// Daily recommended songs.
pub fn daily_songs( data: &[u8] ) -> Vec<Song> {
    extract_list( data, ListKind::DailySongs.path(), Song::from_daily_songs_json )
}


/// Daily recommended playlists.
pub fn daily_playlists( data: &[u8] ) -> Vec<Playlist> {
    extract_list( data, ListKind::DailyPlaylists.path(), Playlist::from_json )
}


/// Tracks of a playlist.
pub fn songs_of_playlist( data: &[u8] ) -> Vec<Song> {
    extract_list( data, ListKind::SongsOfPlaylist.path(), Song::from_playlist_songs_json )
}


/// Tracks of an album.
pub fn songs_of_album( data: &[u8] ) -> Vec<Song> {
    extract_list( data, ListKind::SongsOfAlbum.path(), Song::from_album_songs_json )
}


/// A user's playlists.
pub fn playlists( data: &[u8] ) -> Vec<Playlist> {
    extract_list( data, ListKind::Playlists.path(), Playlist::from_json )
}


/// Personal FM songs.
pub fn fm_songs( data: &[u8] ) -> Vec<Song> {
    extract_list( data, ListKind::FmSongs.path(), Song::from_fm_json )
}


/// Intelligence (heart mode) songs.
pub fn intelligence_songs( data: &[u8] ) -> Vec<Song> {
    extract_list( data, ListKind::IntelligenceSongs.path(), Song::from_intelligence_json )
}


/// Newly released albums.
pub fn new_albums( data: &[u8] ) -> Vec<Album> {
    extract_list( data, ListKind::NewAlbums.path(), Album::from_album_json )
}


/// Top albums of the month.
pub fn top_albums( data: &[u8] ) -> Vec<Album> {
    extract_list( data, ListKind::TopAlbums.path(), Album::from_album_json )
}


/// An artist's popular albums.
pub fn artist_hot_albums( data: &[u8] ) -> Vec<Album> {
    extract_list( data, ListKind::ArtistHotAlbums.path(), Album::from_album_json )
}


/// Songs of a search response.
pub fn songs_of_search_result( data: &[u8] ) -> Vec<Song> {
    extract_list( data, ListKind::SongsOfSearchResult.path(), Song::from_search_result_json )
}


/// Albums of a search response.
pub fn albums_of_search_result( data: &[u8] ) -> Vec<Album> {
    extract_list( data, ListKind::AlbumsOfSearchResult.path(), Album::from_album_json )
}


/// Playlists of a search response.
pub fn playlists_of_search_result( data: &[u8] ) -> Vec<Playlist> {
    extract_list( data, ListKind::PlaylistsOfSearchResult.path(), Playlist::from_json )
}


/// Artists of a search response.
pub fn artists_of_search_result( data: &[u8] ) -> Vec<Artist> {
    extract_list( data, ListKind::ArtistsOfSearchResult.path(), Artist::from_json )
}


/// An artist's top songs.
pub fn songs_of_artist( data: &[u8] ) -> Vec<Song> {
    extract_list( data, ListKind::SongsOfArtist.path(), Song::from_artist_songs_json )
}


/// User profiles of a search response.
pub fn users_of_search_result( data: &[u8] ) -> Vec<User> {
    extract_list( data, ListKind::UsersOfSearchResult.path(), User::from_search_result_json )
}


/// DJ radios of a search response.
pub fn dj_radios_of_search_result( data: &[u8] ) -> Vec<DjRadio> {
    extract_list( data, ListKind::DjRadiosOfSearchResult.path(), DjRadio::from_json )
}


/// Songs of a DJ radio's program list.
pub fn songs_of_dj_radio( data: &[u8] ) -> Vec<Song> {
    extract_list( data, ListKind::SongsOfDjRadio.path(), Song::from_dj_radio_program_json )
}


/// A list a response can be read as.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash )]
pub enum ListKind {
    DailySongs,
    DailyPlaylists,
    SongsOfPlaylist,
    SongsOfAlbum,
    Playlists,
    FmSongs,
    IntelligenceSongs,
    NewAlbums,
    TopAlbums,
    ArtistHotAlbums,
    SongsOfSearchResult,
    AlbumsOfSearchResult,
    PlaylistsOfSearchResult,
    ArtistsOfSearchResult,
    SongsOfArtist,
    UsersOfSearchResult,
    DjRadiosOfSearchResult,
    SongsOfDjRadio,
}


/// Entities extracted from a response, grouped by type.
#[derive( Debug, Clone, PartialEq, Serialize )]
#[serde( untagged )]
pub enum Extracted {
    Songs( Vec<Song> ),
    Albums( Vec<Album> ),
    Artists( Vec<Artist> ),
    Playlists( Vec<Playlist> ),
    Users( Vec<User> ),
    DjRadios( Vec<DjRadio> ),
}


impl Extracted {
    pub fn len( &self ) -> usize {
        match self {
            Extracted::Songs( v ) => v.len(),
            Extracted::Albums( v ) => v.len(),
            Extracted::Artists( v ) => v.len(),
            Extracted::Playlists( v ) => v.len(),
            Extracted::Users( v ) => v.len(),
            Extracted::DjRadios( v ) => v.len(),
        }
    }


    pub fn is_empty( &self ) -> bool {
        self.len() == 0
    }
}


impl ListKind {
    /// Every kind, in declaration order.
    pub const ALL: [ListKind; 18] = [
        ListKind::DailySongs,
        ListKind::DailyPlaylists,
        ListKind::SongsOfPlaylist,
        ListKind::SongsOfAlbum,
        ListKind::Playlists,
        ListKind::FmSongs,
        ListKind::IntelligenceSongs,
        ListKind::NewAlbums,
        ListKind::TopAlbums,
        ListKind::ArtistHotAlbums,
        ListKind::SongsOfSearchResult,
        ListKind::AlbumsOfSearchResult,
        ListKind::PlaylistsOfSearchResult,
        ListKind::ArtistsOfSearchResult,
        ListKind::SongsOfArtist,
        ListKind::UsersOfSearchResult,
        ListKind::DjRadiosOfSearchResult,
        ListKind::SongsOfDjRadio,
    ];


    /// Key path of the result array inside the response.
    pub fn path( self ) -> &'static [&'static str] {
        match self {
            ListKind::DailySongs => &[ "data", "dailySongs" ],
            ListKind::DailyPlaylists => &[ "recommend" ],
            ListKind::SongsOfPlaylist => &[ "playlist", "tracks" ],
            ListKind::SongsOfAlbum => &[ "songs" ],
            ListKind::Playlists => &[ "playlist" ],
            ListKind::FmSongs => &[ "data" ],
            ListKind::IntelligenceSongs => &[ "data" ],
            ListKind::NewAlbums => &[ "albums" ],
            ListKind::TopAlbums => &[ "monthData" ],
            ListKind::ArtistHotAlbums => &[ "hotAlbums" ],
            ListKind::SongsOfSearchResult => &[ "result", "songs" ],
            ListKind::AlbumsOfSearchResult => &[ "result", "albums" ],
            ListKind::PlaylistsOfSearchResult => &[ "result", "playlists" ],
            ListKind::ArtistsOfSearchResult => &[ "result", "artists" ],
            ListKind::SongsOfArtist => &[ "songs" ],
            ListKind::UsersOfSearchResult => &[ "result", "userprofiles" ],
            ListKind::DjRadiosOfSearchResult => &[ "result", "djRadios" ],
            ListKind::SongsOfDjRadio => &[ "programs" ],
        }
    }


    /// Command-line name of the kind.
    pub fn name( self ) -> &'static str {
        match self {
            ListKind::DailySongs => "daily-songs",
            ListKind::DailyPlaylists => "daily-playlists",
            ListKind::SongsOfPlaylist => "playlist-songs",
            ListKind::SongsOfAlbum => "album-songs",
            ListKind::Playlists => "playlists",
            ListKind::FmSongs => "fm-songs",
            ListKind::IntelligenceSongs => "intelligence-songs",
            ListKind::NewAlbums => "new-albums",
            ListKind::TopAlbums => "top-albums",
            ListKind::ArtistHotAlbums => "artist-hot-albums",
            ListKind::SongsOfSearchResult => "search-songs",
            ListKind::AlbumsOfSearchResult => "search-albums",
            ListKind::PlaylistsOfSearchResult => "search-playlists",
            ListKind::ArtistsOfSearchResult => "search-artists",
            ListKind::SongsOfArtist => "artist-songs",
            ListKind::UsersOfSearchResult => "search-users",
            ListKind::DjRadiosOfSearchResult => "search-dj-radios",
            ListKind::SongsOfDjRadio => "dj-radio-songs",
        }
    }


    /// Runs the matching extraction over a response body.
    pub fn extract( self, data: &[u8] ) -> Extracted {
        match self {
            ListKind::DailySongs => Extracted::Songs( daily_songs( data ) ),
            ListKind::DailyPlaylists => Extracted::Playlists( daily_playlists( data ) ),
            ListKind::SongsOfPlaylist => Extracted::Songs( songs_of_playlist( data ) ),
            ListKind::SongsOfAlbum => Extracted::Songs( songs_of_album( data ) ),
            ListKind::Playlists => Extracted::Playlists( playlists( data ) ),
            ListKind::FmSongs => Extracted::Songs( fm_songs( data ) ),
            ListKind::IntelligenceSongs => Extracted::Songs( intelligence_songs( data ) ),
            ListKind::NewAlbums => Extracted::Albums( new_albums( data ) ),
            ListKind::TopAlbums => Extracted::Albums( top_albums( data ) ),
            ListKind::ArtistHotAlbums => Extracted::Albums( artist_hot_albums( data ) ),
            ListKind::SongsOfSearchResult => Extracted::Songs( songs_of_search_result( data ) ),
            ListKind::AlbumsOfSearchResult => Extracted::Albums( albums_of_search_result( data ) ),
            ListKind::PlaylistsOfSearchResult => Extracted::Playlists( playlists_of_search_result( data ) ),
            ListKind::ArtistsOfSearchResult => Extracted::Artists( artists_of_search_result( data ) ),
            ListKind::SongsOfArtist => Extracted::Songs( songs_of_artist( data ) ),
            ListKind::UsersOfSearchResult => Extracted::Users( users_of_search_result( data ) ),
            ListKind::DjRadiosOfSearchResult => Extracted::DjRadios( dj_radios_of_search_result( data ) ),
            ListKind::SongsOfDjRadio => Extracted::Songs( songs_of_dj_radio( data ) ),
        }
    }
}


impl FromStr for ListKind {
    type Err = String;


    fn from_str( s: &str ) -> Result<Self, Self::Err> {
        let name = s.to_lowercase();
        ListKind::ALL.iter()
            .copied()
            .find( |kind| kind.name() == name )
            .ok_or_else( || format!( "Unknown list kind: '{}'", s ) )
    }
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_daily_songs() {
        let data = br#"{
            "code": 200,
            "data": { "dailySongs": [
                { "id": 1, "name": "one", "dt": 1000, "ar": [ { "id": 10, "name": "a" } ] },
                { "id": 2, "name": "two" }
            ] }
        }"#;

        let songs = daily_songs( data );
        assert_eq!( songs.len(), 2 );
        assert_eq!( songs[ 0 ].name, "one" );
        assert_eq!( songs[ 0 ].artists[ 0 ].id, 10 );
        assert_eq!( songs[ 1 ].id, 2 );
    }


    #[test]
    fn test_malformed_items_are_dropped_in_order() {
        let data = br#"{ "songs": [
            { "id": 1 }, { "name": "no id" }, 7, null, { "id": 3 }, { "id": "4" }, { "id": 5 }
        ] }"#;

        let ids: Vec<i64> = songs_of_album( data ).iter().map( |s| s.id ).collect();
        assert_eq!( ids, vec![ 1, 3, 5 ] );
    }


    #[test]
    fn test_invalid_input_yields_empty() {
        assert!( daily_songs( b"" ).is_empty() );
        assert!( daily_songs( b"{ not json" ).is_empty() );
        assert!( daily_songs( br#"{ "data": {} }"# ).is_empty() );
        assert!( daily_songs( br#"{ "data": { "dailySongs": {} } }"# ).is_empty() );
        assert!( daily_songs( br#"{ "data": [ 1, 2 ] }"# ).is_empty() );
        assert!( playlists( br#"[ { "id": 1 } ]"# ).is_empty() );
    }


    #[test]
    fn test_search_results() {
        let data = br#"{ "result": {
            "songs": [ { "id": 1, "name": "s", "al": { "id": 2, "name": "al" } } ],
            "albums": [ { "id": 3, "name": "a", "artist": { "id": 4, "name": "b" } } ],
            "playlists": [ { "id": 5, "name": "p" } ],
            "artists": [ { "id": 6, "name": "x", "img1v1Url": "http://img" } ],
            "userprofiles": [ { "userId": 7, "nickname": "u" } ],
            "djRadios": [ { "id": 8, "name": "r", "dj": { "userId": 9 } } ]
        } }"#;

        assert_eq!( songs_of_search_result( data )[ 0 ].album.name, "al" );
        assert_eq!( albums_of_search_result( data )[ 0 ].artists[ 0 ].id, 4 );
        assert_eq!( playlists_of_search_result( data )[ 0 ].id, 5 );
        assert_eq!( artists_of_search_result( data )[ 0 ].pic_url, "http://img" );
        assert_eq!( users_of_search_result( data )[ 0 ].nickname, "u" );
        assert_eq!( dj_radios_of_search_result( data )[ 0 ].dj.user_id, 9 );
    }


    #[test]
    fn test_album_lists() {
        let data = br#"{
            "albums": [ { "id": 1 } ],
            "monthData": [ { "id": 2 }, { "id": 3 } ],
            "hotAlbums": [ { "id": 4 }, { "bad": true } ]
        }"#;

        assert_eq!( new_albums( data ).len(), 1 );
        assert_eq!( top_albums( data ).len(), 2 );
        assert_eq!( artist_hot_albums( data ).len(), 1 );
    }


    #[test]
    fn test_playlist_lists() {
        let data = br#"{
            "recommend": [ { "id": 1, "name": "daily" } ],
            "playlist": [ { "id": 2, "name": "mine" }, { "id": 3, "name": "liked" } ]
        }"#;

        assert_eq!( daily_playlists( data )[ 0 ].name, "daily" );
        assert_eq!( playlists( data ).len(), 2 );
    }


    #[test]
    fn test_playlist_tracks_and_artist_songs() {
        let tracks = br#"{ "playlist": { "id": 1, "tracks": [ { "id": 11 }, { "id": 12 } ] } }"#;
        assert_eq!( songs_of_playlist( tracks ).len(), 2 );

        let artist = br#"{ "artist": { "id": 1 }, "songs": [ { "id": 21, "dt": 5 } ] }"#;
        assert_eq!( songs_of_artist( artist )[ 0 ].duration_ms, 5 );
    }


    #[test]
    fn test_fm_and_intelligence() {
        let fm = br#"{ "data": [ { "id": 1, "duration": 3000, "artists": [ { "id": 2 } ] } ] }"#;
        let songs = fm_songs( fm );
        assert_eq!( songs[ 0 ].duration_ms, 3000 );
        assert_eq!( songs[ 0 ].artists.len(), 1 );

        let heart = br#"{ "data": [ { "id": 9, "songInfo": { "id": 1, "dt": 42 } }, { "id": 10 } ] }"#;
        let songs = intelligence_songs( heart );
        assert_eq!( songs.len(), 1 );
        assert_eq!( songs[ 0 ].duration_ms, 42 );
    }


    #[test]
    fn test_dj_radio_programs() {
        let data = br#"{ "programs": [
            { "id": 100, "mainSong": { "id": 1, "name": "ep1", "duration": 60000 } },
            { "id": 101 }
        ] }"#;

        let songs = songs_of_dj_radio( data );
        assert_eq!( songs.len(), 1 );
        assert_eq!( songs[ 0 ].name, "ep1" );
    }


    #[test]
    fn test_list_kind_dispatch() {
        let data = br#"{ "result": { "artists": [ { "id": 1 }, { "id": 2 } ] } }"#;
        let extracted = ListKind::ArtistsOfSearchResult.extract( data );

        assert!( matches!( extracted, Extracted::Artists( ref v ) if v.len() == 2 ) );
        assert!( ListKind::SongsOfSearchResult.extract( data ).is_empty() );
    }


    #[test]
    fn test_list_kind_names_round_trip() {
        for kind in ListKind::ALL {
            assert_eq!( kind.name().parse::<ListKind>(), Ok( kind ) );
        }
        assert_eq!( "BoGus".parse::<ListKind>(), Err( "Unknown list kind: 'BoGus'".to_string() ) );
        assert_eq!( "Daily-Songs".parse::<ListKind>(), Ok( ListKind::DailySongs ) );
    }
}
