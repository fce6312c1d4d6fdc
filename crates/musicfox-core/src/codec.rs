//! Storage key encoding for numeric IDs.
//!
//! IDs are stored as 8-byte big-endian keys so that byte order matches
//! numeric order.

use thiserror::Error;


/// Width of an encoded ID in bytes.
pub const ID_LEN: usize = 8;


/// Errors that can occur while decoding an ID.
#[derive( Debug, Error, PartialEq, Eq )]
pub enum CodecError {
    #[error( "ID key too short: expected 8 bytes, got {0}" )]
    TooShort( usize ),
}


/// Encodes an ID as an 8-byte big-endian key.
pub fn id_to_bin( id: u64 ) -> [u8; ID_LEN] {
    id.to_be_bytes()
}


/// Decodes an ID from the first 8 bytes of a big-endian key.
///
/// Bytes past the eighth are ignored.
pub fn bin_to_id( bin: &[u8] ) -> Result<u64, CodecError> {
    let head: [u8; ID_LEN] = bin.get( ..ID_LEN )
        .and_then( |b| b.try_into().ok() )
        .ok_or( CodecError::TooShort( bin.len() ) )?;

    Ok( u64::from_be_bytes( head ) )
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_encode_is_big_endian() {
        assert_eq!( id_to_bin( 1 ), [0, 0, 0, 0, 0, 0, 0, 1] );
        assert_eq!( id_to_bin( 0x0102_0304_0506_0708 ), [1, 2, 3, 4, 5, 6, 7, 8] );
    }


    #[test]
    fn test_decode() {
        assert_eq!( bin_to_id( &[0, 0, 0, 0, 0, 0, 0x01, 0x00] ), Ok( 256 ) );
        assert_eq!( bin_to_id( &id_to_bin( u64::MAX ) ), Ok( u64::MAX ) );
    }


    #[test]
    fn test_decode_ignores_trailing_bytes() {
        assert_eq!( bin_to_id( &[0, 0, 0, 0, 0, 0, 0, 7, 0xff, 0xff] ), Ok( 7 ) );
    }


    #[test]
    fn test_decode_too_short() {
        assert_eq!( bin_to_id( &[1, 2, 3] ), Err( CodecError::TooShort( 3 ) ) );
        assert_eq!( bin_to_id( &[] ), Err( CodecError::TooShort( 0 ) ) );
    }


    #[test]
    fn test_keys_sort_like_ids() {
        let mut ids = vec![ 300_u64, 2, 1 << 40, 0, 255, 256 ];
        let mut keys: Vec<_> = ids.iter().map( |&id| id_to_bin( id ) ).collect();

        ids.sort();
        keys.sort();

        let decoded: Vec<u64> = keys.iter().map( |k| bin_to_id( k ).unwrap() ).collect();
        assert_eq!( decoded, ids );
    }
}
