//! Display text normalisation.

/// Characters the terminal renders poorly, with their ASCII stand-ins.
const REPLACEMENTS: &[( char, char )] = &[
    ( '“', '"' ),
    ( '”', '"' ),
    ( '·', '.' ),
];


/// Replaces typographic quotes and middle dots with ASCII equivalents.
pub fn replace_special_str( s: &str ) -> String {
    s.chars()
        .map( |c| {
            REPLACEMENTS.iter()
                .find( |( from, _ )| *from == c )
                .map( |( _, to )| *to )
                .unwrap_or( c )
        })
        .collect()
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_replace_special_str() {
        assert_eq!( replace_special_str( "“Hello”·World" ), "\"Hello\".World" );
    }


    #[test]
    fn test_plain_text_untouched() {
        assert_eq!( replace_special_str( "晴天 - 周杰伦" ), "晴天 - 周杰伦" );
        assert_eq!( replace_special_str( "" ), "" );
    }
}
