//! Classification of upstream response codes.

use std::fmt;

use serde_json::Value;

use crate::model::User;


/// Client-side outcome of an API call.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash )]
#[repr( u8 )]
pub enum ResCode {
    Success,
    UnknownError,
    NetworkError,
    NeedLogin,
    PasswordError,
}


impl fmt::Display for ResCode {
    fn fmt( &self, f: &mut fmt::Formatter<'_> ) -> fmt::Result {
        let message = match self {
            ResCode::Success => "success",
            ResCode::UnknownError => "unknown error",
            ResCode::NetworkError => "network error",
            ResCode::NeedLogin => "login required",
            ResCode::PasswordError => "wrong password",
        };
        f.write_str( message )
    }
}


/// Maps an upstream `code` field to a client result.
///
/// Every code that is not recognised counts as a credential failure.
pub fn check_code( code: f64 ) -> ResCode {
    match code {
        c if c == 301.0 || c == 302.0 => ResCode::NeedLogin,
        c if c == 520.0 => ResCode::NetworkError,
        c if c == 200.0 => ResCode::Success,
        _ => ResCode::PasswordError,
    }
}


/// Checks that a user is logged in.
pub fn check_user_info( user: Option<&User> ) -> ResCode {
    match user {
        Some( u ) if u.user_id != 0 => ResCode::Success,
        _ => ResCode::NeedLogin,
    }
}


/// Reads the top-level numeric `code` of a response body.
pub fn code_of( data: &[u8] ) -> Option<f64> {
    let value: Value = match serde_json::from_slice( data ) {
        Ok( v ) => v,
        Err( e ) => {
            tracing::debug!( "Response is not valid JSON: {}", e );
            return None;
        }
    };

    value.get( "code" ).and_then( Value::as_f64 )
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_check_code() {
        assert_eq!( check_code( 200.0 ), ResCode::Success );
        assert_eq!( check_code( 301.0 ), ResCode::NeedLogin );
        assert_eq!( check_code( 302.0 ), ResCode::NeedLogin );
        assert_eq!( check_code( 520.0 ), ResCode::NetworkError );
    }


    #[test]
    fn test_unrecognised_codes_are_password_errors() {
        assert_eq!( check_code( 400.0 ), ResCode::PasswordError );
        assert_eq!( check_code( 502.0 ), ResCode::PasswordError );
        assert_eq!( check_code( 200.5 ), ResCode::PasswordError );
        assert_eq!( check_code( f64::NAN ), ResCode::PasswordError );
    }


    #[test]
    fn test_check_user_info() {
        assert_eq!( check_user_info( None ), ResCode::NeedLogin );

        let anonymous = User::default();
        assert_eq!( check_user_info( Some( &anonymous ) ), ResCode::NeedLogin );

        let user = User { user_id: 1, ..User::default() };
        assert_eq!( check_user_info( Some( &user ) ), ResCode::Success );
    }


    #[test]
    fn test_code_of() {
        assert_eq!( code_of( br#"{"code":301,"msg":"need login"}"# ), Some( 301.0 ) );
        assert_eq!( code_of( br#"{"msg":"no code"}"# ), None );
        assert_eq!( code_of( b"not json" ), None );
    }


    #[test]
    fn test_repr_order() {
        assert_eq!( ResCode::Success as u8, 0 );
        assert_eq!( ResCode::PasswordError as u8, 4 );
    }
}
