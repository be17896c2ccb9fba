use reqwest::Url;

use super::EncodedToken;
use crate::errors::DecodeError;
use crate::prelude::Result;
use crate::Error;

pub const EXECUTE_TRANSACTION_PATH: &str = "execute-transaction";
pub const TOKEN_QUERY_PARAM: &str = "transactionId";

/// Builds `<base_url>/execute-transaction?transactionId=<token>`.
pub fn share_link(base_url: &str, token: &EncodedToken) -> Result<String> {
    let mut url = Url::parse(base_url)
        .map_err(|e| Error::Config(format!("invalid base url {base_url:?}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(Error::Config(format!("base url {base_url:?} cannot carry a path")));
    }

    let path = format!(
        "{}/{}",
        url.path().trim_end_matches('/'),
        EXECUTE_TRANSACTION_PATH
    );
    url.set_path(&path);
    url.query_pairs_mut()
        .clear()
        .append_pair(TOKEN_QUERY_PARAM, token.as_str());
    Ok(url.into())
}

/// Pulls the token out of a share link. A bare token is passed through.
pub fn token_from_link(link: &str) -> std::result::Result<EncodedToken, DecodeError> {
    let link = link.trim();
    if link.is_empty() {
        return Err(DecodeError::MalformedToken("empty link".to_string()));
    }
    if !link.contains("://") {
        return Ok(EncodedToken::new(link));
    }

    let url = Url::parse(link).map_err(|e| DecodeError::MalformedToken(e.to_string()))?;
    url.query_pairs()
        .find(|(key, _)| key == TOKEN_QUERY_PARAM)
        .map(|(_, value)| EncodedToken::new(value.into_owned()))
        .filter(|token| !token.as_str().is_empty())
        .ok_or_else(|| {
            DecodeError::MalformedToken(format!("link has no {TOKEN_QUERY_PARAM} parameter"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_link_appends_path_and_token() {
        let token = EncodedToken::new("AQID-_xyz");
        let link = share_link("http://localhost:3000", &token).unwrap();
        assert_eq!(
            link,
            "http://localhost:3000/execute-transaction?transactionId=AQID-_xyz"
        );
    }

    #[test]
    fn test_share_link_keeps_base_path() {
        let token = EncodedToken::new("tok");
        let link = share_link("https://app.example/intents/", &token).unwrap();
        assert_eq!(
            link,
            "https://app.example/intents/execute-transaction?transactionId=tok"
        );
    }

    #[test]
    fn test_token_from_link_round_trips() {
        let token = EncodedToken::new("AQID-_xyz");
        let link = share_link("https://app.example", &token).unwrap();
        assert_eq!(token_from_link(&link).unwrap(), token);
    }

    #[test]
    fn test_bare_token_passes_through() {
        assert_eq!(token_from_link(" AQID ").unwrap(), EncodedToken::new("AQID"));
    }

    #[test]
    fn test_link_without_token_is_malformed() {
        assert!(matches!(
            token_from_link("https://app.example/execute-transaction?other=1"),
            Err(DecodeError::MalformedToken(_))
        ));
        assert!(token_from_link("").is_err());
    }
}
