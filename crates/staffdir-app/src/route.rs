//! Route table.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    List,
    Details(String),
    PhotoResult,
    Charts,
    Map,
}

impl Route {
    /// Parse a route path. `/` is an alias for `/login`; unknown paths and
    /// `/details/` without an id yield `None`.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.trim();
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" | "/login" => Some(Self::Login),
            "/list" => Some(Self::List),
            "/photo-result" => Some(Self::PhotoResult),
            "/charts" => Some(Self::Charts),
            "/map" => Some(Self::Map),
            _ => {
                let id = trimmed.strip_prefix("/details/")?;
                (!id.is_empty() && !id.contains('/')).then(|| Self::Details(id.to_string()))
            }
        }
    }

    /// Every route except the login entry point needs an authenticated session.
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Login)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => f.write_str("/login"),
            Self::List => f.write_str("/list"),
            Self::Details(id) => write!(f, "/details/{id}"),
            Self::PhotoResult => f.write_str("/photo-result"),
            Self::Charts => f.write_str("/charts"),
            Self::Map => f.write_str("/map"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_paths() {
        assert_eq!(Route::parse("/"), Some(Route::Login));
        assert_eq!(Route::parse("/login"), Some(Route::Login));
        assert_eq!(Route::parse("/list/"), Some(Route::List));
        assert_eq!(Route::parse("/details/7"), Some(Route::Details("7".into())));
        assert_eq!(Route::parse("/photo-result"), Some(Route::PhotoResult));
        assert_eq!(Route::parse("/charts"), Some(Route::Charts));
        assert_eq!(Route::parse("/map"), Some(Route::Map));
    }

    #[test]
    fn rejects_unknown_paths() {
        assert_eq!(Route::parse("/details/"), None);
        assert_eq!(Route::parse("/details/1/edit"), None);
        assert_eq!(Route::parse("/admin"), None);
        assert_eq!(Route::parse("list"), None);
    }

    #[test]
    fn display_round_trips() {
        for route in [
            Route::Login,
            Route::List,
            Route::Details("12".into()),
            Route::PhotoResult,
            Route::Charts,
            Route::Map,
        ] {
            assert_eq!(Route::parse(&route.to_string()), Some(route));
        }
    }

    #[test]
    fn only_login_is_public() {
        assert!(!Route::Login.requires_auth());
        assert!(Route::List.requires_auth());
        assert!(Route::Details("1".into()).requires_auth());
        assert!(Route::PhotoResult.requires_auth());
        assert!(Route::Charts.requires_auth());
        assert!(Route::Map.requires_auth());
    }
}
