//! Path routing for the two catalog views.

use crate::validation;

/// Where a path leads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// `/`: the listing view.
    Home,
    /// `/pokemon/{id}`: the detail view.
    Detail(u32),
    /// Anything else.
    NotFound,
}

impl Route {
    /// Matches a path. Query strings and fragments are ignored, as is a
    /// single trailing slash. Detail ids must be positive integers.
    pub fn parse(path: &str) -> Self {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let trimmed = if path.len() > 1 {
            path.strip_suffix('/').unwrap_or(path)
        } else {
            path
        };

        if trimmed == "/" || trimmed.is_empty() {
            return Route::Home;
        }

        let segments: Vec<&str> = trimmed.trim_start_matches('/').split('/').collect();
        match segments.as_slice() {
            ["pokemon", id] => validation::parse_id(id)
                .map(Route::Detail)
                .unwrap_or(Route::NotFound),
            _ => Route::NotFound,
        }
    }

    /// Canonical path for this route.
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Detail(id) => format!("/pokemon/{}", id),
            Route::NotFound => "/404".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_is_home() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("/?page=2"), Route::Home);
    }

    #[test]
    fn detail_route() {
        assert_eq!(Route::parse("/pokemon/25"), Route::Detail(25));
        assert_eq!(Route::parse("/pokemon/25/"), Route::Detail(25));
        assert_eq!(Route::parse("/pokemon/25#stats"), Route::Detail(25));
    }

    #[test]
    fn bad_ids_are_not_found() {
        assert_eq!(Route::parse("/pokemon/pikachu"), Route::NotFound);
        assert_eq!(Route::parse("/pokemon/0"), Route::NotFound);
        assert_eq!(Route::parse("/pokemon/"), Route::NotFound);
    }

    #[test]
    fn unknown_paths_are_not_found() {
        assert_eq!(Route::parse("/berries/1"), Route::NotFound);
        assert_eq!(Route::parse("/pokemon/25/moves"), Route::NotFound);
    }

    #[test]
    fn path_round_trip() {
        assert_eq!(Route::parse(&Route::Detail(7).path()), Route::Detail(7));
        assert_eq!(Route::parse(&Route::Home.path()), Route::Home);
    }
}
