use crate::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Upload,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Dashboard => "/dashboard",
            Self::Upload => "/upload",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "/login" => Some(Self::Login),
            "/dashboard" => Some(Self::Dashboard),
            "/upload" => Some(Self::Upload),
            _ => None,
        }
    }

    pub fn requires_session(self) -> bool {
        !matches!(self, Self::Login)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    /// `from` holds the originally requested path so login can send the user back.
    Redirect { to: Route, from: Option<String> },
    NotFound(String),
}

pub fn resolve(path: &str, session: Option<&Session>) -> Navigation {
    let path = normalize(path);
    if path == "/" {
        return Navigation::Redirect {
            to: Route::Dashboard,
            from: None,
        };
    }

    let Some(route) = Route::from_path(&path) else {
        return Navigation::NotFound(path);
    };

    if route.requires_session() && session.is_none() {
        return Navigation::Redirect {
            to: Route::Login,
            from: Some(path),
        };
    }

    Navigation::Render(route)
}

pub fn post_login_target(from: Option<&str>) -> &str {
    match from {
        Some(path) if !path.is_empty() => path,
        _ => Route::Dashboard.path(),
    }
}

fn normalize(path: &str) -> String {
    let trimmed = path.trim();
    let with_slash = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    };
    if with_slash.len() > 1 {
        with_slash.trim_end_matches('/').to_string()
    } else {
        with_slash
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::User;

    fn session() -> Session {
        Session {
            user: User::from_email("usr_1", "me@example.com"),
            token: "tok".to_string(),
        }
    }

    #[test]
    fn root_redirects_to_dashboard() {
        assert_eq!(
            resolve("/", None),
            Navigation::Redirect {
                to: Route::Dashboard,
                from: None
            }
        );
    }

    #[test]
    fn gated_route_without_session_keeps_requested_path() {
        assert_eq!(
            resolve("/upload", None),
            Navigation::Redirect {
                to: Route::Login,
                from: Some("/upload".to_string())
            }
        );
        assert_eq!(
            resolve("upload/", Some(&session())),
            Navigation::Render(Route::Upload)
        );
    }

    #[test]
    fn login_is_public_and_unknown_paths_are_not_found() {
        assert_eq!(resolve("/login", None), Navigation::Render(Route::Login));
        assert_eq!(
            resolve("/settings", Some(&session())),
            Navigation::NotFound("/settings".to_string())
        );
    }

    #[test]
    fn post_login_defaults_to_dashboard() {
        assert_eq!(post_login_target(None), "/dashboard");
        assert_eq!(post_login_target(Some("/upload")), "/upload");
    }
}
