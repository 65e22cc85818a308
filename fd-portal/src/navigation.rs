//! Role-based routing: where each kind of user belongs and which pages they
//! may see.

use crate::models::session::{UserInfo, UserType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    Login,
    Register,
    Calculator,
    AdminConsole,
    Dashboard,
    Profile,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Calculator => "/calculator",
            Route::AdminConsole => "/admin",
            Route::Dashboard => "/dashboard",
            Route::Profile => "/profile",
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        [
            Route::Landing,
            Route::Login,
            Route::Register,
            Route::Calculator,
            Route::AdminConsole,
            Route::Dashboard,
            Route::Profile,
        ]
        .into_iter()
        .find(|route| route.path() == path)
    }

    fn access(self) -> Access {
        match self {
            Route::Landing | Route::Calculator => Access::Public,
            Route::Login | Route::Register => Access::AnonymousOnly,
            Route::AdminConsole => Access::Admin,
            Route::Dashboard | Route::Profile => Access::Customer,
        }
    }
}

enum Access {
    Public,
    AnonymousOnly,
    Admin,
    Customer,
}

/// Post-login destination: admins go to the console, everyone else to the
/// dashboard.
pub fn home_for(user_type: Option<&UserType>) -> Route {
    match user_type {
        Some(UserType::Admin) => Route::AdminConsole,
        _ => Route::Dashboard,
    }
}

/// `Ok` when `user` may view `route`, otherwise the route to send them to.
pub fn authorize(route: Route, user: Option<&UserInfo>) -> Result<(), Route> {
    match (route.access(), user) {
        (Access::Public, _) => Ok(()),
        (Access::AnonymousOnly, None) => Ok(()),
        (Access::AnonymousOnly, Some(user)) => Err(home_for(user.user_type.as_ref())),
        (Access::Admin | Access::Customer, None) => Err(Route::Login),
        (Access::Admin, Some(user)) if user.is_admin() => Ok(()),
        (Access::Admin, Some(_)) => Err(Route::Dashboard),
        (Access::Customer, Some(user)) if user.is_admin() => Err(Route::AdminConsole),
        (Access::Customer, Some(_)) => Ok(()),
    }
}
