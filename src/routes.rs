//! Static route table and base-path-independent path resolution
//!
//! Routes are fixed at startup: every valid path is enumerated explicitly
//! and maps to one handler identifier. Per-request data never travels in
//! path segments.

use std::collections::HashMap;

/// Handler identifier for a registered route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTarget {
    Login,
    Logout,
    Dashboard,
    UserList,
    UserCreate,
    UserEdit,
    UserDelete,
    Kanban,
    TaskUpdate,
    TaskCreate,
}

/// Immutable mapping from route key to handler, aware of the deployment's
/// base path
pub struct RouteTable {
    base_path: String,
    routes: HashMap<&'static str, RouteTarget>,
}

impl RouteTable {
    /// Build the fixed route table for a deployment base path
    pub fn new(base_path: &str) -> Self {
        Self {
            base_path: normalize_base_path(base_path),
            routes: define_routes(),
        }
    }

    /// Normalized base path: empty, or `/`-prefixed with no trailing slash
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Base-path-prefixed target for redirects and links
    pub fn url(&self, path: &str) -> String {
        let path = if path.is_empty() { "/" } else { path };

        if path.starts_with('/')
            && !self.base_path.is_empty()
            && !path.starts_with(self.base_path.as_str())
        {
            format!("{}{}", self.base_path, path)
        } else {
            path.to_string()
        }
    }

    /// Reduce a request path to its route key: strip the base-path prefix,
    /// trim surrounding slashes
    pub fn route_key<'a>(&self, path: &'a str) -> &'a str {
        let path = if !self.base_path.is_empty() {
            path.strip_prefix(self.base_path.as_str()).unwrap_or(path)
        } else {
            path
        };
        path.trim_matches('/')
    }

    /// Look the request path up in the route table
    pub fn resolve(&self, path: &str) -> Option<RouteTarget> {
        self.routes.get(self.route_key(path)).copied()
    }
}

fn define_routes() -> HashMap<&'static str, RouteTarget> {
    use RouteTarget::*;

    HashMap::from([
        ("", Login),
        ("auth/login", Login),
        ("auth/logout", Logout),
        ("dashboard", Dashboard),
        ("dashboard/users", UserList),
        ("dashboard/user/create", UserCreate),
        ("dashboard/user/edit", UserEdit),
        ("dashboard/user/delete", UserDelete),
        ("tasks/kanban", Kanban),
        ("tasks/update", TaskUpdate),
        ("tasks/create", TaskCreate),
    ])
}

fn normalize_base_path(raw: &str) -> String {
    let cleaned = raw.replace('\\', "/");
    let trimmed = cleaned.trim_matches('/');

    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
