//! Route registry and hash resolution.

use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("Route name must be non-empty and made of [a-z0-9-]: '{0}'")]
    InvalidName(String),
}

/// Mapping from route name to fragment locator.
///
/// The default route is registered on construction, so every lookup that
/// misses has somewhere to land.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: BTreeMap<String, String>,
    default_route: String,
}

impl RouteTable {
    /// Create a table whose default route is `name`, served from `locator`.
    pub fn new(name: &str, locator: &str) -> Result<Self, RouteError> {
        validate_name(name)?;
        let mut routes = BTreeMap::new();
        routes.insert(name.to_string(), locator.to_string());
        Ok(Self {
            routes,
            default_route: name.to_string(),
        })
    }

    /// Register another route. Registering an existing name replaces its
    /// locator.
    pub fn with_route(mut self, name: &str, locator: &str) -> Result<Self, RouteError> {
        validate_name(name)?;
        self.routes.insert(name.to_string(), locator.to_string());
        Ok(self)
    }

    pub fn default_route(&self) -> &str {
        &self.default_route
    }

    pub fn contains(&self, name: &str) -> bool {
        self.routes.contains_key(name)
    }

    pub fn locator(&self, name: &str) -> Option<&str> {
        self.routes.get(name).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    /// Resolve a navigation hash to a registered route name.
    ///
    /// Accepts `#about`, `#/about`, `about` and ignores a trailing `?query`.
    /// Anything else, including an empty hash, yields the default route.
    pub fn resolve(&self, hash: &str) -> &str {
        let name = hash.trim();
        let name = name.strip_prefix('#').unwrap_or(name);
        let name = name.strip_prefix('/').unwrap_or(name);
        let name = name.split('?').next().unwrap_or_default();

        match self.routes.get_key_value(name) {
            Some((registered, _)) => registered,
            None => &self.default_route,
        }
    }
}

/// The site's standard pages. `home` is the default.
pub fn site_routes() -> RouteTable {
    let table = ["about", "services", "gallery", "contact", "privacy"]
        .into_iter()
        .fold(RouteTable::new("home", "pages/home.html"), |table, name| {
            table.and_then(|t| t.with_route(name, &format!("pages/{}.html", name)))
        });
    table.expect("built-in route names are valid")
}

fn validate_name(name: &str) -> Result<(), RouteError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(RouteError::InvalidName(name.to_string()))
    }
}
