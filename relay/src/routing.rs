//! HashMap-based route table keyed by `[METHOD] path`.
//!
//! Paths are matched exactly. A path that is mounted for some other method
//! resolves to [`RouteMatch::MethodNotAllowed`] so the server can answer
//! `405` instead of `404`.

use relay_core::{Method, RegistryError, Route};
use std::collections::HashMap;

/// Result of looking a route up.
#[derive(Debug)]
pub enum RouteMatch<'a, V> {
    /// The route is mounted.
    Matched(&'a V),
    /// The path is mounted, but only for these methods.
    MethodNotAllowed(&'a [Method]),
    /// Nothing is mounted on the path.
    NotFound,
}

impl<'a, V> RouteMatch<'a, V> {
    /// The matched value, if any.
    pub fn matched(self) -> Option<&'a V> {
        match self {
            RouteMatch::Matched(value) => Some(value),
            _ => None,
        }
    }
}

/// An immutable route table.
pub struct RouteTable<V> {
    map: HashMap<Route, V>,
    methods: HashMap<String, Vec<Method>>,
}

impl<V> RouteTable<V> {
    /// Look `route` up.
    pub fn lookup(&self, route: &Route) -> RouteMatch<'_, V> {
        if let Some(value) = self.map.get(route) {
            return RouteMatch::Matched(value);
        }
        match self.methods.get(route.path()) {
            Some(methods) => RouteMatch::MethodNotAllowed(methods),
            None => RouteMatch::NotFound,
        }
    }

    /// Iterate over the mounted routes and their values.
    pub fn iter(&self) -> impl Iterator<Item = (&Route, &V)> {
        self.map.iter()
    }

    /// Get the number of routes.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Builder for [`RouteTable`]. Duplicate routes are rejected.
pub struct RouteTableBuilder<V> {
    map: HashMap<Route, V>,
}

impl<V> Default for RouteTableBuilder<V> {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
        }
    }
}

impl<V> RouteTableBuilder<V> {
    /// Returns `true` if `route` is already taken.
    pub fn contains(&self, route: &Route) -> bool {
        self.map.contains_key(route)
    }

    /// Insert a route.
    pub fn insert(&mut self, route: Route, value: V) -> Result<(), RegistryError> {
        if self.contains(&route) {
            return Err(RegistryError::DuplicateRoute(route));
        }
        self.map.insert(route, value);
        Ok(())
    }

    /// Get the number of routes.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the builder has no routes.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Freeze the table.
    pub fn build(self) -> RouteTable<V> {
        let mut methods: HashMap<String, Vec<Method>> = HashMap::new();
        for route in self.map.keys() {
            methods
                .entry(route.path().to_string())
                .or_default()
                .push(route.method().clone());
        }
        for list in methods.values_mut() {
            list.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        }
        RouteTable {
            map: self.map,
            methods,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_routing() {
        let mut builder = RouteTableBuilder::default();
        builder.insert(Route::post("/github"), 1).unwrap();
        builder.insert(Route::post("/gerrit"), 2).unwrap();
        let table = builder.build();

        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup(&Route::post("/github")).matched(), Some(&1));
        assert_eq!(table.lookup(&Route::post("/gerrit")).matched(), Some(&2));
        assert!(matches!(table.lookup(&Route::post("/gitlab")), RouteMatch::NotFound));
    }

    #[test]
    fn test_other_method_is_not_allowed() {
        let mut builder = RouteTableBuilder::default();
        builder.insert(Route::post("/github"), ()).unwrap();
        let table = builder.build();

        match table.lookup(&Route::new(Method::GET, "/github")) {
            RouteMatch::MethodNotAllowed(methods) => assert_eq!(methods, &[Method::POST]),
            other => panic!("unexpected match: {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_route_error() {
        let mut builder = RouteTableBuilder::default();
        builder.insert(Route::post("/github"), 1).unwrap();
        let err = builder.insert(Route::post("/github"), 2).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateRoute(route) if route == Route::post("/github")));

        // Same path, different method is a different route.
        builder.insert(Route::new(Method::PUT, "/github"), 3).unwrap();
        assert_eq!(builder.len(), 2);
    }

    #[test]
    fn test_paths_match_exactly() {
        let mut builder = RouteTableBuilder::default();
        builder.insert(Route::post("/github"), 1).unwrap();
        let table = builder.build();
        assert!(matches!(table.lookup(&Route::post("/github/")), RouteMatch::NotFound));
    }
}
