//! Addressing for everything the gateway can fetch.

use std::fmt;

use crate::domain::EntityKind;

/// A snapshot or collection served as a static file by the application's own origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaticResource {
    /// `schedule_with_ai.json`
    ScheduleWithAi,
    /// `schedule.json`
    Schedule,
    /// `employees.json`, `locations.json` or `shifts.json`
    Collection(EntityKind),
}

impl StaticResource {
    pub fn file_name(&self) -> String {
        match self {
            StaticResource::ScheduleWithAi => "schedule_with_ai.json".to_string(),
            StaticResource::Schedule => "schedule.json".to_string(),
            StaticResource::Collection(kind) => kind.file_name(),
        }
    }
}

/// Where a fetch is directed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Backend data API: `GET /api/data/{kind}.json`
    Api(EntityKind),
    /// Static fallback file on the application origin
    Static(StaticResource),
}

impl Resource {
    /// Request path relative to the backend or static origin
    pub fn path(&self) -> String {
        match self {
            Resource::Api(kind) => format!("/api/data/{}", kind.file_name()),
            Resource::Static(res) => format!("/{}", res.file_name()),
        }
    }

    pub fn is_static(&self) -> bool {
        matches!(self, Resource::Static(_))
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Timestamp token appended to a request so intermediate caches miss
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheBuster(pub u64);

impl CacheBuster {
    pub fn now() -> Self {
        Self(crate::id::now_ms())
    }

    /// Query pair for data fetches (`t=...`)
    pub fn query(&self) -> (&'static str, String) {
        ("t", self.0.to_string())
    }
}

impl fmt::Display for CacheBuster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-call fetch options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchParams {
    pub cache_buster: Option<CacheBuster>,
}

impl FetchParams {
    pub fn fresh(buster: CacheBuster) -> Self {
        Self {
            cache_buster: Some(buster),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_paths() {
        assert_eq!(Resource::Api(EntityKind::Employee).path(), "/api/data/employees.json");
        assert_eq!(Resource::Api(EntityKind::Shift).path(), "/api/data/shifts.json");
    }

    #[test]
    fn test_static_paths() {
        assert_eq!(Resource::Static(StaticResource::ScheduleWithAi).path(), "/schedule_with_ai.json");
        assert_eq!(Resource::Static(StaticResource::Schedule).path(), "/schedule.json");
        assert_eq!(
            Resource::Static(StaticResource::Collection(EntityKind::Location)).path(),
            "/locations.json"
        );
        assert!(Resource::Static(StaticResource::Schedule).is_static());
        assert!(!Resource::Api(EntityKind::Location).is_static());
    }

    #[test]
    fn test_cache_buster_query() {
        let buster = CacheBuster(1738300800123);
        assert_eq!(buster.query(), ("t", "1738300800123".to_string()));
        assert_eq!(FetchParams::fresh(buster).cache_buster, Some(buster));
        assert!(FetchParams::default().cache_buster.is_none());
    }

    #[test]
    fn test_cache_buster_now_is_recent() {
        assert!(CacheBuster::now().0 > 1_600_000_000_000);
    }
}
