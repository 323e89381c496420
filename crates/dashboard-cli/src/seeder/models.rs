//! Generated records waiting to be inserted.

/// A fake service together with its versions.
#[derive(Debug, Clone)]
pub struct ServiceSeed {
    pub name: String,
    pub description: String,
    pub versions: Vec<VersionSeed>,
}

#[derive(Debug, Clone)]
pub struct VersionSeed {
    pub name: String,
    pub url: String,
    pub description: String,
}

/// A fake directory user with a profile.
#[derive(Debug, Clone)]
pub struct UserSeed {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// How much fake data one seed run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedConfig {
    pub services: usize,
    pub versions_per_service: usize,
    pub users: usize,
}

impl SeedConfig {
    /// `services` services with three versions each and no extra users.
    pub fn new(services: usize) -> Self {
        Self {
            services,
            versions_per_service: 3,
            users: 0,
        }
    }

    pub fn with_versions(mut self, versions_per_service: usize) -> Self {
        self.versions_per_service = versions_per_service;
        self
    }

    pub fn with_users(mut self, users: usize) -> Self {
        self.users = users;
        self
    }
}

/// Counts from one seed run. Records whose name was already taken are
/// skipped rather than failing the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub services: usize,
    pub versions: usize,
    pub users: usize,
    pub skipped: usize,
}
