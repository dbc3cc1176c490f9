use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackageQueryError {
    #[error("Package queries are not supported on this platform")]
    Unsupported,
    #[error("Package query for {family_name} failed: {details}")]
    QueryFailed {
        family_name: String,
        details: String,
    },
}

/// Read access to the OS package catalog for the current user.
pub trait PackageQuery {
    /// Major version of the first package installed under `family_name`,
    /// or `None` when no such package is installed.
    ///
    /// # Errors
    /// Returns an error when the package catalog cannot be queried at all.
    fn installed_major_version(&self, family_name: &str) -> Result<Option<u32>, PackageQueryError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPackageQuery;

impl SystemPackageQuery {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_os = "windows")]
impl PackageQuery for SystemPackageQuery {
    fn installed_major_version(
        &self,
        family_name: &str,
    ) -> Result<Option<u32>, PackageQueryError> {
        use windows::Management::Deployment::PackageManager;
        use windows::core::HSTRING;

        let failed = |error: windows::core::Error| PackageQueryError::QueryFailed {
            family_name: family_name.to_string(),
            details: error.to_string(),
        };

        let manager = PackageManager::new().map_err(failed)?;
        // An empty security id means "the current user".
        let packages = manager
            .FindPackagesByUserSecurityIdPackageFamilyName(
                &HSTRING::new(),
                &HSTRING::from(family_name),
            )
            .map_err(failed)?;
        let iterator = packages.First().map_err(failed)?;
        if !iterator.HasCurrent().map_err(failed)? {
            return Ok(None);
        }

        let package = iterator.Current().map_err(failed)?;
        let version = package
            .Id()
            .and_then(|id| id.Version())
            .map_err(failed)?;
        log::debug!(
            "Found package {family_name} version {}.{}.{}",
            version.Major,
            version.Minor,
            version.Build
        );
        Ok(Some(u32::from(version.Major)))
    }
}

#[cfg(not(target_os = "windows"))]
impl PackageQuery for SystemPackageQuery {
    fn installed_major_version(
        &self,
        _family_name: &str,
    ) -> Result<Option<u32>, PackageQueryError> {
        Err(PackageQueryError::Unsupported)
    }
}
