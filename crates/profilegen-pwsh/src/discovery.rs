use std::path::Path;

use log::{debug, info, warn};
use profilegen_platform::{PackageQuery, PackageQueryError, SystemPackageQuery};

use crate::instance::{PowerShellFlags, PowerShellInstance, rank_instances};
use crate::locations::{SearchLocations, SearchRoot};

pub(crate) const PWSH_EXE: &str = "pwsh.exe";
pub const POWERSHELL_PFN: &str = "Microsoft.PowerShell_8wekyb3d8bbwe";
pub const POWERSHELL_PREVIEW_PFN: &str = "Microsoft.PowerShellPreview_8wekyb3d8bbwe";

/// Scan every location and return instances best-first.
///
/// Nothing here is fatal: missing directories are skipped and failing
/// package queries count as "not installed".
pub fn discover(
    locations: &SearchLocations,
    packages: &dyn PackageQuery,
) -> Vec<PowerShellInstance> {
    let mut instances = Vec::new();

    for root in &locations.program_roots {
        accumulate_traditional_layout(root, &mut instances);
    }

    if let Some(aliases) = &locations.app_execution_aliases {
        accumulate_store_instances(aliases, packages, &mut instances);
    }

    for dir in &locations.user_tool_dirs {
        accumulate_pwsh_in_directory(dir, &mut instances);
    }

    // Profiles carry the path as text; a lossy rendering would launch some
    // other file.
    instances.retain(|instance| {
        let representable = instance.executable_path.to_str().is_some();
        if !representable {
            debug!(
                "Skipping {}: path is not valid Unicode",
                instance.executable_path.display()
            );
        }
        representable
    });

    rank_instances(&mut instances);

    info!("Discovered {} PowerShell instance(s)", instances.len());
    for instance in &instances {
        debug!(
            "  {} [{}] {}",
            instance.name(),
            instance.flags,
            instance.executable_path.display()
        );
    }

    instances
}

/// Leading decimal digits of a versioned directory name (`7`, `7-preview`,
/// `7.4` all give 7). Names that do not start with a digit have no version.
pub(crate) fn parse_major_version(dir_name: &str) -> Option<u32> {
    let end = dir_name
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(dir_name.len());
    dir_name[..end].parse().ok()
}

/// Installs laid out as `<root>\<version>\pwsh.exe`.
fn accumulate_traditional_layout(root: &SearchRoot, out: &mut Vec<PowerShellInstance>) {
    if !root.path.exists() {
        return;
    }

    let entries = match std::fs::read_dir(&root.path) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Failed to read {}: {e}", root.path.display());
            return;
        }
    };

    for entry in entries.flatten() {
        let versioned_path = entry.path();
        let executable = versioned_path.join(PWSH_EXE);
        if !executable.exists() {
            continue;
        }

        let dir_name = entry.file_name().to_string_lossy().into_owned();
        let Some(major_version) = parse_major_version(&dir_name) else {
            debug!(
                "Skipping {}: directory name is not a version",
                versioned_path.display()
            );
            continue;
        };

        let mut flags = PowerShellFlags::TRADITIONAL | root.flags;
        if dir_name.contains("-preview") {
            flags |= PowerShellFlags::PREVIEW;
        }
        out.push(PowerShellInstance::new(major_version, flags, executable));
    }
}

/// Packaged installs exposed through app execution aliases. Preview is
/// scanned before stable.
fn accumulate_store_instances(
    aliases_dir: &Path,
    packages: &dyn PackageQuery,
    out: &mut Vec<PowerShellInstance>,
) {
    if !aliases_dir.exists() {
        return;
    }

    let families = [
        (
            POWERSHELL_PREVIEW_PFN,
            PowerShellFlags::STORE | PowerShellFlags::PREVIEW,
        ),
        (POWERSHELL_PFN, PowerShellFlags::STORE),
    ];

    for (family_name, flags) in families {
        let alias_path = aliases_dir.join(family_name);
        if !alias_path.exists() {
            continue;
        }
        if let Some(major_version) = query_major_version(packages, family_name) {
            out.push(PowerShellInstance::new(
                major_version,
                flags,
                alias_path.join(PWSH_EXE),
            ));
        }
    }
}

fn query_major_version(packages: &dyn PackageQuery, family_name: &str) -> Option<u32> {
    match packages.installed_major_version(family_name) {
        Ok(version) => {
            if version.is_none() {
                debug!("No package installed for {family_name}");
            }
            version
        }
        Err(PackageQueryError::Unsupported) => {
            debug!("Package queries unsupported, skipping {family_name}");
            None
        }
        Err(e) => {
            warn!("{e}");
            None
        }
    }
}

/// A bare `pwsh.exe` in a tool directory; its version cannot be determined.
fn accumulate_pwsh_in_directory(dir: &SearchRoot, out: &mut Vec<PowerShellInstance>) {
    let executable = dir.path.join(PWSH_EXE);
    if executable.exists() {
        out.push(PowerShellInstance::new(0, dir.flags, executable));
    }
}

/// Discovery that scans once and hands out the cached result afterwards.
///
/// The cache is never invalidated on its own; call [`rescan`] to pick up
/// installs that appeared after the first scan.
///
/// [`rescan`]: PowerShellDiscovery::rescan
pub struct PowerShellDiscovery {
    locations: SearchLocations,
    packages: Box<dyn PackageQuery>,
    cache: Option<Vec<PowerShellInstance>>,
}

impl PowerShellDiscovery {
    #[must_use]
    pub fn new(locations: SearchLocations, packages: Box<dyn PackageQuery>) -> Self {
        Self {
            locations,
            packages,
            cache: None,
        }
    }

    #[must_use]
    pub fn for_host() -> Self {
        Self::new(SearchLocations::for_host(), Box::new(SystemPackageQuery::new()))
    }

    #[must_use]
    pub fn locations(&self) -> &SearchLocations {
        &self.locations
    }

    #[must_use]
    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    pub fn instances(&mut self) -> &[PowerShellInstance] {
        self.cache
            .get_or_insert_with(|| discover(&self.locations, self.packages.as_ref()))
    }

    pub fn rescan(&mut self) -> &[PowerShellInstance] {
        self.cache = None;
        self.instances()
    }
}

impl std::fmt::Debug for PowerShellDiscovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PowerShellDiscovery")
            .field("locations", &self.locations)
            .field("cached", &self.cache.as_ref().map(Vec::len))
            .finish_non_exhaustive()
    }
}
