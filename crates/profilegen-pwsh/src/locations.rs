use std::path::PathBuf;

use log::debug;
use profilegen_platform::{HostArch, expand_env_template, local_app_data_dir};

use crate::instance::PowerShellFlags;

const PROGRAM_FILES_ROOT: &str = r"%ProgramFiles%\PowerShell";
const PROGRAM_FILES_X86_ROOT: &str = r"%ProgramFiles(x86)%\PowerShell";
const PROGRAM_FILES_ARM_ROOT: &str = r"%ProgramFiles(Arm)%\PowerShell";
const DOTNET_TOOLS_DIR: &str = r"%USERPROFILE%\.dotnet\tools";
const SCOOP_SHIMS_DIR: &str = r"%USERPROFILE%\scoop\shims";

/// A directory to search plus the flags every instance found there carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRoot {
    pub path: PathBuf,
    pub flags: PowerShellFlags,
}

impl SearchRoot {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, flags: PowerShellFlags) -> Self {
        Self {
            path: path.into(),
            flags,
        }
    }
}

/// Every place discovery looks, in scan order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchLocations {
    /// Roots with one versioned subdirectory per install (`<root>\7\pwsh.exe`).
    pub program_roots: Vec<SearchRoot>,
    /// The per-user app execution alias directory for packaged apps.
    pub app_execution_aliases: Option<PathBuf>,
    /// Directories holding a bare `pwsh.exe` of unknown version.
    pub user_tool_dirs: Vec<SearchRoot>,
}

impl SearchLocations {
    /// Locations for this machine, resolved from the process environment.
    #[must_use]
    pub fn for_host() -> Self {
        Self::resolve(
            HostArch::current(),
            |name| std::env::var(name).ok(),
            local_app_data_dir(),
        )
    }

    /// Resolve the built-in location templates with an explicit variable
    /// lookup. Templates whose variable is unknown are dropped.
    pub fn resolve<F>(arch: HostArch, lookup: F, local_app_data: Option<PathBuf>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        debug!("Resolving PowerShell search locations for {arch} host");
        let mut program_templates = vec![(PROGRAM_FILES_ROOT, PowerShellFlags::NONE)];
        if arch.has_wow_x86() {
            program_templates.push((PROGRAM_FILES_X86_ROOT, PowerShellFlags::WOW_X86));
        }
        if arch.has_wow_arm() {
            program_templates.push((PROGRAM_FILES_ARM_ROOT, PowerShellFlags::WOW_ARM));
        }

        let program_roots = program_templates
            .into_iter()
            .filter_map(|(template, flags)| {
                expand_root(template, &lookup).map(|path| SearchRoot::new(path, flags))
            })
            .collect();

        let user_tool_dirs = [
            (DOTNET_TOOLS_DIR, PowerShellFlags::DOTNET),
            (SCOOP_SHIMS_DIR, PowerShellFlags::SCOOP),
        ]
        .into_iter()
        .filter_map(|(template, flags)| {
            expand_root(template, &lookup).map(|path| SearchRoot::new(path, flags))
        })
        .collect();

        Self {
            program_roots,
            app_execution_aliases: local_app_data
                .map(|dir| dir.join("Microsoft").join("WindowsApps")),
            user_tool_dirs,
        }
    }

    /// Append a traditional-layout root scanned after the built-in ones.
    #[must_use]
    pub fn with_program_root(mut self, root: SearchRoot) -> Self {
        self.program_roots.push(root);
        self
    }

    #[must_use]
    pub fn without_user_tools(mut self) -> Self {
        self.user_tool_dirs.clear();
        self
    }
}

/// Expand the leading `%VAR%` component of a backslash-separated template and
/// join the remaining components natively.
fn expand_root<F>(template: &str, lookup: &F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    let mut parts = template.split('\\');
    let head = expand_env_template(parts.next()?, lookup);
    if head.is_empty() || head.contains('%') {
        debug!("Skipping search location {template}: variable not set");
        return None;
    }
    Some(parts.fold(PathBuf::from(head), |path, part| path.join(part)))
}
