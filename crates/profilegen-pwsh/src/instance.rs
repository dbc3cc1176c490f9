use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::fmt::Write as _;
use std::ops::{BitOr, BitOrAssign};
use std::path::PathBuf;

use serde::{Serialize, Serializer};

/// Provenance tags for a discovered PowerShell install.
///
/// The numeric value doubles as a sort key: higher bits are worse caveats,
/// and an install with no flags at all (stable, native, Program Files) is the
/// ideal one. Preview gets the top bit so it dominates every other caveat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PowerShellFlags(u8);

impl PowerShellFlags {
    pub const NONE: Self = Self(0);

    // distribution method
    pub const STORE: Self = Self(1 << 0);
    pub const SCOOP: Self = Self(1 << 1);
    pub const DOTNET: Self = Self(1 << 2);
    pub const TRADITIONAL: Self = Self(1 << 3);

    // non-native architecture
    pub const WOW_ARM: Self = Self(1 << 4);
    pub const WOW_X86: Self = Self(1 << 5);

    // build type
    pub const PREVIEW: Self = Self(1 << 6);

    const NAMED: [(Self, &'static str); 7] = [
        (Self::STORE, "store"),
        (Self::SCOOP, "scoop"),
        (Self::DOTNET, "dotnet"),
        (Self::TRADITIONAL, "traditional"),
        (Self::WOW_ARM, "wow-arm"),
        (Self::WOW_X86, "wow-x86"),
        (Self::PREVIEW, "preview"),
    ];

    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn names(self) -> impl Iterator<Item = &'static str> {
        Self::NAMED
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, name)| name)
    }
}

impl BitOr for PowerShellFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for PowerShellFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for PowerShellFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let mut first = true;
        for name in self.names() {
            if !first {
                f.write_char('|')?;
            }
            f.write_str(name)?;
            first = false;
        }
        Ok(())
    }
}

impl Serialize for PowerShellFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.names())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PowerShellInstance {
    /// 0 when the install layout gives no way to tell.
    pub major_version: u32,
    pub flags: PowerShellFlags,
    pub executable_path: PathBuf,
}

impl PowerShellInstance {
    #[must_use]
    pub fn new(major_version: u32, flags: PowerShellFlags, executable_path: PathBuf) -> Self {
        Self {
            major_version,
            flags,
            executable_path,
        }
    }

    /// Human-readable profile name composed from the version and flags.
    ///
    /// Packaged, dotnet and scoop installs only get their distribution
    /// qualifier; traditional installs spell out version, channel and
    /// architecture.
    #[must_use]
    pub fn name(&self) -> String {
        let mut name = String::from("PowerShell");

        if self.flags.contains(PowerShellFlags::STORE) {
            if self.flags.contains(PowerShellFlags::PREVIEW) {
                name.push_str(" Preview");
            }
            name.push_str(" (msix)");
        } else if self.flags.contains(PowerShellFlags::DOTNET) {
            name.push_str(" (dotnet global)");
        } else if self.flags.contains(PowerShellFlags::SCOOP) {
            name.push_str(" (scoop)");
        } else {
            if self.major_version < 7 {
                name.push_str(" Core");
            }
            if self.major_version != 0 {
                let _ = write!(name, " {}", self.major_version);
            }
            if self.flags.contains(PowerShellFlags::PREVIEW) {
                name.push_str(" Preview");
            }
            if self.flags.contains(PowerShellFlags::WOW_X86) {
                name.push_str(" (x86)");
            }
            if self.flags.contains(PowerShellFlags::WOW_ARM) {
                name.push_str(" (ARM)");
            }
        }

        name
    }

    #[must_use]
    pub fn is_preview(&self) -> bool {
        self.flags.contains(PowerShellFlags::PREVIEW)
    }
}

/// Greater means more preferable: newer major version first, then fewer
/// provenance caveats, then the lexically smaller path.
impl Ord for PowerShellInstance {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major_version
            .cmp(&other.major_version)
            .then_with(|| other.flags.cmp(&self.flags))
            .then_with(|| other.executable_path.cmp(&self.executable_path))
    }
}

impl PartialOrd for PowerShellInstance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Drop repeated executable paths, then sort best-first.
///
/// The first entry scanned for a path wins, so the built-in roots (scanned
/// before any configured extras) decide the provenance flags.
pub fn rank_instances(instances: &mut Vec<PowerShellInstance>) {
    let mut seen = HashSet::new();
    instances.retain(|instance| seen.insert(instance.executable_path.clone()));
    instances.sort_by(|a, b| b.cmp(a));
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{PowerShellFlags, PowerShellInstance, rank_instances};

    fn instance(major: u32, flags: PowerShellFlags, path: &str) -> PowerShellInstance {
        PowerShellInstance::new(major, flags, PathBuf::from(path))
    }

    fn ranked(mut instances: Vec<PowerShellInstance>) -> Vec<PowerShellInstance> {
        rank_instances(&mut instances);
        instances
    }

    #[test]
    fn higher_major_version_sorts_first() {
        let result = ranked(vec![
            instance(6, PowerShellFlags::NONE, "a/pwsh.exe"),
            instance(7, PowerShellFlags::NONE, "b/pwsh.exe"),
        ]);

        assert_eq!(result[0].major_version, 7);
        assert_eq!(result[1].major_version, 6);
    }

    #[test]
    fn unflagged_instance_beats_packaged_ones_at_equal_version() {
        for flag in [
            PowerShellFlags::STORE,
            PowerShellFlags::DOTNET,
            PowerShellFlags::SCOOP,
        ] {
            let result = ranked(vec![
                instance(7, flag, "a/pwsh.exe"),
                instance(7, PowerShellFlags::NONE, "z/pwsh.exe"),
            ]);

            assert!(result[0].flags.is_empty(), "unflagged should win over {flag}");
            assert_eq!(result[1].flags, flag);
        }
    }

    #[test]
    fn preview_ranks_below_stable_non_native() {
        let result = ranked(vec![
            instance(7, PowerShellFlags::TRADITIONAL | PowerShellFlags::PREVIEW, "p/pwsh.exe"),
            instance(7, PowerShellFlags::TRADITIONAL | PowerShellFlags::WOW_X86, "x/pwsh.exe"),
            instance(7, PowerShellFlags::STORE, "s/pwsh.exe"),
        ]);

        let names: Vec<_> = result.iter().map(PowerShellInstance::name).collect();
        assert_eq!(
            names,
            vec!["PowerShell (msix)", "PowerShell 7 (x86)", "PowerShell 7 Preview"]
        );
    }

    #[test]
    fn equal_version_and_flags_fall_back_to_ascending_path() {
        let result = ranked(vec![
            instance(7, PowerShellFlags::TRADITIONAL, "c/pwsh.exe"),
            instance(7, PowerShellFlags::TRADITIONAL, "a/pwsh.exe"),
            instance(7, PowerShellFlags::TRADITIONAL, "b/pwsh.exe"),
        ]);

        let paths: Vec<_> = result.iter().map(|i| i.executable_path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("a/pwsh.exe"),
                PathBuf::from("b/pwsh.exe"),
                PathBuf::from("c/pwsh.exe"),
            ]
        );
    }

    #[test]
    fn unknown_version_sorts_after_known_versions() {
        let result = ranked(vec![
            instance(0, PowerShellFlags::DOTNET, "d/pwsh.exe"),
            instance(6, PowerShellFlags::TRADITIONAL, "t/pwsh.exe"),
        ]);

        assert_eq!(result[0].major_version, 6);
        assert_eq!(result[1].major_version, 0);
    }

    #[test]
    fn repeated_paths_keep_first_scanned_entry() {
        let wow = PowerShellFlags::TRADITIONAL | PowerShellFlags::WOW_X86;
        let result = ranked(vec![
            instance(6, PowerShellFlags::TRADITIONAL, "other/pwsh.exe"),
            instance(7, wow, "same/pwsh.exe"),
            instance(7, PowerShellFlags::TRADITIONAL, "same/pwsh.exe"),
        ]);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].flags, wow);
        assert_eq!(result[0].name(), "PowerShell 7 (x86)");
        assert_eq!(result[1].executable_path, PathBuf::from("other/pwsh.exe"));
    }

    #[test]
    fn store_preview_name_composes_preview_then_msix() {
        let flags = PowerShellFlags::STORE | PowerShellFlags::PREVIEW;
        let name = instance(7, flags, "s/pwsh.exe").name();

        assert_eq!(name, "PowerShell Preview (msix)");
        assert!(!name.contains('7'));
    }

    #[test]
    fn distribution_qualifiers_short_circuit() {
        assert_eq!(
            instance(0, PowerShellFlags::DOTNET | PowerShellFlags::PREVIEW, "d").name(),
            "PowerShell (dotnet global)"
        );
        assert_eq!(instance(0, PowerShellFlags::SCOOP, "s").name(), "PowerShell (scoop)");
    }

    #[test]
    fn traditional_names_spell_out_version_and_architecture() {
        let flags = PowerShellFlags::TRADITIONAL;
        assert_eq!(instance(7, flags, "a").name(), "PowerShell 7");
        assert_eq!(instance(6, flags, "a").name(), "PowerShell Core 6");
        assert_eq!(
            instance(7, flags | PowerShellFlags::PREVIEW | PowerShellFlags::WOW_X86, "a").name(),
            "PowerShell 7 Preview (x86)"
        );
        assert_eq!(
            instance(7, flags | PowerShellFlags::WOW_ARM, "a").name(),
            "PowerShell 7 (ARM)"
        );
        assert_eq!(instance(0, PowerShellFlags::NONE, "a").name(), "PowerShell Core");
    }

    #[test]
    fn flags_display_and_serialize_by_name() {
        let flags = PowerShellFlags::STORE | PowerShellFlags::PREVIEW;

        assert_eq!(flags.to_string(), "store|preview");
        assert_eq!(PowerShellFlags::NONE.to_string(), "none");
        assert_eq!(
            serde_json::to_value(flags).expect("flags should serialize"),
            serde_json::json!(["store", "preview"])
        );
    }
}
