use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostArch {
    X86,
    X64,
    Arm64,
    Other,
}

impl HostArch {
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(target_arch = "x86_64") {
            Self::X64
        } else if cfg!(target_arch = "aarch64") {
            Self::Arm64
        } else if cfg!(target_arch = "x86") {
            Self::X86
        } else {
            Self::Other
        }
    }

    /// Whether 32-bit x86 programs run emulated here, with their own
    /// program files directory.
    #[must_use]
    pub const fn has_wow_x86(self) -> bool {
        matches!(self, Self::X64 | Self::Arm64)
    }

    /// Whether ARM32 programs run emulated here.
    #[must_use]
    pub const fn has_wow_arm(self) -> bool {
        matches!(self, Self::Arm64)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::X86 => "x86",
            Self::X64 => "x64",
            Self::Arm64 => "arm64",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for HostArch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Replace every `%NAME%` in `template` with the value `lookup` returns.
///
/// Names the lookup does not know are left in place verbatim, including the
/// surrounding percent signs. A lone `%` with no closing partner is literal.
pub fn expand_env_template<F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(len) = after.find('%') else {
            out.push_str(&rest[start..]);
            return out;
        };

        let name = &after[..len];
        match (!name.is_empty()).then(|| lookup(name)).flatten() {
            Some(value) => out.push_str(&value),
            None => {
                out.push('%');
                out.push_str(name);
                out.push('%');
            }
        }
        rest = &after[len + 1..];
    }

    out.push_str(rest);
    out
}

/// The per-user local application data folder (`%LOCALAPPDATA%` on Windows).
#[must_use]
pub fn local_app_data_dir() -> Option<PathBuf> {
    dirs::data_local_dir()
}
