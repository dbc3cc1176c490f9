use profilegen_model::{GeneratorError, Profile, ProfileGenerator};
use uuid::Uuid;

use crate::discovery::PowerShellDiscovery;
use crate::instance::PowerShellInstance;

pub const POWERSHELL_CORE_NAMESPACE: &str = "Windows.Terminal.PowershellCore";
pub const PREFERRED_PROFILE_NAME: &str = "PowerShell";

/// Identity the best instance always receives, so the user's default
/// profile keeps pointing at "the" PowerShell across upgrades.
pub const POWERSHELL_CORE_GUID: Uuid = Uuid::from_u128(0x574e_775e_4f2a_5b96_ac1e_a296_2a40_2336);

const POWERSHELL_ICON: &str = "ms-appx:///ProfileIcons/pwsh.png";
const POWERSHELL_PREVIEW_ICON: &str = "ms-appx:///ProfileIcons/pwsh-preview.png";
const GENERATOR_ICON: &str = "ms-appx:///ProfileGeneratorIcons/PowerShell.png";

/// Map ranked instances to launch profiles. Pure; performs no I/O.
#[must_use]
pub fn build_launch_profiles(instances: &[PowerShellInstance]) -> Vec<Profile> {
    instances
        .iter()
        .enumerate()
        .map(|(index, instance)| {
            let mut profile = Profile::dynamic(POWERSHELL_CORE_NAMESPACE, instance.name());
            profile.commandline = format!("\"{}\"", instance.executable_path.display());
            profile.icon = if instance.is_preview() {
                POWERSHELL_PREVIEW_ICON
            } else {
                POWERSHELL_ICON
            }
            .to_string();

            // The first instance is the algorithmically best one; it may be a
            // preview if that is the highest version installed.
            if index == 0 {
                profile.guid = POWERSHELL_CORE_GUID;
                profile.name = PREFERRED_PROFILE_NAME.to_string();
            }
            profile
        })
        .collect()
}

#[derive(Debug)]
pub struct PowershellCoreGenerator {
    discovery: PowerShellDiscovery,
}

impl PowershellCoreGenerator {
    #[must_use]
    pub fn new(discovery: PowerShellDiscovery) -> Self {
        Self { discovery }
    }

    #[must_use]
    pub fn for_host() -> Self {
        Self::new(PowerShellDiscovery::for_host())
    }

    pub fn discovery_mut(&mut self) -> &mut PowerShellDiscovery {
        &mut self.discovery
    }
}

impl ProfileGenerator for PowershellCoreGenerator {
    fn namespace(&self) -> &'static str {
        POWERSHELL_CORE_NAMESPACE
    }

    fn display_name(&self) -> &'static str {
        "PowerShell"
    }

    fn icon(&self) -> &'static str {
        GENERATOR_ICON
    }

    fn generate_profiles(&mut self) -> Result<Vec<Profile>, GeneratorError> {
        Ok(build_launch_profiles(self.discovery.instances()))
    }
}
