mod discovery;
mod generator;
mod instance;
mod locations;

pub use discovery::{POWERSHELL_PFN, POWERSHELL_PREVIEW_PFN, PowerShellDiscovery, discover};
pub use generator::{
    POWERSHELL_CORE_GUID, POWERSHELL_CORE_NAMESPACE, PREFERRED_PROFILE_NAME,
    PowershellCoreGenerator, build_launch_profiles,
};
pub use instance::{PowerShellFlags, PowerShellInstance, rank_instances};
pub use locations::{SearchLocations, SearchRoot};
