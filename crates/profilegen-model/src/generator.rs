use log::{info, warn};
use serde::Serialize;

use crate::error::GeneratorError;
use crate::profile::Profile;

pub trait ProfileGenerator {
    /// Stable identifier written into each generated profile's `source`.
    fn namespace(&self) -> &'static str;
    fn display_name(&self) -> &'static str;
    fn icon(&self) -> &'static str;

    /// Produce profiles for whatever this generator finds installed.
    ///
    /// # Errors
    /// Returns an error when the generator cannot complete; finding nothing
    /// installed is not an error and yields an empty list.
    fn generate_profiles(&mut self) -> Result<Vec<Profile>, GeneratorError>;
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedProfiles {
    pub namespace: &'static str,
    pub display_name: &'static str,
    pub profiles: Vec<Profile>,
}

/// Run every generator, isolating failures so one broken generator does not
/// hide the profiles of the others.
pub fn generate_all(generators: &mut [Box<dyn ProfileGenerator>]) -> Vec<GeneratedProfiles> {
    generators
        .iter_mut()
        .map(|generator| {
            let namespace = generator.namespace();
            let profiles = match generator.generate_profiles() {
                Ok(profiles) => {
                    info!("Generator {namespace} produced {} profile(s)", profiles.len());
                    profiles
                }
                Err(e) => {
                    warn!("Generator {namespace} failed: {e}");
                    Vec::new()
                }
            };
            GeneratedProfiles {
                namespace,
                display_name: generator.display_name(),
                profiles,
            }
        })
        .collect()
}
