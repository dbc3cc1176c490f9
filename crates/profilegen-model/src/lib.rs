mod error;
mod generator;
mod profile;
mod profile_match;

pub use error::{GeneratorError, ProfileMatchError};
pub use generator::{GeneratedProfiles, ProfileGenerator, generate_all};
pub use profile::{
    ColorSchemePair, DEFAULT_COLOR_SCHEME, DEFAULT_STARTING_DIRECTORY, Profile,
    dynamic_profile_guid,
};
pub use profile_match::ProfileMatcher;
