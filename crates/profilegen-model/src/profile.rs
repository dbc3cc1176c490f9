use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_STARTING_DIRECTORY: &str = "%USERPROFILE%";
pub const DEFAULT_COLOR_SCHEME: &str = "Campbell";

// Namespace under which every generated profile's identity is derived.
const RUNTIME_GENERATED_PROFILE_NAMESPACE: Uuid =
    Uuid::from_u128(0xf65d_db7e_706b_4499_8a50_4031_3caf_510a);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSchemePair {
    pub dark: String,
    pub light: String,
}

impl ColorSchemePair {
    #[must_use]
    pub fn both(name: &str) -> Self {
        Self {
            dark: name.to_string(),
            light: name.to_string(),
        }
    }
}

impl Default for ColorSchemePair {
    fn default() -> Self {
        Self::both(DEFAULT_COLOR_SCHEME)
    }
}

/// A launchable shell configuration produced by a generator.
///
/// Field names serialize the way the settings file spells them, so the
/// consumer can merge generated profiles into its profile list directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub guid: Uuid,
    pub name: String,
    pub source: String,
    pub commandline: String,
    pub starting_directory: String,
    pub color_scheme: ColorSchemePair,
    pub icon: String,
}

impl Profile {
    /// Create a dynamic profile whose identity is derived from its source and name.
    #[must_use]
    pub fn dynamic(source: &str, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            guid: dynamic_profile_guid(source, &name),
            name,
            source: source.to_string(),
            commandline: String::new(),
            starting_directory: DEFAULT_STARTING_DIRECTORY.to_string(),
            color_scheme: ColorSchemePair::default(),
            icon: String::new(),
        }
    }
}

fn utf16le_bytes(value: &str) -> Vec<u8> {
    value.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

/// Name-based (v5) identity for a generated profile.
///
/// The source is hashed into its own namespace first so two generators can
/// produce profiles with the same display name without colliding.
#[must_use]
pub fn dynamic_profile_guid(source: &str, name: &str) -> Uuid {
    let namespace = if source.is_empty() {
        RUNTIME_GENERATED_PROFILE_NAMESPACE
    } else {
        Uuid::new_v5(&RUNTIME_GENERATED_PROFILE_NAMESPACE, &utf16le_bytes(source))
    };
    Uuid::new_v5(&namespace, &utf16le_bytes(name))
}
