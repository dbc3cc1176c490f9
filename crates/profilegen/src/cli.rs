use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use profilegen_model::{GeneratedProfiles, ProfileGenerator, ProfileMatcher, generate_all};
use profilegen_platform::{AppPaths, SystemPackageQuery};
use profilegen_pwsh::{
    PowerShellDiscovery, PowerShellInstance, PowershellCoreGenerator, SearchLocations,
};

use crate::error::AppError;
use crate::settings::AppSettings;

#[derive(Debug, Parser)]
#[command(
    name = "profilegen",
    version,
    about = "Discover installed shells and generate terminal launch profiles"
)]
pub struct Cli {
    /// Log to stderr as well as the log file
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file to use instead of the per-user default
    #[arg(long, global = true, env = "PROFILEGEN_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List discovered PowerShell installs, best first
    Instances {
        /// Print JSON instead of one line per install
        #[arg(long)]
        json: bool,
    },
    /// Print generated launch profiles as JSON
    Profiles {
        #[command(flatten)]
        filter: ProfileFilter,
    },
    /// List the available profile generators
    Generators,
    /// Write a settings file with default values
    InitConfig {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
}

/// Keep only profiles where one of the given patterns matches the whole field.
#[derive(Debug, Clone, Default, Args)]
pub struct ProfileFilter {
    /// Regex over the profile name
    #[arg(long, value_name = "REGEX")]
    pub match_name: Option<String>,

    /// Regex over the profile commandline
    #[arg(long, value_name = "REGEX")]
    pub match_commandline: Option<String>,

    /// Regex over the generator namespace
    #[arg(long, value_name = "REGEX")]
    pub match_source: Option<String>,
}

impl ProfileFilter {
    fn matcher(&self) -> Result<ProfileMatcher, AppError> {
        Ok(ProfileMatcher::new(
            self.match_name.as_deref(),
            self.match_commandline.as_deref(),
            self.match_source.as_deref(),
        )?)
    }
}

impl Cli {
    pub fn settings_path(&self) -> Result<PathBuf, AppError> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => Ok(AppPaths::new()?.settings_file()),
        }
    }
}

fn host_discovery(settings: &AppSettings) -> PowerShellDiscovery {
    PowerShellDiscovery::new(
        settings.apply_to(SearchLocations::for_host()),
        Box::new(SystemPackageQuery::new()),
    )
}

fn host_generators(settings: &AppSettings) -> Vec<Box<dyn ProfileGenerator>> {
    vec![Box::new(PowershellCoreGenerator::new(host_discovery(
        settings,
    )))]
}

pub fn run(cli: &Cli, settings: &AppSettings, out: &mut impl Write) -> Result<(), AppError> {
    match &cli.command {
        Command::Instances { json } => {
            let mut discovery = host_discovery(settings);
            write_instances(discovery.instances(), *json, out)
        }
        Command::Profiles { filter } => {
            let matcher = filter.matcher()?;
            let mut generators = host_generators(settings);
            let mut generated = generate_all(&mut generators);
            retain_matching(&mut generated, &matcher);
            write_profiles(&generated, out)
        }
        Command::Generators => write_generators(&host_generators(settings), out),
        Command::InitConfig { force } => {
            let path = cli.settings_path()?;
            init_config(&path, *force)?;
            writeln!(out, "{}", path.display())?;
            Ok(())
        }
    }
}

fn write_instances(
    instances: &[PowerShellInstance],
    json: bool,
    out: &mut impl Write,
) -> Result<(), AppError> {
    if json {
        serde_json::to_writer_pretty(&mut *out, instances)?;
        writeln!(out)?;
        return Ok(());
    }

    if instances.is_empty() {
        writeln!(out, "No PowerShell installations found")?;
        return Ok(());
    }

    for (rank, instance) in instances.iter().enumerate() {
        writeln!(
            out,
            "{}. {} [{}] {}",
            rank + 1,
            instance.name(),
            instance.flags,
            instance.executable_path.display()
        )?;
    }
    Ok(())
}

/// An empty matcher leaves every profile in place.
fn retain_matching(generated: &mut [GeneratedProfiles], matcher: &ProfileMatcher) {
    if matcher.is_empty() {
        return;
    }
    for group in generated {
        group.profiles.retain(|profile| matcher.matches(profile));
    }
}

fn write_profiles(generated: &[GeneratedProfiles], out: &mut impl Write) -> Result<(), AppError> {
    serde_json::to_writer_pretty(&mut *out, generated)?;
    writeln!(out)?;
    Ok(())
}

fn write_generators(
    generators: &[Box<dyn ProfileGenerator>],
    out: &mut impl Write,
) -> Result<(), AppError> {
    for generator in generators {
        writeln!(
            out,
            "{}\t{}\t{}",
            generator.namespace(),
            generator.display_name(),
            generator.icon()
        )?;
    }
    Ok(())
}

fn init_config(path: &Path, force: bool) -> Result<(), AppError> {
    if path.exists() && !force {
        return Err(AppError::SettingsExist(path.to_path_buf()));
    }
    AppSettings::default().save_to(path)?;
    log::info!("Wrote default settings to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;
    use profilegen_model::{GeneratedProfiles, Profile};
    use profilegen_pwsh::{PowerShellFlags, PowerShellInstance, build_launch_profiles};

    use super::*;

    fn instances() -> Vec<PowerShellInstance> {
        vec![
            PowerShellInstance::new(
                7,
                PowerShellFlags::TRADITIONAL,
                PathBuf::from("pf/7/pwsh.exe"),
            ),
            PowerShellInstance::new(0, PowerShellFlags::SCOOP, PathBuf::from("scoop/pwsh.exe")),
        ]
    }

    fn output(write: impl FnOnce(&mut Vec<u8>) -> Result<(), AppError>) -> String {
        let mut buffer = Vec::new();
        write(&mut buffer).expect("writing output should succeed");
        String::from_utf8(buffer).expect("output should be UTF-8")
    }

    #[test]
    fn parses_subcommands_and_global_flags() {
        let cli = Cli::try_parse_from(["profilegen", "instances", "--json", "-v"])
            .expect("arguments should parse");

        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Instances { json: true }));

        let cli = Cli::try_parse_from([
            "profilegen",
            "--config",
            "custom.json",
            "init-config",
            "--force",
        ])
        .expect("arguments should parse");
        assert_eq!(cli.config, Some(PathBuf::from("custom.json")));
        assert!(matches!(cli.command, Command::InitConfig { force: true }));
        assert_eq!(
            cli.settings_path().expect("explicit path should resolve"),
            PathBuf::from("custom.json")
        );
    }

    #[test]
    fn rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["profilegen", "frobnicate"]).is_err());
    }

    #[test]
    fn instances_are_listed_with_rank_flags_and_path() {
        let text = output(|out| write_instances(&instances(), false, out));

        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("1. PowerShell 7 [traditional] "));
        assert!(lines[1].starts_with("2. PowerShell (scoop) [scoop] "));
    }

    #[test]
    fn empty_instance_list_prints_notice() {
        let text = output(|out| write_instances(&[], false, out));

        assert_eq!(text, "No PowerShell installations found\n");
    }

    #[test]
    fn instances_json_includes_flag_names() {
        let text = output(|out| write_instances(&instances(), true, out));
        let value: serde_json::Value = serde_json::from_str(&text).expect("output should be JSON");

        assert_eq!(value[0]["major_version"], 7);
        assert_eq!(value[0]["flags"], serde_json::json!(["traditional"]));
        assert_eq!(value[1]["major_version"], 0);
    }

    #[test]
    fn profiles_json_groups_by_generator() {
        let generated = vec![GeneratedProfiles {
            namespace: "Windows.Terminal.PowershellCore",
            display_name: "PowerShell",
            profiles: build_launch_profiles(&instances()),
        }];

        let text = output(|out| write_profiles(&generated, out));
        let value: serde_json::Value = serde_json::from_str(&text).expect("output should be JSON");

        assert_eq!(value[0]["namespace"], "Windows.Terminal.PowershellCore");
        assert_eq!(value[0]["profiles"][0]["name"], "PowerShell");
        assert_eq!(value[0]["profiles"][1]["name"], "PowerShell (scoop)");
        let parsed: Vec<Profile> = serde_json::from_value(value[0]["profiles"].clone())
            .expect("profiles should deserialize back");
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn profile_filter_keeps_only_matching_profiles() {
        let cli = Cli::try_parse_from(["profilegen", "profiles", "--match-name", r".*\(scoop\)"])
            .expect("arguments should parse");
        let Command::Profiles { filter } = cli.command else {
            panic!("expected profiles subcommand");
        };
        let mut generated = vec![GeneratedProfiles {
            namespace: "Windows.Terminal.PowershellCore",
            display_name: "PowerShell",
            profiles: build_launch_profiles(&instances()),
        }];

        retain_matching(&mut generated, &filter.matcher().expect("pattern should compile"));

        let names: Vec<_> = generated[0].profiles.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["PowerShell (scoop)"]);
    }

    #[test]
    fn profile_filter_without_patterns_keeps_everything() {
        let mut generated = vec![GeneratedProfiles {
            namespace: "Windows.Terminal.PowershellCore",
            display_name: "PowerShell",
            profiles: build_launch_profiles(&instances()),
        }];
        let matcher = ProfileFilter::default()
            .matcher()
            .expect("no patterns to compile");

        retain_matching(&mut generated, &matcher);

        assert_eq!(generated[0].profiles.len(), 2);
    }

    #[test]
    fn invalid_profile_filter_is_an_error() {
        let filter = ProfileFilter {
            match_source: Some("[".to_string()),
            ..ProfileFilter::default()
        };

        assert!(matches!(filter.matcher(), Err(AppError::Match(_))));
    }

    #[test]
    fn generators_are_listed_one_per_line() {
        let generators = host_generators(&AppSettings::default());

        let text = output(|out| write_generators(&generators, out));

        assert_eq!(
            text,
            concat!(
                "Windows.Terminal.PowershellCore\tPowerShell\t",
                "ms-appx:///ProfileGeneratorIcons/PowerShell.png\n"
            )
        );
    }

    #[test]
    fn init_config_refuses_to_overwrite_without_force() {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        let path = temp_dir.path().join("settings.json");

        init_config(&path, false).expect("first write should succeed");
        assert!(matches!(
            init_config(&path, false),
            Err(AppError::SettingsExist(_))
        ));
        init_config(&path, true).expect("forced write should succeed");

        let loaded = AppSettings::load_from(&path).expect("written settings should load");
        assert!(loaded.include_user_tools);
    }
}
