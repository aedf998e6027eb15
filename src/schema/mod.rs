//! The server questionnaire.

use std::sync::Arc;

use crate::catalog::{ReleaseFilter, VersionManifest};
use crate::config::GeneratorConfig;
use crate::prompt::{Answer, Choices, Prompt, PromptDescriptor, PromptType};

/// Answer names of the questions that are not server properties.
pub const VERSION_TYPE: &str = "type";
pub const VERSION: &str = "version";
pub const SERVER_KIND: &str = "mod";
pub const SERVER_NAME: &str = "name";

/// Questions after this one are skipped in quick mode.
const LAST_BASIC_PROPERTY: &str = "max-players";

const TRUE_FIRST: [&str; 2] = ["true", "false"];
const FALSE_FIRST: [&str; 2] = ["false", "true"];

fn select(key: &str, choices: impl Into<Choices>) -> Prompt {
    Prompt::from_key(key).kind(PromptType::Select).choices(choices)
}

fn number(key: &str, initial: i64) -> Prompt {
    Prompt::from_key(key).kind(PromptType::Number).initial(initial)
}

fn text(key: &str, initial: &str) -> Prompt {
    Prompt::from_key(key).kind(PromptType::Text).initial(initial)
}

/// Builds the full questionnaire.
///
/// The version list depends on the version-type answer. With `advanced`
/// false every property after `max-players` keeps its default.
pub fn server_prompts(
    manifest: Arc<VersionManifest>,
    config: &GeneratorConfig,
    advanced: bool,
) -> Vec<PromptDescriptor> {
    let prompts = vec![
        Prompt::new()
            .kind(PromptType::Select)
            .name(VERSION_TYPE)
            .message("Select Minecraft version type")
            .choices(["Release", "Release and Snapshot"]),
        Prompt::new()
            .kind(PromptType::Select)
            .name(VERSION)
            .message("Select Minecraft version")
            .choices(Choices::derived(move |prev| {
                let index = match prev {
                    Some(Answer::Index(i)) => *i,
                    _ => 0,
                };
                manifest.ids(ReleaseFilter::from_index(index))
            })),
        Prompt::new()
            .kind(PromptType::Select)
            .name(SERVER_KIND)
            .message("Server type")
            .choices(["Vanilla", "Fabric"]),
        Prompt::new()
            .kind(PromptType::Text)
            .name(SERVER_NAME)
            .message("Server name")
            .initial("A Minecraft Server"),
    ];

    let properties = vec![
        number("server-port", 25565),
        select("gamemode", ["survival", "creative", "spectator", "adventure"]),
        select("white-list", FALSE_FIRST),
        select("difficulty", ["hard", "normal", "easy", "peaceful"]),
        number("spawn-protection", 0),
        number("max-players", 20),
        number("view-distance", 10),
        text("level-name", "world"),
        text("level-seed", ""),
        select("level-type", ["default", "flat", "largeBiomes", "amplified", "buffet"]),
        select("pvp", TRUE_FIRST).message("PVP"),
        text("resource-pack", ""),
        text("resource-pack-sha1", ""),
        select("allow-flight", TRUE_FIRST),
        select("allow-nether", TRUE_FIRST),
        select("spawn-animals", TRUE_FIRST),
        select("spawn-monsters", TRUE_FIRST),
        select("spawn-npcs", TRUE_FIRST),
        select("broadcast-console-to-ops", TRUE_FIRST),
        select("broadcast-rcon-to-ops", TRUE_FIRST),
        select("enable-command-block", TRUE_FIRST),
        select("enable-rcon", TRUE_FIRST),
        number("rcon.port", 25575),
        text("rcon.password", &config.default_rcon_password),
        number("entity-broadcast-range-percentage", 100),
        select("force-gamemode", FALSE_FIRST),
        select("generate-structures", TRUE_FIRST),
        select("hardcore", FALSE_FIRST),
        number("max-build-height", 256),
        number("player-idle-timeout", 0),
        number("query.port", 25565),
    ];

    let mut descriptors: Vec<PromptDescriptor> = prompts.into_iter().map(Prompt::build).collect();
    let mut basic = true;
    for prompt in properties {
        let descriptor = prompt.active(basic || advanced).build();
        basic &= descriptor.property.as_deref() != Some(LAST_BASIC_PROPERTY);
        descriptors.push(descriptor);
    }
    descriptors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::VersionEntry;
    use crate::form::{run_form, tests::ScriptedBackend};
    use std::collections::HashSet;

    fn manifest() -> Arc<VersionManifest> {
        let entry = |id: &str, kind: &str| VersionEntry {
            id: id.to_string(),
            kind: kind.to_string(),
            url: format!("https://example.com/{id}.json"),
        };
        Arc::new(VersionManifest {
            versions: vec![entry("24w14a", "snapshot"), entry("1.21", "release"), entry("1.20.6", "release")],
        })
    }

    #[test]
    fn names_are_unique() {
        let prompts = server_prompts(manifest(), &GeneratorConfig::default(), true);
        let names: HashSet<_> = prompts.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names.len(), prompts.len());
        assert_eq!(prompts.len(), 35);
    }

    #[test]
    fn keeps_property_order_and_messages() {
        let prompts = server_prompts(manifest(), &GeneratorConfig::default(), true);
        let keys: Vec<_> = prompts.iter().filter_map(|p| p.property.as_deref()).collect();
        assert_eq!(keys.first(), Some(&"server-port"));
        assert_eq!(keys.last(), Some(&"query.port"));

        let pvp = prompts.iter().find(|p| p.name == "pvp").unwrap();
        assert_eq!(pvp.message, "PVP");
        let rcon = prompts.iter().find(|p| p.name == "rconPort").unwrap();
        assert_eq!(rcon.message, "Rcon port");
    }

    #[test]
    fn rcon_password_defaults_from_config() {
        let config = GeneratorConfig {
            default_rcon_password: "s3cret".to_string(),
            ..GeneratorConfig::default()
        };
        let prompts = server_prompts(manifest(), &config, true);
        let password = prompts.iter().find(|p| p.name == "rconPassword").unwrap();
        assert_eq!(password.initial, Some(crate::prompt::Initial::Text("s3cret".to_string())));
    }

    #[test]
    fn version_choices_follow_version_type() {
        let prompts = server_prompts(manifest(), &GeneratorConfig::default(), true);
        let version = &prompts[1];
        assert_eq!(version.choices.resolve(Some(&Answer::Index(0))), vec!["1.21", "1.20.6"]);
        assert_eq!(
            version.choices.resolve(Some(&Answer::Index(1))),
            vec!["24w14a", "1.21", "1.20.6"]
        );
    }

    #[test]
    fn quick_mode_deactivates_advanced_properties() {
        let prompts = server_prompts(manifest(), &GeneratorConfig::default(), false);
        let active: Vec<_> = prompts.iter().filter(|p| p.active).map(|p| p.name.as_str()).collect();
        assert_eq!(
            active,
            vec![
                "type",
                "version",
                "mod",
                "name",
                "serverPort",
                "gamemode",
                "whiteList",
                "difficulty",
                "spawnProtection",
                "maxPlayers",
            ]
        );
    }

    #[test]
    fn quick_mode_form_only_asks_basic_questions() {
        let prompts = server_prompts(manifest(), &GeneratorConfig::default(), false);
        let mut backend = ScriptedBackend::default();
        let answers = run_form(&prompts, &mut backend).unwrap();

        assert_eq!(backend.asked.len(), 10);
        assert_eq!(answers.len(), prompts.len());
        assert_eq!(answers.number("queryPort"), Some(25565));
        assert_eq!(answers.text("levelName"), Some("world"));
    }
}
