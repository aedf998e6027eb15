/// The `prompt` module provides the declarative prompt builder. A `Prompt`
/// can derive its answer name and display message from a shorthand key such
/// as `"max-players"`, and select prompts can compute their choices from the
/// previous answer.
pub mod prompt;

/// The `form` module walks an ordered list of prompt descriptors, asks each
/// question through a `PromptBackend` (the terminal by default), and collects
/// the answers by name.
pub mod form;

/// The `schema` module holds the server questionnaire: version selection,
/// server type, and one question per `server.properties` entry.
pub mod schema;

/// The `catalog` module fetches the Mojang version manifest, per-version
/// metadata, and the Fabric installer list.
pub mod catalog;

/// The `http` module downloads files with optional digest verification.
pub mod http;

/// The `filesystem` module creates directories, expands `~`, and writes files.
pub mod filesystem;

/// The `properties` module renders `server.properties` and `eula.txt`.
pub mod properties;

/// The `scripts` module produces the boot scripts for Windows and Unix hosts.
pub mod scripts;

/// The `config` module loads the optional TOML configuration file that
/// supplies defaults such as the RCON password and the server memory.
pub mod config;

/// The `generator` module downloads the server and writes the directory.
pub mod generator;
