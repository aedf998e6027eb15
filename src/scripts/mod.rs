/// Name of the GNU screen session used by the helper scripts.
pub const SCREEN_SESSION: &str = "minecraft";

/// Jar launched by a vanilla server.
pub const VANILLA_JAR: &str = "server.jar";

/// Jar produced by the Fabric installer in server mode.
pub const FABRIC_LAUNCH_JAR: &str = "fabric-server-launch.jar";

/// Script flavour for the host operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    /// Linux and macOS.
    Unix,
}

impl Platform {
    /// Maps an OS name as reported by `std::env::consts::OS`.
    pub fn from_os(os: &str) -> Option<Self> {
        match os {
            "windows" => Some(Platform::Windows),
            "linux" | "macos" => Some(Platform::Unix),
            _ => None,
        }
    }

    /// The platform this binary runs on, if scripts are supported there.
    pub fn current() -> Option<Self> {
        Self::from_os(std::env::consts::OS)
    }
}

/// A script file to write into the server directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub file_name: &'static str,
    pub content: String,
    pub executable: bool,
}

impl Script {
    fn unix(file_name: &'static str, body: &str) -> Self {
        Self {
            file_name,
            content: format!("#!/bin/bash\n{body}\n"),
            executable: true,
        }
    }
}

fn java_command(memory: &str, jar: &str) -> String {
    format!("java -jar -Xms{memory} -Xmx{memory} {jar}")
}

/// Boot script plus, on Unix, the screen helpers.
pub fn boot_scripts(platform: Platform, memory: &str, jar: &str) -> Vec<Script> {
    let command = java_command(memory, jar);
    match platform {
        Platform::Windows => vec![Script {
            file_name: "boot.bat",
            content: format!("@echo off\n{command}\n"),
            executable: false,
        }],
        Platform::Unix => vec![
            Script::unix("boot.sh", &command),
            Script::unix("boot-screen.sh", &format!("screen -dmS {SCREEN_SESSION} ./boot.sh")),
            Script::unix("attach-screen.sh", &format!("screen -r {SCREEN_SESSION}")),
            Script::unix(
                "shutdown-screen.sh",
                &format!("screen -S {SCREEN_SESSION} -X eval 'stuff \"stop\\015\"'"),
            ),
        ],
    }
}
