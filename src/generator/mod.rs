//! Turns collected answers into a server directory.

use std::io;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::catalog::{CatalogClient, CatalogError, ReleaseFilter, VersionEntry, VersionManifest};
use crate::config::GeneratorConfig;
use crate::filesystem::{self, FilesystemError, WriteOptions};
use crate::form::Answers;
use crate::http::download_to_file;
use crate::prompt::PromptDescriptor;
use crate::properties::{self, EULA};
use crate::schema::{SERVER_KIND, SERVER_NAME, VERSION, VERSION_TYPE};
use crate::scripts::{self, FABRIC_LAUNCH_JAR, Platform, VANILLA_JAR};

/// File name of the downloaded Fabric installer.
pub const FABRIC_INSTALLER_JAR: &str = "fabric-installer.jar";

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
    #[error("Download of {url} failed: {source}")]
    Download { url: String, source: io::Error },
    #[error("No answer for `{0}`")]
    MissingAnswer(&'static str),
    #[error("Version #{index} is not in the selected version list")]
    UnknownVersion { index: usize },
    #[error("{file} is {actual} bytes, expected {expected}")]
    SizeMismatch {
        file: &'static str,
        expected: u64,
        actual: u64,
    },
    #[error("Fabric installer failed: {0}")]
    Installer(String),
}

/// Server flavour picked in the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerKind {
    Vanilla,
    Fabric,
}

impl ServerKind {
    pub fn from_index(index: usize) -> Self {
        if index == 0 { ServerKind::Vanilla } else { ServerKind::Fabric }
    }

    /// The jar the boot scripts launch.
    pub fn launch_jar(self) -> &'static str {
        match self {
            ServerKind::Vanilla => VANILLA_JAR,
            ServerKind::Fabric => FABRIC_LAUNCH_JAR,
        }
    }
}

/// Looks up the manifest entry chosen through the version-type and version answers.
pub fn selected_version<'a>(
    manifest: &'a VersionManifest,
    answers: &Answers,
) -> Result<&'a VersionEntry, GenerateError> {
    let filter = ReleaseFilter::from_index(answers.index(VERSION_TYPE).unwrap_or(0));
    let index = answers.index(VERSION).ok_or(GenerateError::MissingAnswer(VERSION))?;
    manifest
        .filtered(filter)
        .into_iter()
        .nth(index)
        .ok_or(GenerateError::UnknownVersion { index })
}

/// Writes a server directory.
pub struct Generator {
    catalog: CatalogClient,
    config: GeneratorConfig,
    out_dir: PathBuf,
    platform: Option<Platform>,
    java: PathBuf,
    progress: ProgressBar,
}

impl Generator {
    pub fn new(catalog: CatalogClient, config: GeneratorConfig, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            catalog,
            config,
            out_dir: out_dir.into(),
            platform: Platform::current(),
            java: PathBuf::from("java"),
            progress: ProgressBar::hidden(),
        }
    }

    /// Overrides the detected platform; `None` writes no boot scripts.
    pub fn with_platform(mut self, platform: Option<Platform>) -> Self {
        self.platform = platform;
        self
    }

    /// Java executable used to run the Fabric installer.
    pub fn with_java(mut self, java: impl Into<PathBuf>) -> Self {
        self.java = java.into();
        self
    }

    /// Spinner whose message follows the current step.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Downloads, installs and writes everything the answers ask for.
    ///
    /// Nothing is cleaned up when a step fails.
    pub async fn generate(
        &self,
        manifest: &VersionManifest,
        descriptors: &[PromptDescriptor],
        answers: &Answers,
    ) -> Result<(), GenerateError> {
        let version = selected_version(manifest, answers)?;
        let kind = ServerKind::from_index(answers.index(SERVER_KIND).unwrap_or(0));
        info!(version = %version.id, ?kind, dir = %self.out_dir.display(), "Generating server");

        filesystem::create_if_not_exists(&self.out_dir)?;

        self.progress.set_message("Downloading jar file of Minecraft server.");
        let server = self.catalog.server_download(version).await?;
        let server_url = server.url.as_deref().unwrap_or_default();
        let written = self.download(server_url, VANILLA_JAR, server.sha1.as_deref()).await?;
        if let Some(expected) = server.size {
            if written != expected {
                return Err(GenerateError::SizeMismatch {
                    file: VANILLA_JAR,
                    expected,
                    actual: written,
                });
            }
        }
        debug!(bytes = written, "Server jar downloaded");

        if kind == ServerKind::Fabric {
            self.progress.set_message("Downloading fabric installer.");
            let installer = self.catalog.latest_fabric_installer().await?;
            self.download(&installer.url, FABRIC_INSTALLER_JAR, None).await?;
            self.progress.set_message("Installing fabric server.");
            self.run_fabric_installer(&version.id).await?;
        }

        self.progress.set_message("Configuring");
        self.write_scripts(kind)?;
        self.write(EULA_FILE, EULA, WriteOptions::default())?;

        let motd = answers.text(SERVER_NAME).unwrap_or_default();
        let rendered = properties::render_server_properties(motd, descriptors, answers);
        self.write(PROPERTIES_FILE, &rendered, WriteOptions::default())?;

        info!("Server generated");
        Ok(())
    }

    async fn download(&self, url: &str, file_name: &str, sha1: Option<&str>) -> Result<u64, GenerateError> {
        let dest = self.out_dir.join(file_name);
        download_to_file(self.catalog.http(), url, &dest, sha1)
            .await
            .map_err(|source| GenerateError::Download {
                url: url.to_string(),
                source,
            })
    }

    async fn run_fabric_installer(&self, minecraft_version: &str) -> Result<(), GenerateError> {
        debug!(java = %self.java.display(), "Running Fabric installer");
        let output = Command::new(&self.java)
            .arg("-jar")
            .arg(FABRIC_INSTALLER_JAR)
            .arg("server")
            .arg("-mcversion")
            .arg(minecraft_version)
            .current_dir(&self.out_dir)
            .output()
            .await
            .map_err(|e| GenerateError::Installer(format!("could not start {}: {e}", self.java.display())))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(status = %output.status, "Fabric installer exited unsuccessfully");
            return Err(GenerateError::Installer(format!(
                "{} {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }

    fn write_scripts(&self, kind: ServerKind) -> Result<(), GenerateError> {
        let Some(platform) = self.platform else {
            warn!("No boot scripts for this platform");
            return Ok(());
        };
        for script in scripts::boot_scripts(platform, &self.config.memory, kind.launch_jar()) {
            let options = if script.executable {
                WriteOptions::executable()
            } else {
                WriteOptions::default()
            };
            self.write(script.file_name, &script.content, options)?;
        }
        Ok(())
    }

    fn write(&self, file_name: &str, content: &str, options: WriteOptions) -> Result<(), GenerateError> {
        let path = self.out_dir.join(file_name);
        debug!(path = %path.display(), "Writing");
        Ok(filesystem::write_file(path, content, options)?)
    }
}

const EULA_FILE: &str = "eula.txt";
const PROPERTIES_FILE: &str = "server.properties";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Endpoints;
    use crate::prompt::Answer;
    use crate::schema::server_prompts;
    use httpmock::prelude::*;
    use serde_json::json;
    use sha1::{Digest, Sha1};
    use std::sync::Arc;

    const JAR: &[u8] = b"server jar bytes";

    fn manifest(server: &MockServer) -> VersionManifest {
        VersionManifest {
            versions: vec![
                VersionEntry {
                    id: "24w14a".to_string(),
                    kind: "snapshot".to_string(),
                    url: server.url("/v/24w14a.json"),
                },
                VersionEntry {
                    id: "1.21".to_string(),
                    kind: "release".to_string(),
                    url: server.url("/v/1.21.json"),
                },
            ],
        }
    }

    fn generator(server: &MockServer, dir: &Path) -> Generator {
        let catalog = CatalogClient::new(
            reqwest::Client::new(),
            Endpoints {
                version_manifest: server.url("/manifest.json"),
                fabric_installers: server.url("/installer"),
            },
        );
        Generator::new(catalog, GeneratorConfig::default(), dir).with_platform(Some(Platform::Unix))
    }

    fn answers(kind: usize) -> Answers {
        let mut answers = Answers::new();
        answers.insert(VERSION_TYPE, Answer::Index(0));
        answers.insert(VERSION, Answer::Index(0));
        answers.insert(SERVER_KIND, Answer::Index(kind));
        answers.insert(SERVER_NAME, Answer::Text("Hi".to_string()));
        answers
    }

    async fn serve_release(server: &MockServer, size: usize) {
        let sha1 = hex::encode(Sha1::digest(JAR));
        let jar_url = server.url("/server.jar");
        server
            .mock_async(move |when, then| {
                when.method(GET).path("/v/1.21.json");
                then.status(200).json_body(json!({
                    "downloads": { "server": { "url": jar_url, "sha1": sha1, "size": size } }
                }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/server.jar");
                then.status(200).body(JAR);
            })
            .await;
    }

    async fn serve_fabric_installer(server: &MockServer) {
        let installer_url = server.url("/fabric-installer-1.0.1.jar");
        server
            .mock_async(move |when, then| {
                when.method(GET).path("/installer");
                then.status(200).json_body(json!([
                    { "url": installer_url, "version": "1.0.1", "stable": true }
                ]));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/fabric-installer-1.0.1.jar");
                then.status(200).body(b"installer");
            })
            .await;
    }

    #[test]
    fn selects_version_through_filter() {
        let server = MockServer::start();
        let manifest = manifest(&server);
        let mut answers = answers(0);
        assert_eq!(selected_version(&manifest, &answers).unwrap().id, "1.21");

        answers.insert(VERSION_TYPE, Answer::Index(1));
        assert_eq!(selected_version(&manifest, &answers).unwrap().id, "24w14a");

        answers.insert(VERSION, Answer::Index(5));
        assert!(matches!(
            selected_version(&manifest, &answers),
            Err(GenerateError::UnknownVersion { index: 5 })
        ));
    }

    #[tokio::test]
    async fn generates_vanilla_server() {
        let server = MockServer::start_async().await;
        serve_release(&server, JAR.len()).await;
        let dir = tempfile::tempdir().unwrap();
        let manifest = manifest(&server);
        let descriptors = server_prompts(Arc::new(manifest.clone()), &GeneratorConfig::default(), true);

        generator(&server, dir.path())
            .generate(&manifest, &descriptors, &answers(0))
            .await
            .unwrap();

        let out = dir.path();
        assert_eq!(std::fs::read(out.join("server.jar")).unwrap(), JAR);
        assert_eq!(std::fs::read_to_string(out.join("eula.txt")).unwrap(), "eula=true\n");
        let boot = std::fs::read_to_string(out.join("boot.sh")).unwrap();
        assert!(boot.ends_with("java -jar -Xms2560M -Xmx2560M server.jar\n"));
        assert!(out.join("shutdown-screen.sh").exists());

        let properties = std::fs::read_to_string(out.join("server.properties")).unwrap();
        assert!(properties.starts_with("motd=\\u0048\\u0069\nserver-port=25565\ngamemode=survival\n"));
        assert!(properties.contains("\nrcon.password=defaultRconPassword\n"));
        assert!(properties.contains("\npvp=true\n"));
        assert!(properties.ends_with("query.port=25565\nenable-query=true\n"));
        assert!(!out.join(FABRIC_INSTALLER_JAR).exists());
    }

    #[tokio::test]
    async fn missing_server_url_aborts_before_writing() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v/1.21.json");
                then.status(200).json_body(json!({ "downloads": {} }));
            })
            .await;
        let dir = tempfile::tempdir().unwrap();
        let manifest = manifest(&server);

        let err = generator(&server, dir.path())
            .generate(&manifest, &[], &answers(0))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::Catalog(CatalogError::MissingServerDownload { .. })));
        assert!(!dir.path().join("server.jar").exists());
        assert!(!dir.path().join("server.properties").exists());
    }

    #[tokio::test]
    async fn fabric_downloads_installer_and_reports_installer_failure() {
        let server = MockServer::start_async().await;
        serve_release(&server, JAR.len()).await;
        serve_fabric_installer(&server).await;
        let dir = tempfile::tempdir().unwrap();
        let manifest = manifest(&server);

        let err = generator(&server, dir.path())
            .with_java(dir.path().join("no-such-java"))
            .generate(&manifest, &[], &answers(1))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::Installer(_)));
        assert_eq!(std::fs::read(dir.path().join(FABRIC_INSTALLER_JAR)).unwrap(), b"installer");
        assert!(!dir.path().join("boot.sh").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn fabric_install_runs_installer_and_boots_launch_jar() {
        let server = MockServer::start_async().await;
        serve_release(&server, JAR.len()).await;
        serve_fabric_installer(&server).await;
        let dir = tempfile::tempdir().unwrap();
        let java = dir.path().join("java");
        filesystem::write_file(&java, "#!/bin/sh\necho \"$@\" > args.txt\n", WriteOptions::executable()).unwrap();
        let out = dir.path().join("server");
        let manifest = manifest(&server);
        let descriptors = server_prompts(Arc::new(manifest.clone()), &GeneratorConfig::default(), true);

        generator(&server, &out)
            .with_java(&java)
            .generate(&manifest, &descriptors, &answers(1))
            .await
            .unwrap();

        let args = std::fs::read_to_string(out.join("args.txt")).unwrap();
        assert_eq!(args.trim_end(), "-jar fabric-installer.jar server -mcversion 1.21");
        assert_eq!(std::fs::read(out.join(FABRIC_INSTALLER_JAR)).unwrap(), b"installer");
        let boot = std::fs::read_to_string(out.join("boot.sh")).unwrap();
        assert_eq!(boot, "#!/bin/bash\njava -jar -Xms2560M -Xmx2560M fabric-server-launch.jar\n");
        let properties = std::fs::read_to_string(out.join("server.properties")).unwrap();
        assert!(properties.starts_with("motd=\\u0048\\u0069\n"));
        assert!(properties.ends_with("enable-query=true\n"));
        assert_eq!(std::fs::read_to_string(out.join("eula.txt")).unwrap(), "eula=true\n");
    }

    #[tokio::test]
    async fn server_jar_size_mismatch_is_an_error() {
        let server = MockServer::start_async().await;
        serve_release(&server, JAR.len() + 1).await;
        let dir = tempfile::tempdir().unwrap();
        let manifest = manifest(&server);

        let err = generator(&server, dir.path())
            .generate(&manifest, &[], &answers(0))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GenerateError::SizeMismatch { file: "server.jar", expected, actual }
                if expected == JAR.len() as u64 + 1 && actual == JAR.len() as u64
        ));
        assert!(!dir.path().join("server.properties").exists());
    }

    #[test]
    fn fabric_boots_the_launch_jar() {
        assert_eq!(ServerKind::from_index(0).launch_jar(), "server.jar");
        assert_eq!(ServerKind::from_index(1).launch_jar(), "fabric-server-launch.jar");
    }
}
