//! Reads an extracted `.aia` project from disk.
//!
//! Layout:
//!
//! ```text
//! youngandroidproject/project.properties
//! src/<package path>/Screen1.scm
//! src/<package path>/Screen1.bky
//! assets/<asset files>
//! assets/external_comps/<package>/components.json
//! assets/external_comps/<package>/files/component_build_infos.json
//! ```
use crate::error::InspectError;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use unchive_descriptor::catalog::{DescriptorCatalog, DescriptorSource};
use unchive_descriptor::prelude::{CatalogError, CatalogResult};
use unchive_project::prelude::{Asset, Extension, Project, ProjectBuilder, ResolverConfig};
use walkdir::WalkDir;

const PROPERTIES_FILE: &str = "youngandroidproject/project.properties";
const SOURCES_DIR: &str = "src";
const ASSETS_DIR: &str = "assets";
const EXTENSIONS_DIR: &str = "external_comps";
const COMPONENTS_FILES: [&str; 2] = ["components.json", "component.json"];
const BUILD_INFOS_FILES: [&str; 2] = [
    "files/component_build_infos.json",
    "component_build_infos.json",
];

/// A descriptor catalog stored in a file.
pub struct CatalogFile(pub PathBuf);

impl DescriptorSource for CatalogFile {
    fn load(&self) -> CatalogResult<Cow<'_, str>> {
        std::fs::read_to_string(&self.0)
            .map(Cow::Owned)
            .map_err(|error| CatalogError::Source(format!("{}: {error}", self.0.display())))
    }
}

pub struct ProjectLoader;

impl ProjectLoader {
    #[tracing::instrument(skip_all, fields(root = %root.display()))]
    pub fn load(
        root: &Path,
        catalog: CatalogResult<Arc<DescriptorCatalog>>,
        config: ResolverConfig,
    ) -> Result<Project, InspectError> {
        crate::cli::check_path(root)?;

        let name = Self::project_name(root)?;
        let mut builder = ProjectBuilder::new(name, catalog, config);

        let screens = Self::add_screens(root, &mut builder)?;
        if screens == 0 {
            return Err(InspectError::NoScreens(root.to_string_lossy().to_string()));
        }

        let assets = root.join(ASSETS_DIR);
        if assets.is_dir() {
            Self::add_assets(&assets, &mut builder)?;
            Self::add_extensions(&assets.join(EXTENSIONS_DIR), &mut builder)?;
        }

        Ok(builder.build()?)
    }

    /// `name=` entry of the project properties, or the directory name.
    fn project_name(root: &Path) -> Result<String, InspectError> {
        let properties = root.join(PROPERTIES_FILE);
        if properties.is_file() {
            let content = std::fs::read_to_string(properties)?;
            let name = content
                .lines()
                .filter_map(|line| line.split_once('='))
                .find(|(key, _)| key.trim() == "name")
                .map(|(_, value)| value.trim().to_owned())
                .filter(|name| !name.is_empty());

            if let Some(name) = name {
                return Ok(name);
            }
        }

        Ok(root
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default())
    }

    fn add_screens(root: &Path, builder: &mut ProjectBuilder) -> Result<usize, InspectError> {
        let sources = root.join(SOURCES_DIR);
        let search_root = if sources.is_dir() { sources } else { root.to_path_buf() };

        let mut count = 0;
        for entry in WalkDir::new(search_root).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            let is_scheme = path.extension().and_then(|ext| ext.to_str()) == Some("scm");
            if !entry.file_type().is_file() || !is_scheme {
                continue;
            }

            let Some(name) = path.file_stem().map(|stem| stem.to_string_lossy().to_string()) else {
                continue;
            };

            let scheme = std::fs::read_to_string(path)?;
            let blocks_path = path.with_extension("bky");
            let blocks = if blocks_path.is_file() {
                std::fs::read_to_string(blocks_path)?
            } else {
                warn!(screen = %name, "Screen has no blocks file");
                String::new()
            };

            debug!(screen = %name, "Found screen");
            builder.add_scheme_screen(name, scheme, blocks);
            count += 1;
        }

        Ok(count)
    }

    fn add_assets(assets: &Path, builder: &mut ProjectBuilder) -> Result<(), InspectError> {
        let walker = WalkDir::new(assets)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                !(entry.depth() == 1 && entry.file_name().to_str() == Some(EXTENSIONS_DIR))
            });

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry
                .path()
                .strip_prefix(assets)
                .unwrap_or(entry.path())
                .to_string_lossy()
                .replace('\\', "/");

            builder.add_asset(Asset::from_file_name(name, entry.metadata()?.len()));
        }

        Ok(())
    }

    fn add_extensions(directory: &Path, builder: &mut ProjectBuilder) -> Result<(), InspectError> {
        if !directory.is_dir() {
            return Ok(());
        }

        let packages = WalkDir::new(directory)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in packages {
            let entry = entry?;
            if !entry.file_type().is_dir() {
                continue;
            }

            let package = entry.file_name().to_string_lossy().to_string();
            let path = entry.path();

            let Some(components) = Self::read_first(path, &COMPONENTS_FILES)? else {
                warn!(%package, "Extension package has no components file, skipping");
                continue;
            };
            let build_infos = Self::read_first(path, &BUILD_INFOS_FILES)?;
            let file_size = Self::directory_size(path)?;

            let extensions = Extension::from_bundle(&components, build_infos.as_deref(), file_size)
                .map_err(|error| InspectError::Extension {
                    package: package.clone(),
                    error,
                })?;

            info!(%package, components = extensions.len(), "Loaded extension");
            builder.add_extensions(extensions);
        }

        Ok(())
    }

    fn read_first(directory: &Path, candidates: &[&str]) -> Result<Option<String>, InspectError> {
        for candidate in candidates {
            let path = directory.join(candidate);
            if path.is_file() {
                return Ok(Some(std::fs::read_to_string(path)?));
            }
        }

        Ok(None)
    }

    fn directory_size(directory: &Path) -> Result<u64, InspectError> {
        let mut size = 0;
        for entry in WalkDir::new(directory) {
            let entry = entry?;
            if entry.file_type().is_file() {
                size += entry.metadata()?.len();
            }
        }

        Ok(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use unchive_descriptor::catalog::CatalogCell;
    use unchive_project::prelude::Origin;

    const CATALOG: &str = r#"[
        {
            "type": "com.google.appinventor.components.runtime.Form",
            "properties": [{ "name": "Title", "editorType": "string" }]
        },
        {
            "type": "com.google.appinventor.components.runtime.Button",
            "properties": [{ "name": "Text", "editorType": "string" }]
        }
    ]"#;

    fn scheme(name: &str, components: &str) -> String {
        format!(
            "#|\n$JSON\n{{\"YaVersion\":\"208\",\"Source\":\"Form\",\"Properties\":{{\"$Name\":\"{name}\",\"$Type\":\"Form\",\"Uuid\":\"0\",\"Title\":\"{name}\",\"$Components\":[{components}]}}}}\n|#\n"
        )
    }

    // Helper function to lay out an extracted project under a temporary directory
    fn create_test_project() -> tempfile::TempDir {
        let directory = tempfile::tempdir().unwrap();
        let root = directory.path();

        let properties = root.join("youngandroidproject");
        fs::create_dir_all(&properties).unwrap();
        fs::write(
            properties.join("project.properties"),
            "main=appinventor.ai_test.Demo.Screen1\nname=Demo\n",
        )
        .unwrap();

        let sources = root.join("src/appinventor/ai_test/Demo");
        fs::create_dir_all(&sources).unwrap();
        fs::write(
            sources.join("Screen1.scm"),
            scheme(
                "Screen1",
                r#"{"$Name":"Button1","$Type":"Button","Uuid":"11","Text":"Go"},{"$Name":"Widget1","$Type":"Widget","Uuid":"12"}"#,
            ),
        )
        .unwrap();
        fs::write(sources.join("Screen1.bky"), "<xml></xml>").unwrap();
        fs::write(sources.join("Screen2.scm"), scheme("Screen2", "")).unwrap();

        let assets = root.join("assets");
        fs::create_dir_all(assets.join("sounds")).unwrap();
        fs::write(assets.join("kitty.png"), [0u8; 16]).unwrap();
        fs::write(assets.join("sounds/meow.mp3"), [0u8; 8]).unwrap();

        let extension = assets.join("external_comps/com.acme.widget");
        fs::create_dir_all(extension.join("files")).unwrap();
        fs::write(
            extension.join("components.json"),
            r#"[{ "type": "com.acme.widget.Widget", "external": "true" }]"#,
        )
        .unwrap();
        fs::write(
            extension.join("files/component_build_infos.json"),
            r#"[{ "type": "com.acme.widget.Widget", "author": "Acme" }]"#,
        )
        .unwrap();

        directory
    }

    #[test]
    fn test_load_project() {
        let directory = create_test_project();
        let cell = CatalogCell::new(CATALOG);

        let project =
            ProjectLoader::load(directory.path(), cell.build(), ResolverConfig::default()).unwrap();

        assert_eq!(project.name, "Demo");
        assert_eq!(project.screen_names(), vec!["Screen1", "Screen2"]);
        assert_eq!(project.asset_names(), vec!["kitty.png", "sounds/meow.mp3"]);
        assert_eq!(project.extensions.len(), 1);

        let screen = project.screen("Screen1").unwrap();
        assert_eq!(screen.blocks, "<xml></xml>");
        assert_eq!(project.screen("Screen2").unwrap().blocks, "");

        let button = screen.form.find("Button1").unwrap();
        assert_eq!(button.origin, Origin::BuiltIn);
        assert!(button.property("Text").unwrap().is_resolved());

        let widget = screen.form.find("Widget1").unwrap();
        assert_eq!(widget.origin, Origin::Extension);

        let extension = &project.extensions[0];
        assert_eq!(extension.build_info.author.as_deref(), Some("Acme"));
        assert!(extension.file_size > 0);
    }

    #[test]
    fn test_load_without_catalog() {
        let directory = create_test_project();
        let cell = CatalogCell::new(CatalogFile(directory.path().join("missing.json")));

        let project =
            ProjectLoader::load(directory.path(), cell.build(), ResolverConfig::sequential())
                .unwrap();
        let button = project.screens[0].form.find("Button1").unwrap();

        assert!(!button.faulty);
        assert!(!button.property("Text").unwrap().is_resolved());
    }

    #[test]
    fn test_catalog_file() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("simple_components.json");
        fs::write(&path, CATALOG).unwrap();

        let catalog = CatalogCell::new(CatalogFile(path)).build().unwrap();
        assert_eq!(catalog.len(), 2);

        let missing = CatalogCell::new(CatalogFile(directory.path().join("nope.json")));
        assert!(matches!(missing.build(), Err(CatalogError::Source(_))));
    }

    #[test]
    fn test_project_without_screens() {
        let directory = tempfile::tempdir().unwrap();

        assert!(matches!(
            ProjectLoader::load(
                directory.path(),
                Ok(Default::default()),
                ResolverConfig::default(),
            ),
            Err(InspectError::NoScreens(_))
        ));
    }

    #[test]
    fn test_invalid_extension_is_reported() {
        let directory = create_test_project();
        fs::write(
            directory
                .path()
                .join("assets/external_comps/com.acme.widget/components.json"),
            "{}",
        )
        .unwrap();

        assert!(matches!(
            ProjectLoader::load(
                directory.path(),
                Ok(Default::default()),
                ResolverConfig::default(),
            ),
            Err(InspectError::Extension { package, .. }) if package == "com.acme.widget"
        ));
    }
}
