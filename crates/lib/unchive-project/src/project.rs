//! Screen and project assembly.
use crate::prelude::*;
use crate::scheme;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};
use unchive_descriptor::catalog::DescriptorCatalog;
use unchive_descriptor::error::CatalogError;

/// Opaque metadata of a bundled asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub name: String,
    /// Asset type, usually the file extension.
    pub kind: String,
    pub size: u64,
}

impl Asset {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            size,
        }
    }

    /// Derives the kind from the extension of `name`.
    pub fn from_file_name(name: impl Into<String>, size: u64) -> Self {
        let name = name.into();
        let kind = name
            .rsplit_once('.')
            .map(|(_, extension)| extension.to_owned())
            .unwrap_or_default();

        Self { name, kind, size }
    }
}

/// What screens are built against: the project's name, its loaded
/// extensions and the built-in catalog, if it could be built.
#[derive(Debug, Clone, Copy)]
pub struct ProjectContext<'a> {
    pub name: &'a str,
    pub catalog: Option<&'a DescriptorCatalog>,
    pub extensions: &'a [Extension],
    pub config: &'a ResolverConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub name: String,
    /// The screen's top-level form.
    pub form: Component,
    /// Block definitions, kept verbatim.
    pub blocks: String,
    /// Name of the owning project; a lookup relation, not ownership.
    pub project_name: String,
}

impl Screen {
    #[tracing::instrument(skip_all, fields(screen = name))]
    pub fn assemble(
        name: &str,
        raw_form: &Value,
        raw_blocks: impl Into<String>,
        context: &ProjectContext<'_>,
    ) -> AssemblyResult<Self> {
        if name.is_empty() {
            return Err(AssemblyError::EmptyScreenName);
        }

        info!("Assembling screen");

        let classifier = OriginClassifier::new(
            context.catalog,
            context.extensions,
            &context.config.builtin_namespace,
        );
        let form = ComponentTreeBuilder::new(classifier, context.config)
            .build(raw_form)
            .map_err(|error| AssemblyError::Build {
                screen: name.to_owned(),
                error,
            })?;

        Ok(Self {
            name: name.to_owned(),
            form,
            blocks: raw_blocks.into(),
            project_name: context.name.to_owned(),
        })
    }

    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.form.walk()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub name: String,
    pub screens: Vec<Screen>,
    pub extensions: Vec<Extension>,
    pub assets: Vec<Asset>,
}

impl Project {
    /// Aggregates already built parts, rejecting the first item that does
    /// not have the expected shape.
    pub fn assemble(
        name: impl Into<String>,
        screens: Vec<Screen>,
        extensions: Vec<Extension>,
        assets: Vec<Asset>,
    ) -> AssemblyResult<Self> {
        for (index, extension) in extensions.iter().enumerate() {
            if extension.name.is_empty() {
                return Err(invalid(ItemKind::Extension, index, "extension has no name"));
            }
            if extension.descriptor.type_id.is_empty() {
                return Err(invalid(ItemKind::Extension, index, "extension has no descriptor type"));
            }
        }

        let mut screen_names = HashSet::with_capacity(screens.len());
        for (index, screen) in screens.iter().enumerate() {
            if screen.name.is_empty() {
                return Err(invalid(ItemKind::Screen, index, "screen has no name"));
            }
            if screen.form.name.is_empty() {
                return Err(invalid(ItemKind::Screen, index, "screen form has no name"));
            }
            if !screen_names.insert(screen.name.as_str()) {
                return Err(invalid(
                    ItemKind::Screen,
                    index,
                    &format!("screen `{}` is declared more than once", screen.name),
                ));
            }
        }

        for (index, asset) in assets.iter().enumerate() {
            if asset.name.is_empty() {
                return Err(invalid(ItemKind::Asset, index, "asset has no name"));
            }
        }

        Ok(Self {
            name: name.into(),
            screens,
            extensions,
            assets,
        })
    }

    pub fn screen(&self, name: &str) -> Option<&Screen> {
        self.screens.iter().find(|screen| screen.name == name)
    }

    pub fn screen_names(&self) -> Vec<&str> {
        self.screens.iter().map(|screen| screen.name.as_str()).collect()
    }

    pub fn asset_names(&self) -> Vec<&str> {
        self.assets.iter().map(|asset| asset.name.as_str()).collect()
    }

    /// The extension a component of type `short_type` would resolve to.
    pub fn extension_for_type(&self, short_type: &str) -> Option<&Extension> {
        self.extensions
            .iter()
            .find(|extension| extension.matches(short_type))
    }

    /// Every faulty component, paired with its screen.
    pub fn faulty_components(&self) -> Vec<(&Screen, &Component)> {
        self.screens
            .iter()
            .flat_map(|screen| {
                screen
                    .components()
                    .filter(|component| component.faulty)
                    .map(move |component| (screen, component))
            })
            .collect()
    }
}

fn invalid(kind: ItemKind, index: usize, reason: &str) -> AssemblyError {
    AssemblyError::InvalidItem {
        kind,
        index,
        reason: reason.to_owned(),
    }
}

#[derive(Debug, Clone)]
enum FormSource {
    Json(Value),
    Scheme(String),
}

#[derive(Debug, Clone)]
struct ScreenSource {
    name: String,
    form: FormSource,
    blocks: String,
}

/// Collects the decoded contents of a project bundle and assembles them.
///
/// The built-in catalog is passed in already built. A failed catalog build
/// is not fatal here: screens are then resolved without built-in
/// descriptors.
#[derive(Debug)]
pub struct ProjectBuilder {
    name: String,
    catalog: Option<Arc<DescriptorCatalog>>,
    config: ResolverConfig,
    extensions: Vec<Extension>,
    assets: Vec<Asset>,
    screens: Vec<ScreenSource>,
}

impl ProjectBuilder {
    pub fn new(
        name: impl Into<String>,
        catalog: Result<Arc<DescriptorCatalog>, CatalogError>,
        config: ResolverConfig,
    ) -> Self {
        let catalog = match catalog {
            Ok(catalog) => Some(catalog),
            Err(error) => {
                warn!(%error, "Built-in descriptors are unavailable, resolving without them");
                None
            }
        };

        Self {
            name: name.into(),
            catalog,
            config,
            extensions: vec![],
            assets: vec![],
            screens: vec![],
        }
    }

    pub fn add_extension(&mut self, extension: Extension) -> &mut Self {
        self.extensions.push(extension);
        self
    }

    pub fn add_extensions(&mut self, extensions: impl IntoIterator<Item = Extension>) -> &mut Self {
        self.extensions.extend(extensions);
        self
    }

    pub fn add_asset(&mut self, asset: Asset) -> &mut Self {
        self.assets.push(asset);
        self
    }

    /// Adds a screen from its already decoded root form.
    pub fn add_screen(
        &mut self,
        name: impl Into<String>,
        form: Value,
        blocks: impl Into<String>,
    ) -> &mut Self {
        self.screens.push(ScreenSource {
            name: name.into(),
            form: FormSource::Json(form),
            blocks: blocks.into(),
        });
        self
    }

    /// Adds a screen from the text of its `.scm` file.
    pub fn add_scheme_screen(
        &mut self,
        name: impl Into<String>,
        scheme: impl Into<String>,
        blocks: impl Into<String>,
    ) -> &mut Self {
        self.screens.push(ScreenSource {
            name: name.into(),
            form: FormSource::Scheme(scheme.into()),
            blocks: blocks.into(),
        });
        self
    }

    /// Builds every screen, in parallel when enabled, and assembles the
    /// project. Screens keep the order they were added in.
    #[tracing::instrument(skip_all, fields(project = %self.name))]
    pub fn build(self) -> AssemblyResult<Project> {
        info!(
            screens = self.screens.len(),
            extensions = self.extensions.len(),
            "Assembling project"
        );

        let context = ProjectContext {
            name: &self.name,
            catalog: self.catalog.as_deref(),
            extensions: &self.extensions,
            config: &self.config,
        };

        let screens = if self.config.runs_parallel() {
            Self::build_screens_parallel(&self.screens, &context)?
        } else {
            self.screens
                .iter()
                .map(|source| Self::build_screen(source, &context))
                .collect::<AssemblyResult<Vec<_>>>()?
        };

        Project::assemble(self.name, screens, self.extensions, self.assets)
    }

    fn build_screen(source: &ScreenSource, context: &ProjectContext<'_>) -> AssemblyResult<Screen> {
        match &source.form {
            FormSource::Json(form) => {
                Screen::assemble(&source.name, form, source.blocks.clone(), context)
            }
            FormSource::Scheme(text) => {
                let document = scheme::decode(text).map_err(|error| AssemblyError::Scheme {
                    screen: source.name.clone(),
                    error,
                })?;
                Screen::assemble(
                    &source.name,
                    &document.properties,
                    source.blocks.clone(),
                    context,
                )
            }
        }
    }

    #[cfg(feature = "parallel")]
    fn build_screens_parallel(
        sources: &[ScreenSource],
        context: &ProjectContext<'_>,
    ) -> AssemblyResult<Vec<Screen>> {
        use rayon::prelude::*;

        sources
            .par_iter()
            .map(|source| Self::build_screen(source, context))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn build_screens_parallel(
        sources: &[ScreenSource],
        context: &ProjectContext<'_>,
    ) -> AssemblyResult<Vec<Screen>> {
        sources
            .iter()
            .map(|source| Self::build_screen(source, context))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use unchive_descriptor::catalog::CatalogCell;
    use unchive_descriptor::descriptor::TypeDescriptor;

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

    fn form(name: &str) -> Value {
        json!({
            "$Name": name,
            "$Type": "Form",
            "Title": name,
            "$Components": [{ "$Name": "Button1", "$Type": "Button", "Text": "Hi" }]
        })
    }

    fn extension(name: &str) -> Extension {
        Extension::new(name, TypeDescriptor::from_value(&json!({ "type": name })).unwrap())
    }

    #[test]
    fn test_assemble_screen() {
        let catalog = DescriptorCatalog::from_json(CATALOG).unwrap();
        let config = ResolverConfig::default();
        let context = ProjectContext {
            name: "Demo",
            catalog: Some(&catalog),
            extensions: &[],
            config: &config,
        };

        let screen = Screen::assemble("Screen1", &form("Screen1"), "<xml/>", &context).unwrap();

        assert_eq!(screen.name, "Screen1");
        assert_eq!(screen.project_name, "Demo");
        assert_eq!(screen.blocks, "<xml/>");
        assert_eq!(screen.form.name, "Screen1");
        assert_eq!(screen.components().count(), 2);

        let button = screen.form.find("Button1").unwrap();
        assert!(button.property("Text").unwrap().is_resolved());
    }

    #[test]
    fn test_empty_screen_name_is_rejected() {
        let config = ResolverConfig::default();
        let context = ProjectContext {
            name: "Demo",
            catalog: None,
            extensions: &[],
            config: &config,
        };

        assert_eq!(
            Screen::assemble("", &form("Screen1"), "", &context),
            Err(AssemblyError::EmptyScreenName)
        );
        assert!(matches!(
            Screen::assemble("Screen1", &json!({ "$Type": "Form" }), "", &context),
            Err(AssemblyError::Build {
                error: BuildError::MissingRootName,
                ..
            })
        ));
    }

    #[test]
    fn test_project_builder() {
        let cell = CatalogCell::new(CATALOG);
        let mut builder = ProjectBuilder::new("Demo", cell.build(), ResolverConfig::default());
        builder
            .add_extension(extension("com.acme.Widget"))
            .add_asset(Asset::from_file_name("kitty.png", 1024))
            .add_screen("Screen1", form("Screen1"), "")
            .add_scheme_screen(
                "Screen2",
                format!("#|\n$JSON\n{}\n|#", json!({ "Properties": form("Screen2") })),
                "<xml/>",
            );

        let project = builder.build().unwrap();

        assert_eq!(project.screen_names(), vec!["Screen1", "Screen2"]);
        assert_eq!(project.asset_names(), vec!["kitty.png"]);
        assert_eq!(project.assets[0].kind, "png");
        assert!(project.extension_for_type("Widget").is_some());
        assert!(project.extension_for_type("Button").is_none());
        assert!(project.faulty_components().is_empty());

        let screen2 = project.screen("Screen2").unwrap();
        assert_eq!(screen2.blocks, "<xml/>");
        assert_eq!(screen2.project_name, "Demo");
    }

    #[test]
    fn test_project_builder_without_catalog() {
        let cell = CatalogCell::new("not json");
        let mut builder = ProjectBuilder::new("Demo", cell.build(), ResolverConfig::sequential());
        builder.add_screen("Screen1", form("Screen1"), "");

        let project = builder.build().unwrap();
        let button = project.screens[0].form.find("Button1").unwrap();

        assert!(!button.faulty);
        assert!(!button.property("Text").unwrap().is_resolved());
    }

    #[test]
    fn test_project_builder_surfaces_screen_errors() {
        let mut builder = ProjectBuilder::new(
            "Demo",
            DescriptorCatalog::from_json(CATALOG).map(Arc::new),
            ResolverConfig::default(),
        );
        builder
            .add_screen("Screen1", form("Screen1"), "")
            .add_scheme_screen("Screen2", "garbage", "");

        assert!(matches!(
            builder.build(),
            Err(AssemblyError::Scheme {
                screen,
                error: SchemeError::MissingFraming,
            }) if screen == "Screen2"
        ));
    }

    #[test]
    fn test_assemble_validates_items() {
        let config = ResolverConfig::default();
        let context = ProjectContext {
            name: "Demo",
            catalog: None,
            extensions: &[],
            config: &config,
        };
        let screen = |name: &str| Screen::assemble(name, &form(name), "", &context).unwrap();

        let mut unnamed = extension("a.C");
        unnamed.name.clear();
        assert!(matches!(
            Project::assemble("Demo", vec![], vec![extension("a.B"), unnamed], vec![]),
            Err(AssemblyError::InvalidItem {
                kind: ItemKind::Extension,
                index: 1,
                ..
            })
        ));

        assert!(matches!(
            Project::assemble("Demo", vec![screen("Screen1"), screen("Screen1")], vec![], vec![]),
            Err(AssemblyError::InvalidItem {
                kind: ItemKind::Screen,
                index: 1,
                ..
            })
        ));

        let mut nameless = screen("Screen1");
        nameless.name.clear();
        assert!(matches!(
            Project::assemble("Demo", vec![nameless], vec![], vec![]),
            Err(AssemblyError::InvalidItem {
                kind: ItemKind::Screen,
                index: 0,
                ..
            })
        ));

        assert!(matches!(
            Project::assemble("Demo", vec![], vec![], vec![Asset::new("", "png", 3)]),
            Err(AssemblyError::InvalidItem {
                kind: ItemKind::Asset,
                index: 0,
                ..
            })
        ));

        let error = Project::assemble("Demo", vec![], vec![], vec![Asset::new("", "png", 3)])
            .unwrap_err();
        assert_eq!(error.to_string(), "Invalid asset at index 0: asset has no name");
    }

    #[test]
    fn test_faulty_components_are_reported() {
        let config = ResolverConfig::default();
        let context = ProjectContext {
            name: "Demo",
            catalog: None,
            extensions: &[],
            config: &config,
        };
        let raw = json!({
            "$Name": "Screen1",
            "$Type": "Form",
            "$Components": [{ "$Type": "Button" }, { "$Name": "Ok", "$Type": "Label" }]
        });
        let screen = Screen::assemble("Screen1", &raw, "", &context).unwrap();
        let project = Project::assemble("Demo", vec![screen], vec![], vec![]).unwrap();

        let faulty = project.faulty_components();
        assert_eq!(faulty.len(), 1);
        assert_eq!(faulty[0].0.name, "Screen1");
        assert_eq!(faulty[0].1.type_name, "Button");
    }
}
