use crate::prelude::*;
use crate::tree::*;
use serde_json::{Value, json};
use unchive_descriptor::catalog::DescriptorCatalog;
use unchive_descriptor::descriptor::TypeDescriptor;

// Helper function to create a catalog holding the given built-in types
fn create_test_catalog(types: Vec<(&str, Vec<&str>)>) -> DescriptorCatalog {
    let descriptors = types
        .into_iter()
        .map(|(short_name, properties)| {
            let properties: Vec<Value> = properties
                .into_iter()
                .map(|name| json!({ "name": name, "editorType": "string" }))
                .collect();

            TypeDescriptor::from_value(&json!({
                "type": format!("{BUILTIN_NAMESPACE}.{short_name}"),
                "name": short_name,
                "properties": properties,
            }))
            .unwrap()
        });

    DescriptorCatalog::from_descriptors(descriptors).unwrap()
}

// Helper function to create an extension with a single string property
fn create_test_extension(name: &str, property: &str) -> Extension {
    let descriptor = TypeDescriptor::from_value(&json!({
        "type": name,
        "external": "true",
        "properties": [{ "name": property, "editorType": "string" }],
    }))
    .unwrap();

    Extension::new(name, descriptor)
}

fn build(
    raw: &Value,
    catalog: Option<&DescriptorCatalog>,
    extensions: &[Extension],
    config: &ResolverConfig,
) -> BuildResult<Component> {
    let classifier = OriginClassifier::new(catalog, extensions, &config.builtin_namespace);
    ComponentTreeBuilder::new(classifier, config).build(raw)
}

fn screen_form() -> Value {
    json!({
        "$Name": "Screen1",
        "$Type": "Form",
        "$Version": "31",
        "Uuid": "0",
        "Title": "Screen1",
        "$Components": [
            { "$Name": "Button1", "$Type": "Button", "Uuid": "-1201", "Text": "Hi" }
        ]
    })
}

// Helper function to create a raw tree of the given depth and fan-out
fn create_nested_form(depth: usize, fan_out: usize) -> Value {
    fn node(prefix: &str, depth: usize, fan_out: usize) -> Value {
        let children: Vec<Value> = if depth == 0 {
            vec![]
        } else {
            (0..fan_out)
                .map(|index| node(&format!("{prefix}_{index}"), depth - 1, fan_out))
                .collect()
        };

        let type_name = if depth == 0 {
            "Label"
        } else {
            "HorizontalArrangement"
        };

        json!({
            "$Name": prefix,
            "$Type": type_name,
            "Text": prefix,
            "$Components": children,
        })
    }

    node("Screen1", depth, fan_out)
}

fn names(component: &Component) -> Vec<String> {
    component
        .walk()
        .map(|component| component.name.clone())
        .collect()
}

#[test]
fn test_builtin_component_resolves_against_catalog() {
    let catalog = create_test_catalog(vec![("Form", vec!["Title"]), ("Button", vec!["Text"])]);
    let config = ResolverConfig::default();

    let root = build(&screen_form(), Some(&catalog), &[], &config).unwrap();

    assert_eq!(root.name, "Screen1");
    assert_eq!(root.type_name, "Form");
    assert!(root.id.is_absent());
    assert_eq!(root.children.len(), 1);

    let button = &root.children[0];
    assert_eq!(button.name, "Button1");
    assert_eq!(button.origin, Origin::BuiltIn);
    assert_eq!(button.id, ComponentId::Numeric(-1201));
    assert!(!button.faulty);
    assert_eq!(button.properties.len(), 1);

    let text = button.property("Text").unwrap();
    assert_eq!(text.value, PropertyValue::Text("Hi".to_string()));
    assert_eq!(text.spec.as_ref().unwrap().name, "Text");
}

#[test]
fn test_unknown_builtin_type_is_not_faulty() {
    let catalog = create_test_catalog(vec![("Form", vec!["Title"])]);
    let config = ResolverConfig::default();

    let root = build(&screen_form(), Some(&catalog), &[], &config).unwrap();
    let button = &root.children[0];

    assert_eq!(button.name, "Button1");
    assert_eq!(button.origin, Origin::BuiltIn);
    assert!(button.descriptor.is_none());
    assert!(!button.faulty);

    let text = button.property("Text").unwrap();
    assert!(!text.is_resolved());
    assert_eq!(text.value, PropertyValue::Unresolved("Hi".to_string()));
}

#[test]
fn test_missing_catalog_degrades_gracefully() {
    let config = ResolverConfig::default();
    let root = build(&screen_form(), None, &[], &config).unwrap();

    assert!(root.walk().all(|component| !component.faulty));
    assert!(
        root.walk()
            .flat_map(|component| component.properties.iter())
            .all(|property| !property.is_resolved())
    );
}

#[test]
fn test_extension_component_uses_embedded_descriptor() {
    // The catalog also knows a `Widget`; the extension must win.
    let catalog = create_test_catalog(vec![("Widget", vec!["Color"])]);
    let extensions = vec![create_test_extension("com.acme.Widget", "Speed")];
    let config = ResolverConfig::default();

    let raw = json!({
        "$Name": "Screen1",
        "$Type": "Form",
        "$Components": [{ "$Name": "Widget1", "$Type": "Widget", "Speed": "fast" }]
    });

    let root = build(&raw, Some(&catalog), &extensions, &config).unwrap();
    let widget = &root.children[0];

    assert_eq!(widget.origin, Origin::Extension);
    assert!(std::sync::Arc::ptr_eq(
        widget.descriptor.as_ref().unwrap(),
        &extensions[0].descriptor
    ));
    assert!(widget.property("Speed").unwrap().is_resolved());
}

#[test]
fn test_null_name_marks_only_that_node_faulty() {
    let config = ResolverConfig::default();
    let catalog = create_test_catalog(vec![("Label", vec!["Text"])]);

    let raw = json!({
        "$Name": "Screen1",
        "$Type": "Form",
        "$Components": [
            {
                "$Name": null,
                "$Type": "VerticalArrangement",
                "Width": "-2",
                "$Components": [
                    { "$Name": "Label1", "$Type": "Label", "Text": "inner" },
                    { "$Name": "Label2", "$Type": "Label", "Text": "inner too" }
                ]
            },
            { "$Name": "Label3", "$Type": "Label", "Text": "sibling" }
        ]
    });

    let root = build(&raw, Some(&catalog), &[], &config).unwrap();
    assert!(!root.faulty);

    let arrangement = &root.children[0];
    assert!(arrangement.faulty);
    assert!(arrangement.properties.is_empty());
    assert_eq!(arrangement.name, "");
    assert_eq!(arrangement.type_name, "VerticalArrangement");
    assert_eq!(arrangement.children.len(), 2);
    assert!(arrangement.children.iter().all(|child| !child.faulty));
    assert!(
        arrangement.children[0]
            .property("Text")
            .unwrap()
            .is_resolved()
    );

    assert!(!root.children[1].faulty);
}

#[test]
fn test_malformed_nodes_keep_their_place() {
    let config = ResolverConfig::default();
    let raw = json!({
        "$Name": "Screen1",
        "$Type": "Form",
        "$Components": [
            "not a component",
            { "$Name": "NoType1" },
            { "$Name": "BadChildren", "$Type": "HorizontalArrangement", "$Components": {} },
            { "$Name": "Fine", "$Type": "Label", "$Components": null }
        ]
    });

    let root = build(&raw, None, &[], &config).unwrap();
    let faulty: Vec<bool> = root.children.iter().map(|child| child.faulty).collect();

    assert_eq!(root.children.len(), 4);
    assert_eq!(faulty, vec![true, true, true, false]);
    assert_eq!(root.children[1].name, "NoType1");
    assert!(root.children[2].children.is_empty());
}

#[test]
fn test_root_requires_a_name() {
    let config = ResolverConfig::default();

    assert_eq!(
        build(&json!({ "$Type": "Form" }), None, &[], &config),
        Err(BuildError::MissingRootName)
    );
    assert_eq!(
        build(&json!({ "$Name": null, "$Type": "Form" }), None, &[], &config),
        Err(BuildError::MissingRootName)
    );
    assert_eq!(
        build(&json!([]), None, &[], &config),
        Err(BuildError::RootNotAnObject)
    );
}

#[test]
fn test_tree_shape_is_preserved() {
    let catalog = create_test_catalog(vec![("Label", vec!["Text"])]);
    let raw = create_nested_form(4, 3);

    let root = build(&raw, Some(&catalog), &[], &ResolverConfig::default()).unwrap();

    // 1 + 3 + 9 + 27 + 81
    assert_eq!(root.count(), 121);
    assert_eq!(root.children[2].children[0].name, "Screen1_2_0");
    assert_eq!(root.find("Screen1_1_2_0_1").unwrap().type_name, "Label");
    assert!(root.find("Screen1_9").is_none());
}

#[test]
fn test_parallel_and_sequential_builds_agree() {
    let catalog = create_test_catalog(vec![("Label", vec!["Text"])]);
    let raw = create_nested_form(3, 5);

    let parallel = build(&raw, Some(&catalog), &[], &ResolverConfig::default()).unwrap();
    let sequential = build(&raw, Some(&catalog), &[], &ResolverConfig::sequential()).unwrap();

    assert_eq!(names(&parallel), names(&sequential));
    assert_eq!(parallel, sequential);
}

#[test]
fn test_component_ids() {
    let config = ResolverConfig::default();
    let raw = json!({
        "$Name": "Screen1",
        "$Type": "Form",
        "$Components": [
            { "$Name": "A", "$Type": "Label", "Uuid": 42 },
            { "$Name": "B", "$Type": "Label", "Uuid": "abc-def" },
            { "$Name": "C", "$Type": "Label" }
        ]
    });

    let root = build(&raw, None, &[], &config).unwrap();
    let ids: Vec<_> = root.children.iter().map(|child| child.id.clone()).collect();

    assert_eq!(
        ids,
        vec![
            ComponentId::Numeric(42),
            ComponentId::Text("abc-def".to_string()),
            ComponentId::Numeric(0),
        ]
    );
    assert_eq!(ids[1].to_string(), "abc-def");
    assert!(ids[2].is_absent());
}
