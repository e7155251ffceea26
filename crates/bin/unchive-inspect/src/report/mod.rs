use crate::error::InspectError;
use std::fmt::Write;
use unchive_project::prelude::{Component, Origin, Project, ProjectSummary};

const INDENT: &str = "  ";

/// Renders every screen's component tree, one node per line.
pub fn render_project(project: &Project) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "{}", project.name);
    for extension in &project.extensions {
        let info = extension.info();
        let _ = writeln!(
            output,
            "{INDENT}extension {} {} ({})",
            info.name, info.version_name, info.package
        );
    }

    for screen in &project.screens {
        let _ = writeln!(output, "{INDENT}screen {}", screen.name);
        render_component(&screen.form, 2, &mut output);
    }

    output
}

fn render_component(component: &Component, depth: usize, output: &mut String) {
    let indent = INDENT.repeat(depth);
    let marker = match (component.faulty, component.origin) {
        (true, _) => " [faulty]",
        (false, Origin::Extension) => " [extension]",
        (false, Origin::BuiltIn) => "",
    };

    let _ = writeln!(
        output,
        "{indent}{} : {}{marker}",
        component.name, component.type_name
    );

    for property in &component.properties {
        let unresolved = if property.is_resolved() { "" } else { " ?" };
        let _ = writeln!(
            output,
            "{indent}{INDENT}{} = {}{unresolved}",
            property.name, property.value
        );
    }

    for child in &component.children {
        render_component(child, depth + 1, output);
    }
}

pub fn render_summary(project: &Project) -> Result<String, InspectError> {
    let summary = ProjectSummary::from_project(project);
    Ok(serde_json::to_string_pretty(&summary)?)
}
