//! Embed fields shared by every build lifecycle notification.

use crate::models::build::BuildContext;
use crate::models::message::EmbedField;
use crate::ports::ProjectRegistry;

/// Shown when the build's project is not in the registry.
pub const NO_DATA: &str = "<No data available>";

/// Branch value for builds on the default (or no) branch.
pub const DEFAULT_BRANCH_LABEL: &str = "Default";

/// Build the context fields for a build: Project, Build, Branch, then Comment
/// when the build has one. Pure; the same input always yields the same fields.
pub fn build_context_fields(build: &BuildContext, projects: &dyn ProjectRegistry) -> Vec<EmbedField> {
    let mut fields = Vec::with_capacity(4);

    let project_name = projects
        .project_name(&build.project_id)
        .unwrap_or_else(|| NO_DATA.to_string());
    fields.push(EmbedField::new("Project", project_name, true));

    fields.push(EmbedField::new("Build", build.build_type_name.as_str(), true));

    let branch_name = match &build.branch {
        Some(branch) if !branch.is_default() => branch.display_name.as_str(),
        _ => DEFAULT_BRANCH_LABEL,
    };
    fields.push(EmbedField::new("Branch", branch_name, true));

    if let Some(comment) = &build.comment {
        fields.push(EmbedField::new("Comment", comment.as_str(), false));
    }

    fields
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::models::build::Branch;

    fn registry() -> HashMap<String, String> {
        HashMap::from([("proj1".to_string(), "Foo".to_string())])
    }

    fn build(branch: Option<Branch>, comment: Option<&str>) -> BuildContext {
        BuildContext {
            build_id: 42,
            project_id: "proj1".to_string(),
            build_type_name: "Compile".to_string(),
            branch,
            comment: comment.map(str::to_string),
        }
    }

    fn values(fields: &[EmbedField]) -> Vec<(&str, &str, bool)> {
        fields.iter().map(|f| (f.name.as_str(), f.value.as_str(), f.inline)).collect()
    }

    #[test]
    fn default_branch_without_comment() {
        let fields = build_context_fields(&build(None, None), &registry());
        assert_eq!(
            values(&fields),
            vec![("Project", "Foo", true), ("Build", "Compile", true), ("Branch", "Default", true)]
        );
    }

    #[test]
    fn default_branch_marker_maps_to_default() {
        let branch = Branch::new(Branch::DEFAULT_BRANCH_NAME, "main");
        let fields = build_context_fields(&build(Some(branch), None), &registry());
        assert_eq!(fields[2].value, "Default");
    }

    #[test]
    fn named_branch_uses_display_name() {
        let branch = Branch::new("refs/heads/feature/x", "feature/x");
        let fields = build_context_fields(&build(Some(branch), Some("flaky test")), &registry());
        assert_eq!(fields[2].value, "feature/x");
        assert_eq!(fields[3], EmbedField::new("Comment", "flaky test", false));
    }

    #[test]
    fn unknown_project_uses_sentinel() {
        let fields = build_context_fields(&build(None, None), &HashMap::new());
        assert_eq!(fields[0].value, NO_DATA);
    }

    #[test]
    fn empty_comment_is_still_a_comment() {
        let fields = build_context_fields(&build(None, Some("")), &registry());
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[3].value, "");
    }
}
