/// Release variables available to message and branch-name templates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplateVars<'a> {
    /// The version after bumping.
    pub version: &'a str,
    /// The version as it was stored before bumping.
    pub orig_version: &'a str,
}

/// Expands `{version}` and `{orig_version}` placeholders in a template.
///
/// Templates come straight from configuration (commit messages, branch names),
/// so unknown placeholders pass through untouched.
pub fn expand(template: &str, vars: &TemplateVars) -> String {
    template
        .replace("{version}", vars.version)
        .replace("{orig_version}", vars.orig_version)
}
