//! Browsable links derived from resource API URIs.
//!
//! A bucket URI looks like `https://connection.keboola.com/v2/storage/buckets/in.c-main`
//! and a table URI like `.../v2/storage/tables/in.c-main.users`. Both map to
//! `{stack}/admin/projects/{project}/storage/{bucket}[/{table}]`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static RESOURCE_URI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<stack>https?://[^/]+)/v2/storage/(?P<kind>buckets|tables)/(?P<id>[^/?#]+)")
        .expect("static regex")
});

/// Which project id is substituted into links.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    schemars::JsonSchema,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LinkProject {
    /// Always the source project, including for destination-only resources
    #[default]
    Source,
    /// The project that owns the resource: source for additions and
    /// modifications, destination for removals
    Owner,
}

/// Builds links for one side of a comparison.
#[derive(Debug, Clone, Default)]
pub struct LinkBuilder {
    project_id: Option<String>,
}

impl LinkBuilder {
    #[must_use]
    pub fn new(project_id: Option<String>) -> Self {
        Self { project_id }
    }

    /// Link for the resource behind `uri`, or `None` when the URI is missing,
    /// unrecognized, or no project id is known.
    #[must_use]
    pub fn link(&self, uri: Option<&str>) -> Option<String> {
        let project = self.project_id.as_deref()?;
        let caps = RESOURCE_URI.captures(uri?)?;
        let stack = &caps["stack"];
        let id = &caps["id"];

        match &caps["kind"] {
            "buckets" => Some(format!("{stack}/admin/projects/{project}/storage/{id}")),
            _ => {
                let (bucket, table) = id.rsplit_once('.')?;
                Some(format!(
                    "{stack}/admin/projects/{project}/storage/{bucket}/{table}"
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> LinkBuilder {
        LinkBuilder::new(Some("1234".into()))
    }

    #[test]
    fn test_bucket_link() {
        let link = builder().link(Some("https://connection.keboola.com/v2/storage/buckets/in.c-main"));
        assert_eq!(
            link.as_deref(),
            Some("https://connection.keboola.com/admin/projects/1234/storage/in.c-main")
        );
    }

    #[test]
    fn test_table_link_splits_at_last_dot() {
        let link = builder().link(Some(
            "https://connection.eu-central-1.keboola.com/v2/storage/tables/in.c-main.users",
        ));
        assert_eq!(
            link.as_deref(),
            Some("https://connection.eu-central-1.keboola.com/admin/projects/1234/storage/in.c-main/users")
        );
    }

    #[test]
    fn test_missing_parts_yield_no_link() {
        assert_eq!(builder().link(None), None);
        assert_eq!(builder().link(Some("not a uri")), None);
        assert_eq!(
            LinkBuilder::new(None).link(Some("https://c.keboola.com/v2/storage/buckets/in.c-main")),
            None
        );
    }
}
