//! WP-CLI command strings for a DDEV project

/// Builds `cd <project> && ddev wp ...` command lines
#[derive(Debug, Clone)]
pub struct WpCli {
    project_dir: String,
}

impl WpCli {
    pub fn new(project_dir: impl Into<String>) -> Self {
        Self {
            project_dir: project_dir.into(),
        }
    }

    /// `ddev wp <args>` run from the project directory
    pub fn raw(&self, args: &str) -> String {
        format!("cd {} && ddev wp {}", self.project_dir, args.trim())
    }

    pub fn option_get(&self, name: &str) -> String {
        self.raw(&format!("option get {} --format=json", name))
    }

    pub fn plugin_is_active(&self, slug: &str) -> String {
        self.raw(&format!("plugin is-active {}", slug))
    }

    /// `wp eval '<php>'`
    pub fn eval(&self, php: &str) -> String {
        self.raw(&format!("eval {}", single_quote(php.trim())))
    }

    /// `wp db query '<sql>'`
    pub fn db_query(&self, sql: &str) -> String {
        self.raw(&format!("db query {}", single_quote(sql.trim())))
    }
}

/// Quote for `sh`: nothing inside single quotes is expanded, and each
/// embedded `'` becomes `'\''`
fn single_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', r"'\''"))
}
