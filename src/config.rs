use crate::form::FormOptions;

/// Dashboard configuration.
///
/// The binary fills this from command-line flags; library users build it
/// directly or take the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminConfig {
    /// Start the mock stores with the sample users and roles.
    pub seed: bool,

    /// Role names offered on the user form, first one preselected.
    pub role_options: Vec<String>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            seed: true,
            role_options: FormOptions::default().roles,
        }
    }
}

impl AdminConfig {
    /// Select-control choices derived from this configuration.
    ///
    /// An empty role list falls back to the default choices.
    pub fn form_options(&self) -> FormOptions {
        if self.role_options.is_empty() {
            return FormOptions::default();
        }
        FormOptions {
            roles: self.role_options.clone(),
        }
    }
}
