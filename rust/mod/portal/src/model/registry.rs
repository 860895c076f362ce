use serde::{Deserialize, Serialize};

use crate::model::{Application, Category, default_categories};

/// The persisted aggregate: every category and application, stored and
/// replaced as one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryDocument {
    pub categories: Vec<Category>,
    pub applications: Vec<Application>,
}

impl RegistryDocument {
    /// Document written on first start: default categories plus three
    /// sample applications.
    pub fn seed() -> Self {
        Self {
            categories: default_categories(),
            applications: sample_applications(),
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn sample(
    id: &str,
    name: &str,
    description: &str,
    icon: &str,
    color: &str,
    groups: &[&str],
    category: &str,
    tags: &[&str],
) -> Application {
    Application {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        url: format!("https://{}.example.com", id),
        color: color.to_string(),
        groups: groups.iter().map(|g| g.to_string()).collect(),
        category: category.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        oidc: None,
        extra: Default::default(),
    }
}

fn sample_applications() -> Vec<Application> {
    vec![
        sample(
            "guacamole",
            "Guacamole",
            "Acces distant aux postes et serveurs",
            "fas fa-desktop",
            "app-success",
            &["GG-POM-ADMINS"],
            "admin",
            &["rdp", "ssh", "vnc", "bastion"],
        ),
        sample(
            "intranet",
            "Intranet",
            "Informations internes et actualites",
            "fas fa-building",
            "app-primary",
            &["GG-POM-USERS", "GG-POM-ADMINS"],
            "collab",
            &["intranet", "actualites", "communication"],
        ),
        sample(
            "tickets",
            "Support & Tickets",
            "Declarer et suivre vos demandes",
            "fas fa-ticket-alt",
            "app-info",
            &["GG-POM-USERS", "GG-POM-ADMINS"],
            "collab",
            &["support", "helpdesk", "glpi"],
        ),
    ]
}
