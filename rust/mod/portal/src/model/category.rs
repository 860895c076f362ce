use serde::{Deserialize, Serialize};

/// Id of the catch-all category.
pub const OTHER_CATEGORY_ID: &str = "other";

/// A heading under which applications are grouped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub icon: String,

    #[serde(default)]
    pub color: String,

    #[serde(default)]
    pub description: String,

    /// Ascending sort key.
    #[serde(default)]
    pub order: i64,
}

impl Category {
    fn seed(id: &str, name: &str, icon: &str, color: &str, description: &str, order: i64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
            description: description.to_string(),
            order,
        }
    }
}

/// Categories seeded into new installations and injected by migrations.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::seed("admin", "Administration", "fas fa-shield-alt", "danger", "Gestion systeme et infrastructure", 1),
        Category::seed("collab", "Collaboration", "fas fa-users", "primary", "Communication et travail d'equipe", 2),
        Category::seed("monitoring", "Monitoring", "fas fa-chart-line", "success", "Supervision et metriques", 3),
        Category::seed("storage", "Stockage", "fas fa-cloud", "info", "Partage et archivage fichiers", 4),
        Category::seed("dev", "Developpement", "fas fa-code", "warning", "Outils developpeurs", 5),
        Category::seed(OTHER_CATEGORY_ID, "Autres", "fas fa-folder", "secondary", "Applications non categorisees", 99),
    ]
}
