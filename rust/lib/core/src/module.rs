use axum::Router;

/// A service module that contributes HTTP routes.
///
/// The binary entry point collects modules and nests each one's routes
/// under its prefix before adding system endpoints and middleware.
pub trait Module: Send + Sync {
    /// Module name, used for logging.
    fn name(&self) -> &str;

    /// Path prefix the routes are nested under (e.g. `/api`).
    fn prefix(&self) -> &str;

    /// Return the module's routes, with state already applied.
    fn routes(&self) -> Router;
}
