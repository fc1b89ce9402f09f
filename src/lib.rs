use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// --- Module Structure ---

// Core shell services and components.
pub mod auth;
pub mod config;
pub mod error;
pub mod menu;
pub mod models;
pub mod router;
pub mod transport;
pub mod workspace;

// Module for the statically authored navigation description
// (public, student, teacher, admin layouts).
pub mod routes;

use auth::{GateDecision, SessionContext, SessionGate};
use menu::{AccordionState, MenuEntry, build_menu};
use router::{Location, RouteTable};
use routes::{RouteNode, portal_route_tree};

// --- Public Re-exports ---

// Makes core state types easily accessible to embedding applications.
pub use auth::{FileSessionStore, MemorySessionStore, SessionCredential, SessionStoreState};
pub use config::{AppConfig, Env};
pub use error::ConfigError;
pub use transport::{ApiState, HttpPortalApi, MockPortalApi};
pub use workspace::{TeacherWorkspace, WorkspaceCache, WorkspaceStatus};

/// ShellState
///
/// Implements the **Unified State Pattern**: the single container holding all
/// services the shell depends on. Everything here is explicitly injected;
/// none of it is reachable through ambient globals.
#[derive(Clone)]
pub struct ShellState {
    /// Transport layer: the portal REST client behind the `PortalApi` trait.
    pub api: ApiState,
    /// Session layer: the explicit session-context object (created at login,
    /// destroyed at logout) read by the gate and the transport.
    pub session: SessionContext,
    /// Configuration: the loaded, immutable environment configuration.
    pub config: AppConfig,
}

/// PortalShell
///
/// The assembled navigation shell: validated route tree, flattened route
/// table, sidebar menu model, accordion state and session gate, all built
/// from one authored description so they can never disagree. One shell lives
/// for the lifetime of the navigation session.
pub struct PortalShell {
    state: ShellState,
    tree: Vec<RouteNode>,
    table: RouteTable,
    menu: Vec<MenuEntry>,
    gate: SessionGate,
    accordion: AccordionState,
    location: Location,
}

/// create_shell
///
/// Assembles the shell from the shared state: authors the route tree, derives
/// the route table and menu, and wires the session gate. Fails fast if the
/// configured login entry point does not resolve against the table, since the
/// gate's redirect target would otherwise dead-end.
pub fn create_shell(state: ShellState) -> Result<PortalShell, ConfigError> {
    let tree = portal_route_tree();
    let table = RouteTable::from_tree(&tree);
    let menu = build_menu(&tree);

    let login_path = state.config.login_path.clone();
    if table.resolve(&login_path).is_none() {
        return Err(ConfigError::UnresolvedLoginPath { path: login_path });
    }

    let gate = SessionGate::new(state.session.clone(), login_path.clone());
    let location = Location::new(login_path);
    let accordion = AccordionState::from_location(&tree, &location.path);

    tracing::info!(routes = table.routes().len(), "portal shell assembled");

    Ok(PortalShell {
        state,
        tree,
        table,
        menu,
        gate,
        accordion,
        location,
    })
}

impl PortalShell {
    /// navigate
    ///
    /// Drives one navigation: follows redirect markers, resolves the target
    /// against the route table (first match wins), recomputes the accordion
    /// from the new location, and runs the gate. Returns `None` for a path
    /// the table does not know.
    ///
    /// The gate is evaluated fresh on every call; a credential cleared since
    /// the previous navigation is observed here and nowhere earlier.
    pub fn navigate(&mut self, path: &str) -> Option<GateDecision> {
        let mut target = path.to_string();
        let mut hops = 0;
        while let Some(to) = self.table.redirect_target(&target) {
            hops += 1;
            if hops > 8 {
                tracing::warn!(path, "redirect chain too long, giving up");
                return None;
            }
            target = to.to_string();
        }

        let Some(route) = self.table.resolve(&target).cloned() else {
            tracing::warn!(path = %target, "navigation to unknown path");
            return None;
        };

        self.location = Location::new(target);
        self.accordion.sync_to_location(&self.tree, &self.location.path);

        // Public-layout leaves (the login entry point) sit outside the gate;
        // everything else is protected.
        if route.layout == routes::public::LAYOUT {
            return Some(GateDecision::Mount(auth::MountContext {
                route,
                location: self.location.clone(),
            }));
        }
        Some(self.gate.evaluate(&route, &self.location))
    }

    /// toggle_group
    ///
    /// Manual accordion toggle from the sidebar. Does not navigate.
    pub fn toggle_group(&mut self, group_path: &str) {
        self.accordion.toggle(group_path);
    }

    /// mount_teacher_workspace
    ///
    /// Constructs the teacher workspace for its subtree root: the cache is
    /// initialized (one fetch cycle) and registered on the invalidation
    /// signal. Dropping the returned bundle is the teardown.
    pub async fn mount_teacher_workspace(&self) -> TeacherWorkspace {
        TeacherWorkspace::mount(self.state.api.clone()).await
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn accordion(&self) -> &AccordionState {
        &self.accordion
    }

    pub fn menu(&self) -> &[MenuEntry] {
        &self.menu
    }

    pub fn route_table(&self) -> &RouteTable {
        &self.table
    }

    pub fn session(&self) -> &SessionContext {
        &self.state.session
    }
}

/// init_tracing
///
/// Sets up the logging stack for an embedding application. The filter
/// prioritizes `RUST_LOG`, falling back to a sensible default; the output
/// format is selected per environment: pretty print for local debugging,
/// JSON for ingestion by centralized log aggregators in production.
pub fn init_tracing(config: &AppConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "portal_shell=debug".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }
}
