use crate::routes::{RouteKind, RouteNode, ViewId};

/// Location
///
/// The active location as supplied by the navigation shell, one value per
/// render. Only the path is modelled; the shell has no use for query or hash
/// fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// FlatRoute
///
/// One renderable route entry, derived from a leaf of the authored tree:
/// the fully joined mount path (layout + ancestor segments + own segment),
/// the owning layout, and the renderer to mount there.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRoute {
    pub full_path: String,
    pub layout: String,
    pub renderer: ViewId,
}

/// flatten
///
/// Expands the nested route description into the ordered flat list the route
/// table is built from. Depth-first, first-group-first; each leaf contributes
/// exactly one entry, a group with a landing renderer contributes its own
/// entry ahead of its children's, and redirect markers contribute nothing.
///
/// Pure and side-effect-free: the same tree always yields the same list, so
/// callers flatten once at startup and keep the result for the session (the
/// tree is static).
pub fn flatten(tree: &[RouteNode]) -> Vec<FlatRoute> {
    let mut out = Vec::new();
    for node in tree {
        flatten_into(node, &node.layout, &node.layout, &mut out);
    }
    out
}

fn flatten_into(node: &RouteNode, prefix: &str, layout: &str, out: &mut Vec<FlatRoute>) {
    let full_path = format!("{}{}", prefix, node.path);
    match &node.kind {
        RouteKind::Leaf { renderer } => out.push(FlatRoute {
            full_path,
            layout: layout.to_string(),
            renderer: *renderer,
        }),
        RouteKind::Group { landing, children } => {
            // The group's own landing page precedes its children in match order.
            if let Some(renderer) = landing {
                out.push(FlatRoute {
                    full_path: full_path.clone(),
                    layout: layout.to_string(),
                    renderer: *renderer,
                });
            }
            for child in children {
                flatten_into(child, &full_path, layout, out);
            }
        }
        RouteKind::Redirect { .. } => {}
    }
}

/// RouteTable
///
/// The declarative route table handed to the navigation shell: the flattened
/// entries plus the redirect markers, both in traversal order. Resolution is
/// strictly first-match over that order.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<FlatRoute>,
    // (full source path, target path) pairs from redirect markers.
    redirects: Vec<(String, String)>,
}

impl RouteTable {
    /// from_tree
    ///
    /// Builds the table from a validated tree. Called once at shell assembly.
    pub fn from_tree(tree: &[RouteNode]) -> Self {
        let routes = flatten(tree);
        let mut redirects = Vec::new();
        for node in tree {
            collect_redirects(node, &node.layout, &mut redirects);
        }
        Self { routes, redirects }
    }

    pub fn routes(&self) -> &[FlatRoute] {
        &self.routes
    }

    /// resolve
    ///
    /// First-match lookup of a location against the flattened entries.
    pub fn resolve(&self, path: &str) -> Option<&FlatRoute> {
        self.routes.iter().find(|route| route.full_path == path)
    }

    /// redirect_target
    ///
    /// If the path carries a redirect marker, the target it forwards to.
    pub fn redirect_target(&self, path: &str) -> Option<&str> {
        self.redirects
            .iter()
            .find(|(from, _)| from == path)
            .map(|(_, to)| to.as_str())
    }
}

fn collect_redirects(node: &RouteNode, prefix: &str, out: &mut Vec<(String, String)>) {
    let full_path = format!("{}{}", prefix, node.path);
    match &node.kind {
        RouteKind::Redirect { to } => out.push((full_path, to.clone())),
        RouteKind::Group { children, .. } => {
            for child in children {
                collect_redirects(child, &full_path, out);
            }
        }
        RouteKind::Leaf { .. } => {}
    }
}
