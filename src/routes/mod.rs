/// Route Module Index
///
/// Organizes the portal's statically authored navigation description into one
/// module per layout, mirroring the role partition of the product
/// (public / student / teacher / admin). Each module returns the nested
/// `RouteNode` tree for its layout; `portal_route_tree` concatenates them in
/// traversal order, which is also first-match resolution order.
///
/// The tree is authored once at startup and never mutated afterwards.
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Routes reachable without a session credential (login entry point).
pub mod public;

/// Routes for the student layout (dashboard, record, announcements, challenge).
pub mod student;

/// Routes for the teacher layout. This subtree shares one workspace cache.
pub mod teacher;

/// Routes for the admin layout, including the managed-resources submenu.
pub mod admin;

/// ViewId
///
/// Identifies a concrete leaf view. The shell never renders; it only decides
/// *which* view mounts for a location, so a renderer is just this identifier
/// handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewId {
    Login,
    StudentDashboard,
    AcademicRecord,
    Announcements,
    ChallengeLeaderboard,
    TeacherDashboard,
    ClassroomList,
    ClassroomRoster,
    CoordinatedCourses,
    AdminDashboard,
    ManagementOverview,
    UserTable,
    CourseCatalog,
}

/// RouteNode
///
/// A node of the validated route/menu tree. The "exactly one kind" invariant
/// of the authoring format is a type-system guarantee here: a node is a group,
/// a leaf, or a redirect, and nothing else.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteNode {
    /// Path segment, relative to the parent (leading slash, e.g. "/classes").
    pub path: String,
    /// Owning top-level section identifier (e.g. "/teacher"). Present on
    /// top-level nodes; empty on nested children, which inherit it.
    pub layout: String,
    // Presentation metadata, carried through unchanged.
    pub name: String,
    pub icon: Option<String>,
    pub kind: RouteKind,
}

/// RouteKind
///
/// The three node kinds. A group may additionally carry a landing renderer of
/// its own, which flattens to one entry ahead of its children.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteKind {
    Group {
        landing: Option<ViewId>,
        children: Vec<RouteNode>,
    },
    Leaf {
        renderer: ViewId,
    },
    /// Not independently navigable; omitted from both the menu and the flat
    /// route table.
    Redirect { to: String },
}

impl RouteNode {
    /// Authors a submenu group.
    pub fn group(
        path: &str,
        layout: &str,
        name: &str,
        icon: &str,
        children: Vec<RouteNode>,
    ) -> Self {
        Self {
            path: path.to_string(),
            layout: layout.to_string(),
            name: name.to_string(),
            icon: Some(icon.to_string()),
            kind: RouteKind::Group {
                landing: None,
                children,
            },
        }
    }

    /// Authors a group that also owns a landing page of its own.
    pub fn group_with_landing(
        path: &str,
        layout: &str,
        name: &str,
        icon: &str,
        landing: ViewId,
        children: Vec<RouteNode>,
    ) -> Self {
        Self {
            path: path.to_string(),
            layout: layout.to_string(),
            name: name.to_string(),
            icon: Some(icon.to_string()),
            kind: RouteKind::Group {
                landing: Some(landing),
                children,
            },
        }
    }

    /// Authors a navigable leaf bound to a renderer.
    pub fn leaf(path: &str, layout: &str, name: &str, icon: &str, renderer: ViewId) -> Self {
        Self {
            path: path.to_string(),
            layout: layout.to_string(),
            name: name.to_string(),
            icon: Some(icon.to_string()),
            kind: RouteKind::Leaf { renderer },
        }
    }

    /// Authors a redirect marker (default-landing entries).
    pub fn redirect(path: &str, layout: &str, to: &str) -> Self {
        Self {
            path: path.to_string(),
            layout: layout.to_string(),
            name: String::new(),
            icon: None,
            kind: RouteKind::Redirect { to: to.to_string() },
        }
    }

    /// children
    ///
    /// Convenience accessor: the node's children if it is a group, empty
    /// otherwise.
    pub fn children(&self) -> &[RouteNode] {
        match &self.kind {
            RouteKind::Group { children, .. } => children,
            _ => &[],
        }
    }
}

/// RawRouteNode
///
/// The serde-facing authoring record, shaped exactly like the external
/// menu/route configuration format: `children`, `renderer` and `redirect` are
/// all optional fields, and the kind invariant is only a convention at this
/// stage. `build_route_tree` converts a raw tree into validated `RouteNode`s,
/// rejecting malformed nodes eagerly: a bad node is an authoring bug, not
/// runtime data, so it must never be silently skipped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRouteNode {
    pub path: String,
    #[serde(default)]
    pub layout: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub children: Option<Vec<RawRouteNode>>,
    #[serde(default)]
    pub renderer: Option<ViewId>,
    #[serde(default)]
    pub redirect: Option<String>,
}

/// build_route_tree
///
/// Validates and converts a whole raw tree. Fails fast on the first malformed
/// node, identifying it by path.
pub fn build_route_tree(raw: Vec<RawRouteNode>) -> Result<Vec<RouteNode>, ConfigError> {
    raw.into_iter().map(RouteNode::try_from).collect()
}

impl TryFrom<RawRouteNode> for RouteNode {
    type Error = ConfigError;

    /// Enforces the kind invariant of the authoring format:
    /// - children (+ optional renderer, the landing-page form) → Group
    /// - renderer alone → Leaf
    /// - redirect alone → Redirect
    /// Anything else is malformed.
    fn try_from(raw: RawRouteNode) -> Result<Self, Self::Error> {
        let kind = match (raw.children, raw.renderer, raw.redirect) {
            (Some(children), landing, None) => {
                if children.is_empty() {
                    return Err(ConfigError::EmptyGroup { path: raw.path });
                }
                let children = children
                    .into_iter()
                    .map(RouteNode::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                RouteKind::Group { landing, children }
            }
            (None, Some(renderer), None) => RouteKind::Leaf { renderer },
            (None, None, Some(to)) => RouteKind::Redirect { to },
            (None, None, None) => {
                return Err(ConfigError::MalformedRouteNode {
                    path: raw.path,
                    reason: "node has none of children/renderer/redirect".to_string(),
                });
            }
            _ => {
                return Err(ConfigError::MalformedRouteNode {
                    path: raw.path,
                    reason: "redirect cannot be combined with children or renderer".to_string(),
                });
            }
        };

        Ok(RouteNode {
            path: raw.path,
            layout: raw.layout,
            name: raw.name,
            icon: raw.icon,
            kind,
        })
    }
}

/// portal_route_tree
///
/// The complete authored navigation description for the portal, in traversal
/// order. First-match resolution depends on this order, so the public layout
/// (and its login entry) comes first.
pub fn portal_route_tree() -> Vec<RouteNode> {
    let mut tree = public::public_routes();
    tree.extend(student::student_routes());
    tree.extend(teacher::teacher_routes());
    tree.extend(admin::admin_routes());
    tree
}
