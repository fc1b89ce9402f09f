use super::{RouteNode, ViewId};

/// Layout identifier of the public section. Leaves under this layout sit
/// outside the session gate.
pub const LAYOUT: &str = "/auth";

/// Public Layout Routes
///
/// The only part of the portal reachable without a session credential. Every
/// other layout sits behind the session gate, and the gate's redirect target
/// (the login entry point) lives here, so this layout comes first in the
/// route table.
pub fn public_routes() -> Vec<RouteNode> {
    vec![
        // /auth/login
        // The login entry point. Unauthenticated navigation anywhere in the
        // portal lands here, with the originally requested path discarded.
        RouteNode::leaf("/login", LAYOUT, "Login", "key", ViewId::Login),
        // /auth forwards to the login leaf. Redirect markers are omitted
        // from both the menu and the flat route table.
        RouteNode::redirect("", LAYOUT, "/auth/login"),
    ]
}
