use super::{RouteNode, ViewId};

/// Admin Layout Routes
///
/// Restricted to the admin role by the backend; the shell only gates on
/// credential presence. The "Management" group carries its own landing page,
/// which flattens to one entry ahead of the group's children.
pub fn admin_routes() -> Vec<RouteNode> {
    vec![
        // /admin/dashboard
        RouteNode::leaf(
            "/dashboard",
            "/admin",
            "Dashboard",
            "home",
            ViewId::AdminDashboard,
        ),
        // /admin/management and /admin/management/*: submenu with landing.
        RouteNode::group_with_landing(
            "/management",
            "/admin",
            "Management",
            "settings",
            ViewId::ManagementOverview,
            vec![
                // /admin/management/users
                RouteNode::leaf("/users", "", "Users", "user", ViewId::UserTable),
                // /admin/management/courses
                RouteNode::leaf("/courses", "", "Courses", "book", ViewId::CourseCatalog),
            ],
        ),
        // /admin/announcements
        RouteNode::leaf(
            "/announcements",
            "/admin",
            "Announcements",
            "bell",
            ViewId::Announcements,
        ),
        // /admin, default landing.
        RouteNode::redirect("", "/admin", "/admin/dashboard"),
    ]
}
